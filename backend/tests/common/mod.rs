#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use food_waste_dashboard::catalog::Report;
use food_waste_dashboard::charts::{
    CLAIMED_LISTINGS_SQL, MOST_CLAIMED_SQL, TOTAL_CLAIMS_SQL, TOTAL_LISTINGS_SQL,
};
use food_waste_dashboard::config::AppConfig;
use food_waste_dashboard::frame::{Cell, Frame};
use food_waste_dashboard::models::{CategoryCount, DailyClaims};
use food_waste_dashboard::store::{DataError, DateRange, Store, TableName};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn default_config() -> AppConfig {
    AppConfig::from_builder(config::Config::builder()).expect("default config")
}

/// In-memory [`Store`] answering from canned results and recording every call.
#[derive(Default)]
pub struct FakeStore {
    pub tables: HashMap<TableName, Frame>,
    pub reports: HashMap<&'static str, Frame>,
    pub groups: HashMap<&'static str, Vec<CategoryCount>>,
    pub daily: Vec<DailyClaims>,
    pub counts: HashMap<&'static str, i64>,
    pub failure: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeStore {
    /// 5 listings, 3 claims covering 2 listings: one claimed twice on
    /// 2024-01-01 and one claimed once on 2024-01-03.
    pub fn seeded() -> Self {
        let mut providers = Frame::new(&["provider_id", "name", "city"]);
        providers.push_row(vec![Cell::Int(1), "Green Grocer".into(), "Austin".into()]);
        providers.push_row(vec![Cell::Int(2), "Corner Bakery".into(), "Dallas".into()]);

        let mut store = Self::default();
        store.tables.insert(TableName::Providers, providers.clone());
        store.reports.insert("all-providers", providers);
        store.daily = vec![
            DailyClaims {
                claim_date: date(2024, 1, 1),
                total_claims: 2,
            },
            DailyClaims {
                claim_date: date(2024, 1, 3),
                total_claims: 1,
            },
        ];
        store.counts.insert(TOTAL_CLAIMS_SQL, 3);
        store.counts.insert(TOTAL_LISTINGS_SQL, 5);
        store.counts.insert(CLAIMED_LISTINGS_SQL, 2);
        store.groups.insert(
            MOST_CLAIMED_SQL,
            vec![CategoryCount {
                category: Some("Bread".to_string()),
                total: 2,
            }],
        );
        store
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), DataError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(DataError::Connection(
                diesel::ConnectionError::BadConnection(message.clone()),
            )),
            None => Ok(()),
        }
    }
}

impl Store for FakeStore {
    fn ping(&self) -> Result<(), DataError> {
        self.record("ping".to_string())
    }

    fn browse(&self, table: TableName) -> Result<Frame, DataError> {
        self.record(format!("browse {}", table))?;
        Ok(self.tables.get(&table).cloned().unwrap_or_default())
    }

    fn run_report(&self, report: &Report) -> Result<Frame, DataError> {
        self.record(format!("report {}", report.slug))?;
        Ok(self.reports.get(report.slug).cloned().unwrap_or_default())
    }

    fn category_counts(&self, sql: &str) -> Result<Vec<CategoryCount>, DataError> {
        self.record(format!("groups {}", sql))?;
        Ok(self.groups.get(sql).cloned().unwrap_or_default())
    }

    fn claims_per_day(&self, range: DateRange) -> Result<Vec<DailyClaims>, DataError> {
        self.record(format!("claims_per_day {} {}", range.start, range.end))?;
        Ok(self
            .daily
            .iter()
            .filter(|day| range.start <= day.claim_date && day.claim_date <= range.end)
            .cloned()
            .collect())
    }

    fn count(&self, sql: &str) -> Result<i64, DataError> {
        self.record(format!("count {}", sql))?;
        Ok(self.counts.get(sql).copied().unwrap_or_default())
    }
}
