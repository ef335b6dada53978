use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Date;
use log::{debug, error, info};

use crate::catalog::{Report, RowShape};
use crate::charts::CLAIMS_PER_DAY_SQL;
use crate::frame::Frame;
use crate::models::{
    CategoryCount, Claim, ClaimantRow, DailyClaims, FoodListing, Provider, ProviderListingRow,
    Receiver, Total,
};
use crate::schema::{claims, food_listings, providers, receivers};
use crate::store::{DataError, DateRange, Store, TableName};

pub fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
    match PgConnection::establish(database_url) {
        Ok(conn) => {
            debug!("Database connection established");
            Ok(conn)
        }
        Err(e) => {
            error!("Failed to establish database connection: {}", e);
            Err(e)
        }
    }
}

/// PostgreSQL-backed [`Store`]. Opens a fresh connection for every call.
#[derive(Clone)]
pub struct PgStore {
    database_url: String,
}

impl PgStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Runs `f` on a connection that lives exactly as long as the call.
    ///
    /// The connection is dropped (and closed) on every exit path, including
    /// errors returned by `f` and panics unwinding through it.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut PgConnection) -> QueryResult<T>,
    ) -> Result<T, DataError> {
        let mut conn = establish_connection(&self.database_url)?;
        let result = f(&mut conn);
        drop(conn);
        debug!("Database connection released");
        result.map_err(|e| {
            error!("Query failed: {}", e);
            DataError::Query(e)
        })
    }
}

impl Store for PgStore {
    fn ping(&self) -> Result<(), DataError> {
        let one: i32 = self.with_connection(|conn| {
            diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1")).get_result(conn)
        })?;
        info!("Database test query result: {}", one);
        Ok(())
    }

    fn browse(&self, table: TableName) -> Result<Frame, DataError> {
        info!("Loading table {}", table);
        self.with_connection(|conn| {
            Ok(match table {
                TableName::Providers => Frame::from_rows(providers::table.load::<Provider>(conn)?),
                TableName::Receivers => Frame::from_rows(receivers::table.load::<Receiver>(conn)?),
                TableName::FoodListings => {
                    Frame::from_rows(food_listings::table.load::<FoodListing>(conn)?)
                }
                TableName::Claims => Frame::from_rows(claims::table.load::<Claim>(conn)?),
            })
        })
    }

    fn run_report(&self, report: &Report) -> Result<Frame, DataError> {
        info!("Running report {:?}", report.label);
        self.with_connection(|conn| {
            let query = diesel::sql_query(report.sql);
            Ok(match report.shape {
                RowShape::Providers => Frame::from_rows(query.load::<Provider>(conn)?),
                RowShape::Claims => Frame::from_rows(query.load::<Claim>(conn)?),
                RowShape::FoodListings => Frame::from_rows(query.load::<FoodListing>(conn)?),
                RowShape::Claimants => Frame::from_rows(query.load::<ClaimantRow>(conn)?),
                RowShape::ProviderListings => {
                    Frame::from_rows(query.load::<ProviderListingRow>(conn)?)
                }
            })
        })
    }

    fn category_counts(&self, sql: &str) -> Result<Vec<CategoryCount>, DataError> {
        self.with_connection(|conn| diesel::sql_query(sql).load::<CategoryCount>(conn))
    }

    fn claims_per_day(&self, range: DateRange) -> Result<Vec<DailyClaims>, DataError> {
        info!("Counting claims between {} and {}", range.start, range.end);
        self.with_connection(|conn| {
            diesel::sql_query(CLAIMS_PER_DAY_SQL)
                .bind::<Date, _>(range.start)
                .bind::<Date, _>(range.end)
                .load::<DailyClaims>(conn)
        })
    }

    fn count(&self, sql: &str) -> Result<i64, DataError> {
        self.with_connection(|conn| diesel::sql_query(sql).get_result::<Total>(conn))
            .map(|row| row.total)
    }
}
