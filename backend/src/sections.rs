//! One handler per navigation entry. Each call evaluates its section from
//! scratch and returns the widgets to show; nothing is kept between calls.

use chrono::NaiveDate;
use log::{error, warn};
use serde::Deserialize;

use crate::catalog;
use crate::charts::{self, ClaimTally, Visualization};
use crate::page::{Choice, Page, Section, Widget};
use crate::store::{Store, TableName};

/// Chart behaviour taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    pub tally: ClaimTally,
    pub window_days: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            tally: ClaimTally::default(),
            window_days: charts::DEFAULT_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisualizationRequest {
    pub chart: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn table_select(selected: TableName) -> Widget {
    Widget::Select {
        name: "table",
        label: "Select Table".to_string(),
        choices: TableName::ALL
            .iter()
            .map(|table| Choice::new(table.as_str(), table.as_str()))
            .collect(),
        selected: selected.as_str().to_string(),
    }
}

fn parse_table(page: &mut Page, table: Option<&str>) -> Option<TableName> {
    match table {
        None => Some(TableName::Providers),
        Some(raw) => match raw.parse::<TableName>() {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("Rejected table selection: {}", e);
                page.push(table_select(TableName::Providers));
                page.push(Widget::error(format!("Cannot show {}", e)));
                None
            }
        },
    }
}

pub fn view_tables(store: &dyn Store, table: Option<&str>) -> Page {
    let mut page = Page::new(Section::ViewTables);
    let Some(table) = parse_table(&mut page, table) else {
        return page;
    };
    page.push(table_select(table));
    match store.browse(table) {
        Ok(frame) => {
            page.push(Widget::Table { frame });
        }
        Err(e) => {
            error!("Failed to load table {}: {}", table, e);
            page.push(Widget::error(format!("Error loading table `{}`: {}", table, e)));
        }
    }
    page
}

pub fn run_queries(store: &dyn Store, slug: Option<&str>) -> Page {
    let mut page = Page::new(Section::RunQueries);
    page.push(Widget::subheader("Run Predefined SQL Queries"));

    let selected = match slug {
        None => Some(catalog::default_report()),
        Some(slug) => catalog::find_by_slug(slug),
    };
    page.push(Widget::Select {
        name: "report",
        label: "Choose a Query".to_string(),
        choices: catalog::reports()
            .iter()
            .map(|report| Choice::new(report.slug, report.label))
            .collect(),
        selected: selected
            .unwrap_or_else(catalog::default_report)
            .slug
            .to_string(),
    });

    let Some(report) = selected else {
        page.push(Widget::error(format!(
            "Unknown query `{}`",
            slug.unwrap_or_default()
        )));
        return page;
    };
    match store.run_report(report) {
        Ok(frame) => {
            page.push(Widget::Table { frame });
        }
        Err(e) => {
            error!("Report {:?} failed: {}", report.label, e);
            page.push(Widget::error(format!("Error running query: {}", e)));
        }
    }
    page
}

pub fn visualizations(
    store: &dyn Store,
    request: &VisualizationRequest,
    settings: ChartSettings,
    today: NaiveDate,
) -> Page {
    let mut page = Page::new(Section::Visualizations);
    page.push(Widget::subheader("Data Visualizations"));

    let selected = match request.chart.as_deref() {
        None => Some(Visualization::ClaimsPerDay),
        Some(slug) => Visualization::from_slug(slug),
    };
    page.push(Widget::Select {
        name: "chart",
        label: "Choose Visualization".to_string(),
        choices: Visualization::ALL
            .iter()
            .map(|viz| Choice::new(viz.slug(), viz.label()))
            .collect(),
        selected: selected
            .unwrap_or(Visualization::ClaimsPerDay)
            .slug()
            .to_string(),
    });

    let Some(viz) = selected else {
        page.push(Widget::error(format!(
            "Unknown visualization `{}`",
            request.chart.as_deref().unwrap_or_default()
        )));
        return page;
    };

    let range = match charts::range_for(
        viz,
        request.start.as_deref(),
        request.end.as_deref(),
        today,
        settings.window_days,
    ) {
        Ok(range) => range,
        Err(e) => {
            warn!("Rejected date input: {}", e);
            page.push(raw_date_input("start", "Start Date", &request.start));
            page.push(raw_date_input("end", "End Date", &request.end));
            page.push(Widget::error(e.to_string()));
            return page;
        }
    };
    if viz.uses_date_range() {
        page.push(Widget::date_input("start", "Start Date", range.start));
        page.push(Widget::date_input("end", "End Date", range.end));
    }

    match charts::render(store, viz, range, settings.tally) {
        Ok(rendered) => {
            if let Some(frame) = rendered.frame {
                page.push(Widget::Table { frame });
            }
            page.push(Widget::Chart {
                chart: rendered.chart,
            });
        }
        Err(e) => {
            error!("Visualization {} failed: {}", viz.slug(), e);
            page.push(Widget::error(format!("Error running query: {}", e)));
        }
    }
    page
}

// Echoes back what was typed so the operator can correct it.
fn raw_date_input(name: &'static str, label: &str, raw: &Option<String>) -> Widget {
    Widget::DateInput {
        name,
        label: label.to_string(),
        value: raw.clone().unwrap_or_default(),
    }
}

pub fn add_record(table: Option<&str>) -> Page {
    let mut page = Page::new(Section::AddRecord);
    page.push(Widget::subheader("Add New Record"));
    let Some(table) = parse_table(&mut page, table) else {
        return page;
    };
    page.push(table_select(table));
    page.push(Widget::info(format!(
        "Form to insert data into `{}` coming soon!",
        table
    )));
    page
}

pub fn update_record() -> Page {
    let mut page = Page::new(Section::UpdateRecord);
    page.push(Widget::subheader("Update Existing Record"))
        .push(Widget::info("Update feature is coming soon!"));
    page
}

pub fn delete_record() -> Page {
    let mut page = Page::new(Section::DeleteRecord);
    page.push(Widget::subheader("Delete Record"))
        .push(Widget::info("Delete feature is coming soon!"));
    page
}

pub fn about() -> Page {
    let mut page = Page::new(Section::About);
    page.push(Widget::subheader("Project Info")).push(Widget::Markdown {
        lines: vec![
            "**Project Title**: Local Food Waste Management".to_string(),
            "**Built With**: Rust, PostgreSQL, axum, diesel, Plotly".to_string(),
            "**Purpose**: Efficiently manage food donations and reduce wastage by matching \
             donors and receivers."
                .to_string(),
        ],
    });
    page
}
