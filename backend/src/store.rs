use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::Report;
use crate::frame::Frame;
use crate::models::{CategoryCount, DailyClaims};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("could not connect to the database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("{0}")]
    Query(#[from] diesel::result::Error),
}

/// The four tables the dashboard may browse. Nothing else reaches a `FROM` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Providers,
    Receivers,
    FoodListings,
    Claims,
}

impl TableName {
    pub const ALL: [TableName; 4] = [
        TableName::Providers,
        TableName::Receivers,
        TableName::FoodListings,
        TableName::Claims,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Providers => "providers",
            TableName::Receivers => "receivers",
            TableName::FoodListings => "food_listings",
            TableName::Claims => "claims",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown table `{0}`")]
pub struct UnknownTable(pub String);

impl FromStr for TableName {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| UnknownTable(s.to_string()))
    }
}

/// Inclusive calendar range; `start > end` is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Read-only access to the food donation database.
///
/// Every call is one statement on a connection of its own; implementations
/// must not hold connections between calls.
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health check.
    fn ping(&self) -> Result<(), DataError>;

    /// All rows of `table` in the database's default order.
    fn browse(&self, table: TableName) -> Result<Frame, DataError>;

    fn run_report(&self, report: &Report) -> Result<Frame, DataError>;

    /// Runs a query producing `category, total` rows.
    fn category_counts(&self, sql: &str) -> Result<Vec<CategoryCount>, DataError>;

    /// Claims grouped per calendar day within `range`, ordered by day.
    fn claims_per_day(&self, range: DateRange) -> Result<Vec<DailyClaims>, DataError>;

    /// Runs a single-row query producing a `total` column.
    fn count(&self, sql: &str) -> Result<i64, DataError>;
}
