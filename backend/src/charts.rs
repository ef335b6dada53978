//! Aggregate visualizations and the chart figures they produce.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::frame::{Cell, Frame};
use crate::models::CategoryCount;
use crate::store::{DataError, DateRange, Store};

pub const CLAIMS_PER_DAY_SQL: &str = "SELECT DATE(timestamp) AS claim_date, COUNT(*) AS total_claims \
     FROM claims \
     WHERE DATE(timestamp) BETWEEN $1 AND $2 \
     GROUP BY claim_date \
     ORDER BY claim_date;";

pub const LISTINGS_BY_FOOD_TYPE_SQL: &str = "SELECT food_type AS category, COUNT(*) AS total \
     FROM food_listings \
     GROUP BY food_type \
     ORDER BY food_type;";

pub const MEAL_TYPE_DISTRIBUTION_SQL: &str = "SELECT meal_type AS category, COUNT(*) AS total \
     FROM food_listings \
     GROUP BY meal_type \
     ORDER BY meal_type;";

pub const TOP_CITIES_SQL: &str = "SELECT p.city AS category, COUNT(*) AS total \
     FROM providers p \
     JOIN food_listings f ON p.provider_id = f.provider_id \
     GROUP BY p.city \
     ORDER BY total DESC, p.city ASC \
     LIMIT 5;";

/// Ties on the claim count go to the alphabetically first food name.
pub const MOST_CLAIMED_SQL: &str = "SELECT f.food_name AS category, COUNT(*) AS total \
     FROM claims c \
     JOIN food_listings f ON c.food_id = f.food_id \
     GROUP BY f.food_name \
     ORDER BY total DESC, f.food_name ASC \
     LIMIT 1;";

pub const TOTAL_CLAIMS_SQL: &str = "SELECT COUNT(*) AS total FROM claims;";
pub const TOTAL_LISTINGS_SQL: &str = "SELECT COUNT(*) AS total FROM food_listings;";
pub const CLAIMED_LISTINGS_SQL: &str = "SELECT COUNT(DISTINCT food_id) AS total FROM claims;";

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Chart label for rows whose grouping column is NULL.
pub const MISSING_CATEGORY: &str = "(missing)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visualization {
    ClaimsPerDay,
    ListingsByFoodType,
    MealTypeDistribution,
    TopCities,
    ClaimedVsUnclaimed,
    MostClaimedItem,
}

impl Visualization {
    pub const ALL: [Visualization; 6] = [
        Visualization::ClaimsPerDay,
        Visualization::ListingsByFoodType,
        Visualization::MealTypeDistribution,
        Visualization::TopCities,
        Visualization::ClaimedVsUnclaimed,
        Visualization::MostClaimedItem,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Visualization::ClaimsPerDay => "Claims per Day (line chart)",
            Visualization::ListingsByFoodType => "Food Listings by Type (bar chart)",
            Visualization::MealTypeDistribution => "Meal Type Distribution (pie chart)",
            Visualization::TopCities => "Top 5 Cities by Food Listings",
            Visualization::ClaimedVsUnclaimed => "Claimed vs Unclaimed Food (pie chart)",
            Visualization::MostClaimedItem => "Most Claimed Food Item",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Visualization::ClaimsPerDay => "claims-per-day",
            Visualization::ListingsByFoodType => "listings-by-food-type",
            Visualization::MealTypeDistribution => "meal-type-distribution",
            Visualization::TopCities => "top-cities",
            Visualization::ClaimedVsUnclaimed => "claimed-vs-unclaimed",
            Visualization::MostClaimedItem => "most-claimed-item",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|viz| viz.slug() == slug)
    }

    /// Only the claims-per-day chart takes a date range.
    pub fn uses_date_range(self) -> bool {
        matches!(self, Visualization::ClaimsPerDay)
    }
}

/// How the claimed/unclaimed pie counts the "claimed" slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimTally {
    /// Raw claim rows, so a listing claimed twice counts twice.
    #[default]
    RawClaims,
    /// Distinct listings with at least one claim.
    DistinctListings,
}

/// The three counts behind the claimed/unclaimed pie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimTotals {
    pub claims: i64,
    pub listings: i64,
    pub claimed_listings: i64,
}

impl ClaimTotals {
    pub fn load(store: &dyn Store) -> Result<Self, DataError> {
        Ok(Self {
            claims: store.count(TOTAL_CLAIMS_SQL)?,
            listings: store.count(TOTAL_LISTINGS_SQL)?,
            claimed_listings: store.count(CLAIMED_LISTINGS_SQL)?,
        })
    }

    /// `(claimed, unclaimed)` under the given tally.
    pub fn split(&self, tally: ClaimTally) -> (i64, i64) {
        let unclaimed = self.listings - self.claimed_listings;
        let claimed = match tally {
            ClaimTally::RawClaims => self.claims,
            ClaimTally::DistinctListings => self.claimed_listings,
        };
        (claimed, unclaimed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Bars get one trace (and one colour) per category.
    pub color_by_category: bool,
    pub points: Vec<Point>,
}

impl Chart {
    fn new(kind: ChartKind, title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            color_by_category: false,
            points: Vec::new(),
        }
    }

    fn colored(mut self) -> Self {
        self.color_by_category = true;
        self
    }

    fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Plotly figure (`data` + `layout`) for this chart.
    pub fn to_plotly(&self) -> Value {
        let labels: Vec<&str> = self.points.iter().map(|p| p.label.as_str()).collect();
        let values: Vec<i64> = self.points.iter().map(|p| p.value).collect();

        let data = match self.kind {
            ChartKind::Line => json!([{
                "type": "scatter",
                "mode": "lines",
                "x": labels,
                "y": values,
            }]),
            ChartKind::Bar if self.color_by_category => Value::Array(
                self.points
                    .iter()
                    .map(|p| {
                        json!({
                            "type": "bar",
                            "name": p.label,
                            "x": [p.label],
                            "y": [p.value],
                        })
                    })
                    .collect(),
            ),
            ChartKind::Bar => json!([{ "type": "bar", "x": labels, "y": values }]),
            ChartKind::Pie => json!([{ "type": "pie", "labels": labels, "values": values }]),
        };

        let layout = match self.kind {
            ChartKind::Pie => json!({ "title": { "text": self.title } }),
            _ => json!({
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_label } },
                "yaxis": { "title": { "text": self.y_label } },
            }),
        };

        json!({ "data": data, "layout": layout })
    }
}

/// What a visualization shows: an optional table of the aggregated rows and the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub frame: Option<Frame>,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} `{value}` is not a date in YYYY-MM-DD form")]
    InvalidDate { field: &'static str, value: String },
}

/// Builds the range from the raw date inputs, defaulting to the last
/// `window_days` days through `today`. Start after end is accepted as is.
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    window_days: u32,
) -> Result<DateRange, InputError> {
    let start = parse_date("Start Date", start, window_start(today, window_days))?;
    let end = parse_date("End Date", end, today)?;
    Ok(DateRange::new(start, end))
}

/// The range `viz` runs with. Date inputs are only read by visualizations
/// that take a range; the others ignore them and get the default window.
pub fn range_for(
    viz: Visualization,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    window_days: u32,
) -> Result<DateRange, InputError> {
    if viz.uses_date_range() {
        resolve_range(start, end, today, window_days)
    } else {
        Ok(DateRange::new(window_start(today, window_days), today))
    }
}

fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

fn parse_date(
    field: &'static str,
    raw: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate, InputError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            InputError::InvalidDate {
                field,
                value: value.to_string(),
            }
        }),
    }
}

/// Runs the queries behind `viz` and assembles its chart.
pub fn render(
    store: &dyn Store,
    viz: Visualization,
    range: DateRange,
    tally: ClaimTally,
) -> Result<Rendered, DataError> {
    match viz {
        Visualization::ClaimsPerDay => {
            let days = store.claims_per_day(range)?;
            let points = days
                .iter()
                .map(|day| Point {
                    label: day.claim_date.format("%Y-%m-%d").to_string(),
                    value: day.total_claims,
                })
                .collect();
            Ok(Rendered {
                frame: Some(Frame::from_rows(days)),
                chart: Chart::new(ChartKind::Line, "Claims Per Day", "claim_date", "total_claims")
                    .with_points(points),
            })
        }
        Visualization::ListingsByFoodType => grouped(
            store,
            LISTINGS_BY_FOOD_TYPE_SQL,
            Chart::new(ChartKind::Bar, "Food Listings by Type", "food_type", "total").colored(),
        ),
        Visualization::MealTypeDistribution => grouped(
            store,
            MEAL_TYPE_DISTRIBUTION_SQL,
            Chart::new(ChartKind::Pie, "Meal Type Distribution", "meal_type", "total"),
        ),
        Visualization::TopCities => grouped(
            store,
            TOP_CITIES_SQL,
            Chart::new(ChartKind::Bar, "Top 5 Cities by Listings", "city", "total").colored(),
        ),
        Visualization::ClaimedVsUnclaimed => {
            let (claimed, unclaimed) = ClaimTotals::load(store)?.split(tally);
            Ok(Rendered {
                frame: None,
                chart: Chart::new(ChartKind::Pie, "Claimed vs Unclaimed Food", "Status", "Count")
                    .with_points(vec![
                        Point {
                            label: "Claimed".to_string(),
                            value: claimed,
                        },
                        Point {
                            label: "Unclaimed".to_string(),
                            value: unclaimed,
                        },
                    ]),
            })
        }
        Visualization::MostClaimedItem => grouped(
            store,
            MOST_CLAIMED_SQL,
            Chart::new(ChartKind::Bar, "Most Claimed Food Item", "food_name", "total_claims"),
        ),
    }
}

fn grouped(store: &dyn Store, sql: &str, chart: Chart) -> Result<Rendered, DataError> {
    let counts = store.category_counts(sql)?;
    let mut frame = Frame::new(&[chart.x_label.as_str(), chart.y_label.as_str()]);
    let mut points = Vec::with_capacity(counts.len());
    for CategoryCount { category, total } in counts {
        let label = category
            .clone()
            .unwrap_or_else(|| MISSING_CATEGORY.to_string());
        frame.push_row(vec![Cell::from(category), Cell::Int(total)]);
        points.push(Point {
            label,
            value: total,
        });
    }
    Ok(Rendered {
        frame: Some(frame),
        chart: chart.with_points(points),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_tally_counts_claim_rows() {
        // 5 listings, one claimed twice and one claimed once.
        let totals = ClaimTotals {
            claims: 3,
            listings: 5,
            claimed_listings: 2,
        };
        assert_eq!(totals.split(ClaimTally::RawClaims), (3, 3));
        assert_eq!(totals.split(ClaimTally::DistinctListings), (2, 3));
        assert_eq!(ClaimTally::default(), ClaimTally::RawClaims);
    }

    #[test]
    fn range_defaults_to_trailing_window() {
        let today = date(2024, 3, 31);
        let range = resolve_range(None, Some(""), today, DEFAULT_WINDOW_DAYS).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 3, 1), today));
    }

    #[test]
    fn oversized_window_clamps_to_the_earliest_date() {
        let today = date(2024, 1, 1);
        let range = resolve_range(None, None, today, u32::MAX).unwrap();
        assert_eq!(range.start, NaiveDate::MIN);
        assert_eq!(range.end, today);
    }

    #[test]
    fn undated_charts_ignore_date_inputs() {
        let today = date(2024, 3, 31);
        let range = range_for(Visualization::TopCities, Some("x"), Some("01/03/2024"), today, 30)
            .unwrap();
        assert_eq!(range, DateRange::new(date(2024, 3, 1), today));
        assert!(range_for(Visualization::ClaimsPerDay, Some("x"), None, today, 30).is_err());
    }

    #[test]
    fn inverted_range_is_accepted() {
        let range = resolve_range(Some("2024-01-03"), Some("2024-01-01"), date(2024, 6, 1), 30)
            .unwrap();
        assert_eq!(range.start, date(2024, 1, 3));
        assert_eq!(range.end, date(2024, 1, 1));
    }

    #[test]
    fn malformed_dates_are_rejected_before_any_query() {
        let err = resolve_range(
            Some("2024-01-01' OR '1'='1"),
            None,
            date(2024, 6, 1),
            30,
        )
        .unwrap_err();
        assert!(matches!(err, InputError::InvalidDate { field: "Start Date", .. }));
        assert!(resolve_range(None, Some("01/03/2024"), date(2024, 6, 1), 30).is_err());
    }

    struct Groups(Vec<CategoryCount>);

    impl Store for Groups {
        fn ping(&self) -> Result<(), DataError> {
            Ok(())
        }

        fn browse(&self, _: crate::store::TableName) -> Result<Frame, DataError> {
            Ok(Frame::default())
        }

        fn run_report(&self, _: &crate::catalog::Report) -> Result<Frame, DataError> {
            Ok(Frame::default())
        }

        fn category_counts(&self, _: &str) -> Result<Vec<CategoryCount>, DataError> {
            Ok(self.0.clone())
        }

        fn claims_per_day(&self, _: DateRange) -> Result<Vec<crate::models::DailyClaims>, DataError> {
            Ok(Vec::new())
        }

        fn count(&self, _: &str) -> Result<i64, DataError> {
            Ok(0)
        }
    }

    #[test]
    fn null_categories_are_kept_and_labelled() {
        let store = Groups(vec![
            CategoryCount { category: None, total: 2 },
            CategoryCount { category: Some("Vegan".into()), total: 3 },
        ]);
        let today = date(2024, 1, 1);
        let rendered = render(
            &store,
            Visualization::ListingsByFoodType,
            DateRange::new(today, today),
            ClaimTally::default(),
        )
        .unwrap();

        let frame = rendered.frame.unwrap();
        assert_eq!(frame.rows[0], vec![Cell::Null, Cell::Int(2)]);
        assert_eq!(rendered.chart.points[0].label, MISSING_CATEGORY);
        assert_eq!(rendered.chart.points[1].label, "Vegan");
    }

    #[test]
    fn slugs_round_trip() {
        for viz in Visualization::ALL {
            assert_eq!(Visualization::from_slug(viz.slug()), Some(viz));
        }
        assert_eq!(Visualization::from_slug("heatmap"), None);
        assert!(Visualization::ClaimsPerDay.uses_date_range());
        assert!(!Visualization::TopCities.uses_date_range());
    }

    #[test]
    fn colored_bars_get_one_trace_per_category() {
        let chart = Chart::new(ChartKind::Bar, "Food Listings by Type", "food_type", "total")
            .colored()
            .with_points(vec![
                Point { label: "Fruits".into(), value: 2 },
                Point { label: "Vegetables".into(), value: 3 },
            ]);
        let figure = chart.to_plotly();
        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1]["name"], "Vegetables");
        assert_eq!(data[1]["y"], json!([3]));
        assert_eq!(figure["layout"]["xaxis"]["title"]["text"], "food_type");
    }

    #[test]
    fn pie_and_line_figures() {
        let pie = Chart::new(ChartKind::Pie, "Meal Type Distribution", "meal_type", "total")
            .with_points(vec![Point { label: "Dinner".into(), value: 4 }]);
        let figure = pie.to_plotly();
        assert_eq!(figure["data"][0]["type"], "pie");
        assert_eq!(figure["data"][0]["labels"], json!(["Dinner"]));
        assert!(figure["layout"].get("xaxis").is_none());

        let line = Chart::new(ChartKind::Line, "Claims Per Day", "claim_date", "total_claims");
        let figure = line.to_plotly();
        assert_eq!(figure["data"][0]["mode"], "lines");
        assert_eq!(figure["data"][0]["x"], json!([]));
    }
}
