//! Predefined reports offered on the "Run Queries" page.
//!
//! The catalog is plain data: a label shown in the menu, a slug used in
//! URLs, the literal SQL and the row layout the SQL produces.

use serde::Serialize;

/// Row layout a report decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowShape {
    Providers,
    Claims,
    FoodListings,
    Claimants,
    ProviderListings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Report {
    pub slug: &'static str,
    pub label: &'static str,
    pub sql: &'static str,
    pub shape: RowShape,
}

pub const REPORTS: [Report; 8] = [
    Report {
        slug: "all-providers",
        label: "Show all providers",
        sql: "SELECT * FROM providers;",
        shape: RowShape::Providers,
    },
    Report {
        slug: "recent-claims",
        label: "Recent 10 claims (most recent first)",
        sql: "SELECT * FROM claims ORDER BY timestamp DESC LIMIT 10;",
        shape: RowShape::Claims,
    },
    Report {
        slug: "claimed-status",
        label: "List food claimed status",
        sql: "SELECT * FROM claims WHERE status = 'Claimed';",
        shape: RowShape::Claims,
    },
    Report {
        slug: "listed-this-month",
        label: "Foods listed in current month",
        sql: "SELECT * FROM food_listings \
              WHERE DATE_TRUNC('month', listed_date) = DATE_TRUNC('month', CURRENT_DATE);",
        shape: RowShape::FoodListings,
    },
    Report {
        slug: "unclaimed-food",
        label: "List of unclaimed food",
        sql: "SELECT f.* \
              FROM food_listings f \
              LEFT JOIN claims c ON f.food_id = c.food_id \
              WHERE c.food_id IS NULL;",
        shape: RowShape::FoodListings,
    },
    Report {
        slug: "expired-food",
        label: "Food items that expired",
        sql: "SELECT * FROM food_listings WHERE expiry_date::date < CURRENT_DATE;",
        shape: RowShape::FoodListings,
    },
    Report {
        slug: "food-and-receiver",
        label: "Food and the receiver who claimed it",
        sql: "SELECT f.food_name, r.name AS receiver_name, c.status, c.timestamp \
              FROM claims c \
              JOIN food_listings f ON c.food_id = f.food_id \
              JOIN receivers r ON c.receiver_id = r.receiver_id;",
        shape: RowShape::Claimants,
    },
    Report {
        slug: "provider-listings",
        label: "Provider details with food items listed",
        sql: "SELECT p.name, p.city, f.food_name, f.quantity, f.expiry_date \
              FROM providers p \
              JOIN food_listings f ON p.provider_id = f.provider_id;",
        shape: RowShape::ProviderListings,
    },
];

pub fn reports() -> &'static [Report] {
    &REPORTS
}

/// The report shown when nothing has been picked yet.
pub fn default_report() -> &'static Report {
    &REPORTS[0]
}

pub fn find_by_label(label: &str) -> Option<&'static Report> {
    REPORTS.iter().find(|report| report.label == label)
}

pub fn find_by_slug(slug: &str) -> Option<&'static Report> {
    REPORTS.iter().find(|report| report.slug == slug)
}

/// SQL text for a menu label, exactly as stored.
pub fn sql_for(label: &str) -> Option<&'static str> {
    find_by_label(label).map(|report| report.sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn menu_order_is_stable() {
        let labels: Vec<_> = reports().iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "Show all providers",
                "Recent 10 claims (most recent first)",
                "List food claimed status",
                "Foods listed in current month",
                "List of unclaimed food",
                "Food items that expired",
                "Food and the receiver who claimed it",
                "Provider details with food items listed",
            ]
        );
        assert_eq!(default_report().slug, "all-providers");
    }

    #[test]
    fn labels_and_slugs_are_unique() {
        let labels: HashSet<_> = reports().iter().map(|r| r.label).collect();
        let slugs: HashSet<_> = reports().iter().map(|r| r.slug).collect();
        assert_eq!(labels.len(), REPORTS.len());
        assert_eq!(slugs.len(), REPORTS.len());
    }

    #[test]
    fn label_lookup_returns_sql_unchanged() {
        assert_eq!(sql_for("Show all providers"), Some("SELECT * FROM providers;"));
        assert_eq!(
            sql_for("Food items that expired"),
            Some("SELECT * FROM food_listings WHERE expiry_date::date < CURRENT_DATE;")
        );
        assert_eq!(sql_for("Drop everything"), None);
    }

    #[test]
    fn slug_and_label_lookups_agree() {
        for report in reports() {
            assert_eq!(find_by_slug(report.slug), Some(report));
            assert_eq!(find_by_label(report.label), Some(report));
        }
        assert!(find_by_slug("nope").is_none());
    }

    #[test]
    fn every_report_is_a_single_select() {
        for report in reports() {
            let sql = report.sql.trim();
            assert!(sql.starts_with("SELECT"), "{}", report.label);
            assert_eq!(sql.matches(';').count(), 1, "{}", report.label);
            assert!(sql.ends_with(';'), "{}", report.label);
            for verb in ["INSERT", "UPDATE", "DELETE", "DROP", "ALTER"] {
                assert!(!sql.contains(verb), "{} contains {}", report.label, verb);
            }
        }
    }
}
