use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Int4, Nullable, Text, Timestamp};
use serde::Serialize;

use crate::frame::{Cell, Tabular};
use crate::schema::{claims, food_listings, providers, receivers};

#[derive(Debug, Clone, Serialize, Queryable, QueryableByName)]
#[diesel(table_name = providers)]
pub struct Provider {
    pub provider_id: i32,
    pub name: Option<String>,
    pub provider_type: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Queryable, QueryableByName)]
#[diesel(table_name = receivers)]
pub struct Receiver {
    pub receiver_id: i32,
    pub name: Option<String>,
    pub receiver_type: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Queryable, QueryableByName)]
#[diesel(table_name = food_listings)]
pub struct FoodListing {
    pub food_id: i32,
    pub food_name: Option<String>,
    pub quantity: Option<i32>,
    pub expiry_date: Option<NaiveDate>,
    pub provider_id: Option<i32>,
    pub provider_type: Option<String>,
    pub location: Option<String>,
    pub food_type: Option<String>,
    pub meal_type: Option<String>,
    pub listed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Queryable, QueryableByName)]
#[diesel(table_name = claims)]
pub struct Claim {
    pub claim_id: i32,
    pub food_id: Option<i32>,
    pub receiver_id: Option<i32>,
    pub status: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
}

/// A claimed food item next to the receiver that claimed it.
#[derive(Debug, Clone, Serialize, QueryableByName)]
pub struct ClaimantRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub food_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub receiver_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub status: Option<String>,
    #[diesel(sql_type = Nullable<Timestamp>)]
    pub timestamp: Option<NaiveDateTime>,
}

/// A provider next to one of its listed food items.
#[derive(Debug, Clone, Serialize, QueryableByName)]
pub struct ProviderListingRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub city: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub food_name: Option<String>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub quantity: Option<i32>,
    #[diesel(sql_type = Nullable<Date>)]
    pub expiry_date: Option<NaiveDate>,
}

/// `category, total` pair produced by the grouped chart queries. Rows whose
/// grouping column is NULL come back with no category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, QueryableByName)]
pub struct CategoryCount {
    #[diesel(sql_type = Nullable<Text>)]
    pub category: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, QueryableByName)]
pub struct DailyClaims {
    #[diesel(sql_type = Date)]
    pub claim_date: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub total_claims: i64,
}

#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct Total {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

impl Tabular for Provider {
    const COLUMNS: &'static [&'static str] =
        &["provider_id", "name", "provider_type", "address", "city", "contact"];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            self.provider_id.into(),
            self.name.into(),
            self.provider_type.into(),
            self.address.into(),
            self.city.into(),
            self.contact.into(),
        ]
    }
}

impl Tabular for Receiver {
    const COLUMNS: &'static [&'static str] =
        &["receiver_id", "name", "receiver_type", "city", "contact"];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            self.receiver_id.into(),
            self.name.into(),
            self.receiver_type.into(),
            self.city.into(),
            self.contact.into(),
        ]
    }
}

impl Tabular for FoodListing {
    const COLUMNS: &'static [&'static str] = &[
        "food_id",
        "food_name",
        "quantity",
        "expiry_date",
        "provider_id",
        "provider_type",
        "location",
        "food_type",
        "meal_type",
        "listed_date",
    ];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            self.food_id.into(),
            self.food_name.into(),
            self.quantity.into(),
            self.expiry_date.into(),
            self.provider_id.into(),
            self.provider_type.into(),
            self.location.into(),
            self.food_type.into(),
            self.meal_type.into(),
            self.listed_date.into(),
        ]
    }
}

impl Tabular for Claim {
    const COLUMNS: &'static [&'static str] =
        &["claim_id", "food_id", "receiver_id", "status", "timestamp"];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            self.claim_id.into(),
            self.food_id.into(),
            self.receiver_id.into(),
            self.status.into(),
            self.timestamp.into(),
        ]
    }
}

impl Tabular for ClaimantRow {
    const COLUMNS: &'static [&'static str] = &["food_name", "receiver_name", "status", "timestamp"];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            self.food_name.into(),
            self.receiver_name.into(),
            self.status.into(),
            self.timestamp.into(),
        ]
    }
}

impl Tabular for ProviderListingRow {
    const COLUMNS: &'static [&'static str] = &["name", "city", "food_name", "quantity", "expiry_date"];

    fn into_cells(self) -> Vec<Cell> {
        vec![
            self.name.into(),
            self.city.into(),
            self.food_name.into(),
            self.quantity.into(),
            self.expiry_date.into(),
        ]
    }
}

impl Tabular for DailyClaims {
    const COLUMNS: &'static [&'static str] = &["claim_date", "total_claims"];

    fn into_cells(self) -> Vec<Cell> {
        vec![self.claim_date.into(), self.total_claims.into()]
    }
}
