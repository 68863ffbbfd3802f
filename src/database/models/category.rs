use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::api::format::{deserialize_id, serialize_datetime, serialize_id, serialize_opt_id};

/// Dish category (`type` 1) or set-meal category (`type` 2)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(serialize_with = "serialize_id")]
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub category_type: i32,
    pub name: String,
    pub sort: i32,
    #[serde(serialize_with = "serialize_datetime")]
    pub create_time: NaiveDateTime,
    #[serde(serialize_with = "serialize_datetime")]
    pub update_time: NaiveDateTime,
    #[serde(serialize_with = "serialize_opt_id")]
    pub create_user: Option<i64>,
    #[serde(serialize_with = "serialize_opt_id")]
    pub update_user: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    #[serde(rename = "type")]
    pub category_type: i32,
    pub name: String,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    #[serde(rename = "type")]
    pub category_type: Option<i32>,
    pub name: Option<String>,
    pub sort: Option<i32>,
}
