use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::api::format::{deserialize_id, serialize_datetime, serialize_id, serialize_opt_id};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(serialize_with = "serialize_id")]
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "serialize_id")]
    pub category_id: i64,
    /// Price in cents
    pub price: i64,
    pub code: String,
    pub image: String,
    pub description: String,
    pub status: i32,
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
#[serde(rename_all = "camelCase")]
pub struct NewDish {
    pub name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub category_id: i64,
    pub price: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_dish_status")]
    pub status: i32,
    #[serde(default)]
    pub sort: i32,
}

fn default_dish_status() -> i32 {
    super::STATUS_ENABLED
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishUpdate {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::api::format::deserialize_opt_id")]
    pub category_id: Option<i64>,
    pub price: Option<i64>,
    pub code: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub status: Option<i32>,
    pub sort: Option<i32>,
}
