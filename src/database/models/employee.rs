use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::STATUS_ENABLED;
use crate::api::format::{deserialize_id, serialize_datetime, serialize_id, serialize_opt_id};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(serialize_with = "serialize_id")]
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Password digest; never leaves the server
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
    pub sex: String,
    pub id_number: String,
    pub status: i32,
    #[serde(serialize_with = "serialize_datetime")]
    pub create_time: NaiveDateTime,
    #[serde(serialize_with = "serialize_datetime")]
    pub update_time: NaiveDateTime,
    #[serde(serialize_with = "serialize_opt_id")]
    pub create_user: Option<i64>,
    #[serde(serialize_with = "serialize_opt_id")]
    pub update_user: Option<i64>,
}

impl Employee {
    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }
}

/// Body of `POST /employee`. The password is not supplied by the client;
/// new accounts get the configured initial password.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub id_number: String,
}

/// Body of `PUT /employee`: only the fields present are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub sex: Option<String>,
    pub id_number: Option<String>,
    pub status: Option<i32>,
}
