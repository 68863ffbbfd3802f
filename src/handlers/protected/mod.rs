// handlers/protected/mod.rs - Back-office CRUD behind the login gate
//
// Every handler here runs inside the identity scope the gate opens, so
// repository writes pick up the acting employee for the audit columns.

pub mod category;
pub mod dish;
pub mod employee;

use serde::Deserialize;

use crate::api::format::parse_id_list;
use crate::database::models::is_valid_status;
use crate::error::ApiError;

/// `?ids=1,2,3` on batch endpoints
#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    pub ids: String,
}

impl IdsQuery {
    pub fn parse(&self) -> Result<Vec<i64>, ApiError> {
        parse_id_list(&self.ids).map_err(ApiError::bad_request)
    }
}

pub(crate) fn check_status(status: i32) -> Result<(), ApiError> {
    if is_valid_status(status) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("invalid status: {}", status)))
    }
}
