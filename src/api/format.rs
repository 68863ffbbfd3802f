//! JSON conventions shared by every record sent to the admin UI.
//!
//! Ids are 64-bit and exceed what a JavaScript number can hold exactly, so
//! they travel as strings. Incoming ids are accepted either way. Timestamps
//! use `YYYY-MM-DD HH:MM:SS` in server-local time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

impl IdRepr {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            IdRepr::Number(n) => Ok(n),
            IdRepr::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id: {:?}", s))),
        }
    }
}

pub fn serialize_id<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

pub fn serialize_opt_id<S: Serializer>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    IdRepr::deserialize(deserializer)?.into_id()
}

pub fn deserialize_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    match Option::<IdRepr>::deserialize(deserializer)? {
        Some(IdRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(repr) => repr.into_id().map(Some),
        None => Ok(None),
    }
}

pub fn serialize_datetime<S: Serializer>(
    at: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&at.format(DATETIME_FORMAT))
}

/// Parse a comma separated id list such as `ids=1,2,3`.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, String> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|_| format!("invalid id: {:?}", s)))
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err("no ids given".to_string());
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Sample {
        #[serde(serialize_with = "serialize_id", deserialize_with = "deserialize_id")]
        id: i64,
        #[serde(
            default,
            serialize_with = "serialize_opt_id",
            deserialize_with = "deserialize_opt_id"
        )]
        owner: Option<i64>,
    }

    #[test]
    fn ids_serialize_as_strings() {
        let sample = Sample {
            id: 1_417_012_167_126_876_162,
            owner: None,
        };
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["id"], "1417012167126876162");
        assert!(json["owner"].is_null());
    }

    #[test]
    fn ids_deserialize_from_strings_or_numbers() {
        let a: Sample = serde_json::from_str(r#"{"id":"42","owner":7}"#).unwrap();
        assert_eq!((a.id, a.owner), (42, Some(7)));

        let b: Sample = serde_json::from_str(r#"{"id":42,"owner":""}"#).unwrap();
        assert_eq!((b.id, b.owner), (42, None));

        let c: Sample = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(c.owner, None);

        assert!(serde_json::from_str::<Sample>(r#"{"id":"4x2"}"#).is_err());
    }

    #[test]
    fn datetimes_use_the_admin_ui_format() {
        #[derive(Serialize)]
        struct At {
            #[serde(serialize_with = "serialize_datetime")]
            at: NaiveDateTime,
        }
        let at = NaiveDate::from_ymd_opt(2022, 6, 21).unwrap().and_hms_opt(1, 25, 0).unwrap();
        assert_eq!(serde_json::to_value(At { at }).unwrap()["at"], "2022-06-21 01:25:00");
    }

    #[test]
    fn id_lists() {
        assert_eq!(parse_id_list("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list("5").unwrap(), vec![5]);
        assert!(parse_id_list("").is_err());
        assert!(parse_id_list("1,x").is_err());
    }
}
