//! The `{"code": <int>, "data": <object>}` response envelope.
//!
//! # Design
//! Servers following this convention answer 2xx even for application-level
//! failures and put the verdict in `code`. `check_for_error` turns that verdict
//! into an `Outcome` and hands `data` to the caller only when `code` is 0.
//! A missing or non-integer `code` reads as -1 and a missing or non-object
//! `data` reads as `{}`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::json::{self, JsonObject};
use crate::outcome::Outcome;

pub const CODE_OK: i64 = 0;
pub const CODE_MISSING: i64 = -1;
pub const CODE_SESSION_EXPIRED: i64 = -2;
pub const CODE_NO_ACCESS: i64 = -3;

/// Dispatch on the envelope `code`, calling `success` with `data` on code 0.
pub fn check_for_error<T>(
    body: JsonObject,
    success: impl FnOnce(JsonObject) -> Outcome<T>,
) -> Outcome<T> {
    let code = json::read_or(&body, "code", CODE_MISSING);
    match code {
        CODE_OK => success(into_data(body)),
        CODE_SESSION_EXPIRED => Outcome::Failure(ApiError::SessionExpired),
        CODE_NO_ACCESS => Outcome::Failure(ApiError::NoAccess),
        _ => Outcome::Failure(ApiError::UnknownServerError),
    }
}

/// Lift a `data` constructor into a full body parser for `Resource::new`.
pub fn envelope_parser<T, F>(success: F) -> impl Fn(JsonObject) -> Outcome<T> + Send + Sync
where
    F: Fn(JsonObject) -> Outcome<T> + Send + Sync,
{
    move |body: JsonObject| check_for_error(body, &success)
}

/// Body parser that deserializes `data` straight into `T`.
pub fn typed_parser<T: DeserializeOwned>() -> impl Fn(JsonObject) -> Outcome<T> + Send + Sync {
    |body: JsonObject| check_for_error(body, |data| Outcome::from(json::from_object::<T>(data)))
}

fn into_data(mut body: JsonObject) -> JsonObject {
    match body.remove("data") {
        Some(serde_json::Value::Object(data)) => data,
        _ => JsonObject::new(),
    }
}
