use resource_core::{envelope_parser, ApiError, HttpMethod, JsonObject, Outcome, Resource};

/// A stock quote, kept as the raw `data` object the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    pub object: JsonObject,
}

/// Headers identifying the calling device.
pub struct Device {
    pub id: String,
    pub kind: String,
    pub app_version: String,
    pub request_id: String,
}

pub fn stock_resource(url: &str, device: &Device) -> Resource<Stock> {
    Resource::new(
        HttpMethod::Get,
        url,
        envelope_parser(|data| Outcome::Success(Stock { object: data })),
    )
    .param("width", "640")
    .param("height", "1136")
    .headers([
        ("clientType", "0"),
        ("version", device.app_version.as_str()),
        ("deviceId", device.id.as_str()),
        ("deviceType", device.kind.as_str()),
        ("lon", "0"),
        ("lat", "0"),
        ("requestid", device.request_id.as_str()),
    ])
}

/// Message shown to the user for a failed load.
pub fn describe(err: &ApiError) -> String {
    match err {
        ApiError::NoAccess => "you do not have access to this resource".to_string(),
        ApiError::SessionExpired => "your session has expired, please sign in again".to_string(),
        ApiError::UnknownServerError => "unknown error".to_string(),
        ApiError::ParseFailure(_) => "could not read the server response".to_string(),
        ApiError::TransportError(cause) => cause.to_string(),
    }
}
