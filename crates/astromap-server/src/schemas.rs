use serde::{Deserialize, Serialize};

use astromap::pipeline::MapRequest;

pub const MESSAGE_CREATING: &str = "The map is being created";
pub const MESSAGE_ERROR: &str = "An error has occurred";
pub const TIME_ESTIMATED: &str = "5 minutes";

/// Body of `POST /create_map`. The legacy field names are accepted too.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapRequest {
    #[serde(alias = "Location")]
    pub location: String,
    #[serde(alias = "Date_Time")]
    pub date_time: String,
    #[serde(alias = "UserUID")]
    pub user_id: String,
    #[serde(alias = "MapUID")]
    pub map_id: String,
}

impl From<CreateMapRequest> for MapRequest {
    fn from(body: CreateMapRequest) -> Self {
        MapRequest::new(body.user_id, body.map_id, body.location, body.date_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapResponse {
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreateMapResponse {
    pub fn accepted() -> Self {
        Self {
            created: true,
            message: Some(MESSAGE_CREATING.to_string()),
            time_estimated: Some(TIME_ESTIMATED.to_string()),
            error: None,
        }
    }

    pub fn rejected() -> Self {
        Self {
            created: false,
            message: None,
            time_estimated: None,
            error: Some(MESSAGE_ERROR.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingResponse {
    pub status: String,
    pub message: String,
    pub time_estimated: String,
}

impl PendingResponse {
    pub fn new() -> Self {
        Self {
            status: "in_progress".to_string(),
            message: MESSAGE_CREATING.to_string(),
            time_estimated: TIME_ESTIMATED.to_string(),
        }
    }
}

impl Default for PendingResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    /// Stored status string, or a marker such as `not_found`.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: MESSAGE_ERROR.to_string(),
            error: error.into(),
        }
    }
}
