use serde::Serialize;

pub mod contact;

/// Json body shared by all submission responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl ApiResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            error: None,
        }
    }

    pub fn error(error: &'static str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
        }
    }
}
