//! HTTP mapping for control errors.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use homelink_control::ControlError;
use homelink_core::CoreError;
use serde_json::json;

/// Error returned by API handlers, always rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Control(ControlError),
    /// Request body missing, not JSON, or the wrong shape
    Body(JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Control(ControlError::ControllerUnavailable) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Control(ControlError::UnknownDevice(_)) => StatusCode::NOT_FOUND,
            ApiError::Control(
                ControlError::InvalidState(_)
                | ControlError::InvalidDelta(_)
                | ControlError::UnsupportedProperty(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Control(err) => err.to_string(),
            ApiError::Body(rejection) => rejection.body_text(),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        ApiError::Control(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Control(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homelink_core::Device;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ControlError::ControllerUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (ControlError::UnknownDevice("toaster".into()), StatusCode::NOT_FOUND),
            (ControlError::InvalidState("dim".into()), StatusCode::BAD_REQUEST),
            (ControlError::InvalidDelta(f64::NAN), StatusCode::BAD_REQUEST),
            (
                ControlError::UnsupportedProperty(Device::Lamp),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_unknown_device_from_parse() {
        let err: ApiError = "toaster"
            .parse::<Device>()
            .map_err(ApiError::from)
            .unwrap_err();
        assert!(matches!(
            &err,
            ApiError::Control(ControlError::UnknownDevice(name)) if name == "toaster"
        ));
        assert_eq!(err.message(), "Unknown device: toaster");
    }
}
