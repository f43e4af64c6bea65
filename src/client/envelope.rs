//! Response envelope decoding
//!
//! The remote API answers every call with a JSON object. Success and failure
//! markers are inspected once, here, and turned into an [`Envelope`] so call
//! sites never re-check ad hoc fields.
//!
//! ## Rules
//!
//! 1. Non-2xx status: failure. Message is `detail`, else `error`, else
//!    [`GENERIC_SERVER_MESSAGE`].
//! 2. 2xx status with a truthy `error` field: failure, even though the
//!    transport succeeded.
//! 3. Anything else: the body is returned verbatim.

use serde_json::Value;

use super::error::{ApiError, ApiResult};

/// Fallback message when a failed response carries nothing displayable
pub const GENERIC_SERVER_MESSAGE: &str = "Server error";

/// Raw response as handed over by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Undecoded response body
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a decoded response counts as a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Non-success HTTP status
    Server { status: u16 },
    /// Success status with an `error` field in the body
    Application,
    /// Success status but the body is not JSON
    Decode,
}

/// Decoded response: either the payload or a displayable failure
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(Value),
    Failure { kind: FailureKind, message: String },
}

impl Envelope {
    /// Classify a raw response
    pub fn decode(response: &RawResponse) -> Self {
        let parsed = serde_json::from_str::<Value>(&response.body);

        if !response.is_success() {
            let message = parsed
                .ok()
                .and_then(|body| server_message(&body))
                .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string());
            return Envelope::Failure {
                kind: FailureKind::Server {
                    status: response.status,
                },
                message,
            };
        }

        let body = match parsed {
            Ok(body) => body,
            Err(e) => {
                return Envelope::Failure {
                    kind: FailureKind::Decode,
                    message: e.to_string(),
                }
            }
        };

        match body.get("error") {
            Some(error) if is_truthy(error) => Envelope::Failure {
                kind: FailureKind::Application,
                message: non_empty_str(error)
                    .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
            },
            _ => Envelope::Success(body),
        }
    }

    /// Convert into the client's result type
    pub fn into_result(self) -> ApiResult<Value> {
        match self {
            Envelope::Success(body) => Ok(body),
            Envelope::Failure { kind, message } => Err(match kind {
                FailureKind::Server { status } => ApiError::Server { status, message },
                FailureKind::Application => ApiError::Application(message),
                FailureKind::Decode => ApiError::Decode(message),
            }),
        }
    }
}

fn server_message(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(non_empty_str)
        .or_else(|| body.get("error").and_then(non_empty_str))
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// JSON truthiness as the web client sees it
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_on_failed_status() {
        let response = RawResponse::new(401, r#"{"detail": "bad password"}"#);
        let err = Envelope::decode(&response).into_result().unwrap_err();

        assert_eq!(
            err,
            ApiError::Server {
                status: 401,
                message: "bad password".to_string()
            }
        );
        assert_eq!(err.to_string(), "bad password");
    }

    #[test]
    fn test_error_field_on_success_status() {
        let response = RawResponse::new(200, r#"{"error": "cycle not found"}"#);
        let err = Envelope::decode(&response).into_result().unwrap_err();

        assert_eq!(err, ApiError::Application("cycle not found".to_string()));
        assert_eq!(err.to_string(), "cycle not found");
    }

    #[test]
    fn test_failed_status_falls_back_to_error_then_generic() {
        let response = RawResponse::new(409, r#"{"error": "Already following this user."}"#);
        let err = Envelope::decode(&response).into_result().unwrap_err();
        assert_eq!(err.to_string(), "Already following this user.");

        let response = RawResponse::new(500, r#"{"status": "down"}"#);
        let err = Envelope::decode(&response).into_result().unwrap_err();
        assert_eq!(err.to_string(), GENERIC_SERVER_MESSAGE);

        let response = RawResponse::new(502, "<html>Bad Gateway</html>");
        let err = Envelope::decode(&response).into_result().unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 502,
                message: GENERIC_SERVER_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_detail_preferred_over_error() {
        let response = RawResponse::new(400, r#"{"detail": "from detail", "error": "from error"}"#);
        let err = Envelope::decode(&response).into_result().unwrap_err();
        assert_eq!(err.to_string(), "from detail");
    }

    #[test]
    fn test_success_body_returned_verbatim() {
        let body = json!({"verdict": "ok", "cycles": [{"name": "push"}], "error": null});
        let response = RawResponse::new(200, body.to_string());

        assert_eq!(Envelope::decode(&response), Envelope::Success(body));
    }

    #[test]
    fn test_falsy_error_fields_do_not_fail() {
        for error in [json!(""), json!(false), json!(0)] {
            let response = RawResponse::new(200, json!({ "error": error }).to_string());
            assert!(matches!(Envelope::decode(&response), Envelope::Success(_)));
        }
    }

    #[test]
    fn test_non_string_truthy_error_uses_generic_message() {
        let response = RawResponse::new(200, r#"{"error": true}"#);
        let err = Envelope::decode(&response).into_result().unwrap_err();
        assert_eq!(err, ApiError::Application(GENERIC_SERVER_MESSAGE.to_string()));
    }

    #[test]
    fn test_success_status_with_invalid_body() {
        let response = RawResponse::new(200, "not json");
        let err = Envelope::decode(&response).into_result().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
