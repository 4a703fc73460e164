use serde::Serialize;
use serde_json::Value;

/// Uniform JSON envelope for API responses. `data` carries the payload
/// on success and is omitted on error.
#[derive(Serialize)]
pub struct R {
    code: u16,
    message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl Default for R {
    fn default() -> Self {
        R::success_empty()
    }
}

impl R {
    pub fn success_empty() -> Self {
        R {
            code: 0,
            message: String::new(),
            data: None,
        }
    }

    pub fn success<T: Serialize>(data: T) -> Self {
        R {
            code: 0,
            message: String::new(),
            data: serde_json::to_value(data).ok(),
        }
    }

    pub fn error(code: u16, msg: &str) -> Self {
        R {
            code,
            message: msg.to_string(),
            data: None,
        }
    }
}