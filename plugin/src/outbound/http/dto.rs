//! DTOs for decoding InfraKitchen error bodies.
//!
//! Non-2xx bodies are decoded against [`ErrorBodyDto`] first and only then
//! classified into the domain [`ErrorBody`]. A string `message` is required
//! for a structured error; an unusable `error_code` only drops the code.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::ErrorBody;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) error_code: Option<Value>,
    #[serde(default)]
    pub(super) metadata: Option<Value>,
}

impl ErrorBodyDto {
    /// Decode an already parsed JSON body. Anything but an object with a
    /// string-typed `message` field is unrecognised.
    pub(super) fn classify(body: Value) -> ErrorBody {
        if !body.is_object() {
            return ErrorBody::Unrecognised;
        }
        serde_json::from_value::<Self>(body).map_or(ErrorBody::Unrecognised, Self::into_domain)
    }

    pub(super) fn into_domain(self) -> ErrorBody {
        let metadata = match self.metadata {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let message = self.message.filter(|text| !text.is_empty());
        let error_code = self.error_code.and_then(code_text);
        match (message, error_code) {
            (Some(message), Some(error_code)) => ErrorBody::Coded {
                message,
                error_code,
                metadata,
            },
            (Some(message), None) => ErrorBody::MessageOnly { message, metadata },
            (None, _) => ErrorBody::Unrecognised,
        }
    }
}

fn code_text(raw: Value) -> Option<String> {
    match raw {
        Value::String(code) if !code.is_empty() => Some(code),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}
