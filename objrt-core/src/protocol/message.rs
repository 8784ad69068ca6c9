use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RuntimeError};

pub const GET_OBJECT: &str = "GetObject";

/// Request payload. One request per connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    GetObject { path: String },
}

impl Request {
    pub fn get_object(path: impl Into<String>) -> Self {
        Request::GetObject { path: path.into() }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::GetObject { .. } => GET_OBJECT,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Request::GetObject { path } => path,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses a request body. Every defect is a protocol error naming what
    /// was wrong, so the server can answer with an envelope.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| protocol("request body is not valid UTF-8"))?;
        let value: Value = serde_json::from_str(text).map_err(|err| {
            protocol(format!("request body is not valid JSON: {err}"))
        })?;
        let Value::Object(fields) = value else {
            return Err(protocol("request body must be a JSON object"));
        };

        let action = match fields.get("action") {
            Some(Value::String(action)) => action.as_str(),
            Some(_) => return Err(protocol("`action` must be a string")),
            None => return Err(protocol("request is missing `action`")),
        };
        if action != GET_OBJECT {
            return Err(protocol(format!("unsupported action `{action}`")));
        }

        match fields.get("path") {
            Some(Value::String(path)) => Ok(Request::get_object(path.clone())),
            Some(_) => Err(protocol("`path` must be a string")),
            None => Err(protocol("request is missing `path`")),
        }
    }
}

pub fn parse_request(bytes: &[u8]) -> Result<Request> {
    Request::parse(bytes)
}

fn protocol(message: impl Into<String>) -> RuntimeError {
    RuntimeError::Protocol(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn request_serializes_with_action_tag() {
        let bytes = Request::get_object("/Quartz").to_bytes().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"action": "GetObject", "path": "/Quartz"})
        );
        assert_eq!(
            parse_request(&bytes).unwrap(),
            Request::get_object("/Quartz")
        );
    }

    #[test]
    fn defects_are_protocol_errors() {
        let cases: [(&[u8], &str); 7] = [
            (b"\xff\xfe", "UTF-8"),
            (b"{not json", "not valid JSON"),
            (b"[1,2]", "JSON object"),
            (br#"{"path":"/Quartz"}"#, "missing `action`"),
            (
                br#"{"action":"Delete","path":"/Quartz"}"#,
                "unsupported action `Delete`",
            ),
            (br#"{"action":"GetObject"}"#, "missing `path`"),
            (br#"{"action":"GetObject","path":7}"#, "`path` must be a string"),
        ];

        for (body, expected) in cases {
            let err = Request::parse(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Protocol);
            assert!(err.to_string().contains(expected), "{err} vs {expected}");
        }
    }
}
