//! Interpretation of raw responses into payloads or [`ClientError`]s.

use envelope::{probe_id, probe_info};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ErrorDetails};

/// Response as read off the wire by one attempt.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) header_id: Option<String>,
    pub(crate) body: Vec<u8>,
}

impl RawResponse {
    /// Turn the response into the typed payload or a classified error.
    pub(crate) fn into_result<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        if self.status.is_success() {
            decode_success(self.status, self.header_id, &self.body)
        } else {
            Err(failure_for(self.status, self.header_id, &self.body))
        }
    }
}

fn parse_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice(body).ok()
    }
}

fn fallback_message(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || format!("Request failed with status {}", status.as_u16()),
        str::to_owned,
    )
}

fn failure_for(status: StatusCode, header_id: Option<String>, body: &[u8]) -> ClientError {
    let parsed = parse_body(body);
    let info = parsed.as_ref().and_then(probe_info);
    let message = info
        .as_ref()
        .map(|block| block.message().trim())
        .filter(|message| !message.is_empty())
        .map_or_else(|| fallback_message(status), str::to_owned);
    let correlation_id = parsed.as_ref().and_then(probe_id).or(header_id);
    ClientError::from_status(
        status.as_u16(),
        ErrorDetails::new(message, status.as_u16(), correlation_id),
    )
}

fn decode_success<T: DeserializeOwned>(
    status: StatusCode,
    header_id: Option<String>,
    body: &[u8],
) -> Result<T, ClientError> {
    let undecodable = |detail: String, id: Option<String>| {
        ClientError::Unknown(ErrorDetails::new(
            format!("Unexpected response from server: {detail}"),
            status.as_u16(),
            id,
        ))
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null)
            .map_err(|err| undecodable(err.to_string(), header_id));
    }
    let parsed: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => return Err(undecodable(err.to_string(), header_id)),
    };

    let Some(info) = probe_info(&parsed) else {
        return serde_json::from_value(parsed)
            .map_err(|err| undecodable(err.to_string(), header_id));
    };
    let correlation_id = probe_id(&parsed).or(header_id);
    if !info.is_success() {
        return Err(ClientError::Server(ErrorDetails::new(
            info.message(),
            status.as_u16(),
            correlation_id,
        )));
    }
    let data = match parsed {
        Value::Object(mut fields) => fields.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    serde_json::from_value(data).map_err(|err| undecodable(err.to_string(), correlation_id))
}
