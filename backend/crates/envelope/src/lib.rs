//! Uniform response envelope shared by the storefront backend and its clients.
//!
//! Every HTTP response, success or failure, carries the same JSON shape:
//!
//! ```text
//! { "info": { "isSuccess": bool, "code": "string", "message": "string" },
//!   "data": <payload|null>,
//!   "id": "string|null" }
//! ```
//!
//! [`ResponseInfo`] can only be built from an HTTP status, so `isSuccess` and
//! the status code always agree (`isSuccess` ⇔ 2xx). Values decoded from the
//! wire are accepted as-is; clients must treat a disagreement as a failure.
//!
//! # Examples
//!
//! ```
//! use envelope::Envelope;
//!
//! let envelope = Envelope::success(vec![1, 2, 3]).with_id("abc-123");
//! let json = serde_json::to_value(&envelope).expect("serialisable");
//! assert_eq!(json["info"]["isSuccess"], true);
//! assert_eq!(json["info"]["code"], "200");
//! assert_eq!(json["id"], "abc-123");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header carrying the correlation identifier on requests and responses.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Message attached to plain `200 OK` envelopes.
pub const SUCCESS_MESSAGE: &str = "Success";

/// Outcome block of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInfo {
    is_success: bool,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ResponseInfo {
    /// Build the info block for an HTTP status.
    ///
    /// `isSuccess` is derived from the status and `code` is its decimal form.
    ///
    /// # Examples
    /// ```
    /// use envelope::ResponseInfo;
    ///
    /// let info = ResponseInfo::from_status(404, "Resource not found");
    /// assert!(!info.is_success());
    /// assert_eq!(info.code(), "404");
    /// assert_eq!(info.status(), Some(404));
    /// ```
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            is_success: is_success_status(status),
            code: status.to_string(),
            message: message.into(),
        }
    }

    /// Whether the response reports success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_success
    }

    /// String-encoded status or error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric status parsed from [`Self::code`], when it is numeric.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.code.parse().ok()
    }
}

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    info: ResponseInfo,
    data: Option<T>,
    id: Option<String>,
}

impl<T> Envelope<T> {
    /// `200 OK` envelope carrying `data`.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self::success_with_status(200, SUCCESS_MESSAGE, data)
    }

    /// Success envelope with an explicit status (for example `201`).
    ///
    /// A non-2xx status yields `isSuccess == false`; use [`Self::failure`]
    /// for failures so the payload is omitted.
    #[must_use]
    pub fn success_with_status(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            info: ResponseInfo::from_status(status, message),
            data: Some(data),
            id: None,
        }
    }

    /// Failure envelope without payload.
    ///
    /// # Examples
    /// ```
    /// use envelope::Envelope;
    ///
    /// let envelope = Envelope::<()>::failure(500, "An internal server error occurred", Some("id-1".into()));
    /// assert!(!envelope.info().is_success());
    /// assert!(envelope.data().is_none());
    /// assert_eq!(envelope.id(), Some("id-1"));
    /// ```
    #[must_use]
    pub fn failure(status: u16, message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            info: ResponseInfo::from_status(status, message),
            data: None,
            id,
        }
    }

    /// Attach a correlation identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Outcome block.
    #[must_use]
    pub const fn info(&self) -> &ResponseInfo {
        &self.info
    }

    /// Payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Correlation identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Split the envelope into its parts.
    #[must_use]
    pub fn into_parts(self) -> (ResponseInfo, Option<T>, Option<String>) {
        (self.info, self.data, self.id)
    }
}

/// Return whether `status` is in the 2xx range.
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    matches!(status, 200..=299)
}

/// Recognise the envelope shape in an untyped JSON body.
///
/// A body is an envelope when it is an object whose `info` member is an
/// object with a boolean `isSuccess`.
///
/// # Examples
/// ```
/// use envelope::probe_info;
/// use serde_json::json;
///
/// let body = json!({ "info": { "isSuccess": false, "code": "409", "message": "taken" } });
/// let info = probe_info(&body).expect("envelope shape");
/// assert_eq!(info.message(), "taken");
/// assert!(probe_info(&json!({ "name": "plain" })).is_none());
/// ```
#[must_use]
pub fn probe_info(body: &Value) -> Option<ResponseInfo> {
    let info = body.as_object()?.get("info")?;
    if !info.is_object() {
        return None;
    }
    ResponseInfo::deserialize(info).ok()
}

/// Extract the correlation identifier from an untyped envelope body.
#[must_use]
pub fn probe_id(body: &Value) -> Option<String> {
    body.get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    //! Wire-shape coverage for the envelope.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(199, false)]
    #[case(200, true)]
    #[case(201, true)]
    #[case(299, true)]
    #[case(300, false)]
    #[case(404, false)]
    #[case(500, false)]
    fn success_flag_tracks_status(#[case] status: u16, #[case] expected: bool) {
        let info = ResponseInfo::from_status(status, "message");
        assert_eq!(info.is_success(), expected);
        assert_eq!(info.status(), Some(status));
    }

    #[test]
    fn failure_serialises_null_data_and_id() {
        let envelope = Envelope::<u8>::failure(400, "Invalid input parameters", None);
        let json = serde_json::to_value(&envelope).expect("serialisable");
        assert_eq!(
            json,
            json!({
                "info": { "isSuccess": false, "code": "400", "message": "Invalid input parameters" },
                "data": null,
                "id": null
            })
        );
    }

    #[test]
    fn decodes_envelope_without_optional_members() {
        let envelope: Envelope<Value> =
            serde_json::from_value(json!({ "info": { "isSuccess": true } })).expect("decodes");
        assert!(envelope.info().is_success());
        assert_eq!(envelope.info().code(), "");
        assert!(envelope.data().is_none());
        assert!(envelope.id().is_none());
    }

    #[rstest]
    #[case(json!([1, 2]))]
    #[case(json!({ "info": "text" }))]
    #[case(json!({ "info": { "code": "200" } }))]
    #[case(json!({ "info": { "isSuccess": "yes" } }))]
    fn rejects_non_envelope_bodies(#[case] body: Value) {
        assert!(probe_info(&body).is_none());
    }

    #[test]
    fn probe_id_ignores_blank_identifiers() {
        assert_eq!(probe_id(&json!({ "id": "abc-123" })), Some("abc-123".to_owned()));
        assert_eq!(probe_id(&json!({ "id": "  " })), None);
        assert_eq!(probe_id(&json!({ "id": null })), None);
    }
}
