// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::cloud_error::{AttemptError, CloudError};
use crate::details::{
    BAD_REQUEST_KEY, BadRequest, ERROR_INFO_KEY, ErrorInfo, HELP_KEY, Help,
    PRECONDITION_FAILURE_KEY, PreconditionFailure, QUOTA_FAILURE_KEY, QuotaFailure,
};
use crate::http_error::HttpError;
use crate::rpc::{Code, Status};
use bytes::Bytes;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The client family that produced a wrapped error.
///
/// Decided once when the adapter is constructed, by looking for the
/// two integration types ([CloudError], [HttpError]) in the wrapped
/// error and its [source][std::error::Error::source] chain. An error
/// matching neither shape is classified as [Unknown][ErrorFamily::Unknown]
/// rather than assumed to belong to either family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorFamily {
    /// A gRPC-based client error, see [CloudError].
    Cloud,
    /// A REST-based client error, see [HttpError].
    Http,
    /// Neither recognized shape.
    Unknown,
}

impl std::fmt::Display for ErrorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorFamily::Cloud => f.write_str("cloud"),
            ErrorFamily::Http => f.write_str("http"),
            ErrorFamily::Unknown => f.write_str("unknown"),
        }
    }
}

/// The error returned by the structured-detail decoders.
///
/// The decoders iterate the per-attempt records of a [CloudError]; the
/// HTTP family fundamentally does not carry such records, so calling a
/// decoder on the wrong family is a usage bug and fails loudly instead
/// of silently returning absence.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DetailError {
    /// A decoder was invoked on an adapter that does not wrap a cloud
    /// error.
    #[error("structured error details require the cloud error family, this adapter wraps a {0} error")]
    WrongFamily(ErrorFamily),

    /// The trailing metadata carries the well-known key, but its
    /// payload does not decode as the corresponding schema.
    #[error("cannot decode the binary payload stored under {key}")]
    Decode {
        key: &'static str,
        #[source]
        source: prost::DecodeError,
    },
}

/// A uniform view over the errors raised by both Google Cloud client
/// families.
///
/// Construct it with any caught error; the adapter classifies the error
/// once and then answers field queries for whichever family produced
/// it. Accessors for the other family return `None`. The five
/// structured-detail decoders additionally require the cloud family and
/// return [DetailError::WrongFamily] otherwise.
///
/// # Example
/// ```
/// use gcp_error_handler::{AttemptError, CloudError, GcpError};
/// use gcp_error_handler::rpc::Code;
/// let err = CloudError::default()
///     .set_code(429)
///     .set_message("RESOURCE_EXHAUSTED")
///     .set_grpc_status_code(Code::ResourceExhausted)
///     .set_attempts(vec![AttemptError::default()]);
/// let wrapped = GcpError::wrap(err);
/// assert_eq!(wrapped.code(), Some(429));
/// // No attempt carries a quota failure payload: absence, not an error.
/// assert!(matches!(wrapped.quota_failure(), Ok(None)));
/// ```
#[derive(Debug)]
pub struct GcpError {
    underlying: BoxError,
    family: ErrorFamily,
    expand_details: bool,
}

impl GcpError {
    /// Wraps a caught error.
    ///
    /// Never fails. The [DETAIL_VAR][crate::options::DETAIL_VAR]
    /// environment toggle is read here, once, and stored; use
    /// [set_expanded_details][GcpError::set_expanded_details] to
    /// override it for this adapter.
    pub fn wrap<T: Into<BoxError>>(err: T) -> Self {
        let underlying = err.into();
        let family = classify(underlying.as_ref());
        Self {
            underlying,
            family,
            expand_details: crate::options::detail_enabled(),
        }
    }

    /// Enables or disables expanded rendering for this adapter,
    /// overriding the environment toggle.
    pub fn set_expanded_details(mut self, v: bool) -> Self {
        self.expand_details = v;
        self
    }

    /// The client family that produced the wrapped error.
    pub fn family(&self) -> ErrorFamily {
        self.family
    }

    /// True if the wrapped error came from a gRPC-based client.
    pub fn is_cloud_error(&self) -> bool {
        self.family == ErrorFamily::Cloud
    }

    /// True if the wrapped error came from a REST-based client.
    pub fn is_http_error(&self) -> bool {
        self.family == ErrorFamily::Http
    }

    /// Extract the first error of type `T` from the wrapped error and
    /// its source chain.
    pub fn as_inner<T: StdError + 'static>(&self) -> Option<&T> {
        let top: &(dyn StdError + 'static) = self.underlying.as_ref();
        if let Some(value) = top.downcast_ref::<T>() {
            return Some(value);
        }
        let mut e = top.source()?;
        // Prevent infinite loops due to cycles in the `source()`
        // errors.
        for _ in 0..32 {
            if let Some(value) = e.downcast_ref::<T>() {
                return Some(value);
            }
            e = e.source()?;
        }
        None
    }

    /// The raw response body, for the HTTP family.
    pub fn content(&self) -> Option<&Bytes> {
        self.as_inner::<HttpError>().map(HttpError::content)
    }

    /// The URI of the failed request, for the HTTP family.
    pub fn uri(&self) -> Option<&str> {
        self.as_inner::<HttpError>().map(HttpError::uri)
    }

    /// The structured error payload parsed from the response body, for
    /// the HTTP family.
    pub fn error_details(&self) -> Option<Status> {
        self.as_inner::<HttpError>().and_then(HttpError::error_details)
    }

    /// The transport response handle, for the HTTP family.
    pub fn http_response(&self) -> Option<&HttpError> {
        self.as_inner::<HttpError>()
    }

    /// The HTTP status code, for the HTTP family.
    pub fn http_status_code(&self) -> Option<u16> {
        self.as_inner::<HttpError>().map(HttpError::status_code)
    }

    /// The response headers, for the HTTP family.
    pub fn http_headers(&self) -> Option<&std::collections::HashMap<String, String>> {
        self.as_inner::<HttpError>().map(HttpError::headers)
    }

    /// The platform-defined error code, for the cloud family.
    pub fn code(&self) -> Option<i32> {
        self.as_inner::<CloudError>().map(CloudError::code)
    }

    /// The human-readable error message, for the cloud family.
    pub fn message(&self) -> Option<&str> {
        self.as_inner::<CloudError>().map(CloudError::message)
    }

    /// The raw response payload, for the cloud family.
    pub fn response(&self) -> Option<&Bytes> {
        self.as_inner::<CloudError>().and_then(CloudError::response)
    }

    /// The transport status code, for the cloud family.
    ///
    /// Also `None` for cloud errors that did not originate from a
    /// transport call.
    pub fn grpc_status_code(&self) -> Option<&Code> {
        self.as_inner::<CloudError>()
            .and_then(CloudError::grpc_status_code)
    }

    /// The ordered per-attempt error records, for the cloud family.
    pub fn errors(&self) -> Option<&[AttemptError]> {
        self.as_inner::<CloudError>().map(CloudError::attempts)
    }

    /// A `google.rpc.Status` view of the wrapped error, for the cloud
    /// family.
    pub fn status(&self) -> Option<Status> {
        let cloud = self.as_inner::<CloudError>()?;
        let status = Status::default()
            .set_code(cloud.code())
            .set_message(cloud.message());
        Some(match cloud.grpc_status_code() {
            Some(code) => status.set_status(code.name()),
            None => status,
        })
    }

    /// Decodes the `google.rpc.Help` detail attached to any attempt
    /// record, if present.
    ///
    /// Returns `Ok(None)` when no attempt carries the detail, and
    /// [DetailError::WrongFamily] when the wrapped error is not a cloud
    /// error. Decoding re-scans the attempt records on every call.
    pub fn help(&self) -> Result<Option<Help>, DetailError> {
        self.decode_detail(HELP_KEY)
    }

    /// Decodes the `google.rpc.ErrorInfo` detail, if present.
    pub fn error_info(&self) -> Result<Option<ErrorInfo>, DetailError> {
        self.decode_detail(ERROR_INFO_KEY)
    }

    /// Decodes the `google.rpc.QuotaFailure` detail, if present.
    pub fn quota_failure(&self) -> Result<Option<QuotaFailure>, DetailError> {
        self.decode_detail(QUOTA_FAILURE_KEY)
    }

    /// Decodes the `google.rpc.BadRequest` detail, if present.
    pub fn bad_request(&self) -> Result<Option<BadRequest>, DetailError> {
        self.decode_detail(BAD_REQUEST_KEY)
    }

    /// Decodes the `google.rpc.PreconditionFailure` detail, if present.
    pub fn precondition_failure(&self) -> Result<Option<PreconditionFailure>, DetailError> {
        self.decode_detail(PRECONDITION_FAILURE_KEY)
    }

    fn decode_detail<T>(&self, key: &'static str) -> Result<Option<T>, DetailError>
    where
        T: prost::Message + Default,
    {
        let Some(cloud) = self.as_inner::<CloudError>() else {
            return Err(DetailError::WrongFamily(self.family));
        };
        for attempt in cloud.attempts() {
            if let Some(value) = attempt.trailing_metadata().get(key) {
                return T::decode(value.as_ref())
                    .map(Some)
                    .map_err(|source| DetailError::Decode { key, source });
            }
        }
        Ok(None)
    }

    // The expanded rendering only applies to transport-originated
    // cloud errors. Detail decode failures degrade to omission.
    fn expanded_report(&self) -> Option<String> {
        let cloud = self.as_inner::<CloudError>()?;
        cloud.grpc_status_code()?;
        let mut report = std::collections::BTreeMap::new();
        report.insert(
            "GoogleCloudError",
            serde_json::Value::String(self.underlying.to_string()),
        );
        if let Ok(Some(help)) = self.help() {
            if let Ok(value) = serde_json::to_value(&help) {
                report.insert("google.rpc.Help", value);
            }
        }
        if let Ok(Some(detail)) = self.bad_request() {
            if let Ok(value) = serde_json::to_value(&detail) {
                report.insert("google.rpc.BadRequest", value);
            }
        }
        serde_json::to_string_pretty(&report).ok()
    }
}

impl std::fmt::Display for GcpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.expand_details {
            if let Some(report) = self.expanded_report() {
                return f.write_str(&report);
            }
        }
        write!(f, "{}", self.underlying)
    }
}

impl StdError for GcpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.underlying.as_ref() as &(dyn StdError))
    }
}

fn classify(err: &(dyn StdError + 'static)) -> ErrorFamily {
    let mut current = Some(err);
    // Bounded for the same reason as `as_inner`: a cycle in the
    // `source()` chain must not hang classification.
    for _ in 0..32 {
        let Some(e) = current else {
            break;
        };
        if e.downcast_ref::<HttpError>().is_some() {
            return ErrorFamily::Http;
        }
        if e.downcast_ref::<CloudError>().is_some() {
            return ErrorFamily::Cloud;
        }
        current = e.source();
    }
    ErrorFamily::Unknown
}
