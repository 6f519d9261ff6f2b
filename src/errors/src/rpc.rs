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

use crate::details::{BadRequest, ErrorInfo, Help, PreconditionFailure, QuotaFailure};
use serde::{Deserialize, Serialize};

/// The [Status] type defines a logical error model that is suitable for
/// different programming environments, including REST APIs and RPC
/// APIs. Each [Status] message contains three pieces of data: error
/// code, error message, and error details.
///
/// You can find out more about this error model and how to work with it
/// in the [API Design Guide](https://cloud.google.com/apis/design/errors).
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Status {
    /// The status code.
    ///
    /// When using a HTTP transport this is the HTTP status code. When
    /// using gRPC, this is one of the values enumerated in [Code].
    pub code: i32,

    /// A developer-facing error message, which should be in English.
    pub message: String,

    /// The underlying `google.rpc.Status.code`, as a string.
    ///
    /// When serialized over JSON, status messages include both the HTTP
    /// status code (in the `code` field), and the status [Code] as a
    /// string.
    pub status: Option<String>,

    /// A list of messages that carry the error details. There is a
    /// common set of message types for APIs to use.
    pub details: Vec<StatusDetails>,
}

impl Status {
    /// Sets the value of [code][Status::code].
    pub fn set_code<T: Into<i32>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value of [message][Status::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [status][Status::status].
    pub fn set_status<T: Into<String>>(mut self, v: T) -> Self {
        self.status = Some(v.into());
        self
    }

    /// Sets the value of [details][Status::details].
    pub fn set_details<T: Into<Vec<StatusDetails>>>(mut self, v: T) -> Self {
        self.details = v.into();
        self
    }
}

/// The canonical error codes for APIs.
///
/// Sometimes multiple error codes may apply. Services should return the
/// most specific error code that applies. For example, prefer
/// `OUT_OF_RANGE` over `FAILED_PRECONDITION` if both codes apply.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub enum Code {
    /// Not an error; returned on success.
    ///
    /// HTTP Mapping: 200 OK
    Ok = 0,

    /// The operation was cancelled, typically by the caller.
    ///
    /// HTTP Mapping: 499 Client Closed Request
    Canceled = 1,

    /// Unknown error. For example, this error may be returned when a
    /// `Status` value received from another address space belongs to an
    /// error space that is not known in this address space.
    ///
    /// HTTP Mapping: 500 Internal Server Error
    #[default]
    Unknown = 2,

    /// The client specified an invalid argument. Note that this differs
    /// from `FAILED_PRECONDITION`. `INVALID_ARGUMENT` indicates
    /// arguments that are problematic regardless of the state of the
    /// system (e.g., a malformed file name).
    ///
    /// HTTP Mapping: 400 Bad Request
    InvalidArgument = 3,

    /// The deadline expired before the operation could complete.
    ///
    /// HTTP Mapping: 504 Gateway Timeout
    DeadlineExceeded = 4,

    /// Some requested entity (e.g., file or directory) was not found.
    ///
    /// HTTP Mapping: 404 Not Found
    NotFound = 5,

    /// The entity that a client attempted to create (e.g., file or
    /// directory) already exists.
    ///
    /// HTTP Mapping: 409 Conflict
    AlreadyExists = 6,

    /// The caller does not have permission to execute the specified
    /// operation.
    ///
    /// HTTP Mapping: 403 Forbidden
    PermissionDenied = 7,

    /// Some resource has been exhausted, perhaps a per-user quota, or
    /// perhaps the entire file system is out of space.
    ///
    /// HTTP Mapping: 429 Too Many Requests
    ResourceExhausted = 8,

    /// The operation was rejected because the system is not in a state
    /// required for the operation's execution. For example, the
    /// directory to be deleted is non-empty.
    ///
    /// HTTP Mapping: 400 Bad Request
    FailedPrecondition = 9,

    /// The operation was aborted, typically due to a concurrency issue
    /// such as a sequencer check failure or transaction abort.
    ///
    /// HTTP Mapping: 409 Conflict
    Aborted = 10,

    /// The operation was attempted past the valid range. E.g., seeking
    /// or reading past end-of-file.
    ///
    /// HTTP Mapping: 400 Bad Request
    OutOfRange = 11,

    /// The operation is not implemented or is not supported/enabled in
    /// this service.
    ///
    /// HTTP Mapping: 501 Not Implemented
    Unimplemented = 12,

    /// Internal errors. This means that some invariants expected by the
    /// underlying system have been broken.
    ///
    /// HTTP Mapping: 500 Internal Server Error
    Internal = 13,

    /// The service is currently unavailable. This is most likely a
    /// transient condition, which can be corrected by retrying with a
    /// backoff.
    ///
    /// HTTP Mapping: 503 Service Unavailable
    Unavailable = 14,

    /// Unrecoverable data loss or corruption.
    ///
    /// HTTP Mapping: 500 Internal Server Error
    DataLoss = 15,

    /// The request does not have valid authentication credentials for
    /// the operation.
    ///
    /// HTTP Mapping: 401 Unauthorized
    Unauthenticated = 16,
}

impl Code {
    /// The name of the status code, as used in the JSON representation
    /// of `google.rpc.Status`.
    pub fn name(&self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Canceled => "CANCELED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::convert::From<i32> for Code {
    fn from(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Canceled,
            2 => Code::Unknown,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::default(),
        }
    }
}

impl std::convert::TryFrom<&str> for Code {
    type Error = String;
    fn try_from(value: &str) -> std::result::Result<Code, Self::Error> {
        match value {
            "OK" => Ok(Code::Ok),
            "CANCELED" => Ok(Code::Canceled),
            "UNKNOWN" => Ok(Code::Unknown),
            "INVALID_ARGUMENT" => Ok(Code::InvalidArgument),
            "DEADLINE_EXCEEDED" => Ok(Code::DeadlineExceeded),
            "NOT_FOUND" => Ok(Code::NotFound),
            "ALREADY_EXISTS" => Ok(Code::AlreadyExists),
            "PERMISSION_DENIED" => Ok(Code::PermissionDenied),
            "RESOURCE_EXHAUSTED" => Ok(Code::ResourceExhausted),
            "FAILED_PRECONDITION" => Ok(Code::FailedPrecondition),
            "ABORTED" => Ok(Code::Aborted),
            "OUT_OF_RANGE" => Ok(Code::OutOfRange),
            "UNIMPLEMENTED" => Ok(Code::Unimplemented),
            "INTERNAL" => Ok(Code::Internal),
            "UNAVAILABLE" => Ok(Code::Unavailable),
            "DATA_LOSS" => Ok(Code::DataLoss),
            "UNAUTHENTICATED" => Ok(Code::Unauthenticated),
            _ => Err(format!("unknown status code value {value}")),
        }
    }
}

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.clone() as i32)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Code::from)
    }
}

/// The type of details associated with [Status].
///
/// Google Cloud RPCs often return a detailed error description. These
/// details can be used to better understand the root cause of the
/// problem. REST error bodies tag each detail with its type name,
/// sometimes with the full `type.googleapis.com/` prefix; both forms
/// are accepted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[non_exhaustive]
#[serde(tag = "@type")]
pub enum StatusDetails {
    #[serde(
        rename = "google.rpc.BadRequest",
        alias = "type.googleapis.com/google.rpc.BadRequest"
    )]
    BadRequest(BadRequest),
    #[serde(
        rename = "google.rpc.ErrorInfo",
        alias = "type.googleapis.com/google.rpc.ErrorInfo"
    )]
    ErrorInfo(ErrorInfo),
    #[serde(
        rename = "google.rpc.Help",
        alias = "type.googleapis.com/google.rpc.Help"
    )]
    Help(Help),
    #[serde(
        rename = "google.rpc.PreconditionFailure",
        alias = "type.googleapis.com/google.rpc.PreconditionFailure"
    )]
    PreconditionFailure(PreconditionFailure),
    #[serde(
        rename = "google.rpc.QuotaFailure",
        alias = "type.googleapis.com/google.rpc.QuotaFailure"
    )]
    QuotaFailure(QuotaFailure),
    /// A detail of a kind this crate does not model.
    #[serde(other)]
    Other,
}

/// A helper class to deserialize wrapped Status messages.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct ErrorWrapper {
    error: Status,
}

impl TryFrom<&bytes::Bytes> for Status {
    type Error = serde_json::Error;

    fn try_from(value: &bytes::Bytes) -> Result<Self, Self::Error> {
        serde_json::from_slice::<ErrorWrapper>(value).map(|w| w.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::bad_request::FieldViolation;
    use crate::details::help;
    use serde_json::json;
    use test_case::test_case;
    type Result = std::result::Result<(), Box<dyn std::error::Error>>;

    // This is a sample string received from production. It is useful to
    // validate the serialization helpers.
    const SAMPLE_PAYLOAD: &[u8] = b"{\n  \"error\": {\n    \"code\": 400,\n    \"message\": \"The provided Secret ID [] does not match the expected format [[a-zA-Z_0-9]+]\",\n    \"status\": \"INVALID_ARGUMENT\"\n  }\n}\n";

    #[test]
    fn try_from_bytes() -> Result {
        let got = Status::try_from(&bytes::Bytes::from_static(SAMPLE_PAYLOAD))?;
        let want = Status::default()
            .set_code(400)
            .set_status("INVALID_ARGUMENT")
            .set_message(
                "The provided Secret ID [] does not match the expected format [[a-zA-Z_0-9]+]",
            );
        assert_eq!(got, want);

        let got = Status::try_from(&bytes::Bytes::from_static(b"\"error\": 1234"));
        assert!(got.is_err(), "{got:?}");
        Ok(())
    }

    #[test]
    fn deserialize_details() -> Result {
        let input = json!({
            "code": 400,
            "message": "bad request",
            "status": "INVALID_ARGUMENT",
            "details": [
                {"@type": "google.rpc.BadRequest",
                 "fieldViolations": [{"field": "name", "description": "required"}]},
                {"@type": "type.googleapis.com/google.rpc.Help",
                 "links": [{"description": "docs", "url": "https://cloud.google.com"}]},
                {"@type": "google.rpc.RequestInfo", "requestId": "abc123"},
            ]
        });
        let got: Status = serde_json::from_value(input)?;
        let want = vec![
            StatusDetails::BadRequest(BadRequest::default().set_field_violations(vec![
                FieldViolation::default()
                    .set_field("name")
                    .set_description("required"),
            ])),
            StatusDetails::Help(Help::default().set_links(vec![
                help::Link::default()
                    .set_description("docs")
                    .set_url("https://cloud.google.com"),
            ])),
            StatusDetails::Other,
        ];
        assert_eq!(got.details, want);
        Ok(())
    }

    #[test_case("OK")]
    #[test_case("CANCELED")]
    #[test_case("UNKNOWN")]
    #[test_case("INVALID_ARGUMENT")]
    #[test_case("DEADLINE_EXCEEDED")]
    #[test_case("NOT_FOUND")]
    #[test_case("ALREADY_EXISTS")]
    #[test_case("PERMISSION_DENIED")]
    #[test_case("RESOURCE_EXHAUSTED")]
    #[test_case("FAILED_PRECONDITION")]
    #[test_case("ABORTED")]
    #[test_case("OUT_OF_RANGE")]
    #[test_case("UNIMPLEMENTED")]
    #[test_case("INTERNAL")]
    #[test_case("UNAVAILABLE")]
    #[test_case("DATA_LOSS")]
    #[test_case("UNAUTHENTICATED")]
    fn code_roundtrip(input: &str) -> Result {
        let code = Code::try_from(input)?;
        assert_eq!(code.name(), input);
        assert_eq!(code.to_string(), input);
        let roundtrip = Code::from(code.clone() as i32);
        assert_eq!(roundtrip, code);
        Ok(())
    }

    #[test]
    fn code_try_from_string_error() {
        let err = Code::try_from("INVALID-NOT-A-CODE");
        match err {
            Err(s) => assert!(
                s.contains("INVALID-NOT-A-CODE"),
                "expected invalid string in error {s}"
            ),
            Ok(v) => panic!("expected error in try_from, got {v:?}"),
        };
    }

    #[test]
    fn code_deserialize_unknown() -> Result {
        let input = json!(-17);
        let code = serde_json::from_value::<Code>(input)?;
        assert_eq!(code, Code::Unknown);
        Ok(())
    }

    #[test]
    fn code_serialize_as_i32() -> Result {
        let got = serde_json::to_value(Code::NotFound)?;
        assert_eq!(got, json!(5));
        Ok(())
    }
}
