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

//! Wraps errors the way an application would: caught as opaque boxed
//! errors, sometimes several layers away from the client error.

use bytes::Bytes;
use gcp_error_handler::details::{BAD_REQUEST_KEY, BadRequest, ErrorInfo, ERROR_INFO_KEY, bad_request};
use gcp_error_handler::rpc::Code;
use gcp_error_handler::{
    AttemptError, CloudError, DetailError, ErrorFamily, GcpError, HttpError, TrailingMetadata,
};
use anyhow::Result;
use prost::Message;
use std::collections::HashMap;
use std::error::Error as _;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn storage_denied() -> CloudError {
    let info = ErrorInfo::default()
        .set_reason("USER_PROJECT_DENIED")
        .set_domain("storage.googleapis.com")
        .set_metadata([("consumer", "projects/my-project")]);
    let detail = BadRequest::default().set_field_violations(vec![
        bad_request::FieldViolation::default()
            .set_field("name")
            .set_description("required"),
    ]);
    let metadata = TrailingMetadata::default()
        .append(ERROR_INFO_KEY, info.encode_to_vec())
        .append(BAD_REQUEST_KEY, detail.encode_to_vec());
    CloudError::default()
        .set_code(403)
        .set_message("PERMISSION_DENIED")
        .set_grpc_status_code(Code::PermissionDenied)
        .set_attempts(vec![
            AttemptError::default()
                .set_message("reading gs://bucket/object failed")
                .set_trailing_metadata(metadata),
        ])
}

fn not_found() -> HttpError {
    let body = serde_json::json!({
        "error": {"code": 404, "message": "instance not found", "status": "NOT_FOUND"}
    });
    HttpError::new(
        404,
        "https://compute.googleapis.com/compute/v1/projects/p/zones/z/instances/i",
        HashMap::new(),
        Bytes::from(body.to_string()),
    )
}

#[test]
#[serial_test::serial]
fn wrap_boxed_cloud_error() -> Result<()> {
    let boxed: BoxError = storage_denied().into();
    let wrapped = GcpError::wrap(boxed);
    assert_eq!(wrapped.family(), ErrorFamily::Cloud);
    assert_eq!(wrapped.code(), Some(403));
    assert_eq!(wrapped.message(), Some("PERMISSION_DENIED"));
    assert_eq!(wrapped.grpc_status_code(), Some(&Code::PermissionDenied));

    let info = wrapped.error_info()?.unwrap();
    assert_eq!(info.reason, "USER_PROJECT_DENIED");
    assert_eq!(
        info.metadata.get("consumer").map(String::as_str),
        Some("projects/my-project")
    );
    let detail = wrapped.bad_request()?.unwrap();
    assert_eq!(detail.field_violations[0].field, "name");
    Ok(())
}

#[test]
#[serial_test::serial]
fn wrap_nested_application_error() -> Result<()> {
    #[derive(Debug, thiserror::Error)]
    #[error("fetching instance metadata: {0}")]
    struct Outer(#[source] HttpError);

    let wrapped = GcpError::wrap(Outer(not_found()));
    assert_eq!(wrapped.family(), ErrorFamily::Http);
    assert_eq!(wrapped.http_status_code(), Some(404));
    assert!(wrapped.uri().unwrap().starts_with("https://compute.googleapis.com/"));

    let status = wrapped.error_details().unwrap();
    assert_eq!(status.code, 404);
    assert_eq!(status.status.as_deref(), Some("NOT_FOUND"));

    // The cloud accessors stay silent, the decoders do not.
    assert_eq!(wrapped.code(), None);
    assert!(matches!(
        wrapped.quota_failure(),
        Err(DetailError::WrongFamily(ErrorFamily::Http))
    ));
    Ok(())
}

#[test]
#[serial_test::serial]
fn wrap_unrecognized_error() {
    let wrapped = GcpError::wrap(std::io::Error::other("connection reset"));
    assert_eq!(wrapped.family(), ErrorFamily::Unknown);
    assert!(!wrapped.is_cloud_error());
    assert!(!wrapped.is_http_error());
    assert_eq!(wrapped.code(), None);
    assert_eq!(wrapped.http_status_code(), None);

    let got = wrapped.help();
    assert!(
        matches!(got, Err(DetailError::WrongFamily(ErrorFamily::Unknown))),
        "{got:?}"
    );
    // The original error still renders and remains reachable.
    assert!(wrapped.to_string().contains("connection reset"));
    assert!(wrapped.source().is_some());
}

#[test]
#[serial_test::serial]
fn wrap_string_message() {
    let wrapped = GcpError::wrap("task panicked");
    assert_eq!(wrapped.family(), ErrorFamily::Unknown);
    assert_eq!(wrapped.to_string(), "task panicked");
}

#[test]
#[serial_test::serial]
fn detail_error_messages() {
    let wrapped = GcpError::wrap(not_found());
    let err = wrapped.error_info().unwrap_err();
    assert!(err.to_string().contains("cloud error family"), "{err}");
    assert!(err.to_string().contains("http"), "{err}");
}
