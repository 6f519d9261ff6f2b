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

//! Uniform error inspection for Google Cloud client libraries.
//!
//! Google Cloud applications often call services through two different
//! client families. The gRPC-based clients report failures with a
//! numeric code, a message, and per-attempt records carrying trailing
//! metadata. The REST-based clients report failures with a raw response
//! body, the request URI, and a structured detail payload embedded in
//! the body. Code that handles both ends up branching on the concrete
//! error type at every call site.
//!
//! This crate wraps either family behind one read-only view,
//! [GcpError]. The adapter classifies the wrapped error once, exposes
//! the fields each family carries, and decodes the well-known
//! structured details (`google.rpc.Help`, `google.rpc.ErrorInfo`,
//! `google.rpc.QuotaFailure`, `google.rpc.BadRequest`,
//! `google.rpc.PreconditionFailure`) conveyed as binary trailing
//! metadata on failed gRPC calls.
//!
//! # Example
//! ```
//! use gcp_error_handler::{CloudError, GcpError};
//! let err = CloudError::default()
//!     .set_code(403)
//!     .set_message("PERMISSION_DENIED");
//! let wrapped = GcpError::wrap(err);
//! assert!(wrapped.is_cloud_error());
//! assert_eq!(wrapped.message(), Some("PERMISSION_DENIED"));
//! assert_eq!(wrapped.uri(), None);
//! ```

/// The adapter over both error families.
mod adapter;
pub use adapter::{DetailError, ErrorFamily, GcpError};

/// The gRPC-based ("cloud error") integration type.
mod cloud_error;
pub use cloud_error::{AttemptError, CloudError, TrailingMetadata};

/// The REST-based integration type.
mod http_error;
pub use http_error::HttpError;

/// Rendering options, including the process-wide environment toggle.
pub mod options;

/// The canonical status codes and the `google.rpc.Status` error model.
pub mod rpc;

/// The well-known structured error detail payloads.
pub mod details;
