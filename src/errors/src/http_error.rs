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

use crate::rpc::Status;
use bytes::Bytes;

/// An error reported by a REST-based Google Cloud client.
///
/// REST-based clients describe a non-2xx response with the HTTP status
/// code, the request URI, the response headers, and the raw response
/// body. Services following [AIP-193] embed a `google.rpc.Status`
/// payload in the body; [error_details][HttpError::error_details]
/// parses it on demand.
///
/// [AIP-193]: https://google.aip.dev/193
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpError {
    status_code: u16,
    uri: String,
    headers: std::collections::HashMap<String, String>,
    content: Bytes,
}

impl HttpError {
    /// Creates a new [HttpError] with the given status code, request
    /// URI, headers, and response body.
    pub fn new(
        status_code: u16,
        uri: impl Into<String>,
        headers: std::collections::HashMap<String, String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            status_code,
            uri: uri.into(),
            headers,
            content: content.into(),
        }
    }

    /// Returns the status code associated with the HTTP error response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the URI of the request that failed.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns a reference to the headers associated with the HTTP
    /// error response.
    pub fn headers(&self) -> &std::collections::HashMap<String, String> {
        &self.headers
    }

    /// Returns a reference to the raw response body.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Parses the structured error payload embedded in the response
    /// body, if the body carries one.
    ///
    /// Parsing happens on every call; the result is not cached.
    pub fn error_details(&self) -> Option<Status> {
        Status::try_from(&self.content).ok()
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HTTP Error: code={}, uri={}, headers={:?}",
            self.status_code, self.uri, self.headers
        )?;
        if self.content.is_empty() {
            return Ok(());
        }
        if let Some(status) = self.error_details() {
            return write!(f, ", payload:\n{status:?}");
        }
        write!(f, ", payload:\n{:?}", self.content)
    }
}

impl std::error::Error for HttpError {}
