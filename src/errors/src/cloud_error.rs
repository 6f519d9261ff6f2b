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

use crate::rpc::Code;
use bytes::Bytes;

/// An error reported by a gRPC-based Google Cloud client.
///
/// The gRPC-based clients surface a platform-defined code, a
/// developer-facing message, and one record per failed attempt. Each
/// attempt record carries the trailing metadata returned by the failed
/// call, which is where services attach binary-encoded structured
/// details (see [crate::details]).
///
/// Errors raised before any call is made (e.g. while building the
/// request) have no transport status code; for those
/// [grpc_status_code][CloudError::grpc_status_code] is `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CloudError {
    code: i32,
    message: String,
    grpc_status_code: Option<Code>,
    response: Option<Bytes>,
    attempts: Vec<AttemptError>,
}

impl CloudError {
    /// The platform-defined error code.
    ///
    /// This is the HTTP mapping of the status, e.g. `403` for
    /// `PERMISSION_DENIED`.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The transport status code, or `None` if the error did not
    /// originate from a transport call.
    pub fn grpc_status_code(&self) -> Option<&Code> {
        self.grpc_status_code.as_ref()
    }

    /// The raw response payload associated with the failure, if any.
    pub fn response(&self) -> Option<&Bytes> {
        self.response.as_ref()
    }

    /// The per-attempt error records, in the order the attempts were
    /// made.
    pub fn attempts(&self) -> &[AttemptError] {
        &self.attempts
    }

    /// Sets the value of [code][CloudError::code].
    pub fn set_code<T: Into<i32>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value of [message][CloudError::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [grpc_status_code][CloudError::grpc_status_code].
    pub fn set_grpc_status_code<T: Into<Code>>(mut self, v: T) -> Self {
        self.grpc_status_code = Some(v.into());
        self
    }

    /// Sets the value of [response][CloudError::response].
    pub fn set_response<T: Into<Bytes>>(mut self, v: T) -> Self {
        self.response = Some(v.into());
        self
    }

    /// Sets the value of [attempts][CloudError::attempts].
    pub fn set_attempts<T: Into<Vec<AttemptError>>>(mut self, v: T) -> Self {
        self.attempts = v.into();
        self
    }
}

impl std::fmt::Display for CloudError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "the service reports an error with code {} described as: {}",
            self.grpc_status_code
                .as_ref()
                .map(Code::name)
                .unwrap_or("UNKNOWN"),
            self.message
        )
    }
}

impl std::error::Error for CloudError {}

/// One failed attempt of a gRPC call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttemptError {
    message: String,
    trailing_metadata: TrailingMetadata,
}

impl AttemptError {
    /// The error message for this attempt.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The trailing metadata attached to the failed call.
    pub fn trailing_metadata(&self) -> &TrailingMetadata {
        &self.trailing_metadata
    }

    /// Sets the value of [message][AttemptError::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [trailing_metadata][AttemptError::trailing_metadata].
    pub fn set_trailing_metadata<T: Into<TrailingMetadata>>(mut self, v: T) -> Self {
        self.trailing_metadata = v.into();
        self
    }
}

/// The key/value pairs attached to a failed remote call.
///
/// Keys ending in `-bin` carry binary values. Keys may repeat; lookups
/// return the first match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrailingMetadata(Vec<(String, Bytes)>);

impl TrailingMetadata {
    /// Appends one key/value pair.
    pub fn append<K: Into<String>, V: Into<Bytes>>(mut self, key: K, value: V) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// The value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates the key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bytes)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True if no metadata was attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TrailingMetadata
where
    K: Into<String>,
    V: Into<Bytes>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let error = CloudError::default()
            .set_code(429)
            .set_message("quota exceeded")
            .set_grpc_status_code(Code::ResourceExhausted)
            .set_response(Bytes::from_static(b"{}"))
            .set_attempts(vec![AttemptError::default().set_message("attempt 1")]);
        assert_eq!(error.code(), 429);
        assert_eq!(error.message(), "quota exceeded");
        assert_eq!(error.grpc_status_code(), Some(&Code::ResourceExhausted));
        assert_eq!(error.response(), Some(&Bytes::from_static(b"{}")));
        assert_eq!(error.attempts().len(), 1);
    }

    #[test]
    fn display_includes_code_name_and_message() {
        let error = CloudError::default()
            .set_message("NOT FOUND")
            .set_grpc_status_code(Code::NotFound);
        let got = error.to_string();
        assert!(got.contains("NOT_FOUND"), "{got}");
        assert!(got.contains("NOT FOUND"), "{got}");
    }

    #[test]
    fn display_without_transport_code() {
        let error = CloudError::default().set_message("local failure");
        let got = error.to_string();
        assert!(got.contains("UNKNOWN"), "{got}");
        assert!(got.contains("local failure"), "{got}");
    }

    #[test]
    fn metadata_from_iter_preserves_order() {
        let metadata = TrailingMetadata::from_iter([
            ("google.rpc.help-bin", Bytes::from_static(b"h")),
            ("google.rpc.errorinfo-bin", Bytes::from_static(b"e")),
        ]);
        let keys = metadata.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["google.rpc.help-bin", "google.rpc.errorinfo-bin"]);
        assert_eq!(
            metadata.get("google.rpc.errorinfo-bin"),
            Some(&Bytes::from_static(b"e"))
        );
    }

    #[test]
    fn metadata_first_match_wins() {
        let metadata = TrailingMetadata::default()
            .append("google.rpc.help-bin", Bytes::from_static(b"first"))
            .append("google.rpc.help-bin", Bytes::from_static(b"second"));
        assert_eq!(
            metadata.get("google.rpc.help-bin"),
            Some(&Bytes::from_static(b"first"))
        );
        assert_eq!(metadata.get("google.rpc.errorinfo-bin"), None);
        assert!(!metadata.is_empty());
    }
}
