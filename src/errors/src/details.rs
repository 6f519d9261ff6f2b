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

//! The well-known error detail payloads defined by `google/rpc/error_details.proto`.
//!
//! Failed gRPC calls may attach these messages to their trailing
//! metadata, binary-encoded under fixed keys (e.g.
//! `google.rpc.badrequest-bin`). REST error bodies carry the same
//! payloads in JSON form. The types here decode both: they are prost
//! messages for the binary form and serde types for the JSON form.

use serde::{Deserialize, Serialize};

/// The trailing metadata key for a binary-encoded [Help] payload.
pub const HELP_KEY: &str = "google.rpc.help-bin";
/// The trailing metadata key for a binary-encoded [ErrorInfo] payload.
pub const ERROR_INFO_KEY: &str = "google.rpc.errorinfo-bin";
/// The trailing metadata key for a binary-encoded [QuotaFailure] payload.
pub const QUOTA_FAILURE_KEY: &str = "google.rpc.quotafailure-bin";
/// The trailing metadata key for a binary-encoded [BadRequest] payload.
pub const BAD_REQUEST_KEY: &str = "google.rpc.badrequest-bin";
/// The trailing metadata key for a binary-encoded [PreconditionFailure] payload.
pub const PRECONDITION_FAILURE_KEY: &str = "google.rpc.preconditionfailure-bin";

/// Links to documentation or for performing an out-of-band action.
///
/// For example, if a quota check failed with an error indicating the
/// calling project has not enabled the accessed service, this can
/// contain a URL pointing directly to the right place in the developer
/// console to flip the bit.
#[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
#[serde(default, rename_all = "camelCase")]
pub struct Help {
    /// URL(s) pointing to additional information on handling the
    /// current error.
    #[prost(message, repeated, tag = "1")]
    pub links: Vec<help::Link>,
}

impl Help {
    /// Sets the value of [links][Help::links].
    pub fn set_links<T: Into<Vec<help::Link>>>(mut self, v: T) -> Self {
        self.links = v.into();
        self
    }
}

/// Defines additional types related to [Help].
pub mod help {
    use serde::{Deserialize, Serialize};

    /// Describes a URL link.
    #[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Link {
        /// Describes what the link offers.
        #[prost(string, tag = "1")]
        pub description: String,

        /// The URL of the link.
        #[prost(string, tag = "2")]
        pub url: String,
    }

    impl Link {
        /// Sets the value of [description][Link::description].
        pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
            self.description = v.into();
            self
        }

        /// Sets the value of [url][Link::url].
        pub fn set_url<T: Into<String>>(mut self, v: T) -> Self {
            self.url = v.into();
            self
        }
    }
}

/// Describes the cause of the error with structured details.
#[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorInfo {
    /// The reason of the error. This is a constant value that
    /// identifies the proximate cause of the error, e.g.
    /// `USER_PROJECT_DENIED`.
    #[prost(string, tag = "1")]
    pub reason: String,

    /// The logical grouping to which the "reason" belongs, typically
    /// the registered service name of the tool or product that
    /// generates the error, e.g. `googleapis.com`.
    #[prost(string, tag = "2")]
    pub domain: String,

    /// Additional structured details about this error, e.g. the
    /// consumer project or the exhausted service.
    #[prost(map = "string, string", tag = "3")]
    pub metadata: std::collections::HashMap<String, String>,
}

impl ErrorInfo {
    /// Sets the value of [reason][ErrorInfo::reason].
    pub fn set_reason<T: Into<String>>(mut self, v: T) -> Self {
        self.reason = v.into();
        self
    }

    /// Sets the value of [domain][ErrorInfo::domain].
    pub fn set_domain<T: Into<String>>(mut self, v: T) -> Self {
        self.domain = v.into();
        self
    }

    /// Sets the value of [metadata][ErrorInfo::metadata].
    pub fn set_metadata<K, V, T>(mut self, v: T) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        T: IntoIterator<Item = (K, V)>,
    {
        self.metadata = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }
}

/// Describes how a quota check failed.
#[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
#[serde(default, rename_all = "camelCase")]
pub struct QuotaFailure {
    /// Describes all quota violations.
    #[prost(message, repeated, tag = "1")]
    pub violations: Vec<quota_failure::Violation>,
}

impl QuotaFailure {
    /// Sets the value of [violations][QuotaFailure::violations].
    pub fn set_violations<T: Into<Vec<quota_failure::Violation>>>(mut self, v: T) -> Self {
        self.violations = v.into();
        self
    }
}

/// Defines additional types related to [QuotaFailure].
pub mod quota_failure {
    use serde::{Deserialize, Serialize};

    /// A message type used to describe a single quota violation.
    #[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Violation {
        /// The subject on which the quota check failed, e.g.
        /// `clientip:<ip address of client>`.
        #[prost(string, tag = "1")]
        pub subject: String,

        /// A description of how the quota check failed.
        #[prost(string, tag = "2")]
        pub description: String,
    }

    impl Violation {
        /// Sets the value of [subject][Violation::subject].
        pub fn set_subject<T: Into<String>>(mut self, v: T) -> Self {
            self.subject = v.into();
            self
        }

        /// Sets the value of [description][Violation::description].
        pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
            self.description = v.into();
            self
        }
    }
}

/// Describes violations in a client request, typically indicating the
/// request is malformed.
#[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
#[serde(default, rename_all = "camelCase")]
pub struct BadRequest {
    /// Describes all violations in the client request.
    #[prost(message, repeated, tag = "1")]
    pub field_violations: Vec<bad_request::FieldViolation>,
}

impl BadRequest {
    /// Sets the value of [field_violations][BadRequest::field_violations].
    pub fn set_field_violations<T: Into<Vec<bad_request::FieldViolation>>>(
        mut self,
        v: T,
    ) -> Self {
        self.field_violations = v.into();
        self
    }
}

/// Defines additional types related to [BadRequest].
pub mod bad_request {
    use serde::{Deserialize, Serialize};

    /// A message type used to describe a single bad request field.
    #[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
    #[serde(default, rename_all = "camelCase")]
    pub struct FieldViolation {
        /// A path leading to a field in the request body, e.g.
        /// `violated_field` or `field_one.field_two`.
        #[prost(string, tag = "1")]
        pub field: String,

        /// A description of why the request element is bad.
        #[prost(string, tag = "2")]
        pub description: String,
    }

    impl FieldViolation {
        /// Sets the value of [field][FieldViolation::field].
        pub fn set_field<T: Into<String>>(mut self, v: T) -> Self {
            self.field = v.into();
            self
        }

        /// Sets the value of [description][FieldViolation::description].
        pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
            self.description = v.into();
            self
        }
    }
}

/// Describes what preconditions have failed.
#[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
#[serde(default, rename_all = "camelCase")]
pub struct PreconditionFailure {
    /// Describes all precondition violations.
    #[prost(message, repeated, tag = "1")]
    pub violations: Vec<precondition_failure::Violation>,
}

impl PreconditionFailure {
    /// Sets the value of [violations][PreconditionFailure::violations].
    pub fn set_violations<T: Into<Vec<precondition_failure::Violation>>>(
        mut self,
        v: T,
    ) -> Self {
        self.violations = v.into();
        self
    }
}

/// Defines additional types related to [PreconditionFailure].
pub mod precondition_failure {
    use serde::{Deserialize, Serialize};

    /// A message type used to describe a single precondition failure.
    #[derive(Clone, PartialEq, Deserialize, Serialize, ::prost::Message)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Violation {
        /// The type of PreconditionFailure, e.g. `TOS` for "Terms of
        /// Service violation".
        #[prost(string, tag = "1")]
        pub r#type: String,

        /// The subject, relative to the type, that failed.
        #[prost(string, tag = "2")]
        pub subject: String,

        /// A description of how the precondition failed.
        #[prost(string, tag = "3")]
        pub description: String,
    }

    impl Violation {
        /// Sets the value of [type][Violation::type].
        pub fn set_type<T: Into<String>>(mut self, v: T) -> Self {
            self.r#type = v.into();
            self
        }

        /// Sets the value of [subject][Violation::subject].
        pub fn set_subject<T: Into<String>>(mut self, v: T) -> Self {
            self.subject = v.into();
            self
        }

        /// Sets the value of [description][Violation::description].
        pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
            self.description = v.into();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use serde_json::json;
    type Result = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn help_binary_roundtrip() -> Result {
        let help = Help::default().set_links(vec![
            help::Link::default()
                .set_description("quota docs")
                .set_url("https://cloud.google.com/docs/quota"),
        ]);
        let encoded = help.encode_to_vec();
        let decoded = Help::decode(encoded.as_slice())?;
        assert_eq!(decoded, help);
        Ok(())
    }

    #[test]
    fn error_info_binary_roundtrip() -> Result {
        let info = ErrorInfo::default()
            .set_reason("USER_PROJECT_DENIED")
            .set_domain("googleapis.com")
            .set_metadata([("consumer", "projects/my-project")]);
        let decoded = ErrorInfo::decode(info.encode_to_vec().as_slice())?;
        assert_eq!(decoded, info);
        Ok(())
    }

    #[test]
    fn bad_request_json_field_names() -> Result {
        let detail = BadRequest::default().set_field_violations(vec![
            bad_request::FieldViolation::default()
                .set_field("name")
                .set_description("required"),
        ]);
        let got = serde_json::to_value(&detail)?;
        let want = json!({
            "fieldViolations": [{"field": "name", "description": "required"}]
        });
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn precondition_failure_json_uses_type() -> Result {
        let detail = PreconditionFailure::default().set_violations(vec![
            precondition_failure::Violation::default()
                .set_type("TOS")
                .set_subject("google.com/cloud")
                .set_description("terms of service not accepted"),
        ]);
        let got = serde_json::to_value(&detail)?;
        let want = json!({
            "violations": [{
                "type": "TOS",
                "subject": "google.com/cloud",
                "description": "terms of service not accepted"
            }]
        });
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn quota_failure_from_partial_json() -> Result {
        let got: QuotaFailure =
            serde_json::from_value(json!({"violations": [{"subject": "project:p"}]}))?;
        assert_eq!(got.violations.len(), 1);
        assert_eq!(got.violations[0].subject, "project:p");
        assert_eq!(got.violations[0].description, "");
        Ok(())
    }
}
