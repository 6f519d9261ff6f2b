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

//! Shows how to inspect the errors raised by different Google Cloud
//! services through a single adapter.

const DESCRIPTION: &str = concat!(
    "Each subcommand fabricates the error a specific Google Cloud service",
    " is known to return, including its structured details, then inspects",
    " the error through the adapter. Set GOOGLE_ENABLE_ERROR_DETAIL=true",
    " (or pass --extended) to render the expanded detail report."
);

use bytes::Bytes;
use clap::Parser;
use gcp_error_handler::details::{
    self, BadRequest, ErrorInfo, Help, PreconditionFailure, QuotaFailure, bad_request, help,
    precondition_failure, quota_failure,
};
use gcp_error_handler::rpc::Code;
use gcp_error_handler::{AttemptError, CloudError, GcpError, HttpError, TrailingMetadata};
use prost::Message;
use std::collections::HashMap;

fn main() -> anyhow::Result<()> {
    let _guard = enable_tracing();

    let args = Args::parse();
    let error = match args.command {
        Service::Gcs { bucket, object } => gcs_error(&bucket, &object),
        Service::Pubsub { project, topic } => pubsub_error(&project, &topic),
        Service::Compute {
            project,
            zone,
            instance,
        } => return inspect_http(compute_error(&project, &zone, &instance), args.extended),
        Service::Asset { project } => asset_error(&project),
    };
    inspect_cloud(error, args.extended)
}

/// Inspect fabricated Google Cloud client errors.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = DESCRIPTION)]
struct Args {
    #[command(subcommand)]
    command: Service,

    /// Render the expanded detail report even if
    /// GOOGLE_ENABLE_ERROR_DETAIL is unset.
    #[arg(long, global = true)]
    extended: bool,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Service {
    /// A storage read denied with ErrorInfo metadata.
    Gcs {
        /// The bucket holding the object.
        #[arg(long)]
        bucket: String,
        /// The name of the object to read.
        #[arg(long)]
        object: String,
    },
    /// A publish rejected over quota, with Help and QuotaFailure details.
    Pubsub {
        /// The project id owning the topic.
        #[arg(long)]
        project: String,
        /// The topic to publish on.
        #[arg(long)]
        topic: String,
    },
    /// A REST instance lookup that returned 404.
    Compute {
        /// The project id owning the instance.
        #[arg(long)]
        project: String,
        /// The zone of the instance.
        #[arg(long)]
        zone: String,
        /// The name of the instance.
        #[arg(long)]
        instance: String,
    },
    /// An export blocked by failed preconditions and a malformed field.
    Asset {
        /// The project id to export assets for.
        #[arg(long)]
        project: String,
    },
}

fn inspect_cloud(error: CloudError, extended: bool) -> anyhow::Result<()> {
    tracing::info!("raw client error: {error}");
    let mut wrapped = GcpError::wrap(error);
    if extended {
        wrapped = wrapped.set_expanded_details(true);
    }

    println!("family:      {}", wrapped.family());
    if let Some(code) = wrapped.code() {
        println!("code:        {code}");
    }
    if let Some(message) = wrapped.message() {
        println!("message:     {message}");
    }
    if let Some(code) = wrapped.grpc_status_code() {
        println!("grpc status: {code}");
    }
    if let Some(attempts) = wrapped.errors() {
        for (i, attempt) in attempts.iter().enumerate() {
            println!("attempt[{i}]:  {}", attempt.message());
            if !attempt.trailing_metadata().is_empty() {
                for (key, value) in attempt.trailing_metadata().iter() {
                    println!("  {key}: {} bytes", value.len());
                }
            }
        }
    }

    if let Some(info) = wrapped.error_info()? {
        println!("ErrorInfo reason={} domain={}", info.reason, info.domain);
        for (k, v) in info.metadata.iter() {
            println!("  {k}: {v}");
        }
    }
    if let Some(help) = wrapped.help()? {
        for link in help.links.iter() {
            println!("Help: {} ({})", link.url, link.description);
        }
    }
    if let Some(failure) = wrapped.quota_failure()? {
        for violation in failure.violations.iter() {
            println!("QuotaFailure: {}: {}", violation.subject, violation.description);
        }
    }
    if let Some(detail) = wrapped.bad_request()? {
        for violation in detail.field_violations.iter() {
            println!("BadRequest: {}: {}", violation.field, violation.description);
        }
    }
    if let Some(failure) = wrapped.precondition_failure()? {
        for violation in failure.violations.iter() {
            println!(
                "PreconditionFailure: {} {}: {}",
                violation.r#type, violation.subject, violation.description
            );
        }
    }

    println!("\n{wrapped}");
    Ok(())
}

fn inspect_http(error: HttpError, extended: bool) -> anyhow::Result<()> {
    tracing::info!("raw client error: {error}");
    let mut wrapped = GcpError::wrap(error);
    if extended {
        wrapped = wrapped.set_expanded_details(true);
    }

    println!("family:      {}", wrapped.family());
    if let Some(code) = wrapped.http_status_code() {
        println!("status code: {code}");
    }
    if let Some(uri) = wrapped.uri() {
        println!("uri:         {uri}");
    }
    if let Some(headers) = wrapped.http_headers() {
        for (k, v) in headers.iter() {
            println!("  {k}: {v}");
        }
    }
    match wrapped.error_details() {
        Some(status) => println!("parsed body: {status:?}"),
        None => {
            if let Some(content) = wrapped.content() {
                println!("raw body:    {}", String::from_utf8_lossy(content));
            }
        }
    }

    println!("\n{wrapped}");
    Ok(())
}

fn gcs_error(bucket: &str, object: &str) -> CloudError {
    let info = ErrorInfo::default()
        .set_reason("USER_PROJECT_DENIED")
        .set_domain("storage.googleapis.com")
        .set_metadata([("bucket", bucket)]);
    let metadata =
        TrailingMetadata::default().append(details::ERROR_INFO_KEY, info.encode_to_vec());
    CloudError::default()
        .set_code(403)
        .set_message(format!(
            "does not have storage.objects.get access to {bucket}/{object}"
        ))
        .set_grpc_status_code(Code::PermissionDenied)
        .set_attempts(vec![
            AttemptError::default()
                .set_message(format!("reading gs://{bucket}/{object} failed"))
                .set_trailing_metadata(metadata),
        ])
}

fn pubsub_error(project: &str, topic: &str) -> CloudError {
    let help = Help::default().set_links(vec![
        help::Link::default()
            .set_description("Pub/Sub quota documentation")
            .set_url("https://cloud.google.com/pubsub/quotas"),
    ]);
    let failure = QuotaFailure::default().set_violations(vec![
        quota_failure::Violation::default()
            .set_subject(format!("project:{project}"))
            .set_description("publisher throughput exceeded"),
    ]);
    let metadata = TrailingMetadata::default()
        .append(details::HELP_KEY, help.encode_to_vec())
        .append(details::QUOTA_FAILURE_KEY, failure.encode_to_vec());
    CloudError::default()
        .set_code(429)
        .set_message("publish request throttled")
        .set_grpc_status_code(Code::ResourceExhausted)
        .set_attempts(vec![
            AttemptError::default()
                .set_message(format!(
                    "publishing to projects/{project}/topics/{topic} failed"
                ))
                .set_trailing_metadata(metadata),
        ])
}

fn compute_error(project: &str, zone: &str, instance: &str) -> HttpError {
    let resource = format!("projects/{project}/zones/{zone}/instances/{instance}");
    let body = serde_json::json!({
        "error": {
            "code": 404,
            "message": format!("The resource '{resource}' was not found"),
            "status": "NOT_FOUND",
            "errors": [{
                "message": "instance not found",
                "domain": "global",
                "reason": "notFound"
            }]
        }
    });
    let headers = HashMap::from_iter(
        [("content-type", "application/json; charset=UTF-8")]
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    HttpError::new(
        404,
        format!("https://compute.googleapis.com/compute/v1/{resource}"),
        headers,
        Bytes::from(body.to_string()),
    )
}

fn asset_error(project: &str) -> CloudError {
    let precondition = PreconditionFailure::default().set_violations(vec![
        precondition_failure::Violation::default()
            .set_type("TOS")
            .set_subject("cloudasset.googleapis.com")
            .set_description("service terms of service not accepted"),
    ]);
    let detail = BadRequest::default().set_field_violations(vec![
        bad_request::FieldViolation::default()
            .set_field("parent")
            .set_description("parent must be a project, folder or organization"),
    ]);
    let metadata = TrailingMetadata::default()
        .append(details::PRECONDITION_FAILURE_KEY, precondition.encode_to_vec())
        .append(details::BAD_REQUEST_KEY, detail.encode_to_vec());
    CloudError::default()
        .set_code(400)
        .set_message("export request rejected")
        .set_grpc_status_code(Code::FailedPrecondition)
        .set_attempts(vec![
            AttemptError::default()
                .set_message(format!("exporting assets for projects/{project} failed"))
                .set_trailing_metadata(metadata),
        ])
}

fn enable_tracing() -> tracing::dispatcher::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_default(subscriber)
}
