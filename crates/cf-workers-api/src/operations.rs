//! Typed Workers API operations
//!
//! Each operation owns its validated arguments and knows how to turn them
//! into exactly one [`ProviderRequest`], and how to present the provider's
//! `result` to the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::multipart::{MultipartForm, Part};
use crate::request::{Method, ProviderRequest};
use crate::{Config, Error, Result};

/// Module name the uploaded script is registered under.
pub const MAIN_MODULE: &str = "worker.js";

pub const DEFAULT_COMPATIBILITY_DATE: &str = "2024-01-01";

pub const DEFAULT_TAIL_LIMIT: u32 = 100;

/// Script names, zone ids and route ids are interpolated into the URL path.
static PATH_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

static COMPATIBILITY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

fn default_compatibility_date() -> String {
    DEFAULT_COMPATIBILITY_DATE.to_string()
}

/// Arguments for uploading (creating or replacing) a script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptUpload {
    pub script_name: String,
    pub script_content: String,
    #[serde(default = "default_compatibility_date")]
    pub compatibility_date: String,
    #[serde(default)]
    pub compatibility_flags: Vec<String>,
}

/// Upload metadata part, serialized as JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadMetadata {
    pub main_module: String,
    pub compatibility_date: String,
    pub compatibility_flags: Vec<String>,
}

/// Arguments naming a single script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptRef {
    pub script_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteCreate {
    pub zone_id: String,
    pub pattern: String,
    pub script_name: String,
}

/// Arguments naming a zone
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneRef {
    pub zone_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDelete {
    pub zone_id: String,
    pub route_id: String,
}

#[derive(Clone, Deserialize)]
pub struct SecretPut {
    pub script_name: String,
    pub secret_name: String,
    pub secret_value: String,
}

impl std::fmt::Debug for SecretPut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPut")
            .field("script_name", &self.script_name)
            .field("secret_name", &self.secret_name)
            .field("secret_value", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretDelete {
    pub script_name: String,
    pub secret_name: String,
}

/// Arguments for the tail snapshot.
///
/// `limit` is accepted in any shape for compatibility with existing callers
/// but is not sent to the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TailFetch {
    pub script_name: String,
    #[serde(default)]
    pub limit: Option<Value>,
}

impl TailFetch {
    /// Requested limit, or [`DEFAULT_TAIL_LIMIT`] when absent or null.
    pub fn limit(&self) -> Value {
        match &self.limit {
            Some(Value::Null) | None => Value::from(DEFAULT_TAIL_LIMIT),
            Some(limit) => limit.clone(),
        }
    }
}

/// Operation discriminant, used to key the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    ScriptUpload,
    ScriptDelete,
    ScriptGet,
    ScriptsList,
    RouteCreate,
    RouteList,
    RouteDelete,
    SecretPut,
    SecretDelete,
    TailFetch,
}

impl OperationKind {
    /// Deserialize and validate an argument bag for this kind.
    ///
    /// A `null` bag is treated as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when a required field is missing,
    /// has the wrong type, or fails validation.
    pub fn parse(self, arguments: Value) -> Result<Operation> {
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let operation = match self {
            Self::ScriptUpload => Operation::ScriptUpload(from_arguments(arguments)?),
            Self::ScriptDelete => Operation::ScriptDelete(from_arguments(arguments)?),
            Self::ScriptGet => Operation::ScriptGet(from_arguments(arguments)?),
            Self::ScriptsList => Operation::ScriptsList,
            Self::RouteCreate => Operation::RouteCreate(from_arguments(arguments)?),
            Self::RouteList => Operation::RouteList(from_arguments(arguments)?),
            Self::RouteDelete => Operation::RouteDelete(from_arguments(arguments)?),
            Self::SecretPut => Operation::SecretPut(from_arguments(arguments)?),
            Self::SecretDelete => Operation::SecretDelete(from_arguments(arguments)?),
            Self::TailFetch => Operation::TailFetch(from_arguments(arguments)?),
        };
        operation.validate()?;
        Ok(operation)
    }
}

fn from_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArgument(e.to_string()))
}

/// A validated Workers API call.
#[derive(Debug, Clone)]
pub enum Operation {
    ScriptUpload(ScriptUpload),
    ScriptDelete(ScriptRef),
    ScriptGet(ScriptRef),
    ScriptsList,
    RouteCreate(RouteCreate),
    RouteList(ZoneRef),
    RouteDelete(RouteDelete),
    SecretPut(SecretPut),
    SecretDelete(SecretDelete),
    TailFetch(TailFetch),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::ScriptUpload(_) => OperationKind::ScriptUpload,
            Self::ScriptDelete(_) => OperationKind::ScriptDelete,
            Self::ScriptGet(_) => OperationKind::ScriptGet,
            Self::ScriptsList => OperationKind::ScriptsList,
            Self::RouteCreate(_) => OperationKind::RouteCreate,
            Self::RouteList(_) => OperationKind::RouteList,
            Self::RouteDelete(_) => OperationKind::RouteDelete,
            Self::SecretPut(_) => OperationKind::SecretPut,
            Self::SecretDelete(_) => OperationKind::SecretDelete,
            Self::TailFetch(_) => OperationKind::TailFetch,
        }
    }

    /// Check argument values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::ScriptUpload(args) => {
                path_segment("script_name", &args.script_name)?;
                non_empty("script_content", &args.script_content)?;
                if !COMPATIBILITY_DATE.is_match(&args.compatibility_date) {
                    return Err(Error::InvalidArgument(format!(
                        "compatibility_date must be YYYY-MM-DD, got '{}'",
                        args.compatibility_date
                    )));
                }
                Ok(())
            }
            Self::ScriptDelete(args) | Self::ScriptGet(args) => {
                path_segment("script_name", &args.script_name)
            }
            Self::ScriptsList => Ok(()),
            Self::RouteCreate(args) => {
                path_segment("zone_id", &args.zone_id)?;
                non_empty("pattern", &args.pattern)?;
                path_segment("script_name", &args.script_name)
            }
            Self::RouteList(args) => path_segment("zone_id", &args.zone_id),
            Self::RouteDelete(args) => {
                path_segment("zone_id", &args.zone_id)?;
                path_segment("route_id", &args.route_id)
            }
            Self::SecretPut(args) => {
                path_segment("script_name", &args.script_name)?;
                non_empty("secret_name", &args.secret_name)
            }
            Self::SecretDelete(args) => {
                path_segment("script_name", &args.script_name)?;
                non_empty("secret_name", &args.secret_name)
            }
            Self::TailFetch(args) => path_segment("script_name", &args.script_name),
        }
    }

    /// Build the single provider request for this operation.
    ///
    /// # Errors
    ///
    /// Propagates JSON serialization failures of the request body.
    pub fn to_request(&self, config: &Config) -> Result<ProviderRequest> {
        let account = config.account_id();
        let request = match self {
            Self::ScriptUpload(args) => {
                let metadata = UploadMetadata {
                    main_module: MAIN_MODULE.to_string(),
                    compatibility_date: args.compatibility_date.clone(),
                    compatibility_flags: args.compatibility_flags.clone(),
                };
                let form = MultipartForm::new()
                    .part(Part::new(
                        "metadata",
                        "application/json",
                        serde_json::to_vec(&metadata)?,
                    ))
                    .part(
                        Part::new(
                            MAIN_MODULE,
                            "application/javascript",
                            args.script_content.as_bytes(),
                        )
                        .with_filename(MAIN_MODULE),
                    );
                ProviderRequest::new(config, Method::Put, script_path(account, &args.script_name))
                    .multipart(&form)
            }
            Self::ScriptDelete(args) => {
                ProviderRequest::new(config, Method::Delete, script_path(account, &args.script_name))
            }
            Self::ScriptGet(args) => {
                ProviderRequest::new(config, Method::Get, script_path(account, &args.script_name))
            }
            Self::ScriptsList => ProviderRequest::new(
                config,
                Method::Get,
                format!("/accounts/{account}/workers/scripts"),
            ),
            Self::RouteCreate(args) => {
                ProviderRequest::new(config, Method::Post, routes_path(&args.zone_id)).json(
                    &json!({
                        "pattern": args.pattern,
                        "script": args.script_name,
                    }),
                )?
            }
            Self::RouteList(args) => {
                ProviderRequest::new(config, Method::Get, routes_path(&args.zone_id))
            }
            Self::RouteDelete(args) => ProviderRequest::new(
                config,
                Method::Delete,
                format!("{}/{}", routes_path(&args.zone_id), args.route_id),
            ),
            Self::SecretPut(args) => ProviderRequest::new(
                config,
                Method::Patch,
                settings_path(account, &args.script_name),
            )
            .json(&json!({
                "environment_variables": [{
                    "name": args.secret_name,
                    "text": args.secret_value,
                    "type": "secret_text",
                }]
            }))?,
            // An entry without `text` asks the provider to drop the binding.
            Self::SecretDelete(args) => ProviderRequest::new(
                config,
                Method::Patch,
                settings_path(account, &args.script_name),
            )
            .json(&json!({
                "environment_variables": [{
                    "name": args.secret_name,
                    "type": "secret_text",
                }]
            }))?,
            Self::TailFetch(args) => ProviderRequest::new(
                config,
                Method::Get,
                format!("{}/tails", script_path(account, &args.script_name)),
            ),
        };
        Ok(request)
    }

    /// Caller-facing text for a successful call.
    ///
    /// Delete and secret operations answer with a fixed confirmation; the
    /// provider body for those is ignored.
    ///
    /// # Errors
    ///
    /// Propagates JSON serialization failures of `result`.
    pub fn render(&self, result: &Value) -> Result<String> {
        let text = match self {
            Self::ScriptDelete(args) => {
                format!("Worker script '{}' deleted successfully", args.script_name)
            }
            Self::RouteDelete(args) => format!("Route '{}' deleted successfully", args.route_id),
            Self::SecretPut(args) => format!(
                "Secret '{}' set for worker '{}'",
                args.secret_name, args.script_name
            ),
            Self::SecretDelete(args) => format!(
                "Secret '{}' deleted from worker '{}'",
                args.secret_name, args.script_name
            ),
            _ => serde_json::to_string_pretty(result)?,
        };
        Ok(text)
    }
}

fn script_path(account: &str, script_name: &str) -> String {
    format!("/accounts/{account}/workers/scripts/{script_name}")
}

fn settings_path(account: &str, script_name: &str) -> String {
    format!("{}/settings", script_path(account, script_name))
}

fn routes_path(zone_id: &str) -> String {
    format!("/zones/{zone_id}/workers/routes")
}

fn path_segment(field: &str, value: &str) -> Result<()> {
    if PATH_SEGMENT.is_match(value) {
        return Ok(());
    }
    Err(Error::InvalidArgument(format!(
        "{field} must contain only letters, digits, '-' or '_', got '{value}'"
    )))
}

fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(())
}
