//! Operation-level pieces of the input code model.

use std::rc::Rc;

use http::Method;
use serde_json::Value;

use super::schema::{Schema, SchemaId, SchemaStore};

/// The complete input to one generation session.
///
/// Produced by an upstream schema-processing phase and consumed here as an
/// in-memory object graph; this crate never parses a wire format.
#[derive(Debug, bon::Builder)]
#[builder(on(String, into))]
pub struct CodeModel {
  pub service_name: String,
  pub description: Option<String>,
  /// Host template; may contain `{placeholders}` resolved against
  /// client-level parameters at generation time.
  pub host: String,
  #[builder(default)]
  pub security: Vec<SecurityScheme>,
  #[builder(default)]
  pub groups: Vec<OperationGroup>,
  pub store: Rc<SchemaStore>,
}

impl CodeModel {
  /// Looks up an operation by its group/name reference.
  #[must_use]
  pub fn resolve(&self, reference: &OperationRef) -> Option<&Operation> {
    self
      .groups
      .iter()
      .find(|group| group.name == reference.group)
      .and_then(|group| group.operations.iter().find(|op| op.name == reference.name))
  }
}

/// A named set of operations sharing one client wrapper.
#[derive(Debug, Clone)]
pub struct OperationGroup {
  pub name: String,
  pub operations: Vec<Operation>,
}

impl OperationGroup {
  #[must_use]
  pub fn new(name: impl Into<String>, operations: Vec<Operation>) -> Self {
    Self {
      name: name.into(),
      operations,
    }
  }
}

/// One API action.
#[derive(Debug, Clone, bon::Builder)]
#[builder(on(String, into))]
pub struct Operation {
  pub group: String,
  pub name: String,
  pub method: Method,
  pub path: String,
  #[builder(default)]
  pub requests: Vec<Request>,
  #[builder(default)]
  pub responses: Vec<Response>,
  pub paging: Option<PagingMetadata>,
  pub lro: Option<LroMetadata>,
  /// Alternate simplified request shape for convenience generation.
  pub convenience: Option<Request>,
  pub summary: Option<String>,
  pub description: Option<String>,
}

impl Operation {
  /// Stable identity used for descriptor caching and polling configuration.
  #[must_use]
  pub fn identity(&self) -> String {
    format!("{}_{}", self.group, self.name)
  }

  #[must_use]
  pub fn primary_request(&self) -> Option<&Request> {
    self.requests.first()
  }

  /// The request shape client methods are built from: the convenience
  /// override when declared, the wire request otherwise.
  #[must_use]
  pub fn client_request(&self) -> Option<&Request> {
    self.convenience.as_ref().or_else(|| self.primary_request())
  }

  /// The success response, preferring an explicit 200 status when several
  /// response shapes are declared.
  #[must_use]
  pub fn success_response(&self) -> Option<&Response> {
    self
      .responses
      .iter()
      .find(|response| response.status_codes.contains(&200))
      .or_else(|| self.responses.iter().find(|response| response.is_success()))
  }

  /// Declared body schema of the success response.
  #[must_use]
  pub fn response_schema(&self) -> Option<SchemaId> {
    self.success_response().and_then(|response| response.schema)
  }
}

/// One request shape of an operation.
#[derive(Debug, Clone, Default)]
pub struct Request {
  pub parameters: Vec<Parameter>,
  pub media_type: Option<String>,
}

impl Request {
  #[must_use]
  pub fn new(parameters: Vec<Parameter>) -> Self {
    Self {
      parameters,
      media_type: None,
    }
  }
}

/// One response shape of an operation.
#[derive(Debug, Clone, bon::Builder)]
pub struct Response {
  #[builder(default)]
  pub status_codes: Vec<u16>,
  pub schema: Option<SchemaId>,
  /// Declared response headers, mapped into a deserialized-headers model
  /// when the schema resolves to a class.
  pub headers_schema: Option<SchemaId>,
  #[builder(default)]
  pub headers: Vec<ResponseHeader>,
}

impl Response {
  #[must_use]
  pub fn is_success(&self) -> bool {
    self.status_codes.iter().any(|code| (200..300).contains(code))
  }
}

/// A single declared response header.
#[derive(Debug, Clone)]
pub struct ResponseHeader {
  pub name: String,
  pub schema: SchemaId,
}

/// HTTP location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Body,
  Uri,
}

/// Where the parameter value comes from at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterImplementation {
  /// Supplied per call as a method argument.
  #[default]
  Method,
  /// Bound once on the service client (endpoint, api-version, host pieces).
  Client,
}

/// Declared HTTP serialization style for array-valued parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum SerializationStyle {
  Form,
  Simple,
  SpaceDelimited,
  PipeDelimited,
  TabDelimited,
}

/// One parameter of a request.
#[derive(Debug, Clone, bon::Builder)]
#[builder(on(String, into))]
pub struct Parameter {
  pub name: String,
  pub schema: SchemaId,
  #[builder(default)]
  pub required: bool,
  #[builder(default)]
  pub nullable: bool,
  pub location: ParameterLocation,
  #[builder(default)]
  pub implementation: ParameterImplementation,
  pub style: Option<SerializationStyle>,
  #[builder(default)]
  pub explode: bool,
  /// Index (into the owning request's parameter list) of the carrier object
  /// this parameter is grouped into on the caller side.
  pub grouped_by: Option<usize>,
  /// Index of the original body parameter this one was flattened out of.
  pub original_parameter: Option<usize>,
  /// Property on the original body object a flattened parameter maps back to.
  pub target_property: Option<String>,
  pub client_default: Option<Value>,
  pub description: Option<String>,
}

impl Parameter {
  /// Whether this parameter carries a constant schema; constants never take
  /// caller input and never join required-parameter validation sets.
  #[must_use]
  pub fn is_constant(&self, store: &SchemaStore) -> bool {
    matches!(store.get(self.schema), Schema::Constant { .. })
  }

  /// The baked-in literal for a constant parameter.
  #[must_use]
  pub fn constant_value<'a>(&self, store: &'a SchemaStore) -> Option<&'a Value> {
    match store.get(self.schema) {
      Schema::Constant { value, .. } => Some(value),
      _ => None,
    }
  }
}

/// Link from one operation to another (paging continuation, LRO polling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRef {
  pub group: String,
  pub name: String,
}

impl OperationRef {
  #[must_use]
  pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      group: group.into(),
      name: name.into(),
    }
  }
}

/// Paging extension metadata.
#[derive(Debug, Clone, bon::Builder)]
#[builder(on(String, into))]
pub struct PagingMetadata {
  /// Response property holding the page items; must resolve to a list-valued
  /// property of the response model.
  pub item_name: String,
  /// Response property carrying the continuation cursor, when any.
  pub next_link_name: Option<String>,
  /// Distinct continuation operation; the operation itself when absent.
  pub next_operation: Option<OperationRef>,
}

/// Long-running-operation extension metadata.
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct LroMetadata {
  /// Operation whose response is polled for progress.
  pub polling_operation: Option<OperationRef>,
  /// Operation whose response carries the final result.
  pub final_operation: Option<OperationRef>,
  pub poll_interval_secs: Option<u64>,
}

/// Declared security scheme of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityScheme {
  OAuth2 { scopes: Vec<String> },
  ApiKey { header_name: String },
}
