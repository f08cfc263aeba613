//! Synthesized method descriptors.
//!
//! A [`ClientMethod`] is created once per (operation, overload) by the
//! synthesis engine and is immutable afterwards; sibling overloads are
//! produced from a shared base value through explicit `with_*` updates, never
//! by reconfiguring a mutable builder.

use std::rc::Rc;

use http::Method;

use super::return_types::ReturnShape;
use crate::generator::{
  mapper::{ClientMethodParameter, ClientType, MappedParameter},
  tokens::{FieldToken, MethodToken},
};

/// The kind of method to synthesize; the first axis of the overload space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub(crate) enum ClientMethodType {
  PagingAsyncSinglePage,
  PagingSyncSinglePage,
  PagingAsync,
  PagingSync,
  LongRunningBeginAsync,
  LongRunningBeginSync,
  LongRunningAsync,
  LongRunningSync,
  SimpleAsyncRestResponse,
  SimpleSyncRestResponse,
  SimpleAsync,
  SimpleSync,
}

impl ClientMethodType {
  #[must_use]
  pub(crate) fn is_async(self) -> bool {
    matches!(
      self,
      ClientMethodType::PagingAsyncSinglePage
        | ClientMethodType::PagingAsync
        | ClientMethodType::LongRunningBeginAsync
        | ClientMethodType::LongRunningAsync
        | ClientMethodType::SimpleAsyncRestResponse
        | ClientMethodType::SimpleAsync
    )
  }

  #[must_use]
  pub(crate) fn is_paging(self) -> bool {
    matches!(
      self,
      ClientMethodType::PagingAsyncSinglePage
        | ClientMethodType::PagingSyncSinglePage
        | ClientMethodType::PagingAsync
        | ClientMethodType::PagingSync
    )
  }

  #[must_use]
  pub(crate) fn is_long_running(self) -> bool {
    matches!(
      self,
      ClientMethodType::LongRunningBeginAsync
        | ClientMethodType::LongRunningBeginSync
        | ClientMethodType::LongRunningAsync
        | ClientMethodType::LongRunningSync
    )
  }

  /// Single-page internals backing a pager.
  #[must_use]
  pub(crate) fn is_single_page(self) -> bool {
    matches!(self, ClientMethodType::PagingAsyncSinglePage | ClientMethodType::PagingSyncSinglePage)
  }

  /// Envelope-returning shapes bound directly to the wire call.
  #[must_use]
  pub(crate) fn is_rest_response(self) -> bool {
    matches!(self, ClientMethodType::SimpleAsyncRestResponse | ClientMethodType::SimpleSyncRestResponse)
  }

  /// Caller-facing value shapes: everything that is neither an internal
  /// single-page method nor a raw envelope method.
  #[must_use]
  pub(crate) fn is_convenience(self) -> bool {
    !self.is_single_page() && !self.is_rest_response()
  }
}

/// The parameter-breadth axis of the overload space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum OverloadBreadth {
  /// All parameters, optionals included.
  Maximal,
  /// Required parameters only.
  RequiredOnly,
}

/// Resolved visibility of one overload candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MethodVisibility {
  Public,
  Crate,
  /// The candidate is dropped before emission.
  NotGenerate,
}

/// Wire-level method bound directly to the HTTP call.
#[derive(Debug, Clone, bon::Builder)]
#[builder(on(String, into))]
pub(crate) struct ProxyMethod {
  pub(crate) name: MethodToken,
  pub(crate) http_method: Method,
  pub(crate) path: String,
  #[builder(default)]
  pub(crate) parameters: Vec<MappedParameter>,
  pub(crate) response_body: ClientType,
  #[builder(default)]
  pub(crate) expected_status_codes: Vec<u16>,
  /// Paging operations accept a continuation URL that overrides the built
  /// request URL; the same wire method serves first and next pages.
  #[builder(default)]
  pub(crate) supports_next_link: bool,
}

impl ProxyMethod {
  /// Parameters materialized at the wire call site, in declaration order.
  pub(crate) fn wire_parameters(&self) -> impl Iterator<Item = &MappedParameter> {
    self.parameters.iter()
  }
}

/// Reference from a single-page method to its continuation method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NextPageMethod {
  pub(crate) name: MethodToken,
  /// The continuation resolves to the operation itself; a valid terminal
  /// case that must not recurse during resolution.
  pub(crate) is_self: bool,
}

/// Paging binding of a synthesized method.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub(crate) struct MethodPageDetails {
  pub(crate) item_name: FieldToken,
  pub(crate) next_link_name: Option<FieldToken>,
  pub(crate) next_method: Option<NextPageMethod>,
}

/// Long-running binding of a synthesized method.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
#[builder(on(String, into))]
pub(crate) struct MethodPollingDetails {
  pub(crate) intermediate_type: ClientType,
  pub(crate) final_type: ClientType,
  /// Named strategy token passed to the poller constructor.
  pub(crate) strategy: String,
  pub(crate) poll_interval_secs: u64,
}

/// One input-expression → output-property mapping of a parameter transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParameterMapping {
  pub(crate) input_parameter: FieldToken,
  /// Property read off the input (grouped carrier objects).
  pub(crate) input_property: Option<FieldToken>,
  /// Property written on the out-parameter (flattened originals).
  pub(crate) output_property: Option<FieldToken>,
}

/// Reassembly rule for one grouped or flattened parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MethodTransformationDetail {
  pub(crate) out_parameter: FieldToken,
  pub(crate) out_type: ClientType,
  pub(crate) mappings: Vec<ParameterMapping>,
}

impl MethodTransformationDetail {
  /// An out-parameter with no mappings is instantiated as an empty default
  /// instance so required nested objects never reach the wire unset.
  #[must_use]
  pub(crate) fn instantiates_default(&self) -> bool {
    self.mappings.is_empty()
  }
}

/// One synthesized client method overload.
#[derive(Debug, Clone, bon::Builder)]
#[builder(on(String, into))]
pub(crate) struct ClientMethod {
  pub(crate) name: MethodToken,
  pub(crate) method_type: ClientMethodType,
  pub(crate) visibility: MethodVisibility,
  pub(crate) only_required_parameters: bool,
  pub(crate) has_context: bool,
  /// Caller-facing parameters in order; the context parameter is appended
  /// at emission when `has_context` is set.
  #[builder(default)]
  pub(crate) parameters: Vec<ClientMethodParameter>,
  pub(crate) return_shape: ReturnShape,
  pub(crate) proxy: Rc<ProxyMethod>,
  #[builder(default)]
  pub(crate) transformations: Vec<MethodTransformationDetail>,
  pub(crate) page_details: Option<MethodPageDetails>,
  pub(crate) polling_details: Option<MethodPollingDetails>,
  pub(crate) operation_identity: String,
  pub(crate) description: Option<String>,
}

impl ClientMethod {
  /// Structural identity used for overload deduplication.
  #[must_use]
  pub(crate) fn overload_key(&self) -> (ClientMethodType, bool, bool) {
    (self.method_type, self.only_required_parameters, self.has_context)
  }

  /// Parameters the caller actually passes: method-level, non-constant,
  /// not folded into a group carrier, not a flattening target, and required
  /// when this is a required-only overload.
  pub(crate) fn argument_parameters(&self) -> impl Iterator<Item = &ClientMethodParameter> {
    self.parameters.iter().filter(move |parameter| {
      let visible = !parameter.is_constant && !parameter.from_client && parameter.grouped_by.is_none();
      let breadth_ok = !self.only_required_parameters || parameter.required;
      visible && breadth_ok
    })
  }

  /// Parameters subject to required-null validation. Constant parameters
  /// never appear here.
  pub(crate) fn validation_parameters(&self) -> impl Iterator<Item = &ClientMethodParameter> {
    self
      .argument_parameters()
      .filter(|parameter| parameter.required && parameter.nullable)
  }

  /// Locals materialized before the wire call: constants always, omitted
  /// optionals when this is a required-only overload.
  pub(crate) fn materialized_locals(&self) -> impl Iterator<Item = &ClientMethodParameter> {
    self.parameters.iter().filter(move |parameter| {
      if parameter.from_client {
        return false;
      }
      if parameter.is_constant {
        return true;
      }
      self.only_required_parameters && !parameter.required
    })
  }

  // Sibling-overload derivation: explicit field overrides over an immutable
  // base, replacing the builder-mutation-and-reuse idiom.

  #[must_use]
  pub(crate) fn with_context(&self, visibility: MethodVisibility, name: MethodToken) -> Self {
    Self {
      name,
      has_context: true,
      visibility,
      ..self.clone()
    }
  }

  #[must_use]
  pub(crate) fn with_required_only(&self, visibility: MethodVisibility, name: MethodToken) -> Self {
    Self {
      name,
      only_required_parameters: true,
      visibility,
      ..self.clone()
    }
  }

  #[must_use]
  pub(crate) fn with_shape(
    &self,
    method_type: ClientMethodType,
    return_shape: ReturnShape,
    visibility: MethodVisibility,
    name: MethodToken,
  ) -> Self {
    Self {
      name,
      method_type,
      return_shape,
      visibility,
      ..self.clone()
    }
  }
}
