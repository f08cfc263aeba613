//! Lowers a synthesized method descriptor into the body IR.
//!
//! One fixed control-flow shape per method kind: simple call, paging
//! single-page, paging continuation, long-running begin, and long-running
//! completion.

use super::ir::{BodyStmt, ContextArg, InvokeBinding, MethodBodyIr, ValueExpr};
use crate::generator::{
  mapper::{ClientType, WireConversion},
  settings::{GenerationSettings, SyncMethodsGeneration},
  synthesis::{ClientMethod, ClientMethodType, ReturnShape},
  tokens::{FieldToken, MethodToken},
};

/// The deserialized-headers class for a return shape.
///
/// Anything other than a class-typed headers slot yields `None`: the
/// envelope degrades to "no deserialized headers" rather than failing.
pub(crate) fn deserialized_headers_type(shape: &ReturnShape) -> Option<&ClientType> {
  match shape {
    ReturnShape::WithHeadersResponse { headers, .. } if matches!(headers, ClientType::Class(_)) => Some(headers),
    _ => None,
  }
}

/// Builds the body IR for one client method.
pub(crate) fn build_body(method: &ClientMethod, settings: &GenerationSettings) -> MethodBodyIr {
  match method.method_type {
    ClientMethodType::PagingAsync | ClientMethodType::PagingSync => build_pager_body(method, settings),
    ClientMethodType::LongRunningBeginAsync | ClientMethodType::LongRunningBeginSync => {
      build_poller_body(method, settings)
    }
    ClientMethodType::LongRunningAsync | ClientMethodType::LongRunningSync => build_completion_body(method),
    _ => build_simple_body(method, settings),
  }
}

/// Simple call shape: validate → materialize locals → transform → convert →
/// invoke → reshape. Single-page and rest-response methods share it; only the
/// reshape differs.
fn build_simple_body(method: &ClientMethod, settings: &GenerationSettings) -> MethodBodyIr {
  let mut ir = MethodBodyIr::default();

  if method.return_shape.is_fallible() {
    for parameter in method.validation_parameters() {
      ir.push(BodyStmt::ValidateRequired {
        parameter: parameter.name.clone(),
      });
    }
  }

  for parameter in method.materialized_locals() {
    if parameter.is_constant {
      ir.push(BodyStmt::DeclareLiteral {
        name: parameter.name.clone(),
        literal: parameter
          .constant_literal
          .clone()
          .unwrap_or_else(|| "Default::default()".to_string()),
      });
    } else {
      ir.push(BodyStmt::DeclareNone {
        name: parameter.name.clone(),
      });
    }
  }

  for detail in &method.transformations {
    if detail.instantiates_default() {
      ir.push(BodyStmt::DeclareDefault {
        name: detail.out_parameter.clone(),
        ty: detail.out_type.clone(),
        mutable: false,
      });
      continue;
    }

    let writes_back = detail.mappings.iter().any(|mapping| mapping.output_property.is_some());
    if writes_back {
      ir.push(BodyStmt::DeclareDefault {
        name: detail.out_parameter.clone(),
        ty: detail.out_type.clone(),
        mutable: true,
      });
      for mapping in &detail.mappings {
        if let Some(property) = &mapping.output_property {
          ir.push(BodyStmt::AssignProperty {
            target: detail.out_parameter.clone(),
            property: property.clone(),
            value: mapping.input_parameter.clone(),
          });
        }
      }
    } else {
      for mapping in &detail.mappings {
        if let Some(property) = &mapping.input_property {
          ir.push(BodyStmt::ExtractFromGroup {
            name: detail.out_parameter.clone(),
            carrier: mapping.input_parameter.clone(),
            property: property.clone(),
          });
        }
      }
    }
  }

  let args = wire_arguments(method, &mut ir);

  ir.push(BodyStmt::InvokeProxy {
    method: method.proxy.name.clone(),
    args,
    binding: invoke_binding(method, settings),
  });

  push_reshape(method, &mut ir);
  ir
}

/// Converts wire parameters as needed and produces the proxy argument list
/// in declaration order.
fn wire_arguments(method: &ClientMethod, ir: &mut MethodBodyIr) -> Vec<ValueExpr> {
  let mut args = Vec::new();

  for mapped in method.proxy.wire_parameters() {
    let name = mapped.proxy.name.clone();

    // Uri-level parameters are part of the proxy's endpoint, not its
    // argument list.
    if mapped.proxy.location == crate::generator::codemodel::ParameterLocation::Uri {
      continue;
    }

    if mapped.proxy.from_client {
      args.push(ValueExpr::ClientAccessor(name));
      continue;
    }

    match mapped.wire_conversion() {
      Some(WireConversion::JoinCollection(format)) => {
        if let Some(delimiter) = format.delimiter() {
          let converted = FieldToken::new(format!("{}_joined", name));
          ir.push(BodyStmt::JoinCollection {
            name: converted.clone(),
            source: name,
            delimiter,
          });
          args.push(ValueExpr::Local(converted));
        } else {
          // Exploded collections stay a list on the wire.
          args.push(ValueExpr::Local(name));
        }
      }
      Some(WireConversion::Base64Encode) => {
        let converted = FieldToken::new(format!("{}_base64", name));
        ir.push(BodyStmt::Base64Encode {
          name: converted.clone(),
          source: name,
        });
        args.push(ValueExpr::Local(converted));
      }
      Some(WireConversion::JsonBody) | None => args.push(ValueExpr::Local(name)),
    }
  }

  if method.proxy.supports_next_link && method.method_type.is_single_page() {
    args.push(ValueExpr::Local(FieldToken::new("next_link")));
  }
  args.push(ValueExpr::Context(context_arg(method)));
  args
}

fn invoke_binding(method: &ClientMethod, settings: &GenerationSettings) -> InvokeBinding {
  if method.method_type.is_async() {
    InvokeBinding::Async
  } else if settings.is_sync_stack_enabled {
    InvokeBinding::Blocking
  } else {
    InvokeBinding::BlockOn
  }
}

fn push_reshape(method: &ClientMethod, ir: &mut MethodBodyIr) {
  match &method.return_shape {
    ReturnShape::SinglePage(_) => {
      let details = method.page_details.as_ref();
      ir.push(BodyStmt::BuildPageResponse {
        items: details.map(|d| d.item_name.clone()).unwrap_or_else(|| FieldToken::new("value")),
        next_link: details.and_then(|d| d.next_link_name.clone()),
      });
    }
    ReturnShape::WithHeadersResponse { .. } => match deserialized_headers_type(&method.return_shape) {
      Some(headers) => ir.push(BodyStmt::ReturnResponseWithHeaders {
        headers_type: headers.clone(),
      }),
      // Lossy fallback: an unexpected generic shape means no deserialized
      // headers, never an error.
      None => ir.push(BodyStmt::ReturnResponse),
    },
    ReturnShape::WithResponse(_) => ir.push(BodyStmt::ReturnResponse),
    ReturnShape::Body(ClientType::Void) => ir.push(BodyStmt::ReturnVoid),
    ReturnShape::Body(_) => ir.push(BodyStmt::UnwrapBody),
    // Pager and poller shapes never reach the simple pipeline.
    _ => ir.push(BodyStmt::ReturnResponse),
  }
}

/// Paging continuation shape: an iterable backed by a fetch-first closure and
/// a fetch-by-link closure calling the (possibly different) continuation
/// method, with context threaded through both.
fn build_pager_body(method: &ClientMethod, settings: &GenerationSettings) -> MethodBodyIr {
  let mut ir = MethodBodyIr::default();
  let element = match &method.return_shape {
    ReturnShape::Pager(element) | ReturnShape::PageIterator(element) => element.clone(),
    _ => ClientType::Json,
  };

  let blocking = !method.method_type.is_async();
  // A fully-synchronous single-page sibling only exists when every sync
  // kind is generated; otherwise blocking closures drive the async one.
  let block_on = blocking && !sync_internals_generated(settings);
  let sibling_suffix = if blocking && !block_on { "_blocking_with_context" } else { "_with_context" };

  let single_page = MethodToken::new(format!("{}_single_page{sibling_suffix}", method.proxy.name));
  let next_method = method
    .page_details
    .as_ref()
    .and_then(|details| details.next_method.as_ref())
    .map(|next| MethodToken::new(format!("{}{sibling_suffix}", next.name)));

  ir.push(BodyStmt::BuildPager {
    element,
    single_page,
    next_method,
    args: pass_through_arguments(method),
    context: context_arg(method),
    blocking,
    block_on,
  });
  ir
}

/// Whether the internal sync shapes (single-page, rest-response) are part of
/// this session's surface.
fn sync_internals_generated(settings: &GenerationSettings) -> bool {
  settings.sync_methods_generation == SyncMethodsGeneration::All
}

/// Long-running begin shape: a cold poller over the rest-response method.
fn build_poller_body(method: &ClientMethod, settings: &GenerationSettings) -> MethodBodyIr {
  let mut ir = MethodBodyIr::default();
  let (intermediate, final_type, strategy, interval) = match &method.polling_details {
    Some(details) => (
      details.intermediate_type.clone(),
      details.final_type.clone(),
      details.strategy.clone(),
      details.poll_interval_secs,
    ),
    None => (ClientType::Json, ClientType::Json, "default".to_string(), 1),
  };

  let blocking = !method.method_type.is_async();
  let block_on = blocking && !sync_internals_generated(settings);
  let activation_suffix = if blocking && !block_on {
    "_with_response_blocking_with_context"
  } else {
    "_with_response_with_context"
  };

  ir.push(BodyStmt::BuildPoller {
    intermediate,
    final_type,
    activation: MethodToken::new(format!("{}{activation_suffix}", method.proxy.name)),
    args: pass_through_arguments(method),
    strategy,
    interval_secs: interval,
    context: context_arg(method),
    blocking,
    block_on,
  });
  ir
}

/// Long-running completion shape: begin, then drive the poller to its final
/// result.
fn build_completion_body(method: &ClientMethod) -> MethodBodyIr {
  let mut ir = MethodBodyIr::default();
  let blocking = !method.method_type.is_async();
  let mut begin = format!("begin_{}", method.proxy.name);
  if blocking {
    begin.push_str("_blocking");
  }
  if method.has_context {
    begin.push_str("_with_context");
  }

  let mut args = pass_through_arguments(method);
  if method.has_context {
    args.push(ValueExpr::Context(ContextArg::Caller));
  }

  ir.push(BodyStmt::AwaitCompletion {
    begin: MethodToken::new(begin),
    args,
    blocking,
  });
  ir
}

/// Arguments forwarded to a maximal sibling: present parameters pass through,
/// omitted optionals become `None`.
fn pass_through_arguments(method: &ClientMethod) -> Vec<ValueExpr> {
  method
    .parameters
    .iter()
    .filter(|parameter| !parameter.is_constant && !parameter.from_client && parameter.grouped_by.is_none())
    .map(|parameter| {
      if method.only_required_parameters && !parameter.required {
        ValueExpr::NoneValue
      } else {
        ValueExpr::Local(parameter.name.clone())
      }
    })
    .collect()
}

fn context_arg(method: &ClientMethod) -> ContextArg {
  if method.has_context { ContextArg::Caller } else { ContextArg::None }
}
