//! Three-tier polling resolution for long-running operations.

use std::rc::Rc;

use http::Method;

use super::method::MethodPollingDetails;
use crate::generator::{
  codemodel::{CodeModel, Operation, OperationRef, Schema},
  mapper::{ClientType, TypeMapperRegistry},
  settings::GenerationSettings,
};

const DEFAULT_STRATEGY: &str = "default";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Whether the long-running branch applies to this operation at all:
/// fluent mode or explicit polling configuration must be in effect, and the
/// return payload must not be a byte stream.
pub(crate) fn lro_applies(
  operation: &Operation,
  registry: &TypeMapperRegistry,
  settings: &GenerationSettings,
) -> bool {
  let Some(lro) = &operation.lro else {
    return false;
  };

  let configured = settings.is_fluent
    || settings.polling_for(&operation.identity()).is_some()
    || lro.polling_operation.is_some()
    || lro.final_operation.is_some();
  if !configured {
    return false;
  }

  let streams_bytes = operation
    .response_schema()
    .is_some_and(|schema| matches!(registry.store().get(schema), Schema::Binary));
  !streams_bytes
}

/// Resolves intermediate/final result types, the strategy token, and the
/// poll interval for one long-running operation.
///
/// Resolution prefers explicit operation-to-operation links, then the static
/// per-operation-id configuration, then the operation's own declared response
/// type (200-status preferred), before defaulting to an opaque payload.
pub(crate) fn resolve_polling(
  operation: &Operation,
  model: &CodeModel,
  registry: &Rc<TypeMapperRegistry>,
  settings: &GenerationSettings,
) -> anyhow::Result<MethodPollingDetails> {
  let lro = operation.lro.clone().unwrap_or_default();
  let static_config = settings.polling_for(&operation.identity());

  let linked_intermediate = resolve_link_type(lro.polling_operation.as_ref(), model, registry)?;
  let linked_final = resolve_link_type(lro.final_operation.as_ref(), model, registry)?;

  let configured_intermediate = static_config
    .and_then(|config| config.intermediate_type.as_deref())
    .map(|name| resolve_named_type(name, model, registry))
    .transpose()?;
  let configured_final = static_config
    .and_then(|config| config.final_type.as_deref())
    .map(|name| resolve_named_type(name, model, registry))
    .transpose()?;

  let own_response = operation
    .response_schema()
    .map(|schema| registry.map(schema))
    .transpose()?;

  let intermediate = linked_intermediate
    .or(configured_intermediate)
    .or_else(|| own_response.clone())
    .unwrap_or(ClientType::Json);

  let final_type = match linked_final.or(configured_final) {
    Some(resolved) => resolved,
    // A known intermediate without a final link: DELETE destroys the
    // resource, anything else settles on the operation's own response.
    None if operation.method == Method::DELETE => ClientType::Void,
    None => own_response.unwrap_or(ClientType::Json),
  };

  // Protocol mode pages and polls opaque payloads uniformly.
  let (intermediate, final_type) = if settings.is_data_plane_client {
    (intermediate.erased(), final_type.erased())
  } else {
    (intermediate, final_type)
  };

  let strategy = static_config
    .map(|config| config.strategy.clone())
    .unwrap_or_else(|| DEFAULT_STRATEGY.to_string());
  let poll_interval_secs = lro
    .poll_interval_secs
    .or_else(|| static_config.map(|config| config.poll_interval_secs))
    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

  Ok(
    MethodPollingDetails::builder()
      .intermediate_type(intermediate)
      .final_type(final_type)
      .strategy(strategy)
      .poll_interval_secs(poll_interval_secs)
      .build(),
  )
}

fn resolve_link_type(
  link: Option<&OperationRef>,
  model: &CodeModel,
  registry: &Rc<TypeMapperRegistry>,
) -> anyhow::Result<Option<ClientType>> {
  let Some(reference) = link else {
    return Ok(None);
  };
  let Some(target) = model.resolve(reference) else {
    return Ok(None);
  };
  target.response_schema().map(|schema| registry.map(schema)).transpose()
}

/// Resolves a statically-configured type name against the named schemas of
/// the model, defaulting to an opaque payload when nothing matches.
fn resolve_named_type(
  name: &str,
  model: &CodeModel,
  registry: &Rc<TypeMapperRegistry>,
) -> anyhow::Result<ClientType> {
  for (id, schema) in model.store.iter_named() {
    if schema.name() == Some(name) {
      return registry.map(id);
    }
  }
  Ok(ClientType::Json)
}
