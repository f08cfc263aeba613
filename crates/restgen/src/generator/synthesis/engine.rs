//! The client-method synthesis engine.
//!
//! For each operation the engine decides the full overload set: the method
//! kind (paging / long-running / simple, in that precedence), the sync/async
//! binding, the parameter breadth, and context inclusion. Visibility of every
//! candidate is decided by [`super::visibility::method_visibility`] alone;
//! candidates it rejects are filtered and the remainder deduplicated by
//! structural identity before being returned.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::{Context as _, bail};
use itertools::Itertools;

use super::{
  method::{
    ClientMethod, ClientMethodType, MethodPageDetails, MethodPollingDetails, MethodVisibility, NextPageMethod,
    OverloadBreadth, ProxyMethod,
  },
  polling::{lro_applies, resolve_polling},
  return_types::{ReturnShape, ReturnTypeHolder, ReturnTypeResolver},
  transformations::{build_transformations, flatten_targets},
  visibility::method_visibility,
};
use crate::generator::{
  codemodel::{CodeModel, Operation, PagingMetadata},
  mapper::{ClientType, ParameterMapper, TypeMapperRegistry},
  naming::identifiers::{to_field_name, to_method_name},
  settings::{GenerationSettings, SyncMethodsGeneration},
  tokens::{FieldToken, MethodToken},
};

pub(crate) struct ClientMethodSynthesizer {
  model: Rc<CodeModel>,
  registry: Rc<TypeMapperRegistry>,
  parameter_mapper: ParameterMapper,
  resolver: ReturnTypeResolver,
  settings: Rc<GenerationSettings>,
  /// Descriptor lists are computed once per (operation identity, protocol
  /// flag) and immutable afterwards.
  cache: RefCell<HashMap<(String, bool), Rc<Vec<ClientMethod>>>>,
}

impl ClientMethodSynthesizer {
  pub(crate) fn new(model: Rc<CodeModel>, registry: Rc<TypeMapperRegistry>, settings: Rc<GenerationSettings>) -> Self {
    Self {
      model,
      parameter_mapper: ParameterMapper::new(Rc::clone(&registry)),
      resolver: ReturnTypeResolver::new(Rc::clone(&registry), Rc::clone(&settings)),
      registry,
      settings,
      cache: RefCell::new(HashMap::new()),
    }
  }

  /// Synthesizes the ordered overload list for one operation.
  pub(crate) fn synthesize(&self, operation: &Operation) -> anyhow::Result<Rc<Vec<ClientMethod>>> {
    let key = (operation.identity(), self.settings.is_data_plane_client);
    if let Some(cached) = self.cache.borrow().get(&key) {
      return Ok(Rc::clone(cached));
    }

    let methods = Rc::new(self.synthesize_uncached(operation)?);
    self.cache.borrow_mut().insert(key, Rc::clone(&methods));
    Ok(methods)
  }

  fn synthesize_uncached(&self, operation: &Operation) -> anyhow::Result<Vec<ClientMethod>> {
    let holder = self
      .resolver
      .resolve(operation)
      .with_context(|| format!("resolving return types of `{}`", operation.identity()))?;

    let proxy = Rc::new(self.build_proxy(operation)?);

    let client_parameters = operation
      .client_request()
      .map(|request| self.parameter_mapper.map_all(&request.parameters))
      .transpose()?
      .unwrap_or_default();

    let targets = flatten_targets(&client_parameters);
    let transformations = build_transformations(&client_parameters);
    let parameters: Vec<_> = client_parameters
      .iter()
      .filter(|mapped| !targets.contains(&mapped.client.name))
      .map(|mapped| mapped.client.clone())
      .collect();

    let has_optional = parameters
      .iter()
      .any(|parameter| !parameter.required && !parameter.is_constant && !parameter.from_client && parameter.grouped_by.is_none());

    let (kinds, page_details, polling_details) = self.plan_kinds(operation)?;

    let base = ClientMethod::builder()
      .name(MethodToken::new(to_method_name(&operation.name)))
      .method_type(kinds[0])
      .visibility(MethodVisibility::Crate)
      .only_required_parameters(false)
      .has_context(false)
      .parameters(parameters)
      .return_shape(holder.async_with_response.clone())
      .proxy(proxy)
      .transformations(transformations)
      .maybe_page_details(page_details)
      .maybe_polling_details(polling_details.clone())
      .operation_identity(operation.identity())
      .maybe_description(operation.summary.clone().or_else(|| operation.description.clone()))
      .build();

    let base_name = to_method_name(&operation.name);
    let breadths = if has_optional && self.settings.required_parameter_client_methods {
      vec![OverloadBreadth::Maximal, OverloadBreadth::RequiredOnly]
    } else {
      vec![OverloadBreadth::Maximal]
    };

    let mut candidates = Vec::new();

    for &kind in &kinds {
      let shape = Self::shape_for(kind, &holder, polling_details.as_ref());
      for &breadth in &breadths {
        for has_context in [false, true] {
          let visibility =
            method_visibility(kind, breadth, has_context, self.settings.is_data_plane_client);
          if visibility == MethodVisibility::NotGenerate {
            continue;
          }

          let name = Self::method_name(&base_name, kind, breadth, has_context);
          let mut sibling = base.with_shape(kind, shape.clone(), visibility, name.clone());
          if breadth == OverloadBreadth::RequiredOnly {
            sibling = sibling.with_required_only(visibility, name.clone());
          }
          if has_context {
            sibling = sibling.with_context(visibility, name);
          }
          candidates.push(sibling);
        }
      }
    }

    // Sync and async planning can independently request the same
    // context-bearing overload; structural identity dedups them.
    Ok(candidates.into_iter().unique_by(ClientMethod::overload_key).collect())
  }

  /// Kind precedence: paging, then long-running, then simple; the sync axis
  /// multiplies each branch per the session settings.
  fn plan_kinds(
    &self,
    operation: &Operation,
  ) -> anyhow::Result<(Vec<ClientMethodType>, Option<MethodPageDetails>, Option<MethodPollingDetails>)> {
    if let Some(paging) = &operation.paging {
      let page_details = self.resolve_page_details(operation, paging)?;
      let kinds = self.with_sync_kinds(
        vec![ClientMethodType::PagingAsyncSinglePage, ClientMethodType::PagingAsync],
        &[ClientMethodType::PagingSyncSinglePage, ClientMethodType::PagingSync],
      );
      return Ok((kinds, Some(page_details), None));
    }

    if lro_applies(operation, &self.registry, &self.settings) {
      let polling = resolve_polling(operation, &self.model, &self.registry, &self.settings)?;
      let kinds = self.with_sync_kinds(
        vec![
          ClientMethodType::SimpleAsyncRestResponse,
          ClientMethodType::LongRunningBeginAsync,
          ClientMethodType::LongRunningAsync,
        ],
        &[
          ClientMethodType::SimpleSyncRestResponse,
          ClientMethodType::LongRunningBeginSync,
          ClientMethodType::LongRunningSync,
        ],
      );
      return Ok((kinds, None, Some(polling)));
    }

    let kinds = self.with_sync_kinds(
      vec![ClientMethodType::SimpleAsyncRestResponse, ClientMethodType::SimpleAsync],
      &[ClientMethodType::SimpleSyncRestResponse, ClientMethodType::SimpleSync],
    );
    Ok((kinds, None, None))
  }

  fn with_sync_kinds(&self, mut kinds: Vec<ClientMethodType>, sync: &[ClientMethodType]) -> Vec<ClientMethodType> {
    for &kind in sync {
      let include = match self.settings.sync_methods_generation {
        SyncMethodsGeneration::None => false,
        SyncMethodsGeneration::All => true,
        SyncMethodsGeneration::Essential => kind.is_convenience(),
      };
      if include {
        kinds.push(kind);
      }
    }
    kinds
  }

  fn resolve_page_details(&self, operation: &Operation, paging: &PagingMetadata) -> anyhow::Result<MethodPageDetails> {
    let next_method = match &paging.next_link_name {
      None => None,
      Some(_) => match &paging.next_operation {
        None => Some(NextPageMethod {
          name: MethodToken::new(format!("{}_single_page", to_method_name(&operation.name))),
          is_self: true,
        }),
        Some(reference) => {
          let Some(target) = self.model.resolve(reference) else {
            bail!(
              "paging operation `{}` references continuation `{}::{}` which does not exist",
              operation.identity(),
              reference.group,
              reference.name
            );
          };
          let is_self = target.group == operation.group && target.name == operation.name;
          Some(NextPageMethod {
            name: MethodToken::new(format!("{}_single_page", to_method_name(&target.name))),
            is_self,
          })
        }
      },
    };

    Ok(
      MethodPageDetails::builder()
        .item_name(FieldToken::new(to_field_name(&paging.item_name)))
        .maybe_next_link_name(
          paging
            .next_link_name
            .as_deref()
            .map(|name| FieldToken::new(to_field_name(name))),
        )
        .maybe_next_method(next_method)
        .build(),
    )
  }

  fn build_proxy(&self, operation: &Operation) -> anyhow::Result<ProxyMethod> {
    let wire_parameters = operation
      .primary_request()
      .map(|request| self.parameter_mapper.map_all(&request.parameters))
      .transpose()?
      .unwrap_or_default();

    let response_body = operation
      .response_schema()
      .map(|schema| self.registry.map(schema))
      .transpose()?
      .unwrap_or(ClientType::Void);

    let expected_status_codes = operation
      .responses
      .iter()
      .filter(|response| response.is_success())
      .flat_map(|response| response.status_codes.iter().copied())
      .collect();

    Ok(
      ProxyMethod::builder()
        .name(MethodToken::new(to_method_name(&operation.name)))
        .http_method(operation.method.clone())
        .path(operation.path.clone())
        .parameters(wire_parameters)
        .response_body(response_body)
        .expected_status_codes(expected_status_codes)
        .supports_next_link(operation.paging.is_some())
        .build(),
    )
  }

  fn shape_for(
    kind: ClientMethodType,
    holder: &ReturnTypeHolder,
    polling: Option<&MethodPollingDetails>,
  ) -> ReturnShape {
    match kind {
      ClientMethodType::PagingAsyncSinglePage | ClientMethodType::SimpleAsyncRestResponse => {
        holder.async_with_response.clone()
      }
      ClientMethodType::PagingSyncSinglePage | ClientMethodType::SimpleSyncRestResponse => {
        holder.sync_with_response.clone()
      }
      ClientMethodType::PagingAsync | ClientMethodType::SimpleAsync => holder.async_body.clone(),
      ClientMethodType::PagingSync | ClientMethodType::SimpleSync => holder.sync_body.clone(),
      ClientMethodType::LongRunningBeginAsync => polling.map_or(holder.async_body.clone(), |details| {
        ReturnShape::Poller {
          intermediate: details.intermediate_type.clone(),
          final_type: details.final_type.clone(),
        }
      }),
      ClientMethodType::LongRunningBeginSync => polling.map_or(holder.sync_body.clone(), |details| {
        ReturnShape::SyncPoller {
          intermediate: details.intermediate_type.clone(),
          final_type: details.final_type.clone(),
        }
      }),
      ClientMethodType::LongRunningAsync | ClientMethodType::LongRunningSync => {
        polling.map_or(holder.async_body.clone(), |details| ReturnShape::Body(details.final_type.clone()))
      }
    }
  }

  /// Rust has no signature overloading, so every overload axis shows up in
  /// the method name.
  fn method_name(base: &str, kind: ClientMethodType, breadth: OverloadBreadth, has_context: bool) -> MethodToken {
    let mut name = match kind {
      ClientMethodType::PagingAsyncSinglePage => format!("{base}_single_page"),
      ClientMethodType::PagingSyncSinglePage => format!("{base}_single_page_blocking"),
      ClientMethodType::PagingAsync | ClientMethodType::SimpleAsync | ClientMethodType::LongRunningAsync => {
        base.to_string()
      }
      ClientMethodType::PagingSync | ClientMethodType::SimpleSync | ClientMethodType::LongRunningSync => {
        format!("{base}_blocking")
      }
      ClientMethodType::LongRunningBeginAsync => format!("begin_{base}"),
      ClientMethodType::LongRunningBeginSync => format!("begin_{base}_blocking"),
      ClientMethodType::SimpleAsyncRestResponse => format!("{base}_with_response"),
      ClientMethodType::SimpleSyncRestResponse => format!("{base}_with_response_blocking"),
    };
    if breadth == OverloadBreadth::RequiredOnly {
      name.push_str("_required");
    }
    if has_context {
      name.push_str("_with_context");
    }
    MethodToken::new(name)
  }
}
