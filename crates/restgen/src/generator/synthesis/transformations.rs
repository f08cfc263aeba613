//! Parameter transformation sub-protocol: grouped and flattened parameters
//! are reassembled into wire-facing values before any transport call.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::method::{MethodTransformationDetail, ParameterMapping};
use crate::generator::{
  mapper::MappedParameter,
  tokens::FieldToken,
};

/// Names of parameters that only exist as flattening targets; they are
/// reconstructed by a transformation instead of appearing in argument lists.
pub(crate) fn flatten_targets(parameters: &[MappedParameter]) -> HashSet<FieldToken> {
  parameters
    .iter()
    .filter_map(|parameter| parameter.client.original_parameter.clone())
    .collect()
}

/// Builds the transformation details for one method's parameter list.
///
/// Grouped parameters become a read off their carrier object; flattened
/// parameters become property writes on their reconstructed original. An
/// original that ends up with no mappings at all (none of its properties came
/// from a caller-visible parameter) is still listed so it can be instantiated
/// as an empty default instance.
pub(crate) fn build_transformations(parameters: &[MappedParameter]) -> Vec<MethodTransformationDetail> {
  let mut details: IndexMap<FieldToken, MethodTransformationDetail> = IndexMap::new();

  // Every flattening target gets a detail up front, mappings or not.
  for parameter in parameters {
    if let Some(target) = &parameter.client.original_parameter {
      if let Some(original) = parameters.iter().find(|candidate| &candidate.client.name == target) {
        details.entry(target.clone()).or_insert_with(|| MethodTransformationDetail {
          out_parameter: target.clone(),
          out_type: original.client.client_type.clone(),
          mappings: vec![],
        });
      }
    }
  }

  for parameter in parameters {
    let client = &parameter.client;

    if let Some(carrier) = &client.grouped_by {
      let detail = details.entry(client.name.clone()).or_insert_with(|| MethodTransformationDetail {
        out_parameter: client.name.clone(),
        out_type: client.client_type.clone(),
        mappings: vec![],
      });
      detail.mappings.push(ParameterMapping {
        input_parameter: carrier.clone(),
        input_property: Some(client.name.clone()),
        output_property: None,
      });
    }

    if let Some(original) = &client.original_parameter {
      // Constants and client-bound values are materialized elsewhere; only
      // caller-visible parameters contribute mappings.
      if client.is_constant || client.from_client {
        continue;
      }
      if let Some(detail) = details.get_mut(original) {
        detail.mappings.push(ParameterMapping {
          input_parameter: client.name.clone(),
          input_property: None,
          output_property: client.target_property.clone().or_else(|| Some(client.name.clone())),
        });
      }
    }
  }

  details.into_values().collect()
}
