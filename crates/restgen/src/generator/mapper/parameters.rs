//! Maps raw operation parameters into the wire-level / caller-facing pair.

use std::rc::Rc;

use serde_json::Value;

use super::{
  client_type::{ClientPrimitive, ClientType},
  registry::TypeMapperRegistry,
};
use crate::generator::{
  codemodel::{Parameter, ParameterImplementation, ParameterLocation, PrimitiveKind, Schema, SerializationStyle},
  naming::identifiers::to_field_name,
  tokens::FieldToken,
};

/// Join rule for array-valued parameters collapsed to a single string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum CollectionFormat {
  Csv,
  Ssv,
  Pipes,
  Tsv,
  /// Exploded style: the parameter stays a list and is repeated on the wire.
  Multi,
}

impl CollectionFormat {
  /// The join delimiter; exploded parameters have none.
  #[must_use]
  pub(crate) fn delimiter(self) -> Option<char> {
    match self {
      CollectionFormat::Csv => Some(','),
      CollectionFormat::Ssv => Some(' '),
      CollectionFormat::Pipes => Some('|'),
      CollectionFormat::Tsv => Some('\t'),
      CollectionFormat::Multi => None,
    }
  }

  fn from_style(style: Option<SerializationStyle>) -> Self {
    match style {
      Some(SerializationStyle::SpaceDelimited) => CollectionFormat::Ssv,
      Some(SerializationStyle::PipeDelimited) => CollectionFormat::Pipes,
      Some(SerializationStyle::TabDelimited) => CollectionFormat::Tsv,
      // Unstyled and form/simple styles join with commas.
      Some(SerializationStyle::Form | SerializationStyle::Simple) | None => CollectionFormat::Csv,
    }
  }
}

/// Conversion applied between the client value and its wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WireConversion {
  JoinCollection(CollectionFormat),
  Base64Encode,
  JsonBody,
}

/// Wire-level view of one parameter, bound directly to the HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProxyMethodParameter {
  pub(crate) name: FieldToken,
  /// Name on the wire (header/query key, path placeholder).
  pub(crate) serialized_name: String,
  pub(crate) wire_type: ClientType,
  pub(crate) location: ParameterLocation,
  pub(crate) required: bool,
  pub(crate) nullable: bool,
  pub(crate) is_constant: bool,
  /// Rendered literal for constant parameters, baked in at generation time.
  pub(crate) constant_literal: Option<String>,
  pub(crate) collection_format: Option<CollectionFormat>,
  pub(crate) explode: bool,
  pub(crate) from_client: bool,
}

impl ProxyMethodParameter {
  /// Where the wire value is read from inside a generated method body:
  /// client-level parameters resolve to an accessor on the client object,
  /// everything else to a local.
  #[must_use]
  pub(crate) fn reference_expression(&self) -> String {
    if self.from_client {
      format!("self.{}()", self.name)
    } else {
      self.name.to_string()
    }
  }
}

/// Caller-facing view of the same parameter, in client types.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClientMethodParameter {
  pub(crate) name: FieldToken,
  pub(crate) client_type: ClientType,
  pub(crate) required: bool,
  pub(crate) nullable: bool,
  pub(crate) is_constant: bool,
  pub(crate) constant_literal: Option<String>,
  pub(crate) from_client: bool,
  pub(crate) location: ParameterLocation,
  /// Carrier parameter this one is grouped into on the caller side.
  pub(crate) grouped_by: Option<FieldToken>,
  /// Original body parameter this one was flattened out of.
  pub(crate) original_parameter: Option<FieldToken>,
  /// Property on the original body object the flattened value maps back to.
  pub(crate) target_property: Option<FieldToken>,
  pub(crate) description: Option<String>,
}

impl ClientMethodParameter {
  /// Whether the caller must supply this parameter: constants and
  /// client-bound values never join the argument list's required set.
  #[must_use]
  pub(crate) fn is_required_argument(&self) -> bool {
    self.required && !self.is_constant && !self.from_client
  }
}

/// The 1:1 wire/client pair produced for each raw parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MappedParameter {
  pub(crate) proxy: ProxyMethodParameter,
  pub(crate) client: ClientMethodParameter,
}

impl MappedParameter {
  /// Conversion from client value to wire value, fully determined by
  /// (wire type, client type, location).
  #[must_use]
  pub(crate) fn wire_conversion(&self) -> Option<WireConversion> {
    if self.proxy.location == ParameterLocation::Body {
      return self.client.client_type.is_structured().then_some(WireConversion::JsonBody);
    }
    match (&self.proxy.wire_type, &self.client.client_type) {
      (ClientType::Primitive(ClientPrimitive::String), ClientType::List(_)) => Some(WireConversion::JoinCollection(
        self.proxy.collection_format.unwrap_or(CollectionFormat::Csv),
      )),
      (ClientType::Primitive(ClientPrimitive::String), ClientType::Binary) => Some(WireConversion::Base64Encode),
      _ => None,
    }
  }
}

/// Maps raw parameters into proxy/client parameter pairs.
pub(crate) struct ParameterMapper {
  registry: Rc<TypeMapperRegistry>,
}

impl ParameterMapper {
  pub(crate) fn new(registry: Rc<TypeMapperRegistry>) -> Self {
    Self { registry }
  }

  /// Applies the wire-representation decision table, in priority order:
  /// body parameters keep their schema type; non-body arrays collapse to a
  /// delimited string (or stay a list when exploded); non-body byte arrays
  /// become Base64 strings.
  pub(crate) fn map(&self, parameter: &Parameter) -> anyhow::Result<MappedParameter> {
    let store = self.registry.store();
    let client_type = self.registry.map(parameter.schema)?;

    let (wire_type, collection_format) = match (parameter.location, store.get(parameter.schema)) {
      (ParameterLocation::Body, _) => (client_type.clone(), None),
      (_, Schema::Array { .. }) if parameter.explode => {
        let wire = ClientType::list_of(ClientType::Primitive(ClientPrimitive::String));
        (wire, Some(CollectionFormat::Multi))
      }
      (_, Schema::Array { .. }) => {
        let format = CollectionFormat::from_style(parameter.style);
        (ClientType::Primitive(ClientPrimitive::String), Some(format))
      }
      (_, Schema::Primitive(PrimitiveKind::ByteArray)) => (ClientType::Primitive(ClientPrimitive::String), None),
      _ => (client_type.clone(), None),
    };

    let is_constant = parameter.is_constant(store);
    let constant_literal = parameter
      .constant_value(store)
      .map(|value| render_literal(value, &client_type));

    let name = FieldToken::new(to_field_name(&parameter.name));
    let from_client = parameter.implementation == ParameterImplementation::Client;

    let proxy = ProxyMethodParameter {
      name: name.clone(),
      serialized_name: parameter.name.clone(),
      wire_type,
      location: parameter.location,
      required: parameter.required,
      nullable: parameter.nullable,
      is_constant,
      constant_literal: constant_literal.clone(),
      collection_format,
      explode: parameter.explode,
      from_client,
    };

    let client = ClientMethodParameter {
      name,
      client_type,
      required: parameter.required,
      nullable: parameter.nullable,
      is_constant,
      constant_literal,
      from_client,
      location: parameter.location,
      // Index links are resolved to names in `map_all`.
      grouped_by: None,
      original_parameter: None,
      target_property: parameter
        .target_property
        .as_deref()
        .map(|property| FieldToken::new(to_field_name(property))),
      description: parameter.description.clone(),
    };

    Ok(MappedParameter { proxy, client })
  }

  /// Maps a full parameter list, resolving grouped-by / original-parameter
  /// index links into the mapped names.
  pub(crate) fn map_all(&self, parameters: &[Parameter]) -> anyhow::Result<Vec<MappedParameter>> {
    let mut mapped = parameters.iter().map(|p| self.map(p)).collect::<anyhow::Result<Vec<_>>>()?;

    for index in 0..mapped.len() {
      if let Some(group_index) = parameters[index].grouped_by {
        let group_name = mapped.get(group_index).map(|target| target.client.name.clone());
        mapped[index].client.grouped_by = group_name;
      }
      if let Some(original_index) = parameters[index].original_parameter {
        let original_name = mapped.get(original_index).map(|target| target.client.name.clone());
        mapped[index].client.original_parameter = original_name;
      }
    }

    Ok(mapped)
  }
}

/// Renders a constant default as Rust literal text.
pub(crate) fn render_literal(value: &Value, client_type: &ClientType) -> String {
  match value {
    Value::String(text) => format!("{text:?}"),
    Value::Bool(flag) => flag.to_string(),
    Value::Number(number) => {
      if matches!(client_type, ClientType::Primitive(ClientPrimitive::Float32 | ClientPrimitive::Float64))
        && !number.to_string().contains('.')
      {
        format!("{number}.0")
      } else {
        number.to_string()
      }
    }
    Value::Null => "None".to_string(),
    other => format!("serde_json::json!({other})"),
  }
}
