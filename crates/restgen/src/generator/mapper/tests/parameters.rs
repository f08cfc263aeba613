use std::rc::Rc;

use serde_json::json;

use super::support::{pet_schema, registry_over};
use crate::generator::{
  codemodel::{Parameter, ParameterImplementation, ParameterLocation, SchemaStore, SerializationStyle},
  mapper::{ClientPrimitive, ClientType, CollectionFormat, ParameterMapper, WireConversion},
};

fn mapper_over(store: SchemaStore) -> ParameterMapper {
  ParameterMapper::new(registry_over(store))
}

#[test]
fn test_body_parameter_keeps_schema_type() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let pet = pet_schema(&mut store);
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("body")
      .schema(pet)
      .required(true)
      .location(ParameterLocation::Body)
      .build(),
  )?;

  assert!(matches!(mapped.proxy.wire_type, ClientType::Class(_)));
  assert_eq!(mapped.wire_conversion(), Some(WireConversion::JsonBody));
  Ok(())
}

#[test]
fn test_query_array_joins_with_comma_by_default() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let string = store.string();
  let list = store.array_of(string);
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("tags")
      .schema(list)
      .location(ParameterLocation::Query)
      .build(),
  )?;

  assert_eq!(mapped.proxy.wire_type, ClientType::Primitive(ClientPrimitive::String));
  assert_eq!(mapped.proxy.collection_format, Some(CollectionFormat::Csv));
  assert_eq!(mapped.wire_conversion(), Some(WireConversion::JoinCollection(CollectionFormat::Csv)));
  assert_eq!(mapped.client.client_type.render(), "Vec<String>");
  Ok(())
}

#[test]
fn test_styled_arrays_pick_matching_delimiters() -> anyhow::Result<()> {
  let cases = [
    (SerializationStyle::SpaceDelimited, CollectionFormat::Ssv, ' '),
    (SerializationStyle::PipeDelimited, CollectionFormat::Pipes, '|'),
    (SerializationStyle::TabDelimited, CollectionFormat::Tsv, '\t'),
  ];

  for (style, expected, delimiter) in cases {
    let mut store = SchemaStore::new();
    let string = store.string();
    let list = store.array_of(string);
    let mapper = mapper_over(store);

    let mapped = mapper.map(
      &Parameter::builder()
        .name("ids")
        .schema(list)
        .location(ParameterLocation::Query)
        .style(style)
        .build(),
    )?;
    assert_eq!(mapped.proxy.collection_format, Some(expected));
    assert_eq!(expected.delimiter(), Some(delimiter));
  }
  Ok(())
}

#[test]
fn test_exploded_array_stays_a_list_of_strings() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let string = store.string();
  let list = store.array_of(string);
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("tags")
      .schema(list)
      .location(ParameterLocation::Query)
      .explode(true)
      .build(),
  )?;

  assert_eq!(mapped.proxy.wire_type.render(), "Vec<String>");
  assert_eq!(mapped.proxy.collection_format, Some(CollectionFormat::Multi));
  assert_eq!(CollectionFormat::Multi.delimiter(), None);
  Ok(())
}

#[test]
fn test_header_byte_array_becomes_base64_string() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let bytes = store.byte_array();
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("content-hash")
      .schema(bytes)
      .location(ParameterLocation::Header)
      .build(),
  )?;

  assert_eq!(mapped.proxy.wire_type, ClientType::Primitive(ClientPrimitive::String));
  assert_eq!(mapped.client.client_type, ClientType::Binary);
  assert_eq!(mapped.wire_conversion(), Some(WireConversion::Base64Encode));
  Ok(())
}

#[test]
fn test_body_byte_array_is_not_base64_encoded() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let bytes = store.byte_array();
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("payload")
      .schema(bytes)
      .location(ParameterLocation::Body)
      .build(),
  )?;

  assert_eq!(mapped.proxy.wire_type, ClientType::Binary);
  assert_eq!(mapped.wire_conversion(), None);
  Ok(())
}

#[test]
fn test_client_parameter_resolves_to_accessor_expression() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let string = store.string();
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("endpoint")
      .schema(string)
      .required(true)
      .location(ParameterLocation::Uri)
      .implementation(ParameterImplementation::Client)
      .build(),
  )?;

  assert!(mapped.proxy.from_client);
  assert_eq!(mapped.proxy.reference_expression(), "self.endpoint()");
  assert!(!mapped.client.is_required_argument());
  Ok(())
}

#[test]
fn test_constant_parameter_carries_rendered_literal() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let string = store.string();
  let constant = store.constant(string, json!("2024-05-01"));
  let mapper = mapper_over(store);

  let mapped = mapper.map(
    &Parameter::builder()
      .name("api-version")
      .schema(constant)
      .required(true)
      .location(ParameterLocation::Query)
      .build(),
  )?;

  assert!(mapped.proxy.is_constant);
  assert_eq!(mapped.proxy.constant_literal.as_deref(), Some("\"2024-05-01\""));
  assert!(!mapped.client.is_required_argument());
  Ok(())
}

#[test]
fn test_map_all_resolves_group_links_to_names() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let string = store.string();
  let group_schema = pet_schema(&mut store);
  let mapper = mapper_over(store);

  let parameters = vec![
    Parameter::builder()
      .name("options")
      .schema(group_schema)
      .location(ParameterLocation::Query)
      .build(),
    Parameter::builder()
      .name("filter")
      .schema(string)
      .location(ParameterLocation::Query)
      .grouped_by(0)
      .build(),
  ];

  let mapped = mapper.map_all(&parameters)?;
  assert_eq!(mapped[1].client.grouped_by.as_ref().map(|name| name.as_str()), Some("options"));
  Ok(())
}

#[test]
fn test_rc_registry_is_shared_between_mappers() -> anyhow::Result<()> {
  let mut store = SchemaStore::new();
  let pet = pet_schema(&mut store);
  let registry = registry_over(store);
  let mapper = ParameterMapper::new(Rc::clone(&registry));

  mapper.map(
    &Parameter::builder()
      .name("body")
      .schema(pet)
      .location(ParameterLocation::Body)
      .build(),
  )?;

  // The mapper warmed the shared registry.
  assert_eq!(registry.generated_classes().len(), 1);
  Ok(())
}
