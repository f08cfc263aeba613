use std::rc::Rc;

use http::Method;

use super::support::{code_model, paged_list_operation, pet_store, registry_for, simple_get_operation};
use crate::generator::{
  codemodel::{ObjectSchema, Operation, Property, Response, Schema},
  mapper::{ClientPrimitive, ClientType},
  settings::GenerationSettings,
  synthesis::{ReturnShape, ReturnTypeResolver},
};

fn resolver_for(model: &Rc<crate::generator::codemodel::CodeModel>, settings: GenerationSettings) -> ReturnTypeResolver {
  ReturnTypeResolver::new(registry_for(model), Rc::new(settings))
}

#[test]
fn test_paging_variants_wrap_the_page_element() -> anyhow::Result<()> {
  let mut fixture = pet_store();
  let operation = paged_list_operation(&mut fixture);
  let model = code_model(fixture, vec![operation.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::default());

  let holder = resolver.resolve(&operation)?;
  assert!(matches!(holder.async_with_response, ReturnShape::SinglePage(ClientType::Class(_))));
  assert!(matches!(holder.async_body, ReturnShape::Pager(ClientType::Class(_))));
  assert!(matches!(holder.sync_with_response, ReturnShape::SinglePage(_)));
  assert!(matches!(holder.sync_body, ReturnShape::PageIterator(_)));
  assert_eq!(holder.async_body.render(), "Pager<Pet>");
  assert_eq!(holder.sync_body.render(), "PageIterator<Pet>");
  Ok(())
}

#[test]
fn test_non_paging_variants_use_the_body_type() -> anyhow::Result<()> {
  let mut fixture = pet_store();
  let operation = simple_get_operation(&mut fixture);
  let model = code_model(fixture, vec![operation.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::default());

  let holder = resolver.resolve(&operation)?;
  assert_eq!(holder.async_with_response.render(), "Response<Pet>");
  assert_eq!(holder.async_body.render(), "Pet");
  assert!(holder.page_element.is_none());
  Ok(())
}

#[test]
fn test_void_response_resolves_unit() -> anyhow::Result<()> {
  let fixture = pet_store();
  let operation = Operation::builder()
    .group("pets")
    .name("ping")
    .method(Method::GET)
    .path("/ping")
    .responses(vec![Response::builder().status_codes(vec![204]).build()])
    .build();
  let model = code_model(fixture, vec![operation.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::default());

  let holder = resolver.resolve(&operation)?;
  assert_eq!(holder.async_body.render(), "()");
  assert_eq!(holder.async_with_response.render(), "Response<()>");
  Ok(())
}

#[test]
fn test_protocol_mode_erases_body_and_page_element() -> anyhow::Result<()> {
  let mut fixture = pet_store();
  let paged = paged_list_operation(&mut fixture);
  let simple = simple_get_operation(&mut fixture);
  let model = code_model(fixture, vec![paged.clone(), simple.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::builder().is_data_plane_client(true).build());

  let paged_holder = resolver.resolve(&paged)?;
  assert_eq!(paged_holder.page_element, Some(ClientType::Binary));
  assert_eq!(paged_holder.async_body.render(), "Pager<Vec<u8>>");

  let simple_holder = resolver.resolve(&simple)?;
  assert_eq!(simple_holder.async_body.render(), "Vec<u8>");
  Ok(())
}

#[test]
fn test_declared_headers_produce_headers_response_shape() -> anyhow::Result<()> {
  let mut fixture = pet_store();
  let string = fixture.store.string();
  let headers = fixture.store.insert(Schema::Object(
    ObjectSchema::builder()
      .name("GetPetHeaders")
      .properties(vec![Property::builder().name("etag").schema(string).build()])
      .build(),
  ));
  let mut operation = simple_get_operation(&mut fixture);
  operation.responses = vec![
    Response::builder()
      .status_codes(vec![200])
      .schema(fixture.pet)
      .headers_schema(headers)
      .build(),
  ];
  let model = code_model(fixture, vec![operation.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::default());

  let holder = resolver.resolve(&operation)?;
  assert_eq!(holder.async_with_response.render(), "HeadersResponse<GetPetHeaders, Pet>");
  assert_eq!(holder.async_body.render(), "Pet");
  Ok(())
}

#[test]
fn test_missing_item_property_is_a_schema_error() {
  let mut fixture = pet_store();
  let mut operation = paged_list_operation(&mut fixture);
  operation.paging = operation.paging.take().map(|mut paging| {
    paging.item_name = "entries".to_string();
    paging
  });
  let model = code_model(fixture, vec![operation.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::default());

  let error = resolver.resolve(&operation).unwrap_err();
  assert!(error.to_string().contains("paging item `entries` not found"));
}

#[test]
fn test_non_list_item_property_is_a_schema_error() {
  let mut fixture = pet_store();
  let mut operation = paged_list_operation(&mut fixture);
  operation.paging = operation.paging.take().map(|mut paging| {
    paging.item_name = "nextLink".to_string();
    paging
  });
  let model = code_model(fixture, vec![operation.clone()]);
  let resolver = resolver_for(&model, GenerationSettings::default());

  let error = resolver.resolve(&operation).unwrap_err();
  assert!(error.to_string().contains("must be list-valued"));
}

#[test]
fn test_fallible_shapes() {
  let body = ReturnShape::Body(ClientType::Primitive(ClientPrimitive::String));
  let pager = ReturnShape::Pager(ClientType::Primitive(ClientPrimitive::String));
  assert!(body.is_fallible());
  assert!(!pager.is_fallible(), "cold shapes surface errors through the stream");
}
