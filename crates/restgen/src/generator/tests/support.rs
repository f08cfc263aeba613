//! Shared pet-store code model used by the orchestrator tests.

use std::rc::Rc;

use http::Method;
use serde_json::json;

use crate::generator::codemodel::{
  CodeModel, LroMetadata, ObjectSchema, Operation, OperationGroup, OperationRef, PagingMetadata, Parameter,
  ParameterImplementation, ParameterLocation, Property, Request, Response, Schema, SchemaStore, SecurityScheme,
};

/// A small but complete service: a paged list, a simple get, a long-running
/// delete, and a client-level api-version constant.
pub(super) fn pet_store_model() -> CodeModel {
  let mut store = SchemaStore::new();
  let string = store.string();
  let int64 = store.int64();

  let pet = store.insert(Schema::Object(
    ObjectSchema::builder()
      .name("Pet")
      .properties(vec![
        Property::builder().name("id").schema(int64).required(true).build(),
        Property::builder().name("name").schema(string).required(true).build(),
        Property::builder().name("tag").schema(string).build(),
      ])
      .build(),
  ));
  let pet_list = store.array_of(pet);
  let pet_page = store.insert(Schema::Object(
    ObjectSchema::builder()
      .name("PetPage")
      .properties(vec![
        Property::builder().name("value").schema(pet_list).required(true).build(),
        Property::builder().name("nextLink").schema(string).build(),
      ])
      .build(),
  ));
  let status = store.insert(Schema::Object(
    ObjectSchema::builder()
      .name("OperationStatus")
      .properties(vec![Property::builder().name("status").schema(string).required(true).build()])
      .build(),
  ));

  let api_version = store.constant(string, json!("2024-05-01"));

  let api_version_param = Parameter::builder()
    .name("api-version")
    .schema(api_version)
    .required(true)
    .location(ParameterLocation::Query)
    .implementation(ParameterImplementation::Client)
    .client_default(json!("2024-05-01"))
    .build();

  let list = Operation::builder()
    .group("pets")
    .name("list")
    .method(Method::GET)
    .path("/pets")
    .requests(vec![Request::new(vec![
      Parameter::builder()
        .name("filter")
        .schema(string)
        .location(ParameterLocation::Query)
        .build(),
      api_version_param.clone(),
    ])])
    .responses(vec![Response::builder().status_codes(vec![200]).schema(pet_page).build()])
    .paging(
      PagingMetadata::builder()
        .item_name("value")
        .next_link_name("nextLink".to_string())
        .build(),
    )
    .summary("Lists pets page by page.".to_string())
    .build();

  let get = Operation::builder()
    .group("pets")
    .name("get")
    .method(Method::GET)
    .path("/pets/{petId}")
    .requests(vec![Request::new(vec![
      Parameter::builder()
        .name("petId")
        .schema(string)
        .required(true)
        .location(ParameterLocation::Path)
        .build(),
      api_version_param.clone(),
    ])])
    .responses(vec![Response::builder().status_codes(vec![200]).schema(pet).build()])
    .build();

  let get_status = Operation::builder()
    .group("pets")
    .name("get_status")
    .method(Method::GET)
    .path("/operations/{operationId}")
    .requests(vec![Request::new(vec![
      Parameter::builder()
        .name("operationId")
        .schema(string)
        .required(true)
        .location(ParameterLocation::Path)
        .build(),
    ])])
    .responses(vec![Response::builder().status_codes(vec![200]).schema(status).build()])
    .build();

  let delete = Operation::builder()
    .group("pets")
    .name("delete")
    .method(Method::DELETE)
    .path("/pets/{petId}")
    .requests(vec![Request::new(vec![
      Parameter::builder()
        .name("petId")
        .schema(string)
        .required(true)
        .location(ParameterLocation::Path)
        .build(),
      api_version_param,
    ])])
    .responses(vec![Response::builder().status_codes(vec![202]).build()])
    .lro(
      LroMetadata::builder()
        .polling_operation(OperationRef::new("pets", "get_status"))
        .build(),
    )
    .build();

  CodeModel::builder()
    .service_name("PetStore")
    .description("A sample pet store service.".to_string())
    .host("https://petstore.example.com")
    .security(vec![SecurityScheme::OAuth2 { scopes: vec![] }])
    .groups(vec![OperationGroup::new("pets", vec![list, get, get_status, delete])])
    .store(Rc::new(store))
    .build()
}
