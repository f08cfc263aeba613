use std::rc::Rc;

use http::Method;

use crate::generator::{
  codemodel::{
    CodeModel, ObjectSchema, Operation, OperationGroup, PagingMetadata, Parameter, ParameterLocation, Property,
    Request, Response, Schema, SchemaId, SchemaStore,
  },
  mapper::TypeMapperRegistry,
  settings::GenerationSettings,
  synthesis::ClientMethodSynthesizer,
};

pub(super) struct ModelFixture {
  pub(super) store: SchemaStore,
  pub(super) pet: SchemaId,
  pub(super) pet_page: SchemaId,
}

/// A pet-store-shaped schema set: a `Pet` model and a `PetPage` list response
/// with `value` items and a `nextLink` cursor.
pub(super) fn pet_store() -> ModelFixture {
  let mut store = SchemaStore::new();
  let string = store.string();
  let int64 = store.int64();

  let pet = store.insert(Schema::Object(
    ObjectSchema::builder()
      .name("Pet")
      .properties(vec![
        Property::builder().name("id").schema(int64).required(true).build(),
        Property::builder().name("name").schema(string).required(true).build(),
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

  ModelFixture { store, pet, pet_page }
}

/// A GET /pets paging operation with `value`/`nextLink` metadata and one
/// optional `filter` query parameter.
pub(super) fn paged_list_operation(fixture: &mut ModelFixture) -> Operation {
  let string = fixture.store.string();
  Operation::builder()
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
    ])])
    .responses(vec![Response::builder().status_codes(vec![200]).schema(fixture.pet_page).build()])
    .paging(
      PagingMetadata::builder()
        .item_name("value")
        .next_link_name("nextLink".to_string())
        .build(),
    )
    .build()
}

/// A simple GET /pets/{petId} operation returning a `Pet`.
pub(super) fn simple_get_operation(fixture: &mut ModelFixture) -> Operation {
  let string = fixture.store.string();
  Operation::builder()
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
    ])])
    .responses(vec![Response::builder().status_codes(vec![200]).schema(fixture.pet).build()])
    .build()
}

pub(super) fn code_model(fixture: ModelFixture, operations: Vec<Operation>) -> Rc<CodeModel> {
  Rc::new(
    CodeModel::builder()
      .service_name("PetStore")
      .host("https://petstore.example.com")
      .groups(vec![OperationGroup::new("pets", operations)])
      .store(Rc::new(fixture.store))
      .build(),
  )
}

pub(super) fn synthesizer_for(model: &Rc<CodeModel>, settings: GenerationSettings) -> ClientMethodSynthesizer {
  let registry = Rc::new(TypeMapperRegistry::new(Rc::clone(&model.store)));
  ClientMethodSynthesizer::new(Rc::clone(model), registry, Rc::new(settings))
}

pub(super) fn registry_for(model: &Rc<CodeModel>) -> Rc<TypeMapperRegistry> {
  Rc::new(TypeMapperRegistry::new(Rc::clone(&model.store)))
}
