use std::rc::Rc;

use crate::generator::{
  codemodel::{ChoiceSchema, ChoiceValue, ObjectSchema, Property, Schema, SchemaId, SchemaStore},
  mapper::TypeMapperRegistry,
};

pub(super) fn registry_over(store: SchemaStore) -> Rc<TypeMapperRegistry> {
  Rc::new(TypeMapperRegistry::new(Rc::new(store)))
}

pub(super) fn pet_schema(store: &mut SchemaStore) -> SchemaId {
  let string = store.string();
  let int64 = store.int64();
  store.insert(Schema::Object(
    ObjectSchema::builder()
      .name("Pet")
      .properties(vec![
        Property::builder().name("id").schema(int64).required(true).build(),
        Property::builder().name("name").schema(string).required(true).build(),
        Property::builder().name("tag").schema(string).build(),
      ])
      .build(),
  ))
}

pub(super) fn color_choice(store: &mut SchemaStore, values: &[&str]) -> SchemaId {
  store.insert(Schema::Choice(
    ChoiceSchema::builder()
      .name("Color")
      .values(values.iter().map(|value| ChoiceValue::new(*value)).collect::<Vec<_>>())
      .build(),
  ))
}
