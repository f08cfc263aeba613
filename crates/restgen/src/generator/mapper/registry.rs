//! Memoizing schema-to-client-type mappers.
//!
//! All caches are keyed by [`SchemaId`] arena identity, never by structural
//! equality: the model graph is cyclic and the same node is visited through
//! many reference paths, and every visit must resolve to the same generated
//! type object. The registry is constructor-injected session state; there are
//! no process-wide mapper singletons.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::{anyhow, bail};

use super::client_type::{ClassModel, ClientPrimitive, ClientProperty, ClientType, EnumMember, EnumModel, TypeHandle, UnionModel};
use crate::generator::{
  codemodel::{ChoiceSchema, ObjectSchema, PrimitiveKind, Schema, SchemaId, SchemaStore, UnionSchema},
  naming::identifiers::{suffix_member_collision, to_field_name, to_member_name, to_type_name},
  tokens::{FieldToken, MemberToken, TypeToken},
};

pub(crate) struct TypeMapperRegistry {
  store: Rc<SchemaStore>,
  mapped: RefCell<HashMap<SchemaId, ClientType>>,
  classes: RefCell<HashMap<SchemaId, Rc<ClassModel>>>,
  enums: RefCell<HashMap<SchemaId, Rc<EnumModel>>>,
  unions: RefCell<HashMap<SchemaId, Rc<UnionModel>>>,
  /// Union subtype sets are generated once per base type name; repeated
  /// references to the same union reuse the set.
  union_subtypes: RefCell<HashMap<String, Vec<Rc<ClassModel>>>>,
}

impl TypeMapperRegistry {
  pub(crate) fn new(store: Rc<SchemaStore>) -> Self {
    Self {
      store,
      mapped: RefCell::new(HashMap::new()),
      classes: RefCell::new(HashMap::new()),
      enums: RefCell::new(HashMap::new()),
      unions: RefCell::new(HashMap::new()),
      union_subtypes: RefCell::new(HashMap::new()),
    }
  }

  pub(crate) fn store(&self) -> &SchemaStore {
    &self.store
  }

  /// Maps a schema node to its client type. Idempotent: repeated calls with
  /// the same id return the same result from the memo table.
  pub(crate) fn map(&self, id: SchemaId) -> anyhow::Result<ClientType> {
    if let Some(existing) = self.mapped.borrow().get(&id) {
      return Ok(existing.clone());
    }

    let client_type = match self.store.get(id).clone() {
      Schema::Primitive(kind) => Self::map_primitive(kind),
      Schema::Array { element, .. } => ClientType::list_of(self.map(element)?),
      Schema::Dictionary { value } => ClientType::map_of(self.map(value)?),
      Schema::Constant { value_type, .. } => self.map(value_type)?,
      Schema::Binary => ClientType::Binary,
      Schema::Any => ClientType::Json,
      Schema::Object(object) => self.map_object(id, &object)?,
      Schema::Choice(choice) => self.map_choice(id, &choice),
      Schema::Union(union) => self.map_union(id, &union)?,
    };

    self.mapped.borrow_mut().entry(id).or_insert_with(|| client_type.clone());
    Ok(client_type)
  }

  /// The generated class model for an object schema node. The returned `Rc`
  /// is reference-equal across calls with the same id.
  pub(crate) fn class_model(&self, id: SchemaId) -> anyhow::Result<Rc<ClassModel>> {
    self.map(id)?;
    self
      .classes
      .borrow()
      .get(&id)
      .cloned()
      .ok_or_else(|| anyhow!("schema node {id:?} is not an object schema"))
  }

  /// The generated enum model for a choice schema node.
  pub(crate) fn enum_model(&self, id: SchemaId) -> anyhow::Result<Rc<EnumModel>> {
    self.map(id)?;
    self
      .enums
      .borrow()
      .get(&id)
      .cloned()
      .ok_or_else(|| anyhow!("schema node {id:?} is not a choice schema"))
  }

  /// The generated union model for an "or" schema node.
  pub(crate) fn union_model(&self, id: SchemaId) -> anyhow::Result<Rc<UnionModel>> {
    self.map(id)?;
    self
      .unions
      .borrow()
      .get(&id)
      .cloned()
      .ok_or_else(|| anyhow!("schema node {id:?} is not a union schema"))
  }

  /// Every class model generated so far, in no particular order.
  pub(crate) fn generated_classes(&self) -> Vec<Rc<ClassModel>> {
    self.classes.borrow().values().cloned().collect()
  }

  fn map_primitive(kind: PrimitiveKind) -> ClientType {
    match kind {
      PrimitiveKind::String | PrimitiveKind::Url => ClientType::Primitive(ClientPrimitive::String),
      PrimitiveKind::Bool => ClientType::Primitive(ClientPrimitive::Bool),
      PrimitiveKind::Int32 => ClientType::Primitive(ClientPrimitive::Int32),
      PrimitiveKind::Int64 => ClientType::Primitive(ClientPrimitive::Int64),
      PrimitiveKind::Float32 => ClientType::Primitive(ClientPrimitive::Float32),
      PrimitiveKind::Float64 => ClientType::Primitive(ClientPrimitive::Float64),
      PrimitiveKind::Date => ClientType::Primitive(ClientPrimitive::Date),
      PrimitiveKind::DateTime => ClientType::Primitive(ClientPrimitive::DateTime),
      PrimitiveKind::Duration => ClientType::Primitive(ClientPrimitive::Duration),
      PrimitiveKind::Uuid => ClientType::Primitive(ClientPrimitive::Uuid),
      PrimitiveKind::ByteArray => ClientType::Binary,
    }
  }

  fn map_object(&self, id: SchemaId, object: &ObjectSchema) -> anyhow::Result<ClientType> {
    let handle = TypeHandle::new(id, TypeToken::new(to_type_name(&object.name)));
    let client_type = ClientType::Class(handle.clone());

    // Memoize the handle before recursing into properties; property types
    // may reference this node again (cyclic models).
    self.mapped.borrow_mut().insert(id, client_type.clone());

    let mut properties = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
      properties.push(ClientProperty {
        name: FieldToken::new(to_field_name(&property.name)),
        wire_name: property.wire_name().to_string(),
        client_type: self.map(property.schema)?,
        required: property.required,
        read_only: property.read_only,
      });
    }

    self.classes.borrow_mut().insert(
      id,
      Rc::new(ClassModel {
        schema: id,
        name: handle.name,
        properties,
      }),
    );

    Ok(client_type)
  }

  fn map_choice(&self, id: SchemaId, choice: &ChoiceSchema) -> ClientType {
    let handle = TypeHandle::new(id, TypeToken::new(to_type_name(&choice.name)));

    let mut collisions: HashMap<String, usize> = HashMap::new();
    let members = choice
      .values
      .iter()
      .map(|value| {
        let base = to_member_name(value.name.as_deref(), &value.value);
        let prior = collisions.entry(base.clone()).or_insert(0);
        let name = suffix_member_collision(&base, *prior);
        *prior += 1;
        EnumMember {
          name: MemberToken::new(name),
          value: value.value.clone(),
        }
      })
      .collect();

    self.enums.borrow_mut().insert(
      id,
      Rc::new(EnumModel {
        schema: id,
        name: handle.name.clone(),
        members,
        extensible: choice.extensible,
      }),
    );

    ClientType::Enum(handle)
  }

  fn map_union(&self, id: SchemaId, union: &UnionSchema) -> anyhow::Result<ClientType> {
    if union.arms.is_empty() {
      bail!("union schema `{}` has no arms", union.name);
    }

    let base_name = to_type_name(&union.name);
    let handle = TypeHandle::new(id, TypeToken::new(&base_name));
    self.mapped.borrow_mut().insert(id, ClientType::Union(handle.clone()));

    let subtypes = if let Some(existing) = self.union_subtypes.borrow().get(&base_name) {
      existing.clone()
    } else {
      let mut built = Vec::with_capacity(union.arms.len());
      for arm in &union.arms {
        let arm_type = self.map(arm.schema)?;
        built.push(Rc::new(ClassModel {
          schema: arm.schema,
          name: TypeToken::new(format!("{base_name}{}", to_type_name(&arm.name))),
          properties: vec![ClientProperty {
            name: FieldToken::new("value"),
            wire_name: "value".to_string(),
            client_type: arm_type,
            required: true,
            read_only: false,
          }],
        }));
      }
      self.union_subtypes.borrow_mut().insert(base_name, built.clone());
      built
    };

    self.unions.borrow_mut().insert(
      id,
      Rc::new(UnionModel {
        schema: id,
        name: handle.name.clone(),
        subtypes,
      }),
    );

    Ok(ClientType::Union(handle))
  }
}
