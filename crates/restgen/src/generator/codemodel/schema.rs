//! Arena-backed schema graph for the input code model.
//!
//! Schema nodes are addressed by stable [`SchemaId`] indices rather than
//! object identity, so memoization downstream stays valid even though the
//! graph is cyclic (self-referential and mutually-referential models are
//! expected and legal).

use serde_json::Value;

/// Opaque, stable identifier of a schema node in a [`SchemaStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u32);

impl SchemaId {
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

/// Owning arena for every schema node of one code model.
///
/// All cross-references between nodes go through [`SchemaId`], which makes the
/// node identity explicit and portable: two ids are the same node exactly when
/// they are equal.
#[derive(Debug, Default)]
pub struct SchemaStore {
  nodes: Vec<Schema>,
}

impl SchemaStore {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// The id the next [`SchemaStore::insert`] will return; lets model
  /// builders wire up self-referential nodes.
  #[must_use]
  pub fn next_id(&self) -> SchemaId {
    SchemaId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX))
  }

  /// Inserts a node and returns its stable id.
  pub fn insert(&mut self, schema: Schema) -> SchemaId {
    let id = SchemaId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
    self.nodes.push(schema);
    id
  }

  /// Resolves an id produced by [`SchemaStore::insert`].
  #[must_use]
  pub fn get(&self, id: SchemaId) -> &Schema {
    &self.nodes[id.index()]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Iterates over the named (object, choice, union) nodes in insertion order.
  pub fn iter_named(&self) -> impl Iterator<Item = (SchemaId, &Schema)> {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, schema)| matches!(schema, Schema::Object(_) | Schema::Choice(_) | Schema::Union(_)))
      .map(|(index, schema)| (SchemaId(u32::try_from(index).unwrap_or(u32::MAX)), schema))
  }

  // Convenience constructors used by model builders and tests.

  pub fn primitive(&mut self, kind: PrimitiveKind) -> SchemaId {
    self.insert(Schema::Primitive(kind))
  }

  pub fn string(&mut self) -> SchemaId {
    self.primitive(PrimitiveKind::String)
  }

  pub fn int32(&mut self) -> SchemaId {
    self.primitive(PrimitiveKind::Int32)
  }

  pub fn int64(&mut self) -> SchemaId {
    self.primitive(PrimitiveKind::Int64)
  }

  pub fn boolean(&mut self) -> SchemaId {
    self.primitive(PrimitiveKind::Bool)
  }

  pub fn byte_array(&mut self) -> SchemaId {
    self.primitive(PrimitiveKind::ByteArray)
  }

  pub fn array_of(&mut self, element: SchemaId) -> SchemaId {
    self.insert(Schema::Array { element, unique: false })
  }

  pub fn map_of(&mut self, value: SchemaId) -> SchemaId {
    self.insert(Schema::Dictionary { value })
  }

  pub fn constant(&mut self, value_type: SchemaId, value: Value) -> SchemaId {
    self.insert(Schema::Constant { value_type, value })
  }
}

/// One node of the schema graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
  Primitive(PrimitiveKind),
  Array { element: SchemaId, unique: bool },
  Dictionary { value: SchemaId },
  Object(ObjectSchema),
  Choice(ChoiceSchema),
  Union(UnionSchema),
  Constant { value_type: SchemaId, value: Value },
  Binary,
  Any,
}

impl Schema {
  /// The declared name, for the node kinds that carry one.
  #[must_use]
  pub fn name(&self) -> Option<&str> {
    match self {
      Schema::Object(object) => Some(&object.name),
      Schema::Choice(choice) => Some(&choice.name),
      Schema::Union(union) => Some(&union.name),
      _ => None,
    }
  }
}

/// Wire-level primitive kinds understood by the type mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
  String,
  Bool,
  Int32,
  Int64,
  Float32,
  Float64,
  Date,
  DateTime,
  Duration,
  Uuid,
  Url,
  ByteArray,
}

/// A named model schema with properties.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
#[builder(on(String, into))]
pub struct ObjectSchema {
  pub name: String,
  #[builder(default)]
  pub properties: Vec<Property>,
  pub parent: Option<SchemaId>,
  pub description: Option<String>,
}

/// One property of an object schema.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
#[builder(on(String, into))]
pub struct Property {
  pub name: String,
  /// Name on the wire when it differs from the client-facing name.
  pub serialized_name: Option<String>,
  pub schema: SchemaId,
  #[builder(default)]
  pub required: bool,
  #[builder(default)]
  pub read_only: bool,
}

impl Property {
  #[must_use]
  pub fn wire_name(&self) -> &str {
    self.serialized_name.as_deref().unwrap_or(&self.name)
  }
}

/// An enumerated ("choice") schema over literal values.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
#[builder(on(String, into))]
pub struct ChoiceSchema {
  pub name: String,
  #[builder(default)]
  pub values: Vec<ChoiceValue>,
  /// Extensible choices admit values outside the declared set.
  #[builder(default)]
  pub extensible: bool,
  pub description: Option<String>,
}

/// One literal value of a choice schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceValue {
  /// Declared member name; the value text is used when absent.
  pub name: Option<String>,
  pub value: String,
}

impl ChoiceValue {
  #[must_use]
  pub fn new(value: impl Into<String>) -> Self {
    Self {
      name: None,
      value: value.into(),
    }
  }

  #[must_use]
  pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      value: value.into(),
    }
  }
}

/// A union ("or") schema: one base type plus one concrete subtype per arm.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
#[builder(on(String, into))]
pub struct UnionSchema {
  pub name: String,
  #[builder(default)]
  pub arms: Vec<UnionArm>,
  pub description: Option<String>,
}

/// One arm of a union schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionArm {
  pub name: String,
  pub schema: SchemaId,
}

impl UnionArm {
  #[must_use]
  pub fn new(name: impl Into<String>, schema: SchemaId) -> Self {
    Self {
      name: name.into(),
      schema,
    }
  }
}
