//! Client-side type model produced by the type mapper registry.

use std::{fmt::{Display, Formatter}, rc::Rc};

use anyhow::anyhow;

use crate::generator::{codemodel::SchemaId, tokens::{FieldToken, MemberToken, TypeToken}};

/// Primitive client types with a fixed rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientPrimitive {
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
}

impl Display for ClientPrimitive {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let rendered = match self {
      ClientPrimitive::String => "String",
      ClientPrimitive::Bool => "bool",
      ClientPrimitive::Int32 => "i32",
      ClientPrimitive::Int64 => "i64",
      ClientPrimitive::Float32 => "f32",
      ClientPrimitive::Float64 => "f64",
      ClientPrimitive::Date => "chrono::NaiveDate",
      ClientPrimitive::DateTime => "chrono::DateTime<chrono::Utc>",
      ClientPrimitive::Duration => "chrono::Duration",
      ClientPrimitive::Uuid => "uuid::Uuid",
    };
    f.write_str(rendered)
  }
}

/// Reference to a generated named type, carrying the arena identity of the
/// schema node it was mapped from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
  pub schema: SchemaId,
  pub name: TypeToken,
}

impl TypeHandle {
  #[must_use]
  pub fn new(schema: SchemaId, name: TypeToken) -> Self {
    Self { schema, name }
  }
}

/// A client-side type as used in signatures, bodies, and models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientType {
  Primitive(ClientPrimitive),
  /// Opaque payload (`Vec<u8>`); also the uniform erasure target in
  /// protocol-method mode.
  Binary,
  /// Untyped JSON (`serde_json::Value`).
  Json,
  Void,
  List(Box<ClientType>),
  Map(Box<ClientType>),
  Class(TypeHandle),
  Enum(TypeHandle),
  Union(TypeHandle),
}

impl ClientType {
  #[must_use]
  pub fn list_of(element: ClientType) -> Self {
    ClientType::List(Box::new(element))
  }

  #[must_use]
  pub fn map_of(value: ClientType) -> Self {
    ClientType::Map(Box::new(value))
  }

  /// Structured types are erased in protocol-method mode.
  #[must_use]
  pub fn is_structured(&self) -> bool {
    matches!(
      self,
      ClientType::List(_) | ClientType::Map(_) | ClientType::Class(_) | ClientType::Enum(_) | ClientType::Union(_) | ClientType::Json
    )
  }

  /// Protocol-mode erasure: structured types collapse uniformly to the
  /// opaque payload type, everything else is unchanged.
  #[must_use]
  pub fn erased(&self) -> ClientType {
    if self.is_structured() { ClientType::Binary } else { self.clone() }
  }

  /// Renders the full Rust type text.
  #[must_use]
  pub fn render(&self) -> String {
    match self {
      ClientType::Primitive(primitive) => primitive.to_string(),
      ClientType::Binary => "Vec<u8>".to_string(),
      ClientType::Json => "serde_json::Value".to_string(),
      ClientType::Void => "()".to_string(),
      ClientType::List(element) => format!("Vec<{}>", element.render()),
      ClientType::Map(value) => format!("std::collections::HashMap<String, {}>", value.render()),
      ClientType::Class(handle) | ClientType::Enum(handle) | ClientType::Union(handle) => handle.name.to_string(),
    }
  }

  /// Parses the rendered type into a syntax node for emission.
  pub fn to_type(&self) -> anyhow::Result<syn::Type> {
    let rendered = self.render();
    syn::parse_str(&rendered).map_err(|err| anyhow!("failed to parse type `{rendered}`: {err}"))
  }
}

/// Generated model class: one per object schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassModel {
  pub schema: SchemaId,
  pub name: TypeToken,
  pub properties: Vec<ClientProperty>,
}

impl ClassModel {
  /// Finds a property by its wire name.
  #[must_use]
  pub fn property(&self, wire_name: &str) -> Option<&ClientProperty> {
    self.properties.iter().find(|property| property.wire_name == wire_name)
  }
}

/// One property of a generated model class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProperty {
  pub name: FieldToken,
  pub wire_name: String,
  pub client_type: ClientType,
  pub required: bool,
  pub read_only: bool,
}

/// Generated enumerated type: one per choice schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
  pub schema: SchemaId,
  pub name: TypeToken,
  pub members: Vec<EnumMember>,
  pub extensible: bool,
}

/// One member of a generated enumerated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
  pub name: MemberToken,
  pub value: String,
}

/// Generated union base type plus its concrete subtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionModel {
  pub schema: SchemaId,
  pub name: TypeToken,
  pub subtypes: Vec<Rc<ClassModel>>,
}
