mod operation;
mod schema;

pub use operation::{
  CodeModel, LroMetadata, Operation, OperationGroup, OperationRef, PagingMetadata, Parameter, ParameterImplementation,
  ParameterLocation, Request, Response, ResponseHeader, SecurityScheme, SerializationStyle,
};
pub use schema::{ChoiceSchema, ChoiceValue, ObjectSchema, PrimitiveKind, Property, Schema, SchemaId, SchemaStore, UnionArm, UnionSchema};
