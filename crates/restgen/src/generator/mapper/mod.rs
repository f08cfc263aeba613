pub(crate) mod client_type;
pub(crate) mod parameters;
pub(crate) mod registry;

pub(crate) use client_type::{ClassModel, ClientPrimitive, ClientProperty, ClientType, EnumMember, EnumModel, TypeHandle, UnionModel};
pub(crate) use parameters::{ClientMethodParameter, CollectionFormat, MappedParameter, ParameterMapper, WireConversion};
pub(crate) use registry::TypeMapperRegistry;

#[cfg(test)]
mod tests;
