pub(crate) mod engine;
pub(crate) mod method;
pub(crate) mod polling;
pub(crate) mod return_types;
pub(crate) mod transformations;
pub(crate) mod visibility;

pub(crate) use engine::ClientMethodSynthesizer;
pub(crate) use method::{
  ClientMethod, ClientMethodType, MethodPageDetails, MethodPollingDetails, MethodVisibility, NextPageMethod,
  OverloadBreadth, ProxyMethod,
};
pub(crate) use return_types::{ReturnShape, ReturnTypeResolver};

#[cfg(test)]
mod tests;
