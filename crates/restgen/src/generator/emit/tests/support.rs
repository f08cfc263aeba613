use std::rc::Rc;

use http::Method;

use crate::generator::{
  codemodel::ParameterLocation,
  mapper::{ClientMethodParameter, ClientPrimitive, ClientType},
  synthesis::{
    ClientMethod, ClientMethodType, MethodPageDetails, MethodVisibility, NextPageMethod, ProxyMethod, ReturnShape,
  },
  tokens::{FieldToken, MethodToken},
};

pub(super) fn string_type() -> ClientType {
  ClientType::Primitive(ClientPrimitive::String)
}

pub(super) fn plain_parameter(name: &str, required: bool) -> ClientMethodParameter {
  ClientMethodParameter {
    name: FieldToken::new(name),
    client_type: string_type(),
    required,
    nullable: false,
    is_constant: false,
    constant_literal: None,
    from_client: false,
    location: ParameterLocation::Query,
    grouped_by: None,
    original_parameter: None,
    target_property: None,
    description: None,
  }
}

pub(super) fn constant_parameter(name: &str, literal: &str) -> ClientMethodParameter {
  ClientMethodParameter {
    is_constant: true,
    constant_literal: Some(literal.to_string()),
    ..plain_parameter(name, true)
  }
}

pub(super) fn nullable_required_parameter(name: &str) -> ClientMethodParameter {
  ClientMethodParameter {
    nullable: true,
    ..plain_parameter(name, true)
  }
}

pub(super) fn proxy(name: &str) -> Rc<ProxyMethod> {
  Rc::new(
    ProxyMethod::builder()
      .name(MethodToken::new(name))
      .http_method(Method::GET)
      .path("/items")
      .response_body(string_type())
      .expected_status_codes(vec![200])
      .build(),
  )
}

pub(super) fn method(
  kind: ClientMethodType,
  shape: ReturnShape,
  parameters: Vec<ClientMethodParameter>,
) -> ClientMethod {
  ClientMethod::builder()
    .name(MethodToken::new("list"))
    .method_type(kind)
    .visibility(MethodVisibility::Public)
    .only_required_parameters(false)
    .has_context(false)
    .parameters(parameters)
    .return_shape(shape)
    .proxy(proxy("list"))
    .operation_identity("items_list")
    .build()
}

pub(super) fn page_details(next_link: Option<&str>) -> MethodPageDetails {
  MethodPageDetails::builder()
    .item_name(FieldToken::new("value"))
    .maybe_next_link_name(next_link.map(FieldToken::new))
    .maybe_next_method(next_link.map(|_| NextPageMethod {
      name: MethodToken::new("list_single_page"),
      is_self: true,
    }))
    .build()
}
