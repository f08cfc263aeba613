//! Emits the proxy (wire transport surface) and the client wrappers.

use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;

use super::methods;
use crate::generator::{
  assembler::{ClientGroupModel, CredentialModel, ServiceClientModel},
  codemodel::ParameterLocation,
  mapper::ClientType,
  naming::identifiers::to_method_name,
  settings::{GenerationSettings, SyncMethodsGeneration},
  synthesis::ProxyMethod,
  tokens::{FieldToken, MethodToken, TypeToken},
};

/// Renders the full generated client surface for one service.
pub(crate) fn service_tokens(service: &ServiceClientModel, settings: &GenerationSettings) -> anyhow::Result<TokenStream> {
  let imports = import_tokens();
  let proxy = proxy_tokens(service, settings)?;
  let service_client = service_client_tokens(service, settings)?;
  let groups = service
    .groups
    .iter()
    .map(|group| group_tokens(group, service, settings))
    .collect::<anyhow::Result<Vec<_>>>()?;

  Ok(quote! {
    #imports

    #service_client

    #(#groups)*

    #proxy
  })
}

fn import_tokens() -> TokenStream {
  quote! {
    use restgen_support::{
      base64_encode, Context, Error, HeadersResponse, KeyCredential, Page, PageIterator, Pager, Poller,
      PollingStrategy, Response, Result, SyncPoller, TokenCredential,
    };
  }
}

fn service_client_tokens(service: &ServiceClientModel, settings: &GenerationSettings) -> anyhow::Result<TokenStream> {
  let name = &service.name;
  let proxy_name = &service.proxy_name;
  let blocking_init = if emit_blocking_transport(settings) {
    quote! { http_blocking: reqwest::blocking::Client::new(), }
  } else {
    quote! {}
  };

  let (credential_param, credential_field, scope_const) = match &service.credential {
    CredentialModel::Token { scopes } => {
      let scope_literals = scopes.iter().map(|scope| quote! { #scope });
      (
        quote! { credential: TokenCredential, },
        quote! { credential: Some(credential), },
        quote! { pub const DEFAULT_SCOPES: &[&str] = &[#(#scope_literals),*]; },
      )
    }
    CredentialModel::ApiKey { header_name } => (
      quote! { credential: KeyCredential, },
      quote! { credential: Some(credential.into_token()), },
      quote! { pub const CREDENTIAL_HEADER: &str = #header_name; },
    ),
    CredentialModel::None => (quote! {}, quote! { credential: None, }, quote! {}),
  };

  let extra_params = client_parameter_fields(service)?;
  let constructor_params = extra_params
    .iter()
    .map(|(name, ty)| quote! { #name: #ty })
    .collect::<Vec<_>>();
  let field_inits = extra_params.iter().map(|(name, _)| quote! { #name, }).collect::<Vec<_>>();

  let accessors = service.groups.iter().map(|group| {
    let group_name = &group.name;
    let accessor = MethodToken::new(accessor_name(group_name));
    quote! {
      pub fn #accessor(&self) -> #group_name {
        #group_name { proxy: self.proxy.clone() }
      }
    }
  });

  Ok(quote! {
    pub struct #name {
      pub(crate) proxy: std::sync::Arc<#proxy_name>,
    }

    impl #name {
      #scope_const

      pub fn new(endpoint: impl Into<String>, #credential_param #(#constructor_params),*) -> Self {
        let proxy = std::sync::Arc::new(#proxy_name {
          endpoint: endpoint.into(),
          http: reqwest::Client::new(),
          #blocking_init
          #credential_field
          #(#field_inits)*
        });
        Self { proxy }
      }

      #(#accessors)*
    }
  })
}

fn group_tokens(
  group: &ClientGroupModel,
  service: &ServiceClientModel,
  settings: &GenerationSettings,
) -> anyhow::Result<TokenStream> {
  let name = &group.name;
  let proxy_name = &service.proxy_name;

  let accessors = client_parameter_fields(service)?
    .into_iter()
    .map(|(field, ty)| {
      quote! {
        pub(crate) fn #field(&self) -> #ty {
          self.proxy.#field.clone()
        }
      }
    })
    .collect::<Vec<_>>();

  let methods = group
    .methods
    .iter()
    .map(|method| methods::method_tokens(method, settings))
    .collect::<anyhow::Result<Vec<_>>>()?;

  Ok(quote! {
    #[derive(Clone)]
    pub struct #name {
      pub(crate) proxy: std::sync::Arc<#proxy_name>,
    }

    impl #name {
      pub(crate) fn endpoint(&self) -> String {
        self.proxy.endpoint.clone()
      }

      #(#accessors)*

      #(#methods)*
    }
  })
}

fn emit_blocking_transport(settings: &GenerationSettings) -> bool {
  settings.is_sync_stack_enabled && settings.sync_methods_generation != SyncMethodsGeneration::None
}

fn proxy_tokens(service: &ServiceClientModel, settings: &GenerationSettings) -> anyhow::Result<TokenStream> {
  let name = &service.proxy_name;
  let emit_blocking = emit_blocking_transport(settings);

  // Each operation contributes exactly one proxy method; overloads share it.
  let mut unique: IndexMap<MethodToken, &ProxyMethod> = IndexMap::new();
  for group in &service.groups {
    for method in &group.methods {
      unique.entry(method.proxy.name.clone()).or_insert(&method.proxy);
    }
  }

  let extra_fields = client_parameter_fields(service)?
    .into_iter()
    .map(|(field, ty)| quote! { pub(crate) #field: #ty, })
    .collect::<Vec<_>>();

  let blocking_field = if emit_blocking {
    quote! { pub(crate) http_blocking: reqwest::blocking::Client, }
  } else {
    quote! {}
  };

  let mut wire_methods = Vec::new();
  for proxy in unique.values() {
    wire_methods.push(proxy_method_tokens(proxy, false)?);
    if emit_blocking {
      wire_methods.push(proxy_method_tokens(proxy, true)?);
    }
  }

  Ok(quote! {
    pub struct #name {
      pub(crate) endpoint: String,
      pub(crate) http: reqwest::Client,
      #blocking_field
      pub(crate) credential: Option<TokenCredential>,
      #(#extra_fields)*
    }

    impl #name {
      #(#wire_methods)*
    }
  })
}

fn proxy_method_tokens(proxy: &ProxyMethod, blocking: bool) -> anyhow::Result<TokenStream> {
  let name = if blocking {
    MethodToken::new(format!("{}_blocking", proxy.name))
  } else {
    proxy.name.clone()
  };
  let path = &proxy.path;

  let mut params = vec![quote! { &self }];
  let mut path_statements = Vec::new();
  let mut request_statements = Vec::new();

  for mapped in proxy.wire_parameters() {
    let wire = &mapped.proxy;
    if wire.location == ParameterLocation::Uri {
      continue;
    }

    let param_name = &wire.name;
    let ty = wire.wire_type.to_type()?;
    if wire.required && !wire.nullable {
      params.push(quote! { #param_name: #ty });
    } else {
      params.push(quote! { #param_name: Option<#ty> });
    }

    let serialized = &wire.serialized_name;
    match wire.location {
      ParameterLocation::Path => {
        let placeholder = format!("{{{serialized}}}");
        path_statements.push(quote! {
          let url = url.replace(#placeholder, &#param_name.to_string());
        });
      }
      ParameterLocation::Query => {
        if wire.required && !wire.nullable {
          request_statements.push(quote! {
            request = request.query(&[(#serialized, #param_name.to_string())]);
          });
        } else {
          request_statements.push(quote! {
            if let Some(value) = &#param_name {
              request = request.query(&[(#serialized, value.to_string())]);
            }
          });
        }
      }
      ParameterLocation::Header => {
        if wire.required && !wire.nullable {
          request_statements.push(quote! {
            request = request.header(#serialized, #param_name.to_string());
          });
        } else {
          request_statements.push(quote! {
            if let Some(value) = &#param_name {
              request = request.header(#serialized, value.to_string());
            }
          });
        }
      }
      ParameterLocation::Body => {
        if wire.required && !wire.nullable {
          request_statements.push(quote! {
            request = request.json(&#param_name);
          });
        } else {
          request_statements.push(quote! {
            if let Some(value) = &#param_name {
              request = request.json(value);
            }
          });
        }
      }
      ParameterLocation::Uri => {}
    }
  }
  if proxy.supports_next_link {
    params.push(quote! { next_link: Option<String> });
    path_statements.push(quote! {
      let url = next_link.unwrap_or(url);
    });
  }
  params.push(quote! { context: Context });

  let body_ty = proxy.response_body.to_type()?;
  let status_check = status_check_tokens(&proxy.expected_status_codes);
  let deserialize = deserialize_tokens(&proxy.response_body, blocking)?;

  let http_field = if blocking {
    quote! { self.http_blocking }
  } else {
    quote! { self.http }
  };
  let builder_init = builder_init_tokens(proxy, &http_field);
  let (asyncness, send) = if blocking {
    (quote! {}, quote! { request.send().map_err(Error::transport)? })
  } else {
    (quote! { async }, quote! { request.send().await.map_err(Error::transport)? })
  };

  Ok(quote! {
    pub(crate) #asyncness fn #name(#(#params),*) -> Result<Response<#body_ty>> {
      let _ = &context;
      let url = format!("{}{}", self.endpoint, #path);
      #(#path_statements)*
      let mut request = #builder_init;
      if let Some(credential) = &self.credential {
        request = request.bearer_auth(credential.token());
      }
      #(#request_statements)*
      let response = #send;
      let status = response.status().as_u16();
      #status_check
      let headers = response.headers().clone();
      #deserialize
      Ok(Response::new(status, headers, body))
    }
  })
}

fn builder_init_tokens(proxy: &ProxyMethod, http_field: &TokenStream) -> TokenStream {
  match proxy.http_method.as_str() {
    "GET" => quote! { #http_field.get(&url) },
    "POST" => quote! { #http_field.post(&url) },
    "PUT" => quote! { #http_field.put(&url) },
    "DELETE" => quote! { #http_field.delete(&url) },
    "PATCH" => quote! { #http_field.patch(&url) },
    "HEAD" => quote! { #http_field.head(&url) },
    other => {
      quote! { #http_field.request(#other.parse().unwrap_or(reqwest::Method::GET), &url) }
    }
  }
}

fn status_check_tokens(expected: &[u16]) -> TokenStream {
  if expected.is_empty() {
    return quote! {
      if status >= 400 {
        return Err(Error::http_status(status));
      }
    };
  }
  let codes = expected.iter().map(|code| quote! { #code });
  quote! {
    if ![#(#codes),*].contains(&status) {
      return Err(Error::http_status(status));
    }
  }
}

fn deserialize_tokens(body: &ClientType, blocking: bool) -> anyhow::Result<TokenStream> {
  let awaiting = if blocking { quote! {} } else { quote! { .await } };
  match body {
    ClientType::Void => Ok(quote! {
      let _ = response;
      let body = ();
    }),
    ClientType::Binary => Ok(quote! {
      let body = response.bytes()#awaiting.map_err(Error::transport)?.to_vec();
    }),
    other => {
      let ty = other.to_type()?;
      Ok(quote! {
        let body = response.json::<#ty>()#awaiting.map_err(Error::deserialize)?;
      })
    }
  }
}

fn client_parameter_fields(service: &ServiceClientModel) -> anyhow::Result<Vec<(FieldToken, syn::Type)>> {
  service
    .client_parameters
    .iter()
    .filter(|parameter| parameter.name.as_str() != "endpoint")
    .map(|parameter| {
      let ty = parameter.client_type.to_type()?;
      Ok((parameter.name.clone(), ty))
    })
    .collect()
}

fn accessor_name(group: &TypeToken) -> String {
  let base = group.as_str().strip_suffix("Client").unwrap_or(group.as_str());
  to_method_name(base)
}
