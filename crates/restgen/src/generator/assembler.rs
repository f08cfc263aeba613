//! Aggregates synthesized methods into client and proxy containers.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::generator::{
  codemodel::{CodeModel, ParameterImplementation, SecurityScheme},
  mapper::{ClientMethodParameter, ParameterMapper, TypeMapperRegistry},
  naming::identifiers::to_type_name,
  settings::{CredentialType, GenerationSettings},
  synthesis::ClientMethod,
  tokens::TypeToken,
};

/// Resolved credential model of the generated service client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CredentialModel {
  Token { scopes: Vec<String> },
  ApiKey { header_name: String },
  None,
}

/// One generated client wrapper: the methods of one operation group.
#[derive(Debug)]
pub(crate) struct ClientGroupModel {
  pub(crate) name: TypeToken,
  pub(crate) methods: Vec<ClientMethod>,
}

/// The assembled service: one proxy plus one client per operation group.
#[derive(Debug)]
pub(crate) struct ServiceClientModel {
  pub(crate) name: TypeToken,
  pub(crate) proxy_name: TypeToken,
  pub(crate) endpoint: String,
  pub(crate) credential: CredentialModel,
  pub(crate) client_parameters: Vec<ClientMethodParameter>,
  pub(crate) groups: Vec<ClientGroupModel>,
}

pub(crate) struct ServiceClientAssembler {
  model: Rc<CodeModel>,
  registry: Rc<TypeMapperRegistry>,
  settings: Rc<GenerationSettings>,
}

impl ServiceClientAssembler {
  pub(crate) fn new(model: Rc<CodeModel>, registry: Rc<TypeMapperRegistry>, settings: Rc<GenerationSettings>) -> Self {
    Self {
      model,
      registry,
      settings,
    }
  }

  /// Builds the service model from the synthesized per-group method lists.
  pub(crate) fn assemble(&self, groups: Vec<(String, Vec<ClientMethod>)>) -> anyhow::Result<ServiceClientModel> {
    let service = to_type_name(&self.model.service_name);

    let groups = groups
      .into_iter()
      .map(|(name, methods)| ClientGroupModel {
        name: TypeToken::new(format!("{}Client", to_type_name(&name))),
        methods,
      })
      .collect();

    Ok(ServiceClientModel {
      name: TypeToken::new(format!("{service}Client")),
      proxy_name: TypeToken::new(format!("{service}Proxy")),
      endpoint: self.model.host.clone(),
      credential: self.resolve_credential(),
      client_parameters: self.collect_client_parameters()?,
      groups,
    })
  }

  /// Explicit settings override wins over schema-declared security.
  fn resolve_credential(&self) -> CredentialModel {
    if let Some(credential_type) = self.settings.credential_types.first() {
      return match credential_type {
        CredentialType::Token => CredentialModel::Token {
          scopes: self.resolve_scopes(),
        },
        CredentialType::Key => CredentialModel::ApiKey {
          header_name: "api-key".to_string(),
        },
      };
    }

    match self.model.security.first() {
      Some(SecurityScheme::OAuth2 { .. }) => CredentialModel::Token {
        scopes: self.resolve_scopes(),
      },
      Some(SecurityScheme::ApiKey { header_name }) => CredentialModel::ApiKey {
        header_name: header_name.clone(),
      },
      None => CredentialModel::None,
    }
  }

  /// Scopes come from explicit settings, then declared OAuth2 scopes, then
  /// are synthesized from the host.
  fn resolve_scopes(&self) -> Vec<String> {
    if !self.settings.credential_scopes.is_empty() {
      return self.settings.credential_scopes.clone();
    }

    for scheme in &self.model.security {
      if let SecurityScheme::OAuth2 { scopes } = scheme
        && !scopes.is_empty()
      {
        return scopes.clone();
      }
    }

    vec![synthesize_scope(&self.model.host, &self.model)]
  }

  /// Client-level parameters across all operations, deduplicated by name in
  /// first-seen order; these become constructor parameters and accessors.
  fn collect_client_parameters(&self) -> anyhow::Result<Vec<ClientMethodParameter>> {
    let mapper = ParameterMapper::new(Rc::clone(&self.registry));
    let mut collected: IndexMap<String, ClientMethodParameter> = IndexMap::new();

    for group in &self.model.groups {
      for operation in &group.operations {
        for request in &operation.requests {
          for parameter in &request.parameters {
            if parameter.implementation != ParameterImplementation::Client {
              continue;
            }
            if collected.contains_key(&parameter.name) {
              continue;
            }
            let mapped = mapper.map(parameter)?;
            collected.insert(parameter.name.clone(), mapped.client);
          }
        }
      }
    }

    Ok(collected.into_values().collect())
  }
}

/// Derives a default credential scope from the host: placeholders are
/// resolved against client-level parameter defaults at generation time, then
/// the path and trailing slash are stripped and `/.default` appended.
pub(crate) fn synthesize_scope(host: &str, model: &CodeModel) -> String {
  let mut resolved = host.to_string();

  for group in &model.groups {
    for operation in &group.operations {
      for request in &operation.requests {
        for parameter in &request.parameters {
          if parameter.implementation != ParameterImplementation::Client {
            continue;
          }
          let placeholder = format!("{{{}}}", parameter.name);
          if !resolved.contains(&placeholder) {
            continue;
          }
          if let Some(default) = parameter.client_default.as_ref().and_then(|value| value.as_str()) {
            resolved = resolved.replace(&placeholder, default);
          }
        }
      }
    }
  }

  let trimmed = resolved.trim_end_matches('/');
  let base = match trimmed.find("://") {
    Some(scheme_end) => {
      let after_scheme = scheme_end + 3;
      match trimmed[after_scheme..].find('/') {
        Some(path_start) => &trimmed[..after_scheme + path_start],
        None => trimmed,
      }
    }
    None => trimmed.split('/').next().unwrap_or(trimmed),
  };

  format!("{base}/.default")
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use serde_json::json;

  use super::*;
  use crate::generator::{
    codemodel::{
      CodeModel, Operation, OperationGroup, Parameter, ParameterLocation, Request, SchemaStore, SecurityScheme,
    },
    settings::GenerationSettings,
  };

  fn model_with_host(host: &str, client_parameters: Vec<Parameter>) -> Rc<CodeModel> {
    let operation = Operation::builder()
      .group("service")
      .name("get")
      .method(http::Method::GET)
      .path("/")
      .requests(vec![Request::new(client_parameters)])
      .build();
    Rc::new(
      CodeModel::builder()
        .service_name("Search")
        .host(host)
        .security(vec![SecurityScheme::OAuth2 { scopes: vec![] }])
        .groups(vec![OperationGroup::new("service", vec![operation])])
        .store(Rc::new(SchemaStore::new()))
        .build(),
    )
  }

  fn assembler_for(model: &Rc<CodeModel>, settings: GenerationSettings) -> ServiceClientAssembler {
    let registry = Rc::new(TypeMapperRegistry::new(Rc::clone(&model.store)));
    ServiceClientAssembler::new(Rc::clone(model), registry, Rc::new(settings))
  }

  #[test]
  fn test_scope_synthesis_strips_path_and_trailing_slash() {
    let model = model_with_host("https://search.example.com/v2/", vec![]);
    assert_eq!(synthesize_scope(&model.host, &model), "https://search.example.com/.default");
  }

  #[test]
  fn test_scope_synthesis_resolves_host_placeholders() {
    let mut store = SchemaStore::new();
    let string = store.string();
    let region = Parameter::builder()
      .name("region")
      .schema(string)
      .required(true)
      .location(ParameterLocation::Uri)
      .implementation(ParameterImplementation::Client)
      .client_default(json!("westus"))
      .build();

    let operation = Operation::builder()
      .group("service")
      .name("get")
      .method(http::Method::GET)
      .path("/")
      .requests(vec![Request::new(vec![region])])
      .build();
    let model = Rc::new(
      CodeModel::builder()
        .service_name("Search")
        .host("https://{region}.search.example.com/v1")
        .groups(vec![OperationGroup::new("service", vec![operation])])
        .store(Rc::new(store))
        .build(),
    );

    assert_eq!(synthesize_scope(&model.host, &model), "https://westus.search.example.com/.default");
  }

  #[test]
  fn test_settings_credential_override_wins() -> anyhow::Result<()> {
    let model = model_with_host("https://search.example.com", vec![]);
    let assembler = assembler_for(
      &model,
      GenerationSettings::builder()
        .credential_types(vec![CredentialType::Key])
        .build(),
    );
    let service = assembler.assemble(vec![])?;
    assert_eq!(service.credential, CredentialModel::ApiKey { header_name: "api-key".to_string() });
    Ok(())
  }

  #[test]
  fn test_declared_oauth2_without_override_resolves_token() -> anyhow::Result<()> {
    let model = model_with_host("https://search.example.com", vec![]);
    let assembler = assembler_for(&model, GenerationSettings::default());
    let service = assembler.assemble(vec![])?;
    assert_eq!(
      service.credential,
      CredentialModel::Token { scopes: vec!["https://search.example.com/.default".to_string()] }
    );
    Ok(())
  }

  #[test]
  fn test_explicit_scopes_preempt_synthesis() -> anyhow::Result<()> {
    let model = model_with_host("https://search.example.com", vec![]);
    let assembler = assembler_for(
      &model,
      GenerationSettings::builder()
        .credential_scopes(vec!["https://custom/.default".to_string()])
        .build(),
    );
    let service = assembler.assemble(vec![])?;
    assert_eq!(
      service.credential,
      CredentialModel::Token { scopes: vec!["https://custom/.default".to_string()] }
    );
    Ok(())
  }

  #[test]
  fn test_client_parameters_deduplicate_by_name() -> anyhow::Result<()> {
    let mut store = SchemaStore::new();
    let string = store.string();
    let endpoint = |schema| {
      Parameter::builder()
        .name("endpoint")
        .schema(schema)
        .required(true)
        .location(ParameterLocation::Uri)
        .implementation(ParameterImplementation::Client)
        .build()
    };

    let first = Operation::builder()
      .group("service")
      .name("get")
      .method(http::Method::GET)
      .path("/a")
      .requests(vec![Request::new(vec![endpoint(string)])])
      .build();
    let second = Operation::builder()
      .group("service")
      .name("list")
      .method(http::Method::GET)
      .path("/b")
      .requests(vec![Request::new(vec![endpoint(string)])])
      .build();

    let model = Rc::new(
      CodeModel::builder()
        .service_name("Search")
        .host("https://search.example.com")
        .groups(vec![OperationGroup::new("service", vec![first, second])])
        .store(Rc::new(store))
        .build(),
    );
    let assembler = assembler_for(&model, GenerationSettings::default());
    let service = assembler.assemble(vec![])?;

    assert_eq!(service.client_parameters.len(), 1);
    assert_eq!(service.client_parameters[0].name.as_str(), "endpoint");
    assert_eq!(service.name, "SearchClient");
    assert_eq!(service.proxy_name, "SearchProxy");
    Ok(())
  }
}
