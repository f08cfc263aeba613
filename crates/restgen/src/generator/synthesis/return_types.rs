//! Derives the four return-type variants for one (operation, proxy method)
//! pair.

use std::rc::Rc;

use anyhow::{Context as _, bail};

use crate::generator::{
  codemodel::Operation,
  mapper::{ClientType, TypeMapperRegistry},
  settings::GenerationSettings,
};

/// Shape of one method's return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReturnShape {
  /// `Result<T>`; `Result<()>` for void bodies.
  Body(ClientType),
  /// `Result<Response<T>>`.
  WithResponse(ClientType),
  /// `Result<HeadersResponse<H, T>>`: envelope with deserialized headers.
  WithHeadersResponse { headers: ClientType, body: ClientType },
  /// `Result<Response<Page<T>>>`: one page of a paged sequence.
  SinglePage(ClientType),
  /// `Pager<T>`: lazily-driven async page stream.
  Pager(ClientType),
  /// `PageIterator<T>`: blocking page iterator.
  PageIterator(ClientType),
  /// `Poller<I, F>`: cold async long-running poller.
  Poller { intermediate: ClientType, final_type: ClientType },
  /// `SyncPoller<I, F>`: blocking long-running poller.
  SyncPoller { intermediate: ClientType, final_type: ClientType },
}

impl ReturnShape {
  /// Cold shapes (pagers, pollers) are returned directly; everything else is
  /// fallible at the call site.
  #[must_use]
  pub(crate) fn is_fallible(&self) -> bool {
    matches!(
      self,
      ReturnShape::Body(_)
        | ReturnShape::WithResponse(_)
        | ReturnShape::WithHeadersResponse { .. }
        | ReturnShape::SinglePage(_)
    )
  }

  /// Renders the declared return type (without the `Result` wrapper).
  #[must_use]
  pub(crate) fn render(&self) -> String {
    match self {
      ReturnShape::Body(body) => body.render(),
      ReturnShape::WithResponse(body) => format!("Response<{}>", body.render()),
      ReturnShape::WithHeadersResponse { headers, body } => {
        format!("HeadersResponse<{}, {}>", headers.render(), body.render())
      }
      ReturnShape::SinglePage(element) => format!("Response<Page<{}>>", element.render()),
      ReturnShape::Pager(element) => format!("Pager<{}>", element.render()),
      ReturnShape::PageIterator(element) => format!("PageIterator<{}>", element.render()),
      ReturnShape::Poller { intermediate, final_type } => {
        format!("Poller<{}, {}>", intermediate.render(), final_type.render())
      }
      ReturnShape::SyncPoller { intermediate, final_type } => {
        format!("SyncPoller<{}, {}>", intermediate.render(), final_type.render())
      }
    }
  }
}

/// Ephemeral aggregate of the four resolved return-type variants; consumed
/// during synthesis of one operation's overloads and not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReturnTypeHolder {
  pub(crate) async_with_response: ReturnShape,
  pub(crate) async_body: ReturnShape,
  pub(crate) sync_with_response: ReturnShape,
  pub(crate) sync_body: ReturnShape,
  /// Element type of the paged sequence, for paging operations.
  pub(crate) page_element: Option<ClientType>,
}

pub(crate) struct ReturnTypeResolver {
  registry: Rc<TypeMapperRegistry>,
  settings: Rc<GenerationSettings>,
}

impl ReturnTypeResolver {
  pub(crate) fn new(registry: Rc<TypeMapperRegistry>, settings: Rc<GenerationSettings>) -> Self {
    Self { registry, settings }
  }

  /// Resolves the return-type variants for one operation.
  ///
  /// For paging operations the declared item property must resolve to a
  /// list-valued property of the response model; anything else is a fatal
  /// schema error for the operation, never a silent fallback.
  pub(crate) fn resolve(&self, operation: &Operation) -> anyhow::Result<ReturnTypeHolder> {
    if let Some(paging) = &operation.paging {
      let element = self.page_element_type(operation, &paging.item_name)?;
      return Ok(ReturnTypeHolder {
        async_with_response: ReturnShape::SinglePage(element.clone()),
        async_body: ReturnShape::Pager(element.clone()),
        sync_with_response: ReturnShape::SinglePage(element.clone()),
        sync_body: ReturnShape::PageIterator(element.clone()),
        page_element: Some(element),
      });
    }

    let body = self.body_type(operation)?;
    let headers = self.headers_type(operation)?;

    let with_response = match headers {
      Some(headers) => ReturnShape::WithHeadersResponse {
        headers,
        body: body.clone(),
      },
      None => ReturnShape::WithResponse(body.clone()),
    };

    Ok(ReturnTypeHolder {
      async_with_response: with_response.clone(),
      async_body: ReturnShape::Body(body.clone()),
      sync_with_response: with_response,
      sync_body: ReturnShape::Body(body),
      page_element: None,
    })
  }

  fn body_type(&self, operation: &Operation) -> anyhow::Result<ClientType> {
    let Some(schema) = operation.response_schema() else {
      return Ok(ClientType::Void);
    };
    let mapped = self
      .registry
      .map(schema)
      .with_context(|| format!("resolving response type of `{}`", operation.identity()))?;

    // Protocol mode erases structured types so the binding survives
    // server-side schema evolution.
    if self.settings.is_data_plane_client {
      return Ok(mapped.erased());
    }
    Ok(mapped)
  }

  fn headers_type(&self, operation: &Operation) -> anyhow::Result<Option<ClientType>> {
    if self.settings.is_data_plane_client {
      return Ok(None);
    }
    let Some(schema) = operation.success_response().and_then(|response| response.headers_schema) else {
      return Ok(None);
    };
    Ok(Some(self.registry.map(schema)?))
  }

  /// Locates the list-valued response property designated as the paging
  /// item property; its element type becomes the page element type.
  fn page_element_type(&self, operation: &Operation, item_name: &str) -> anyhow::Result<ClientType> {
    if self.settings.is_data_plane_client {
      // Weakly-typed mode pages an opaque payload uniformly.
      return Ok(ClientType::Binary);
    }

    let Some(schema) = operation.response_schema() else {
      bail!(
        "paging operation `{}` declares item `{item_name}` but has no response model",
        operation.identity()
      );
    };
    let model = self
      .registry
      .class_model(schema)
      .with_context(|| format!("resolving paged response model of `{}`", operation.identity()))?;

    let Some(property) = model.property(item_name) else {
      bail!(
        "paging item `{item_name}` not found among properties of `{}` for operation `{}`",
        model.name,
        operation.identity()
      );
    };

    match &property.client_type {
      ClientType::List(element) => Ok((**element).clone()),
      other => bail!(
        "paging item `{item_name}` of `{}` must be list-valued, found `{}`",
        model.name,
        other.render()
      ),
    }
  }
}
