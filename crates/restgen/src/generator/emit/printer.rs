//! Renders the body IR as Rust source tokens.
//!
//! The printer is the only place that decides how a statement is spelled;
//! it holds no generation logic of its own.

use anyhow::anyhow;
use proc_macro2::TokenStream;
use quote::quote;

use super::ir::{BodyStmt, ContextArg, InvokeBinding, MethodBodyIr, ValueExpr};
use crate::generator::{mapper::ClientType, tokens::MethodToken};

pub(crate) fn print_body(ir: &MethodBodyIr) -> anyhow::Result<TokenStream> {
  let statements = ir
    .statements
    .iter()
    .map(print_statement)
    .collect::<anyhow::Result<Vec<_>>>()?;
  Ok(quote! { #(#statements)* })
}

fn print_statement(statement: &BodyStmt) -> anyhow::Result<TokenStream> {
  match statement {
    BodyStmt::ValidateRequired { parameter } => {
      let name = parameter.as_str();
      Ok(quote! {
        let Some(#parameter) = #parameter else {
          return Err(Error::invalid_argument(#name));
        };
      })
    }
    BodyStmt::DeclareLiteral { name, literal } => {
      let value = parse_expr(literal)?;
      Ok(quote! { let #name = #value; })
    }
    BodyStmt::DeclareNone { name } => Ok(quote! { let #name = None; }),
    BodyStmt::DeclareDefault { name, ty, mutable } => {
      let ty = ty.to_type()?;
      if *mutable {
        Ok(quote! { let mut #name = <#ty>::default(); })
      } else {
        Ok(quote! { let #name = <#ty>::default(); })
      }
    }
    BodyStmt::ExtractFromGroup { name, carrier, property } => Ok(quote! {
      let #name = #carrier.#property.clone();
    }),
    BodyStmt::AssignProperty { target, property, value } => Ok(quote! {
      #target.#property = Some(#value);
    }),
    BodyStmt::JoinCollection { name, source, delimiter } => {
      let delimiter = delimiter.to_string();
      Ok(quote! {
        let #name = #source
          .iter()
          .map(ToString::to_string)
          .collect::<Vec<_>>()
          .join(#delimiter);
      })
    }
    BodyStmt::Base64Encode { name, source } => Ok(quote! {
      let #name = base64_encode(&#source);
    }),
    BodyStmt::InvokeProxy { method, args, binding } => {
      let args = print_args(args);
      match binding {
        InvokeBinding::Async => Ok(quote! {
          let response = self.proxy.#method(#(#args),*).await?;
        }),
        InvokeBinding::Blocking => {
          let blocking = suffixed(method, "_blocking");
          Ok(quote! {
            let response = self.proxy.#blocking(#(#args),*)?;
          })
        }
        InvokeBinding::BlockOn => Ok(quote! {
          let response = futures::executor::block_on(self.proxy.#method(#(#args),*))?;
        }),
      }
    }
    BodyStmt::UnwrapBody => Ok(quote! { Ok(response.into_body()) }),
    BodyStmt::ReturnResponse => Ok(quote! { Ok(response) }),
    BodyStmt::ReturnResponseWithHeaders { headers_type } => {
      let headers = headers_type.to_type()?;
      Ok(quote! {
        let headers = #headers::from_headers(response.headers());
        Ok(HeadersResponse::new(response, headers))
      })
    }
    BodyStmt::ReturnVoid => Ok(quote! {
      let _ = response;
      Ok(())
    }),
    BodyStmt::BuildPageResponse { items, next_link } => {
      let next_link = match next_link {
        Some(link) => quote! { body.#link.clone() },
        None => quote! { None },
      };
      Ok(quote! {
        Ok(response.map_body(|body| Page::new(body.#items.clone(), #next_link)))
      })
    }
    BodyStmt::BuildPager {
      element,
      single_page,
      next_method,
      args,
      context,
      blocking,
      block_on,
    } => print_pager(element, single_page, next_method.as_ref(), args, *context, *blocking, *block_on),
    BodyStmt::BuildPoller {
      intermediate,
      final_type,
      activation,
      args,
      strategy,
      interval_secs,
      context,
      blocking,
      block_on,
    } => print_poller(
      intermediate,
      final_type,
      activation,
      args,
      strategy,
      *interval_secs,
      *context,
      *blocking,
      *block_on,
    ),
    BodyStmt::AwaitCompletion { begin, args, blocking } => {
      let args = print_args(args);
      if *blocking {
        Ok(quote! {
          self.#begin(#(#args),*).until_done()
        })
      } else {
        Ok(quote! {
          self.#begin(#(#args),*).until_done().await
        })
      }
    }
  }
}

#[allow(clippy::too_many_arguments)]
fn print_pager(
  element: &ClientType,
  single_page: &MethodToken,
  next_method: Option<&MethodToken>,
  args: &[ValueExpr],
  context: ContextArg,
  blocking: bool,
  block_on: bool,
) -> anyhow::Result<TokenStream> {
  let element = element.to_type()?;
  let args = print_closure_args(args);
  let context = print_context(context);

  // The continuation invocation repeats the first-page arguments with only
  // the next-link argument substituted.
  let next_fetcher = match next_method {
    Some(next) => {
      if blocking && block_on {
        quote! {
          Some(Box::new({
            let client = client.clone();
            move |next_link: String, context: Context| {
              futures::executor::block_on(client.#next(#(#args,)* Some(next_link), context))
            }
          }))
        }
      } else if blocking {
        quote! {
          Some(Box::new({
            let client = client.clone();
            move |next_link: String, context: Context| client.#next(#(#args,)* Some(next_link), context)
          }))
        }
      } else {
        quote! {
          Some(Box::new({
            let client = client.clone();
            move |next_link: String, context: Context| {
              let client = client.clone();
              Box::pin(async move { client.#next(#(#args,)* Some(next_link), context).await })
            }
          }))
        }
      }
    }
    None => quote! { None },
  };

  if blocking && block_on {
    Ok(quote! {
      let client = self.clone();
      PageIterator::<#element>::new(
        Box::new({
          let client = client.clone();
          move |context: Context| {
            futures::executor::block_on(client.#single_page(#(#args,)* None, context))
          }
        }),
        #next_fetcher,
        #context,
      )
    })
  } else if blocking {
    Ok(quote! {
      let client = self.clone();
      PageIterator::<#element>::new(
        Box::new({
          let client = client.clone();
          move |context: Context| client.#single_page(#(#args,)* None, context)
        }),
        #next_fetcher,
        #context,
      )
    })
  } else {
    Ok(quote! {
      let client = self.clone();
      Pager::<#element>::new(
        Box::new({
          let client = client.clone();
          move |context: Context| {
            let client = client.clone();
            Box::pin(async move { client.#single_page(#(#args,)* None, context).await })
          }
        }),
        #next_fetcher,
        #context,
      )
    })
  }
}

#[allow(clippy::too_many_arguments)]
fn print_poller(
  intermediate: &ClientType,
  final_type: &ClientType,
  activation: &MethodToken,
  args: &[ValueExpr],
  strategy: &str,
  interval_secs: u64,
  context: ContextArg,
  blocking: bool,
  block_on: bool,
) -> anyhow::Result<TokenStream> {
  let intermediate = intermediate.to_type()?;
  let final_type = final_type.to_type()?;
  let args = print_closure_args(args);
  let context = print_context(context);

  // Sync and async pollers use distinct constructors but resolve the
  // strategy identically.
  if blocking && block_on {
    Ok(quote! {
      let client = self.clone();
      SyncPoller::<#intermediate, #final_type>::from_activation(
        Box::new({
          let client = client.clone();
          move |context: Context| {
            futures::executor::block_on(client.#activation(#(#args,)* context))
          }
        }),
        PollingStrategy::from_name(#strategy),
        std::time::Duration::from_secs(#interval_secs),
        #context,
      )
    })
  } else if blocking {
    Ok(quote! {
      let client = self.clone();
      SyncPoller::<#intermediate, #final_type>::from_activation(
        Box::new({
          let client = client.clone();
          move |context: Context| client.#activation(#(#args,)* context)
        }),
        PollingStrategy::from_name(#strategy),
        std::time::Duration::from_secs(#interval_secs),
        #context,
      )
    })
  } else {
    Ok(quote! {
      let client = self.clone();
      Poller::<#intermediate, #final_type>::from_activation(
        Box::new({
          let client = client.clone();
          move |context: Context| {
            let client = client.clone();
            Box::pin(async move { client.#activation(#(#args,)* context).await })
          }
        }),
        PollingStrategy::from_name(#strategy),
        std::time::Duration::from_secs(#interval_secs),
        #context,
      )
    })
  }
}

fn print_args(args: &[ValueExpr]) -> Vec<TokenStream> {
  args.iter().map(print_value).collect()
}

/// Argument spelling inside a reusable closure: captured locals are cloned
/// per invocation.
fn print_closure_args(args: &[ValueExpr]) -> Vec<TokenStream> {
  args
    .iter()
    .map(|value| match value {
      ValueExpr::Local(name) => quote! { #name.clone() },
      other => print_value(other),
    })
    .collect()
}

fn print_value(value: &ValueExpr) -> TokenStream {
  match value {
    ValueExpr::Local(name) => quote! { #name },
    ValueExpr::ClientAccessor(name) => quote! { self.#name() },
    ValueExpr::Literal(text) => match parse_expr(text) {
      Ok(expr) => quote! { #expr },
      Err(_) => {
        let text = text.clone();
        quote! { #text }
      }
    },
    ValueExpr::Context(context) => print_context(*context),
    ValueExpr::NoneValue => quote! { None },
  }
}

fn print_context(context: ContextArg) -> TokenStream {
  match context {
    ContextArg::Caller => quote! { context },
    ContextArg::None => quote! { Context::none() },
  }
}

fn parse_expr(text: &str) -> anyhow::Result<syn::Expr> {
  syn::parse_str(text).map_err(|err| anyhow!("failed to parse expression `{text}`: {err}"))
}

fn suffixed(method: &MethodToken, suffix: &str) -> MethodToken {
  MethodToken::new(format!("{method}{suffix}"))
}
