//! Renders full client-method definitions: doc comments, signature, body.

use anyhow::anyhow;
use proc_macro2::TokenStream;
use quote::quote;

use super::{method_body, printer};
use crate::generator::{
  mapper::ClientMethodParameter,
  settings::GenerationSettings,
  synthesis::{ClientMethod, MethodVisibility, ReturnShape},
};

pub(crate) fn method_tokens(method: &ClientMethod, settings: &GenerationSettings) -> anyhow::Result<TokenStream> {
  let doc_attrs = doc_attrs(method);
  let visibility = visibility_tokens(method.visibility);
  // Cold shapes (pagers, pollers) are returned directly from a plain fn;
  // only fallible shapes await inside the method itself.
  let asyncness = if method.method_type.is_async() && method.return_shape.is_fallible() {
    quote! { async }
  } else {
    quote! {}
  };
  let name = &method.name;

  let mut params = vec![quote! { &self }];
  for parameter in method.argument_parameters() {
    params.push(parameter_tokens(parameter)?);
  }
  if method.method_type.is_single_page() {
    // First-page calls pass None; continuation calls substitute the link.
    params.push(quote! { next_link: Option<String> });
  }
  if method.has_context {
    params.push(quote! { context: Context });
  }

  let return_type = return_tokens(&method.return_shape)?;
  let body = printer::print_body(&method_body::build_body(method, settings))?;

  Ok(quote! {
    #(#doc_attrs)*
    #visibility #asyncness fn #name(#(#params),*) -> #return_type {
      #body
    }
  })
}

fn doc_attrs(method: &ClientMethod) -> Vec<TokenStream> {
  let mut attrs = Vec::new();
  if let Some(description) = &method.description {
    for line in description.lines() {
      let trimmed = line.trim();
      if !trimmed.is_empty() {
        let lit = syn::LitStr::new(trimmed, proc_macro2::Span::call_site());
        attrs.push(quote! { #[doc = #lit] });
      }
    }
  }
  let signature_doc = format!("{} {}", method.proxy.http_method, method.proxy.path);
  let lit = syn::LitStr::new(&signature_doc, proc_macro2::Span::call_site());
  attrs.push(quote! { #[doc = #lit] });
  attrs
}

fn visibility_tokens(visibility: MethodVisibility) -> TokenStream {
  match visibility {
    MethodVisibility::Public => quote! { pub },
    MethodVisibility::Crate | MethodVisibility::NotGenerate => quote! { pub(crate) },
  }
}

fn parameter_tokens(parameter: &ClientMethodParameter) -> anyhow::Result<TokenStream> {
  let name = &parameter.name;
  let ty = parameter.client_type.to_type()?;
  if parameter.required && !parameter.nullable {
    Ok(quote! { #name: #ty })
  } else {
    Ok(quote! { #name: Option<#ty> })
  }
}

fn return_tokens(shape: &ReturnShape) -> anyhow::Result<TokenStream> {
  let rendered = shape.render();
  let ty: syn::Type =
    syn::parse_str(&rendered).map_err(|err| anyhow!("failed to parse return type `{rendered}`: {err}"))?;
  if shape.is_fallible() {
    Ok(quote! { Result<#ty> })
  } else {
    Ok(quote! { #ty })
  }
}
