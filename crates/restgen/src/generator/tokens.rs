//! Interned name tokens for generated identifiers.

use std::fmt::{Display, Formatter};

use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use string_cache::DefaultAtom;
use syn::Ident;

macro_rules! name_token {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $name(DefaultAtom);

    impl $name {
      #[must_use]
      pub fn new(value: impl AsRef<str>) -> Self {
        Self(DefaultAtom::from(value.as_ref()))
      }

      #[must_use]
      pub fn as_str(&self) -> &str {
        &self.0
      }
    }

    impl From<&str> for $name {
      fn from(value: &str) -> Self {
        Self::new(value)
      }
    }

    impl From<String> for $name {
      fn from(value: String) -> Self {
        Self::new(value)
      }
    }

    impl Display for $name {
      fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
      }
    }

    impl ToTokens for $name {
      fn to_tokens(&self, tokens: &mut TokenStream) {
        // Raw identifiers arrive pre-escaped from the naming layer.
        let ident = if let Some(raw) = self.0.strip_prefix("r#") {
          Ident::new_raw(raw, Span::call_site())
        } else {
          Ident::new(&self.0, Span::call_site())
        };
        ident.to_tokens(tokens);
      }
    }

    impl PartialEq<&str> for $name {
      fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
      }
    }
  };
}

name_token! {
  /// A generated type name (`PascalCase`).
  TypeToken
}

name_token! {
  /// A generated method name (`snake_case`).
  MethodToken
}

name_token! {
  /// A generated field, local, or parameter name (`snake_case`).
  FieldToken
}

name_token! {
  /// A generated enum member name (`PascalCase`, collision-suffixed).
  MemberToken
}
