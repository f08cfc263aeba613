//! Identifier sanitization and casing for generated names.

use std::{
  collections::HashSet,
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

static RESERVED_PASCAL_CASE: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  ["Clone", "Copy", "Display", "Self", "Send", "Sync", "Type", "Vec", "Option", "Result", "Box"]
    .into_iter()
    .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Base sanitization: transliterate to ASCII, replace invalid characters with
/// underscores, collapse runs, trim the ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Converts a raw name into a generated type name (`PascalCase`).
///
/// Empty input becomes `Unnamed`, digit-leading results get a `T` prefix, and
/// names colliding with well-known std items get a raw-identifier prefix.
pub(crate) fn to_type_name(name: &str) -> String {
  let sanitized = sanitize(name);
  if sanitized.is_empty() {
    return "Unnamed".to_string();
  }

  let mut ident = sanitized.to_pascal_case();

  if RESERVED_PASCAL_CASE.contains(ident.as_str()) {
    return format!("r#{ident}");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

/// Converts a raw name into a generated method name (`snake_case`).
pub(crate) fn to_method_name(name: &str) -> String {
  to_snake_ident(name)
}

/// Converts a raw name into a generated field, local, or parameter name.
pub(crate) fn to_field_name(name: &str) -> String {
  to_snake_ident(name)
}

fn to_snake_ident(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if ident == "self" {
    return "self_".to_string();
  }

  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Converts a choice literal into an enum member name.
///
/// The declared member name wins when present; the value text is used
/// otherwise. Negative numeric literals read as `Negative...`.
pub(crate) fn to_member_name(declared: Option<&str>, value: &str) -> String {
  let source = declared.unwrap_or(value);
  let has_leading_minus = source.starts_with('-');
  let trimmed = source.strip_prefix('-').unwrap_or(source);

  let sanitized = sanitize(trimmed);
  if sanitized.is_empty() {
    return "Empty".to_string();
  }

  let mut ident = sanitized.to_pascal_case();
  if has_leading_minus {
    ident = format!("Negative{ident}");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'N');
  }
  ident
}

/// Positional collision suffix for generated member names: the second value
/// normalizing to `base` becomes `base_1`, the third `base_2`, and so on.
pub(crate) fn suffix_member_collision(base: &str, prior_collisions: usize) -> String {
  if prior_collisions == 0 {
    base.to_string()
  } else {
    format!("{base}_{prior_collisions}")
  }
}
