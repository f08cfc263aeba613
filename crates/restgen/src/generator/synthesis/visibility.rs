//! The single source of truth for API-surface shape.

use super::method::{ClientMethodType, MethodVisibility, OverloadBreadth};

/// Decides the visibility of one overload candidate.
///
/// Pure function of its inputs; identical inputs always produce identical
/// results. Every candidate the engine enumerates passes through here, and
/// `NotGenerate` is the only way a candidate is dropped.
#[must_use]
pub(crate) fn method_visibility(
  kind: ClientMethodType,
  breadth: OverloadBreadth,
  has_context: bool,
  is_protocol: bool,
) -> MethodVisibility {
  // Required-only overloads exist only for caller-facing value shapes, and
  // never with an explicit context.
  if breadth == OverloadBreadth::RequiredOnly && (has_context || !kind.is_convenience()) {
    return MethodVisibility::NotGenerate;
  }

  if is_protocol {
    // Protocol mode exposes only context-bearing resilient shapes; the
    // body-value convenience methods are suppressed entirely.
    if matches!(
      kind,
      ClientMethodType::SimpleAsync
        | ClientMethodType::SimpleSync
        | ClientMethodType::LongRunningAsync
        | ClientMethodType::LongRunningSync
    ) {
      return MethodVisibility::NotGenerate;
    }
    if breadth == OverloadBreadth::RequiredOnly || !has_context {
      return MethodVisibility::NotGenerate;
    }
    return if kind.is_single_page() {
      MethodVisibility::Crate
    } else {
      MethodVisibility::Public
    };
  }

  if kind.is_single_page() {
    // Single-page internals exist to back the pager closures.
    return MethodVisibility::Crate;
  }

  if kind.is_rest_response() {
    return if has_context { MethodVisibility::Public } else { MethodVisibility::Crate };
  }

  MethodVisibility::Public
}
