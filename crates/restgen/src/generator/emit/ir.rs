//! Intermediate representation of generated method bodies.
//!
//! The synthesis engine decides *what* a body does; this IR records that
//! decision as data, and the printer decides how it is spelled. Keeping the
//! two apart lets the engine's decisions be asserted on without comparing
//! source text.

use crate::generator::{
  mapper::ClientType,
  tokens::{FieldToken, MethodToken},
};

/// How the context argument reaches a closure or call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextArg {
  /// The caller-supplied `context` parameter.
  Caller,
  /// The no-context sentinel, for overloads without the parameter.
  None,
}

/// A value read at a call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueExpr {
  /// A local or parameter.
  Local(FieldToken),
  /// An accessor on the client object (client-level parameters).
  ClientAccessor(FieldToken),
  /// Pre-rendered literal text.
  Literal(String),
  /// The context argument.
  Context(ContextArg),
  /// An omitted optional.
  NoneValue,
}

/// How the transport invocation binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InvokeBinding {
  /// Await the async proxy method.
  Async,
  /// Call the fully synchronous proxy method.
  Blocking,
  /// Drive the async proxy method to completion from blocking code.
  BlockOn,
}

/// One statement of a generated method body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BodyStmt {
  /// Reject a missing required argument.
  ValidateRequired { parameter: FieldToken },
  /// Bind a literal (constant parameters).
  DeclareLiteral { name: FieldToken, literal: String },
  /// Bind an omitted optional to `None` (required-only overloads).
  DeclareNone { name: FieldToken },
  /// Instantiate an empty default instance of a reassembled parameter.
  DeclareDefault { name: FieldToken, ty: ClientType, mutable: bool },
  /// Read a grouped member off its carrier object.
  ExtractFromGroup {
    name: FieldToken,
    carrier: FieldToken,
    property: FieldToken,
  },
  /// Write a flattened value back onto its reassembled original.
  AssignProperty {
    target: FieldToken,
    property: FieldToken,
    value: FieldToken,
  },
  /// Join a collection into a single delimited string.
  JoinCollection {
    name: FieldToken,
    source: FieldToken,
    delimiter: char,
  },
  /// Base64-encode a byte-array value for a non-body location.
  Base64Encode { name: FieldToken, source: FieldToken },
  /// Invoke the proxy method and bind `response`.
  InvokeProxy {
    method: MethodToken,
    args: Vec<ValueExpr>,
    binding: InvokeBinding,
  },
  /// Unwrap the body out of the response envelope.
  UnwrapBody,
  /// Return the full envelope.
  ReturnResponse,
  /// Return the envelope with deserialized headers attached.
  ReturnResponseWithHeaders { headers_type: ClientType },
  /// Discard the body and return unit.
  ReturnVoid,
  /// Reshape the raw response into a page envelope.
  BuildPageResponse {
    items: FieldToken,
    next_link: Option<FieldToken>,
  },
  /// Construct the lazy pager from first-page/next-page closures.
  BuildPager {
    element: ClientType,
    single_page: MethodToken,
    next_method: Option<MethodToken>,
    args: Vec<ValueExpr>,
    context: ContextArg,
    blocking: bool,
    /// Blocking closures drive the async sibling to completion when no
    /// fully-synchronous sibling is generated.
    block_on: bool,
  },
  /// Construct the cold poller for a long-running operation.
  BuildPoller {
    intermediate: ClientType,
    final_type: ClientType,
    activation: MethodToken,
    args: Vec<ValueExpr>,
    strategy: String,
    interval_secs: u64,
    context: ContextArg,
    blocking: bool,
    block_on: bool,
  },
  /// Delegate to the begin method and await the final result.
  AwaitCompletion {
    begin: MethodToken,
    args: Vec<ValueExpr>,
    blocking: bool,
  },
}

/// A complete method body.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MethodBodyIr {
  pub(crate) statements: Vec<BodyStmt>,
}

impl MethodBodyIr {
  pub(crate) fn push(&mut self, statement: BodyStmt) {
    self.statements.push(statement);
  }

  /// True when any statement performs the given structural role; used by
  /// tests to assert synthesis decisions without string comparison.
  pub(crate) fn contains(&self, predicate: impl Fn(&BodyStmt) -> bool) -> bool {
    self.statements.iter().any(predicate)
  }
}
