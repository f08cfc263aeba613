//! External configuration surface consumed by the synthesis engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key of the fallback entry in [`GenerationSettings::polling_config`].
pub const DEFAULT_POLLING_KEY: &str = "default";

/// Which blocking overloads are emitted alongside the async surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SyncMethodsGeneration {
  /// No blocking overloads at all.
  None,
  /// Every async kind gets a blocking sibling, internals included.
  All,
  /// Blocking convenience overloads only; internal rest-response and
  /// single-page shapes stay async-only.
  #[default]
  Essential,
}

/// Credential kinds a client constructor can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialType {
  #[strum(to_string = "TokenCredential")]
  Token,
  #[strum(to_string = "KeyCredential")]
  Key,
}

/// Static per-operation polling override, keyed by operation identity in
/// [`GenerationSettings::polling_config`] with a `"default"` fallback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[builder(on(String, into))]
pub struct PollingSettings {
  /// Named polling strategy token (e.g. `"default"`, `"operation-location"`).
  pub strategy: String,
  /// Fully-named intermediate result type override.
  pub intermediate_type: Option<String>,
  /// Fully-named final result type override.
  pub final_type: Option<String>,
  #[serde(default = "PollingSettings::default_interval")]
  #[builder(default = PollingSettings::default_interval())]
  pub poll_interval_secs: u64,
}

impl PollingSettings {
  fn default_interval() -> u64 {
    1
  }
}

/// Generation-session settings.
///
/// All fields are plain data resolved before synthesis starts; the engine
/// treats them as immutable for the life of the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationSettings {
  /// Protocol-method mode: expose resilient, loosely-typed shapes instead of
  /// strongly-typed convenience methods.
  #[serde(default)]
  #[builder(default)]
  pub is_data_plane_client: bool,
  /// Management-plane naming and polling conventions.
  #[serde(default)]
  #[builder(default)]
  pub is_fluent: bool,
  #[serde(default)]
  #[builder(default)]
  pub sync_methods_generation: SyncMethodsGeneration,
  /// Fully synchronous transport path instead of block-on-async.
  #[serde(default)]
  #[builder(default)]
  pub is_sync_stack_enabled: bool,
  /// Emit required-parameters-only overloads for operations with optional
  /// parameters.
  #[serde(default = "GenerationSettings::default_required_overloads")]
  #[builder(default = true)]
  pub required_parameter_client_methods: bool,
  /// Per-operation-identity polling overrides; `"default"` applies to any
  /// long-running operation without an exact entry.
  #[serde(default)]
  #[builder(default)]
  pub polling_config: IndexMap<String, PollingSettings>,
  /// Overrides the schema-declared security scheme when non-empty.
  #[serde(default)]
  #[builder(default)]
  pub credential_types: Vec<CredentialType>,
  #[serde(default)]
  #[builder(default)]
  pub credential_scopes: Vec<String>,
}

impl GenerationSettings {
  fn default_required_overloads() -> bool {
    true
  }

  /// Resolves the static polling override for one operation identity,
  /// falling back to the `"default"` entry.
  #[must_use]
  pub fn polling_for(&self, operation_identity: &str) -> Option<&PollingSettings> {
    self
      .polling_config
      .get(operation_identity)
      .or_else(|| self.polling_config.get(DEFAULT_POLLING_KEY))
  }
}
