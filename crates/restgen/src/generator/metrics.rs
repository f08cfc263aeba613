use strum::Display;

use crate::generator::synthesis::ClientMethod;

/// Statistics about one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_mapped: usize,
  pub operations_converted: usize,
  pub operations_skipped: usize,
  pub client_methods_generated: usize,
  pub paging_methods_generated: usize,
  pub long_running_methods_generated: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_types_mapped(&mut self, count: usize) {
    self.types_mapped += count;
  }

  pub(crate) fn record_operation(&mut self, methods: &[ClientMethod]) {
    self.operations_converted += 1;
    self.client_methods_generated += methods.len();
    for method in methods {
      if method.method_type.is_paging() {
        self.paging_methods_generated += 1;
      }
      if method.method_type.is_long_running() {
        self.long_running_methods_generated += 1;
      }
    }
  }

  pub fn record_skipped_operation(&mut self, warning: GenerationWarning) {
    self.operations_skipped += 1;
    self.warnings.push(warning);
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }
}

/// Non-fatal findings surfaced to the caller alongside the generated code.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Failed to map schema '{schema_name}': {error}")]
  SchemaMappingFailed { schema_name: String, error: String },
  #[strum(to_string = "Skipped operation '{operation}': {error}")]
  OperationSkipped { operation: String, error: String },
  #[strum(to_string = "[{operation}] {message}")]
  OperationSpecific { operation: String, message: String },
}

impl GenerationWarning {
  #[must_use]
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::OperationSkipped { .. })
  }
}
