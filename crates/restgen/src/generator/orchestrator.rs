//! Orchestration of the code-model to client-library pipeline.
//!
//! The orchestrator owns the session: one mapper registry, one synthesis
//! engine, one assembler, one emission pass. Per-operation failures are
//! collected as warnings and the affected operation is skipped; everything
//! else aborts generation.

use std::rc::Rc;

use anyhow::Context as _;

use crate::generator::{
  assembler::ServiceClientAssembler,
  codemodel::CodeModel,
  emit,
  mapper::TypeMapperRegistry,
  metrics::{GenerationStats, GenerationWarning},
  settings::GenerationSettings,
  synthesis::{ClientMethod, ClientMethodSynthesizer},
};

/// High-level facade over the generation pipeline.
pub struct Orchestrator {
  model: Rc<CodeModel>,
  settings: Rc<GenerationSettings>,
}

impl Orchestrator {
  #[must_use]
  pub fn new(model: CodeModel, settings: GenerationSettings) -> Self {
    Self {
      model: Rc::new(model),
      settings: Rc::new(settings),
    }
  }

  /// Runs the complete pipeline and returns formatted source plus run
  /// statistics.
  ///
  /// # Errors
  ///
  /// Returns an error when emission produces unparseable code or the
  /// assembled client cannot be built; schema errors on individual
  /// operations are downgraded to warnings and skip only that operation.
  pub fn generate(&self) -> anyhow::Result<(String, GenerationStats)> {
    let mut stats = GenerationStats::default();

    let registry = Rc::new(TypeMapperRegistry::new(Rc::clone(&self.model.store)));
    self.warm_registry(&registry, &mut stats);

    let synthesizer =
      ClientMethodSynthesizer::new(Rc::clone(&self.model), Rc::clone(&registry), Rc::clone(&self.settings));

    let mut groups: Vec<(String, Vec<ClientMethod>)> = Vec::new();
    for group in &self.model.groups {
      let mut methods = Vec::new();
      for operation in &group.operations {
        match synthesizer.synthesize(operation) {
          Ok(synthesized) => {
            stats.record_operation(&synthesized);
            methods.extend(synthesized.iter().cloned());
          }
          Err(error) => {
            stats.record_skipped_operation(GenerationWarning::OperationSkipped {
              operation: operation.identity(),
              error: format!("{error:#}"),
            });
          }
        }
      }
      groups.push((group.name.clone(), methods));
    }

    let assembler = ServiceClientAssembler::new(Rc::clone(&self.model), Rc::clone(&registry), Rc::clone(&self.settings));
    let service = assembler.assemble(groups).context("assembling service client")?;

    let tokens = emit::client::service_tokens(&service, &self.settings).context("emitting client source")?;
    let syntax_tree = syn::parse2(tokens).context("parsing emitted client source")?;
    let formatted = prettyplease::unparse(&syntax_tree);

    Ok((formatted, stats))
  }

  /// Generates with the auto-generated file banner prepended.
  ///
  /// # Errors
  ///
  /// Returns the same errors as [`Orchestrator::generate`].
  pub fn generate_with_header(&self, source: &str) -> anyhow::Result<(String, GenerationStats)> {
    let (code, stats) = self.generate()?;

    let description = self
      .model
      .description
      .as_deref()
      .map(|text| text.replace('\n', "\n//! "))
      .unwrap_or_else(|| String::from("No description provided"));

    let final_code = format!(
      "//! AUTO-GENERATED CODE - DO NOT EDIT!\n//!\n//! {}\n//! Source: {}\n//! Generated by `restgen`\n//!\n//! {}\n\n{}",
      self.model.service_name, source, description, code
    );

    Ok((final_code, stats))
  }

  /// Maps every named schema up front so model mapping failures surface as
  /// warnings instead of failing the first operation that touches them.
  fn warm_registry(&self, registry: &Rc<TypeMapperRegistry>, stats: &mut GenerationStats) {
    let mut mapped = 0usize;
    for (id, schema) in self.model.store.iter_named() {
      match registry.map(id) {
        Ok(_) => mapped += 1,
        Err(error) => stats.record_warning(GenerationWarning::SchemaMappingFailed {
          schema_name: schema.name().unwrap_or("<unnamed>").to_string(),
          error: format!("{error:#}"),
        }),
      }
    }
    stats.record_types_mapped(mapped);
  }
}
