pub mod generator;

pub use generator::{
  codemodel,
  metrics::{GenerationStats, GenerationWarning},
  orchestrator::Orchestrator,
  settings,
};
