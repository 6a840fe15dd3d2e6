//! Configuration and invocation of the external coreference trainer.

pub mod config;
pub mod runner;

pub use config::TrainingConfig;
pub use runner::TrainerInvocation;
