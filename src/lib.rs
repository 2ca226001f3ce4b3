//! # Seedbed
//!
//! Model factories for test fixtures.
//!
//! Seedbed builds test objects from named definitions, persists them through
//! their own save capability, and tears every saved object down again once
//! a test is finished.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `json` - JSON definition files
//! - `yaml` - YAML definition files
//! - `macros` - `#[derive(Model)]`
//! - `faker` - Fake data generator kinds
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use seedbed::prelude::*;
//!
//! #[derive(Debug, Default, Model)]
//! struct Article {
//!     id: u64,
//!     title: String,
//!     published: bool,
//! }
//!
//! impl Persistable for Article {
//!     fn save(&mut self) -> Result<bool, BoxError> { Ok(true) }
//!     fn delete(&mut self) -> Result<bool, BoxError> { Ok(true) }
//! }
//!
//! let mut engine = FactoryEngine::new();
//! engine.register_persistable::<Article>("Article");
//! engine.define(
//!     "Article",
//!     Attributes::new()
//!         .with("id", "sequence")
//!         .with("title", "sentence:3,6")
//!         .with("published", "boolean:80"),
//! );
//!
//! let articles = engine.seed(10, "Article")?;
//! engine.delete_saved()?;
//! ```

pub mod factory;

pub use factory::{
	Attributes, BoxError, Definition, EngineConfig, FactoryEngine, FactoryError, FactoryResult,
	GeneratorSpec, Model, ObjectId, Persistable,
};

pub mod prelude {
	pub use seedbed_factory::prelude::*;
}
