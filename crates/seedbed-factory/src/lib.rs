//! Model factories with pending/saved lifecycle tracking for test fixtures.
//!
//! This crate builds test objects from named definitions:
//!
//! - **Definitions**: an ordered map of attribute name to generator spec,
//!   optionally grouped as `group:Model` variants of a base definition
//! - **Generators**: literal values, closures, or registered kinds such as
//!   `"safe_email"`, `"sequence:user_{n}"` or `"factory:Company"`
//! - **Lifecycle**: every created object is pending until its save succeeds,
//!   and [`FactoryEngine::delete_saved`] removes all saved objects again,
//!   reporting every failure at once
//!
//! # Features
//!
//! - `json` - JSON definition files (enabled by default)
//! - `yaml` - YAML definition files (enabled by default)
//! - `macros` - `#[derive(Model)]` (enabled by default)
//! - `faker` - fake data generator kinds (enabled by default)
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```ignore
//! use seedbed_factory::prelude::*;
//!
//! #[derive(Debug, Default, Model)]
//! pub struct User {
//!     pub id: u64,
//!     pub username: String,
//!     pub email: String,
//!     pub active: bool,
//! }
//!
//! impl Persistable for User {
//!     fn save(&mut self) -> Result<bool, BoxError> {
//!         // insert the row
//!         Ok(true)
//!     }
//!
//!     fn delete(&mut self) -> Result<bool, BoxError> {
//!         Ok(true)
//!     }
//! }
//!
//! let mut engine = FactoryEngine::new();
//! engine.register_persistable::<User>("User");
//! engine.define(
//!     "User",
//!     Attributes::new()
//!         .with("id", "sequence")
//!         .with("username", "sequence:user_{n}")
//!         .with("email", "safe_email")
//!         .with("active", GeneratorSpec::literal(true)),
//! );
//! engine.define("inactive:User", Attributes::new().with("active", GeneratorSpec::literal(false)));
//!
//! let user = engine.create("User")?;
//! let inactive = engine.create("inactive:User")?;
//! assert!(engine.is_saved(user) && engine.is_saved(inactive));
//!
//! engine.delete_saved()?;
//! ```
//!
//! # Architecture
//!
//! - [`FactoryEngine`] - definition registry, generator dispatch and lifecycle
//! - [`Definition`] / [`Attributes`] - blueprints for building objects
//! - [`Model`] / [`Persistable`] - capabilities of built objects
//! - [`GeneratorRegistry`] / [`Generator`] - attribute value producers
//! - [`DefinitionLoader`] - definitions from JSON/YAML files
//! - [`facade`] - a process-wide engine behind a mutex

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Lets `#[derive(Model)]` refer to this crate from its own tests.
extern crate self as seedbed_factory;

pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod facade;
pub mod generator;
pub mod lifecycle;
pub mod loader;
pub mod model;
pub mod prelude;

// Re-export commonly used types at crate root
pub use config::EngineConfig;
pub use definition::{Attributes, Callback, CallbackOutcome, Definition};
pub use engine::FactoryEngine;
pub use error::{BoxError, FactoryError, FactoryResult};
pub use generator::{Generator, GeneratorCall, GeneratorContext, GeneratorRegistry, GeneratorSpec};
pub use lifecycle::{Membership, ObjectId};
pub use loader::{DefinitionFormat, DefinitionLoader, DefinitionRecord};
pub use model::{Model, ModelRegistry, Persistable};

// Re-export derive macro when available
#[cfg(feature = "macros")]
pub use seedbed_factory_macros::Model;

#[doc(hidden)]
pub mod __private {
	pub use serde_json;
}
