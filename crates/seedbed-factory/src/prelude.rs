//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use seedbed_factory::prelude::*;
//! ```

// Error types
pub use crate::error::{BoxError, FactoryError, FactoryResult};

// Engine and definitions
pub use crate::config::EngineConfig;
pub use crate::definition::{Attributes, CallbackOutcome, Definition};
pub use crate::engine::FactoryEngine;
pub use crate::lifecycle::{Membership, ObjectId};

// Models
pub use crate::model::{Model, Persistable};

// Generators
pub use crate::generator::{Generator, GeneratorCall, GeneratorContext, GeneratorSpec};

// Definition files
pub use crate::loader::DefinitionLoader;

// Re-export the Model derive macro when available
#[cfg(feature = "macros")]
pub use seedbed_factory_macros::Model;
