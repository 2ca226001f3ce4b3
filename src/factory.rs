//! Factory engine module.
//!
//! # Examples
//!
//! ```rust,no_run
//! use seedbed::factory::{Attributes, FactoryEngine};
//!
//! let mut engine = FactoryEngine::new();
//! engine.define("User", Attributes::new().with("email", "safe_email"));
//! ```

pub use seedbed_factory::*;
