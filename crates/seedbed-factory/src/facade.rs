//! Process-wide engine.
//!
//! These functions operate on one shared [`FactoryEngine`] guarded by a
//! mutex. Every call holds the lock for its full duration, so a generator or
//! callback that calls back into this module deadlocks; generators reach the
//! engine through [`GeneratorContext::engine`](crate::GeneratorContext::engine)
//! instead.
//!
//! # Example
//!
//! ```ignore
//! use seedbed_factory::facade;
//!
//! facade::register_persistable::<User>("User");
//! facade::define("User", Attributes::new().with("email", "safe_email"));
//!
//! let users = facade::seed(3, "User")?;
//! facade::delete_saved()?;
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::definition::{Attributes, CallbackOutcome};
use crate::engine::FactoryEngine;
use crate::error::FactoryResult;
use crate::lifecycle::ObjectId;
use crate::loader::DefinitionLoader;
use crate::model::{Model, Persistable};

static ENGINE: Lazy<Mutex<FactoryEngine>> = Lazy::new(|| Mutex::new(FactoryEngine::new()));

/// Runs `f` with exclusive access to the shared engine.
pub fn with_engine<R>(f: impl FnOnce(&mut FactoryEngine) -> R) -> R {
	f(&mut ENGINE.lock())
}

/// Replaces the shared engine with a fresh one using `config`.
///
/// Tracked objects are forgotten without being deleted.
pub fn reset(config: EngineConfig) {
	*ENGINE.lock() = FactoryEngine::with_config(config);
}

/// See [`FactoryEngine::register_model`].
pub fn register_model<T: Model + Default>(name: impl Into<String>) {
	with_engine(|engine| engine.register_model::<T>(name));
}

/// See [`FactoryEngine::register_persistable`].
pub fn register_persistable<T: Persistable + Default>(name: impl Into<String>) {
	with_engine(|engine| engine.register_persistable::<T>(name));
}

/// See [`FactoryEngine::define`].
pub fn define(name: impl Into<String>, attributes: Attributes) {
	with_engine(|engine| engine.define(name, attributes));
}

/// See [`FactoryEngine::define_with_callback`].
pub fn define_with_callback<F, R>(name: impl Into<String>, attributes: Attributes, callback: F)
where
	F: Fn(&mut dyn Model, bool) -> R + Send + Sync + 'static,
	R: Into<CallbackOutcome>,
{
	with_engine(|engine| engine.define_with_callback(name, attributes, callback));
}

/// See [`FactoryEngine::create`].
pub fn create(name: &str) -> FactoryResult<ObjectId> {
	with_engine(|engine| engine.create(name))
}

/// See [`FactoryEngine::create_with`].
pub fn create_with(name: &str, overrides: Attributes) -> FactoryResult<ObjectId> {
	with_engine(|engine| engine.create_with(name, overrides))
}

/// See [`FactoryEngine::instance_as`].
pub fn instance<T: Model>(name: &str) -> FactoryResult<T> {
	with_engine(|engine| engine.instance_as::<T>(name))
}

/// See [`FactoryEngine::instance_as_with`].
pub fn instance_with<T: Model>(name: &str, overrides: Attributes) -> FactoryResult<T> {
	with_engine(|engine| engine.instance_as_with::<T>(name, overrides))
}

/// See [`FactoryEngine::seed`].
pub fn seed(times: usize, name: &str) -> FactoryResult<Vec<ObjectId>> {
	with_engine(|engine| engine.seed(times, name))
}

/// See [`FactoryEngine::delete_saved`].
pub fn delete_saved() -> FactoryResult<()> {
	with_engine(FactoryEngine::delete_saved)
}

/// See [`FactoryEngine::pending`].
pub fn pending() -> Vec<ObjectId> {
	with_engine(|engine| engine.pending())
}

/// See [`FactoryEngine::saved`].
pub fn saved() -> Vec<ObjectId> {
	with_engine(|engine| engine.saved())
}

/// See [`FactoryEngine::is_pending`].
pub fn is_pending(id: ObjectId) -> bool {
	with_engine(|engine| engine.is_pending(id))
}

/// See [`FactoryEngine::is_saved`].
pub fn is_saved(id: ObjectId) -> bool {
	with_engine(|engine| engine.is_saved(id))
}

/// See [`FactoryEngine::is_pending_or_saved`].
pub fn is_pending_or_saved(id: ObjectId) -> bool {
	with_engine(|engine| engine.is_pending_or_saved(id))
}

/// Loads definition files into the shared engine.
///
/// See [`DefinitionLoader::load`].
pub fn load_definitions<P: AsRef<Path>>(paths: &[P]) -> FactoryResult<usize> {
	with_engine(|engine| DefinitionLoader::new().load(engine, paths))
}
