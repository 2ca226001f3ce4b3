//! The factory engine.
//!
//! [`FactoryEngine`] owns the definition registry, the model type registry,
//! the generator registry and the pending/saved lifecycle. It builds objects
//! from definitions, persists them through their [`Persistable`] capability
//! and tears every saved object down again with [`FactoryEngine::delete_saved`].
//!
//! # Example
//!
//! ```ignore
//! let mut engine = FactoryEngine::new();
//! engine.register_persistable::<User>("User");
//! engine.define(
//!     "User",
//!     Attributes::new()
//!         .with("username", "username")
//!         .with("email", "safe_email"),
//! );
//!
//! let user = engine.create("User")?;
//! assert!(engine.is_saved(user));
//!
//! engine.delete_saved()?;
//! ```

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::EngineConfig;
use crate::definition::{Attributes, CallbackOutcome, Definition};
use crate::error::{FactoryError, FactoryResult};
use crate::generator::{self, GeneratorContext, GeneratorRegistry, GeneratorSpec};
use crate::lifecycle::{Entry, Lifecycle, Membership, ObjectId};
use crate::model::{Model, ModelEntry, ModelRegistry, Persistable};

/// Builds, persists and tracks model instances.
pub struct FactoryEngine {
	config: EngineConfig,
	definitions: HashMap<String, Arc<Definition>>,
	models: ModelRegistry,
	generators: GeneratorRegistry,
	lifecycle: Lifecycle,
}

impl FactoryEngine {
	/// Creates an engine with the default configuration.
	pub fn new() -> Self {
		Self::with_config(EngineConfig::default())
	}

	/// Creates an engine with the given configuration.
	pub fn with_config(config: EngineConfig) -> Self {
		let mut generators = GeneratorRegistry::new();
		if config.default_generators {
			generators.register_defaults(config.sequence_start);
		}
		Self {
			config,
			definitions: HashMap::new(),
			models: ModelRegistry::new(),
			generators,
			lifecycle: Lifecycle::default(),
		}
	}

	/// Returns the engine configuration.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Registers a model type that can only be built with `instance`.
	pub fn register_model<T: Model + Default>(&mut self, name: impl Into<String>) {
		self.models.register::<T>(name);
	}

	/// Registers a model type with its save/delete capability.
	pub fn register_persistable<T: Persistable + Default>(&mut self, name: impl Into<String>) {
		self.models.register_persistable::<T>(name);
	}

	/// The model type registry.
	pub fn models(&self) -> &ModelRegistry {
		&self.models
	}

	/// The model type registry, mutably.
	pub fn models_mut(&mut self) -> &mut ModelRegistry {
		&mut self.models
	}

	/// The generator registry.
	pub fn generators(&self) -> &GeneratorRegistry {
		&self.generators
	}

	/// The generator registry, mutably.
	pub fn generators_mut(&mut self) -> &mut GeneratorRegistry {
		&mut self.generators
	}

	/// Defines how to build `name`.
	///
	/// `name` is a model type, or `group:Model` for a variant whose attributes
	/// are merged over the definition of `Model`. A later definition with the
	/// same name replaces the earlier one.
	pub fn define(&mut self, name: impl Into<String>, attributes: Attributes) {
		self.register(Definition::new(name, attributes));
	}

	/// Defines `name` with a post-build callback.
	///
	/// The callback receives the built object and whether it is already
	/// pending or saved. Unless it returns [`CallbackOutcome::Done`] (or
	/// `false`), `create` saves the object a second time.
	pub fn define_with_callback<F, R>(
		&mut self,
		name: impl Into<String>,
		attributes: Attributes,
		callback: F,
	) where
		F: Fn(&mut dyn Model, bool) -> R + Send + Sync + 'static,
		R: Into<CallbackOutcome>,
	{
		self.register(Definition::new(name, attributes).with_callback(callback));
	}

	/// Registers a prepared definition, replacing any with the same name.
	pub fn register(&mut self, definition: Definition) {
		tracing::debug!(
			definition = definition.name(),
			model = definition.model_type(),
			attributes = definition.attributes().len(),
			"defined factory"
		);
		self.definitions
			.insert(definition.name().to_string(), Arc::new(definition));
	}

	/// Gets a definition by name.
	pub fn definition(&self, name: &str) -> Option<&Definition> {
		self.definitions.get(name).map(Arc::as_ref)
	}

	/// Checks if a definition is registered.
	pub fn has_definition(&self, name: &str) -> bool {
		self.definitions.contains_key(name)
	}

	/// Returns all registered definition names.
	pub fn definition_names(&self) -> Vec<String> {
		self.definitions.keys().cloned().collect()
	}

	/// Builds an object without persisting or tracking it.
	///
	/// The definition callback runs with `saved == false`; its outcome is
	/// ignored.
	///
	/// # Errors
	///
	/// [`FactoryError::NoDefinedFactory`] if `name` was never defined,
	/// [`FactoryError::ModelNotFound`] if its type is not registered, or any
	/// generator error.
	pub fn instance(&mut self, name: &str) -> FactoryResult<Box<dyn Model>> {
		self.make_instance(name, None)
	}

	/// Like [`instance`](Self::instance), with attribute overrides.
	pub fn instance_with(
		&mut self,
		name: &str,
		overrides: Attributes,
	) -> FactoryResult<Box<dyn Model>> {
		self.make_instance(name, Some(&overrides))
	}

	/// Builds an untracked object and downcasts it to `T`.
	pub fn instance_as<T: Model>(&mut self, name: &str) -> FactoryResult<T> {
		let object = self.make_instance(name, None)?;
		downcast(object, name)
	}

	/// Like [`instance_as`](Self::instance_as), with attribute overrides.
	pub fn instance_as_with<T: Model>(
		&mut self,
		name: &str,
		overrides: Attributes,
	) -> FactoryResult<T> {
		let object = self.make_instance(name, Some(&overrides))?;
		downcast(object, name)
	}

	/// Builds, persists and tracks an object.
	///
	/// The object is registered as pending before its attributes are
	/// generated and moves to the saved set once its save succeeds. If the
	/// definition has a callback, it runs afterwards and the object is saved
	/// again unless the callback returns [`CallbackOutcome::Done`].
	///
	/// # Errors
	///
	/// - [`FactoryError::NoDefinedFactory`] / [`FactoryError::ModelNotFound`]
	/// - [`FactoryError::SaveMethodNotFound`] if the type was registered
	///   without persistence; nothing is built in that case
	/// - [`FactoryError::SaveFailed`] / [`FactoryError::SaveError`] if saving
	///   fails; the object stays pending
	pub fn create(&mut self, name: &str) -> FactoryResult<ObjectId> {
		self.make_saved(name, None)
	}

	/// Like [`create`](Self::create), with attribute overrides.
	pub fn create_with(&mut self, name: &str, overrides: Attributes) -> FactoryResult<ObjectId> {
		self.make_saved(name, Some(&overrides))
	}

	/// Calls [`create`](Self::create) `times` times.
	///
	/// Not atomic: on failure, objects created by earlier iterations stay
	/// tracked.
	pub fn seed(&mut self, times: usize, name: &str) -> FactoryResult<Vec<ObjectId>> {
		(0..times).map(|_| self.make_saved(name, None)).collect()
	}

	/// Like [`seed`](Self::seed), with attribute overrides for every object.
	pub fn seed_with(
		&mut self,
		times: usize,
		name: &str,
		overrides: Attributes,
	) -> FactoryResult<Vec<ObjectId>> {
		(0..times)
			.map(|_| self.make_saved(name, Some(&overrides)))
			.collect()
	}

	/// Objects created but not yet saved, oldest first.
	pub fn pending(&self) -> Vec<ObjectId> {
		self.lifecycle.pending().to_vec()
	}

	/// Saved objects, in the order they were saved.
	pub fn saved(&self) -> Vec<ObjectId> {
		self.lifecycle.saved().to_vec()
	}

	/// Returns true if the object is pending.
	pub fn is_pending(&self, id: ObjectId) -> bool {
		self.lifecycle.membership(id) == Some(Membership::Pending)
	}

	/// Returns true if the object is saved.
	pub fn is_saved(&self, id: ObjectId) -> bool {
		self.lifecycle.membership(id) == Some(Membership::Saved)
	}

	/// Returns true if the object is pending or saved.
	pub fn is_pending_or_saved(&self, id: ObjectId) -> bool {
		self.lifecycle.membership(id).is_some()
	}

	/// Gets a tracked object.
	pub fn get(&self, id: ObjectId) -> Option<&dyn Model> {
		self.lifecycle.get(id)
	}

	/// Gets a tracked object mutably.
	pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn Model> {
		self.lifecycle.get_mut(id)
	}

	/// Gets a tracked object as its concrete type.
	pub fn get_as<T: Model>(&self, id: ObjectId) -> Option<&T> {
		self.get(id)?.downcast_ref::<T>()
	}

	/// Gets a tracked object as its concrete type, mutably.
	pub fn get_as_mut<T: Model>(&mut self, id: ObjectId) -> Option<&mut T> {
		self.get_mut(id)?.downcast_mut::<T>()
	}

	/// Definition name a tracked object was built from.
	pub fn model_of(&self, id: ObjectId) -> Option<&str> {
		self.lifecycle.model(id)
	}

	/// Deletes every saved object, most recently saved first.
	///
	/// Every object is attempted even if earlier deletions fail. The saved
	/// set is empty afterwards; pending objects are left alone.
	///
	/// # Errors
	///
	/// [`FactoryError::DeletingFailed`] with one entry per object whose
	/// delete reported failure, returned an error, or was unavailable.
	pub fn delete_saved(&mut self) -> FactoryResult<()> {
		let mut errors = Vec::new();
		while let Some((id, mut entry)) = self.lifecycle.pop_saved() {
			match delete_entry(&mut entry) {
				Ok(()) => tracing::debug!(%id, model = %entry.model, "deleted saved model"),
				Err(error) => {
					tracing::warn!(%id, model = %entry.model, %error, "failed to delete saved model");
					errors.push(error);
				}
			}
		}

		if errors.is_empty() {
			Ok(())
		} else {
			Err(FactoryError::DeletingFailed(errors))
		}
	}

	/// Forgets every tracked object without deleting it.
	pub fn forget_tracked(&mut self) {
		self.lifecycle.clear();
	}

	/// Resolves a generator spec against `object`.
	pub fn generate(&mut self, spec: &GeneratorSpec, object: &dyn Model) -> FactoryResult<Value> {
		let mut ctx = GeneratorContext::new(self, object, "", "", None);
		generator::dispatch(spec, &mut ctx)
	}

	fn lookup(&self, name: &str) -> FactoryResult<Arc<Definition>> {
		self.definitions
			.get(name)
			.cloned()
			.ok_or_else(|| FactoryError::NoDefinedFactory(name.to_string()))
	}

	fn model_entry(&self, definition: &Definition) -> FactoryResult<ModelEntry> {
		self.models
			.entry(definition.model_type())
			.ok_or_else(|| FactoryError::ModelNotFound(definition.model_type().to_string()))
	}

	fn make_instance(
		&mut self,
		name: &str,
		overrides: Option<&Attributes>,
	) -> FactoryResult<Box<dyn Model>> {
		let definition = self.lookup(name)?;
		let mut object = self.model_entry(&definition)?.construct();
		self.generate_attributes(&definition, overrides, object.as_mut(), None)?;
		run_callback(&definition, object.as_mut(), false);
		Ok(object)
	}

	fn make_saved(&mut self, name: &str, overrides: Option<&Attributes>) -> FactoryResult<ObjectId> {
		let definition = self.lookup(name)?;
		let model = self.model_entry(&definition)?;
		if model.persist.is_none() {
			return Err(FactoryError::SaveMethodNotFound(
				definition.model_type().to_string(),
			));
		}

		let mut object = model.construct();
		let id = self.lifecycle.register_pending(definition.name(), model.persist);
		tracing::debug!(%id, definition = definition.name(), "registered pending model");

		let generated = self.generate_attributes(&definition, overrides, object.as_mut(), Some(id));
		// a partially built object stays pending
		self.lifecycle.attach(id, object);
		generated?;

		self.persist(id)?;

		let saved = self.is_pending_or_saved(id);
		let outcome = self
			.lifecycle
			.get_mut(id)
			.and_then(|object| run_callback(&definition, object, saved));
		if outcome == Some(CallbackOutcome::Save) {
			self.persist(id)?;
		}

		Ok(id)
	}

	fn generate_attributes(
		&mut self,
		definition: &Definition,
		overrides: Option<&Attributes>,
		object: &mut dyn Model,
		id: Option<ObjectId>,
	) -> FactoryResult<()> {
		let attributes = self.resolve_attributes(definition, overrides)?;
		for (attribute, spec) in attributes.iter() {
			let value = {
				let mut ctx = GeneratorContext::new(self, &*object, definition.name(), attribute, id);
				generator::dispatch(spec, &mut ctx)?
			};
			object.set_attribute(attribute, value)?;
		}
		Ok(())
	}

	fn resolve_attributes(
		&self,
		definition: &Definition,
		overrides: Option<&Attributes>,
	) -> FactoryResult<Attributes> {
		let attributes = match definition.group() {
			Some(_) => {
				let base = self.lookup(definition.model_type())?;
				base.attributes().merged(definition.attributes())
			}
			None => definition.attributes().clone(),
		};

		Ok(match overrides {
			Some(overrides) => attributes.merged(overrides),
			None => attributes,
		})
	}

	fn persist(&mut self, id: ObjectId) -> FactoryResult<()> {
		let entry = self
			.lifecycle
			.entry_mut(id)
			.ok_or_else(|| FactoryError::ModelNotFound(id.to_string()))?;
		let model = entry.model.clone();
		let persistable = entry
			.persistable()
			.ok_or_else(|| FactoryError::SaveMethodNotFound(model.clone()))?;

		match persistable.save() {
			Ok(true) => {}
			Ok(false) => {
				let errors = persistable.validation_errors().filter(is_truthy);
				tracing::debug!(%id, model = %model, "save reported failure");
				return Err(FactoryError::SaveFailed { model, errors });
			}
			Err(source) => return Err(FactoryError::SaveError { model, source }),
		}

		if self.lifecycle.mark_saved(id) {
			tracing::debug!(%id, model = %model, "saved model");
		}
		Ok(())
	}
}

impl Default for FactoryEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for FactoryEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryEngine")
			.field("config", &self.config)
			.field("definitions", &self.definitions.len())
			.field("models", &self.models)
			.field("generators", &self.generators)
			.field("pending", &self.lifecycle.pending())
			.field("saved", &self.lifecycle.saved())
			.finish()
	}
}

fn run_callback(
	definition: &Definition,
	object: &mut dyn Model,
	saved: bool,
) -> Option<CallbackOutcome> {
	definition.callback().map(|callback| callback(object, saved))
}

fn delete_entry(entry: &mut Entry) -> FactoryResult<()> {
	let model = entry.model.clone();
	let persistable = entry
		.persistable()
		.ok_or_else(|| FactoryError::DeleteMethodNotFound(model.clone()))?;

	match persistable.delete() {
		Ok(true) => Ok(()),
		Ok(false) => Err(FactoryError::DeleteFailed(model)),
		Err(source) => Err(FactoryError::DeleteError { model, source }),
	}
}

fn downcast<T: Model>(object: Box<dyn Model>, model: &str) -> FactoryResult<T> {
	let object: Box<dyn Any> = object;
	object
		.downcast::<T>()
		.map(|object| *object)
		.map_err(|_| FactoryError::TypeMismatch {
			expected: type_name::<T>(),
			model: model.to_string(),
		})
}

/// Validation payloads that are null, false, zero or empty are not reported.
fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64() != Some(0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(fields) => !fields.is_empty(),
	}
}
