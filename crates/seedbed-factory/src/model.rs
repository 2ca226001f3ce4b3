//! Model capabilities and the type registry.
//!
//! The engine treats built objects as opaque [`Model`] trait objects. A model
//! only has to expose named attribute access; persistence is an additional
//! [`Persistable`] capability that is captured when the type is registered,
//! so a type without it is rejected by `create` before anything is built.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::{BoxError, FactoryResult};

/// Named attribute access on a built object.
///
/// Usually derived with `#[derive(Model)]`, which maps every named field to
/// an attribute through serde.
pub trait Model: Any + Send + 'static {
	/// Assigns a generated value to the named attribute.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::AttributeNotFound`](crate::FactoryError::AttributeNotFound)
	/// for unknown attributes and
	/// [`FactoryError::InvalidAttribute`](crate::FactoryError::InvalidAttribute)
	/// when the value cannot be converted.
	fn set_attribute(&mut self, name: &str, value: Value) -> FactoryResult<()>;

	/// Reads the current value of the named attribute.
	fn get_attribute(&self, name: &str) -> Option<Value>;
}

impl dyn Model {
	/// Returns true if the object is a `T`.
	pub fn is<T: Model>(&self) -> bool {
		(self as &dyn Any).is::<T>()
	}

	/// Downcasts to a concrete model type.
	pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
		(self as &dyn Any).downcast_ref::<T>()
	}

	/// Downcasts to a concrete model type mutably.
	pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
		(self as &mut dyn Any).downcast_mut::<T>()
	}
}

impl fmt::Debug for dyn Model {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Model").finish_non_exhaustive()
	}
}

/// Save and delete capabilities of a model.
///
/// `Ok(false)` means the operation reported failure; `Err` means it raised.
pub trait Persistable: Model {
	/// Persists the object.
	fn save(&mut self) -> Result<bool, BoxError>;

	/// Removes the persisted object.
	fn delete(&mut self) -> Result<bool, BoxError>;

	/// Validation errors recorded by the last failed save.
	fn validation_errors(&self) -> Option<Value> {
		None
	}
}

/// Resolves the persistence capability of a type-erased model.
pub(crate) type PersistFn = fn(&mut dyn Model) -> Option<&mut dyn Persistable>;

fn persistable_of<T: Persistable>(model: &mut dyn Model) -> Option<&mut dyn Persistable> {
	model
		.downcast_mut::<T>()
		.map(|model| model as &mut dyn Persistable)
}

/// Registered model type.
#[derive(Clone, Copy)]
pub(crate) struct ModelEntry {
	pub(crate) rust_type: &'static str,
	construct: fn() -> Box<dyn Model>,
	pub(crate) persist: Option<PersistFn>,
}

impl ModelEntry {
	pub(crate) fn construct(&self) -> Box<dyn Model> {
		(self.construct)()
	}
}

fn construct_default<T: Model + Default>() -> Box<dyn Model> {
	Box::new(T::default())
}

/// Registry of instantiable model types, keyed by type name.
///
/// # Example
///
/// ```ignore
/// let mut registry = ModelRegistry::new();
/// registry.register_persistable::<User>("User");
/// assert!(registry.contains("User"));
/// ```
#[derive(Default, Clone)]
pub struct ModelRegistry {
	entries: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a model type without persistence.
	///
	/// Such a type can be built with `instance` but not with `create`.
	pub fn register<T: Model + Default>(&mut self, name: impl Into<String>) {
		self.insert(
			name.into(),
			ModelEntry {
				rust_type: type_name::<T>(),
				construct: construct_default::<T>,
				persist: None,
			},
		);
	}

	/// Registers a model type with its save/delete capability.
	pub fn register_persistable<T: Persistable + Default>(&mut self, name: impl Into<String>) {
		self.insert(
			name.into(),
			ModelEntry {
				rust_type: type_name::<T>(),
				construct: construct_default::<T>,
				persist: Some(persistable_of::<T>),
			},
		);
	}

	fn insert(&mut self, name: String, entry: ModelEntry) {
		tracing::debug!(model = %name, rust_type = entry.rust_type, "registered model type");
		self.entries.insert(name, entry);
	}

	/// Returns true if the type name can be instantiated.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Returns true if the type was registered with a save/delete capability.
	pub fn is_persistable(&self, name: &str) -> bool {
		self.entries
			.get(name)
			.is_some_and(|entry| entry.persist.is_some())
	}

	/// Allocates a default instance of the named type.
	pub fn construct(&self, name: &str) -> Option<Box<dyn Model>> {
		self.entries.get(name).map(ModelEntry::construct)
	}

	pub(crate) fn entry(&self, name: &str) -> Option<ModelEntry> {
		self.entries.get(name).copied()
	}

	/// Returns all registered type names.
	pub fn names(&self) -> Vec<String> {
		self.entries.keys().cloned().collect()
	}

	/// Returns the number of registered types.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no types are registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Removes every registered type.
	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

impl std::fmt::Debug for ModelRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ModelRegistry")
			.field("models", &self.entries.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::FactoryError;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Debug, Default)]
	struct Note {
		body: String,
	}

	impl Model for Note {
		fn set_attribute(&mut self, name: &str, value: Value) -> FactoryResult<()> {
			match name {
				"body" => {
					self.body = value.as_str().unwrap_or_default().to_string();
					Ok(())
				}
				_ => Err(FactoryError::AttributeNotFound {
					model: "Note".to_string(),
					attribute: name.to_string(),
				}),
			}
		}

		fn get_attribute(&self, name: &str) -> Option<Value> {
			(name == "body").then(|| json!(self.body))
		}
	}

	impl Persistable for Note {
		fn save(&mut self) -> Result<bool, BoxError> {
			Ok(true)
		}

		fn delete(&mut self) -> Result<bool, BoxError> {
			Ok(true)
		}
	}

	#[derive(Debug, Default)]
	struct Draft;

	impl Model for Draft {
		fn set_attribute(&mut self, _name: &str, _value: Value) -> FactoryResult<()> {
			Ok(())
		}

		fn get_attribute(&self, _name: &str) -> Option<Value> {
			None
		}
	}

	#[rstest]
	fn test_register_and_construct() {
		let mut registry = ModelRegistry::new();
		registry.register_persistable::<Note>("Note");

		assert!(registry.contains("Note"));
		assert!(!registry.contains("Other"));

		let mut model = registry.construct("Note").unwrap();
		model.set_attribute("body", json!("hello")).unwrap();
		assert_eq!(model.get_attribute("body"), Some(json!("hello")));
		assert!(model.is::<Note>());
		assert_eq!(model.downcast_ref::<Note>().unwrap().body, "hello");
	}

	#[rstest]
	fn test_persistable_capability_is_captured() {
		let mut registry = ModelRegistry::new();
		registry.register_persistable::<Note>("Note");
		registry.register::<Draft>("Draft");

		assert!(registry.is_persistable("Note"));
		assert!(!registry.is_persistable("Draft"));
		assert!(!registry.is_persistable("Missing"));

		let entry = registry.entry("Note").unwrap();
		let mut model = entry.construct();
		let persist = entry.persist.unwrap();
		assert!(persist(model.as_mut()).unwrap().save().unwrap());
	}

	#[rstest]
	fn test_unknown_type_is_not_constructed() {
		let registry = ModelRegistry::new();
		assert!(registry.construct("Ghost").is_none());
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_clear() {
		let mut registry = ModelRegistry::new();
		registry.register::<Draft>("Draft");
		assert_eq!(registry.len(), 1);
		assert_eq!(registry.names(), vec!["Draft".to_string()]);

		registry.clear();
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_boxed_model_debug() {
		let model: Box<dyn Model> = Box::new(Note::default());
		assert_eq!(format!("{:?}", model), "Model { .. }");
	}
}
