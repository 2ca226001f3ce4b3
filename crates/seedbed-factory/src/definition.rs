//! Factory definitions.
//!
//! A [`Definition`] describes how one model kind is built: which registered
//! type to instantiate, which generator fills each attribute, and an optional
//! callback that runs after the object is built.
//!
//! Definitions named `group:Model` are variants of `Model`. Their attributes
//! are merged over the base definition of `Model` when an object is built.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::generator::GeneratorSpec;
use crate::model::Model;

/// Separator between a group name and the model type in a definition name.
pub const GROUP_SEPARATOR: char = ':';

/// What the engine should do after a definition callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackOutcome {
	/// Persist the object once more.
	#[default]
	Save,
	/// The callback made no changes that need saving.
	Done,
}

impl From<bool> for CallbackOutcome {
	fn from(save: bool) -> Self {
		if save { Self::Save } else { Self::Done }
	}
}

impl From<()> for CallbackOutcome {
	fn from(_: ()) -> Self {
		Self::Save
	}
}

/// Post-build callback.
///
/// Receives the built object and whether it is already pending or saved.
pub type Callback = Arc<dyn Fn(&mut dyn Model, bool) -> CallbackOutcome + Send + Sync>;

/// Ordered attribute-name to generator-spec mapping.
///
/// Insertion order is generation order, so a generator may read attributes
/// produced before it. Inserting an existing key replaces its spec in place.
#[derive(Clone, Default)]
pub struct Attributes {
	specs: IndexMap<String, GeneratorSpec>,
}

impl Attributes {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an attribute, builder style.
	///
	/// # Example
	///
	/// ```ignore
	/// let attributes = Attributes::new()
	///     .with("name", "first_name")
	///     .with("active", GeneratorSpec::literal(true));
	/// ```
	pub fn with(mut self, name: impl Into<String>, spec: impl Into<GeneratorSpec>) -> Self {
		self.insert(name, spec);
		self
	}

	/// Inserts or replaces an attribute.
	pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<GeneratorSpec>) {
		self.specs.insert(name.into(), spec.into());
	}

	/// Returns the spec for an attribute.
	pub fn get(&self, name: &str) -> Option<&GeneratorSpec> {
		self.specs.get(name)
	}

	/// Returns true if the attribute is present.
	pub fn contains(&self, name: &str) -> bool {
		self.specs.contains_key(name)
	}

	/// Returns the attribute names in generation order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.specs.keys().map(String::as_str)
	}

	/// Iterates over the attributes in generation order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneratorSpec)> {
		self.specs.iter().map(|(name, spec)| (name.as_str(), spec))
	}

	/// Returns the number of attributes.
	pub fn len(&self) -> usize {
		self.specs.len()
	}

	/// Returns true if there are no attributes.
	pub fn is_empty(&self) -> bool {
		self.specs.is_empty()
	}

	/// Returns a copy of `self` with `other` merged over it.
	///
	/// Keys present in both keep their position in `self` and take the spec
	/// from `other`; keys only in `other` are appended in `other`'s order.
	pub fn merged(&self, other: &Attributes) -> Attributes {
		let mut merged = self.clone();
		for (name, spec) in &other.specs {
			merged.specs.insert(name.clone(), spec.clone());
		}
		merged
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<GeneratorSpec>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attributes = Attributes::new();
		for (name, spec) in iter {
			attributes.insert(name, spec);
		}
		attributes
	}
}

impl fmt::Debug for Attributes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.specs.iter()).finish()
	}
}

/// Blueprint for building one model kind.
#[derive(Clone)]
pub struct Definition {
	name: String,
	model_type: String,
	group: Option<String>,
	attributes: Attributes,
	callback: Option<Callback>,
}

impl Definition {
	/// Creates a definition.
	///
	/// `name` is either a model type (`"User"`) or a grouped variant
	/// (`"admin:User"`).
	pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
		let name = name.into();
		let (group, model_type) = match name.split_once(GROUP_SEPARATOR) {
			Some((group, model_type)) => (Some(group.to_string()), model_type.to_string()),
			None => (None, name.clone()),
		};
		Self {
			name,
			model_type,
			group,
			attributes,
			callback: None,
		}
	}

	/// Attaches a post-build callback.
	pub fn with_callback<F, R>(mut self, callback: F) -> Self
	where
		F: Fn(&mut dyn Model, bool) -> R + Send + Sync + 'static,
		R: Into<CallbackOutcome>,
	{
		self.callback = Some(Arc::new(
			move |model: &mut dyn Model, saved: bool| -> CallbackOutcome {
				callback(model, saved).into()
			},
		));
		self
	}

	/// Registry key of this definition.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Type name the engine instantiates.
	pub fn model_type(&self) -> &str {
		&self.model_type
	}

	/// Variant name, if this is a grouped definition.
	pub fn group(&self) -> Option<&str> {
		self.group.as_deref()
	}

	/// Attribute generators of this definition alone (without the base
	/// definition of a group).
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// The post-build callback, if any.
	pub fn callback(&self) -> Option<&Callback> {
		self.callback.as_ref()
	}
}

impl fmt::Debug for Definition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Definition")
			.field("name", &self.name)
			.field("model_type", &self.model_type)
			.field("group", &self.group)
			.field("attributes", &self.attributes)
			.field("callback", &self.callback.is_some())
			.finish()
	}
}
