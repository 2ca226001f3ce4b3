//! Attribute value generation.
//!
//! Every attribute of a definition maps to a [`GeneratorSpec`]:
//!
//! - [`GeneratorSpec::Literal`] - a fixed value
//! - [`GeneratorSpec::Closure`] - a function of the [`GeneratorContext`]
//! - [`GeneratorSpec::Kind`] - a `"kind"` or `"kind:param1,param2"` string
//!   resolved through the [`GeneratorRegistry`]
//!
//! Generators receive the in-progress object, so they can read attributes
//! generated before them, and a mutable handle to the engine, so they can
//! build related objects.

mod builtin;
#[cfg(feature = "faker")]
mod faker;
mod relation;
mod sequence;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use builtin::{AttributeGenerator, LiteralGenerator, NowGenerator, UuidGenerator};
#[cfg(feature = "faker")]
pub use faker::{FAKER_KINDS, FakerGenerator, MAX_TEXT_COUNT};
pub use relation::FactoryGenerator;
pub use sequence::SequenceGenerator;

use crate::engine::FactoryEngine;
use crate::error::{FactoryError, FactoryResult};
use crate::lifecycle::ObjectId;
use crate::model::Model;

/// Separator between a generator kind and its parameters.
pub const KIND_SEPARATOR: char = ':';

/// Separator between generator parameters.
pub const PARAM_SEPARATOR: char = ',';

/// Closure generator.
pub type GeneratorFn =
	Arc<dyn Fn(&mut GeneratorContext<'_>) -> FactoryResult<Value> + Send + Sync>;

/// How the value of one attribute is produced.
#[derive(Clone)]
pub enum GeneratorSpec {
	/// Fixed value.
	Literal(Value),
	/// Function invoked with the generation context.
	Closure(GeneratorFn),
	/// Registered generator kind, optionally parameterized.
	Kind(String),
}

impl GeneratorSpec {
	/// Creates a literal spec.
	pub fn literal(value: impl Into<Value>) -> Self {
		Self::Literal(value.into())
	}

	/// Creates a closure spec.
	///
	/// # Example
	///
	/// ```ignore
	/// let slug = GeneratorSpec::closure(|ctx| {
	///     let title = ctx.object().get_attribute("title").unwrap_or_default();
	///     Ok(json!(title.as_str().unwrap_or_default().to_lowercase()))
	/// });
	/// ```
	pub fn closure<F>(generator: F) -> Self
	where
		F: Fn(&mut GeneratorContext<'_>) -> FactoryResult<Value> + Send + Sync + 'static,
	{
		Self::Closure(Arc::new(generator))
	}

	/// Creates a kind spec.
	pub fn kind(spec: impl Into<String>) -> Self {
		Self::Kind(spec.into())
	}
}

impl From<&str> for GeneratorSpec {
	fn from(spec: &str) -> Self {
		Self::Kind(spec.to_string())
	}
}

impl From<String> for GeneratorSpec {
	fn from(spec: String) -> Self {
		Self::Kind(spec)
	}
}

impl fmt::Debug for GeneratorSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Closure(_) => f.write_str("Closure(..)"),
			Self::Kind(spec) => f.debug_tuple("Kind").field(spec).finish(),
		}
	}
}

/// A parsed `"kind:param1,param2"` generator spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorCall<'a> {
	kind: &'a str,
	raw_params: Option<&'a str>,
}

impl<'a> GeneratorCall<'a> {
	/// Splits a spec into its kind and parameter text.
	///
	/// # Example
	///
	/// ```
	/// # use seedbed_factory::generator::GeneratorCall;
	/// let call = GeneratorCall::parse("number_between:1, 10");
	/// assert_eq!(call.kind(), "number_between");
	/// assert_eq!(call.params(), vec!["1", "10"]);
	///
	/// let call = GeneratorCall::parse("email");
	/// assert!(call.params().is_empty());
	/// ```
	pub fn parse(spec: &'a str) -> Self {
		match spec.split_once(KIND_SEPARATOR) {
			Some((kind, params)) => Self {
				kind: kind.trim(),
				raw_params: Some(params),
			},
			None => Self {
				kind: spec.trim(),
				raw_params: None,
			},
		}
	}

	/// Generator kind.
	pub fn kind(&self) -> &'a str {
		self.kind
	}

	/// Unsplit parameter text after the kind separator.
	pub fn raw_params(&self) -> Option<&'a str> {
		self.raw_params
	}

	/// Trimmed parameters; empty when the spec has none.
	pub fn params(&self) -> Vec<&'a str> {
		match self.raw_params {
			Some(raw) if !raw.trim().is_empty() => {
				raw.split(PARAM_SEPARATOR).map(str::trim).collect()
			}
			_ => Vec::new(),
		}
	}

	/// Returns the parameter at `index`, or an argument error naming it.
	pub fn param(&self, index: usize, name: &str) -> FactoryResult<&'a str> {
		self.params()
			.get(index)
			.copied()
			.ok_or_else(|| self.invalid(format!("missing parameter `{}`", name)))
	}

	/// Parses the parameter at `index`.
	pub fn parse_param<T>(&self, index: usize, name: &str) -> FactoryResult<T>
	where
		T: std::str::FromStr,
		T::Err: fmt::Display,
	{
		let raw = self.param(index, name)?;
		raw.parse()
			.map_err(|e| self.invalid(format!("parameter `{}` ({}): {}", name, raw, e)))
	}

	/// Builds an argument error for this call.
	pub fn invalid(&self, message: impl Into<String>) -> FactoryError {
		FactoryError::InvalidGeneratorArguments {
			kind: self.kind.to_string(),
			message: message.into(),
		}
	}
}

/// Context handed to every generator invocation.
pub struct GeneratorContext<'a> {
	engine: &'a mut FactoryEngine,
	object: &'a dyn Model,
	model: &'a str,
	attribute: &'a str,
	id: Option<ObjectId>,
}

impl<'a> GeneratorContext<'a> {
	pub(crate) fn new(
		engine: &'a mut FactoryEngine,
		object: &'a dyn Model,
		model: &'a str,
		attribute: &'a str,
		id: Option<ObjectId>,
	) -> Self {
		Self {
			engine,
			object,
			model,
			attribute,
			id,
		}
	}

	/// The engine building the object.
	pub fn engine(&mut self) -> &mut FactoryEngine {
		&mut *self.engine
	}

	/// The object being built, with every earlier attribute already set.
	pub fn object(&self) -> &dyn Model {
		self.object
	}

	/// Definition name of the object being built.
	pub fn model(&self) -> &str {
		self.model
	}

	/// Attribute being generated.
	pub fn attribute(&self) -> &str {
		self.attribute
	}

	/// Lifecycle id of the object, when it was registered as pending.
	pub fn id(&self) -> Option<ObjectId> {
		self.id
	}
}

/// Produces attribute values for a registered kind.
pub trait Generator: Send + Sync {
	/// Generates a value for `call` within `ctx`.
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value>;
}

impl<F> Generator for F
where
	F: Fn(&GeneratorCall<'_>, &mut GeneratorContext<'_>) -> FactoryResult<Value> + Send + Sync,
{
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		self(call, ctx)
	}
}

/// Registry of generator kinds.
///
/// # Example
///
/// ```ignore
/// let mut registry = GeneratorRegistry::with_defaults();
/// fn shout(call: &GeneratorCall<'_>, _ctx: &mut GeneratorContext<'_>) -> FactoryResult<Value> {
///     Ok(json!(call.raw_params().unwrap_or_default().to_uppercase()))
/// }
///
/// registry.register("shout", shout);
/// ```
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
	generators: HashMap<String, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry with every built-in kind, sequences starting at 1.
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		registry.register_defaults(1);
		registry
	}

	/// Registers the built-in kinds.
	pub fn register_defaults(&mut self, sequence_start: u64) {
		self.register("attribute", AttributeGenerator);
		self.register("literal", LiteralGenerator);
		self.register("uuid", UuidGenerator);
		self.register("now", NowGenerator);
		self.register("factory", FactoryGenerator);
		self.register("sequence", SequenceGenerator::starting_at(sequence_start));

		#[cfg(feature = "faker")]
		{
			let faker = Arc::new(FakerGenerator);
			for kind in FAKER_KINDS {
				self.generators.insert(kind.to_string(), faker.clone());
			}
		}
	}

	/// Registers a generator kind, replacing any previous one.
	pub fn register<G: Generator + 'static>(&mut self, kind: impl Into<String>, generator: G) {
		self.generators.insert(kind.into(), Arc::new(generator));
	}

	/// Gets a generator by kind.
	pub fn get(&self, kind: &str) -> Option<Arc<dyn Generator>> {
		self.generators.get(kind).cloned()
	}

	/// Checks if a kind is registered.
	pub fn contains(&self, kind: &str) -> bool {
		self.generators.contains_key(kind)
	}

	/// Removes a kind.
	pub fn remove(&mut self, kind: &str) -> bool {
		self.generators.remove(kind).is_some()
	}

	/// Returns all registered kinds.
	pub fn kinds(&self) -> Vec<String> {
		self.generators.keys().cloned().collect()
	}

	/// Returns the number of registered kinds.
	pub fn len(&self) -> usize {
		self.generators.len()
	}

	/// Returns true if no kinds are registered.
	pub fn is_empty(&self) -> bool {
		self.generators.is_empty()
	}
}

impl fmt::Debug for GeneratorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GeneratorRegistry")
			.field("kinds", &self.generators.len())
			.finish()
	}
}

/// Resolves a spec into a value.
pub(crate) fn dispatch(spec: &GeneratorSpec, ctx: &mut GeneratorContext<'_>) -> FactoryResult<Value> {
	match spec {
		GeneratorSpec::Literal(value) => Ok(value.clone()),
		GeneratorSpec::Closure(generator) => generator(ctx),
		GeneratorSpec::Kind(spec) => {
			let call = GeneratorCall::parse(spec);
			let generator = ctx
				.engine
				.generators()
				.get(call.kind())
				.ok_or_else(|| FactoryError::GeneratorNotFound(call.kind().to_string()))?;
			generator.generate(&call, ctx)
		}
	}
}
