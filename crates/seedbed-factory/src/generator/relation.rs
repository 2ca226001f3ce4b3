//! Related-model generation.

use serde_json::{Value, json};

use super::{Generator, GeneratorCall, GeneratorContext};
use crate::error::FactoryResult;

/// Attribute read from a related object to reference it.
pub const RELATED_KEY_ATTRIBUTE: &str = "id";

/// `factory:Model` - creates a related `Model` and yields its `id`.
///
/// The related object is persisted through the same engine, so it joins the
/// saved set and is torn down by `delete_saved`. When the related model has
/// no `id` attribute, its lifecycle id is used instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactoryGenerator;

impl Generator for FactoryGenerator {
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		let related = call.param(0, "model")?;
		tracing::debug!(
			model = ctx.model(),
			attribute = ctx.attribute(),
			related,
			"creating related model"
		);

		let engine = ctx.engine();
		let id = engine.create(related)?;
		let key = engine
			.get(id)
			.and_then(|object| object.get_attribute(RELATED_KEY_ATTRIBUTE))
			.filter(|key| !key.is_null());

		Ok(key.unwrap_or_else(|| json!(id.get())))
	}
}
