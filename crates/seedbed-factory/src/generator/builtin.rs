//! Small built-in generator kinds.

use serde_json::{Value, json};

use super::{Generator, GeneratorCall, GeneratorContext};
use crate::error::{FactoryError, FactoryResult};

/// `attribute:name` - copies a sibling attribute generated earlier.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeGenerator;

impl Generator for AttributeGenerator {
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		let name = call.param(0, "name")?;
		ctx.object()
			.get_attribute(name)
			.ok_or_else(|| FactoryError::AttributeNotFound {
				model: ctx.model().to_string(),
				attribute: name.to_string(),
			})
	}
}

/// `literal:text` - the parameter text as a string, commas included.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralGenerator;

impl Generator for LiteralGenerator {
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		_ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		Ok(json!(call.raw_params().unwrap_or_default()))
	}
}

/// `uuid` - a random v4 UUID string.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl Generator for UuidGenerator {
	fn generate(
		&self,
		_call: &GeneratorCall<'_>,
		_ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		Ok(json!(uuid::Uuid::new_v4().to_string()))
	}
}

/// `now` - the current UTC time in RFC 3339 format.
#[derive(Debug, Default, Clone, Copy)]
pub struct NowGenerator;

impl Generator for NowGenerator {
	fn generate(
		&self,
		_call: &GeneratorCall<'_>,
		_ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		Ok(json!(chrono::Utc::now().to_rfc3339()))
	}
}
