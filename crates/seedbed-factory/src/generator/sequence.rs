//! Auto-incrementing sequences.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::{Value, json};

use super::{Generator, GeneratorCall, GeneratorContext};
use crate::error::FactoryResult;

/// Placeholder replaced by the counter value in a sequence template.
pub const SEQUENCE_PLACEHOLDER: &str = "{n}";

/// `sequence` or `sequence:template`.
///
/// Each (definition, attribute) pair has its own counter. Without a template
/// the number itself is produced; with one, every `{n}` is replaced. A counter
/// that has produced `u64::MAX` is exhausted and fails every later call.
///
/// ```text
/// "sequence"             -> 1, 2, 3, ...
/// "sequence:user_{n}"    -> "user_1", "user_2", ...
/// ```
#[derive(Debug)]
pub struct SequenceGenerator {
	start: u64,
	// None once the counter has produced u64::MAX
	counters: Mutex<HashMap<String, Option<u64>>>,
}

impl SequenceGenerator {
	/// Creates a generator whose counters start at 1.
	pub fn new() -> Self {
		Self::starting_at(1)
	}

	/// Creates a generator whose counters start at `start`.
	pub fn starting_at(start: u64) -> Self {
		Self {
			start,
			counters: Mutex::new(HashMap::new()),
		}
	}

	/// Returns the next value for `key`, or `None` once the counter is
	/// exhausted.
	pub fn next(&self, key: &str) -> Option<u64> {
		let mut counters = self.counters.lock();
		let counter = counters.entry(key.to_string()).or_insert(Some(self.start));
		let value = (*counter)?;
		*counter = value.checked_add(1);
		Some(value)
	}

	/// Resets every counter.
	pub fn reset(&self) {
		self.counters.lock().clear();
	}
}

impl Default for SequenceGenerator {
	fn default() -> Self {
		Self::new()
	}
}

impl Generator for SequenceGenerator {
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		let key = format!("{}.{}", ctx.model(), ctx.attribute());
		let n = self
			.next(&key)
			.ok_or_else(|| call.invalid(format!("sequence {} is exhausted", key)))?;
		Ok(match call.raw_params() {
			Some(template) if !template.is_empty() => {
				json!(template.replace(SEQUENCE_PLACEHOLDER, &n.to_string()))
			}
			_ => json!(n),
		})
	}
}
