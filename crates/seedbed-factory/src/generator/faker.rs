//! Fake data generation.
//!
//! Wraps the `fake` crate's English locale. Each kind is registered under its
//! own name, so a definition uses `"safe_email"` or `"sentence:3,8"` directly.

use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::boolean::en::Boolean;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{FreeEmail, IPv4, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

use super::{Generator, GeneratorCall, GeneratorContext};
use crate::error::{FactoryError, FactoryResult};

/// Every kind handled by [`FakerGenerator`].
pub const FAKER_KINDS: &[&str] = &[
	"word",
	"words",
	"sentence",
	"paragraph",
	"first_name",
	"last_name",
	"name",
	"username",
	"email",
	"safe_email",
	"phone_number",
	"city",
	"country",
	"street_name",
	"zip_code",
	"company",
	"ipv4",
	"boolean",
	"number_between",
	"random_element",
];

/// Upper bound for the `min,max` counts of `words`, `sentence` and `paragraph`.
pub const MAX_TEXT_COUNT: usize = 1_000;

/// Faker-backed generator for the kinds in [`FAKER_KINDS`].
///
/// | Kind | Parameters | Value |
/// |------|------------|-------|
/// | `words` | `min,max` (default `3,6`) | array of words |
/// | `sentence` | `min,max` words (default `4,10`) | string |
/// | `paragraph` | `min,max` sentences (default `3,6`) | string |
/// | `boolean` | percent true (default `50`) | bool |
/// | `number_between` | `min,max` (inclusive) | integer |
/// | `random_element` | `a,b,...` | one of the parameters |
///
/// Counts above [`MAX_TEXT_COUNT`] are rejected. Every other kind takes no
/// parameters and yields a string.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakerGenerator;

impl FakerGenerator {
	fn range(
		call: &GeneratorCall<'_>,
		default: (usize, usize),
	) -> FactoryResult<std::ops::Range<usize>> {
		let (min, max) = if call.params().is_empty() {
			default
		} else {
			(call.parse_param(0, "min")?, call.parse_param(1, "max")?)
		};
		if min > max {
			return Err(call.invalid(format!("min {} is greater than max {}", min, max)));
		}
		if max > MAX_TEXT_COUNT {
			return Err(call.invalid(format!("max {} exceeds {}", max, MAX_TEXT_COUNT)));
		}
		// fake ranges are half-open
		Ok(min..max + 1)
	}
}

impl Generator for FakerGenerator {
	fn generate(
		&self,
		call: &GeneratorCall<'_>,
		_ctx: &mut GeneratorContext<'_>,
	) -> FactoryResult<Value> {
		let value = match call.kind() {
			"word" => json!(Word().fake::<String>()),
			"words" => json!(Words(Self::range(call, (3, 6))?).fake::<Vec<String>>()),
			"sentence" => json!(Sentence(Self::range(call, (4, 10))?).fake::<String>()),
			"paragraph" => json!(Paragraph(Self::range(call, (3, 6))?).fake::<String>()),
			"first_name" => json!(FirstName().fake::<String>()),
			"last_name" => json!(LastName().fake::<String>()),
			"name" => json!(Name().fake::<String>()),
			"username" => json!(Username().fake::<String>()),
			"email" => json!(FreeEmail().fake::<String>()),
			"safe_email" => json!(SafeEmail().fake::<String>()),
			"phone_number" => json!(PhoneNumber().fake::<String>()),
			"city" => json!(CityName().fake::<String>()),
			"country" => json!(CountryName().fake::<String>()),
			"street_name" => json!(StreetName().fake::<String>()),
			"zip_code" => json!(ZipCode().fake::<String>()),
			"company" => json!(CompanyName().fake::<String>()),
			"ipv4" => json!(IPv4().fake::<String>()),
			"boolean" => {
				let ratio = if call.params().is_empty() {
					50
				} else {
					call.parse_param::<u8>(0, "ratio")?
				};
				if ratio > 100 {
					return Err(call.invalid(format!("ratio {} exceeds 100", ratio)));
				}
				json!(Boolean(ratio).fake::<bool>())
			}
			"number_between" => {
				let min: i64 = call.parse_param(0, "min")?;
				let max: i64 = call.parse_param(1, "max")?;
				if min > max {
					return Err(call.invalid(format!("min {} is greater than max {}", min, max)));
				}
				json!((min..=max).fake::<i64>())
			}
			"random_element" => {
				let choices = call.params();
				let choice = choices
					.choose(&mut rand::thread_rng())
					.ok_or_else(|| call.invalid("at least one element is required"))?;
				json!(choice)
			}
			other => return Err(FactoryError::GeneratorNotFound(other.to_string())),
		};
		Ok(value)
	}
}
