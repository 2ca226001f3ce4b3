//! Procedural macros for seedbed-factory.
//!
//! This crate provides the `#[derive(Model)]` macro, which implements
//! attribute access for structs built by a factory engine.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod crate_paths;
mod model_derive;

/// Derives a `Model` implementation for a struct.
///
/// Every named field becomes an attribute keyed by its name. Generated values
/// are converted with `serde_json::from_value`, and reads go through
/// `serde_json::to_value`.
///
/// # Field attributes
///
/// - `#[model(skip)]` - Exclude the field from attribute access
/// - `#[model(rename = "key")]` - Expose the field under a different key
///
/// # Example
///
/// ```ignore
/// use seedbed_factory::Model;
///
/// #[derive(Debug, Default, Model)]
/// pub struct User {
///     pub id: u64,
///     #[model(rename = "login")]
///     pub username: String,
///     #[model(skip)]
///     pub password_hash: Vec<u8>,
/// }
/// ```
///
/// Assigning an unknown key fails with `FactoryError::AttributeNotFound`, and
/// a value of the wrong shape with `FactoryError::InvalidAttribute`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	model_derive::model_derive_impl(input)
		.unwrap_or_else(|e| e.to_compile_error())
		.into()
}
