//! Derive macro for the Model trait
//!
//! Maps every named field to an attribute. Values cross the boundary as
//! `serde_json::Value`, so each field type must implement `Serialize` and
//! `DeserializeOwned`.

use crate::crate_paths::get_seedbed_factory_crate;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

/// Field-level `#[model(...)]` options
#[derive(Default)]
struct FieldOptions {
	skip: bool,
	rename: Option<String>,
}

impl FieldOptions {
	fn from_attributes(attrs: &[syn::Attribute]) -> syn::Result<Self> {
		let mut options = Self::default();
		for attr in attrs.iter().filter(|attr| attr.path().is_ident("model")) {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("skip") {
					options.skip = true;
					Ok(())
				} else if meta.path.is_ident("rename") {
					let value: LitStr = meta.value()?.parse()?;
					options.rename = Some(value.value());
					Ok(())
				} else {
					Err(meta.error("unsupported model attribute, expected `skip` or `rename`"))
				}
			})?;
		}
		Ok(options)
	}
}

/// Implementation of the Model derive macro
pub(crate) fn model_derive_impl(input: DeriveInput) -> syn::Result<TokenStream> {
	let struct_name = &input.ident;

	let fields = match &input.data {
		Data::Struct(data_struct) => match &data_struct.fields {
			Fields::Named(fields) => &fields.named,
			_ => {
				return Err(syn::Error::new_spanned(
					struct_name,
					"Model can only be derived for structs with named fields",
				));
			}
		},
		_ => {
			return Err(syn::Error::new_spanned(
				struct_name,
				"Model can only be derived for structs",
			));
		}
	};

	let mut attributes = Vec::new();
	for field in fields {
		let options = FieldOptions::from_attributes(&field.attrs)?;
		if options.skip {
			continue;
		}
		let Some(ident) = field.ident.clone() else {
			continue;
		};
		let key = options.rename.unwrap_or_else(|| ident.to_string());
		attributes.push((ident, key));
	}

	let krate = get_seedbed_factory_crate()?;
	let model_name = struct_name.to_string();
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	let set_arms = attributes.iter().map(|(ident, key)| {
		quote! {
			#key => {
				self.#ident = #krate::__private::serde_json::from_value(value).map_err(|e| {
					#krate::FactoryError::InvalidAttribute {
						model: #model_name.to_string(),
						attribute: name.to_string(),
						message: e.to_string(),
					}
				})?;
				Ok(())
			}
		}
	});

	let get_arms = attributes.iter().map(|(ident, key)| {
		quote! {
			#key => #krate::__private::serde_json::to_value(&self.#ident).ok(),
		}
	});

	Ok(quote! {
		impl #impl_generics #krate::Model for #struct_name #ty_generics #where_clause {
			#[allow(unused_variables)]
			fn set_attribute(
				&mut self,
				name: &str,
				value: #krate::__private::serde_json::Value,
			) -> #krate::FactoryResult<()> {
				match name {
					#(#set_arms)*
					_ => Err(#krate::FactoryError::AttributeNotFound {
						model: #model_name.to_string(),
						attribute: name.to_string(),
					}),
				}
			}

			fn get_attribute(&self, name: &str) -> Option<#krate::__private::serde_json::Value> {
				match name {
					#(#get_arms)*
					_ => None,
				}
			}
		}
	})
}
