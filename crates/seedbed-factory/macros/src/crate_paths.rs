//! Helper functions for dynamic crate path resolution using proc_macro_crate

use proc_macro2::TokenStream;
use quote::quote;

/// Resolves the path to the seedbed_factory crate dynamically.
///
/// # Strategy
///
/// 1. `seedbed-factory` itself or as a dependency (possibly renamed): use it directly
/// 2. Only the `seedbed` facade: use `::seedbed::factory`
/// 3. Neither: report an error at the derive site
pub(crate) fn get_seedbed_factory_crate() -> syn::Result<TokenStream> {
	use proc_macro_crate::{FoundCrate, crate_name};

	match crate_name("seedbed-factory") {
		// the crate declares `extern crate self as seedbed_factory`
		Ok(FoundCrate::Itself) => return Ok(quote!(::seedbed_factory)),
		Ok(FoundCrate::Name(name)) => {
			let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
			return Ok(quote!(::#ident));
		}
		Err(_) => {}
	}

	match crate_name("seedbed") {
		Ok(FoundCrate::Itself) => Ok(quote!(crate::factory)),
		Ok(FoundCrate::Name(name)) => {
			let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
			Ok(quote!(::#ident::factory))
		}
		Err(e) => Err(syn::Error::new(
			proc_macro2::Span::call_site(),
			format!(
				"failed to resolve `seedbed-factory` crate: {}. Ensure it is listed in Cargo.toml dependencies.",
				e
			),
		)),
	}
}
