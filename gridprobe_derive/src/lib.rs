//! Procedural macros shared by the gridprobe crates.
//!
//! - [`macro@context`] wraps a function body so that every error it returns carries an
//!   additional `anyhow` context message.
//! - [`ConfigDoc`] generates `demo_yaml()` for configuration structs from their doc comments
//!   and `#[config_demo("...")]` attributes.

mod args;
mod config_doc;

use crate::{args::*, config_doc::*};
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{Fields, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(ConfigDoc, attributes(config_demo))]
pub fn derive_config_doc(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as syn::DeriveInput);
	let name = &input.ident;

	let syn::Data::Struct(data) = &input.data else {
		return syn::Error::new(input.span(), "ConfigDoc can only be derived for structs with named fields")
			.to_compile_error()
			.into();
	};

	let Fields::Named(named) = &data.fields else {
		return syn::Error::new(data.struct_token.span(), "ConfigDoc requires a struct with named fields")
			.to_compile_error()
			.into();
	};

	let blocks: Vec<TokenStream2> = named
		.named
		.iter()
		.map(|field| {
			let ident = field.ident.as_ref().map(ToString::to_string).unwrap_or_default();
			let key = serde_rename(&field.attrs).unwrap_or(ident);
			let key_lit = syn::LitStr::new(&key, Span::call_site());
			let doc_lit = syn::LitStr::new(&collect_doc(&field.attrs), Span::call_site());
			let demo = config_demo(&field.attrs);
			let ty = &field.ty;

			let doc_block = quote! {
				for line in #doc_lit.lines().filter(|l| !l.is_empty()) {
					__s.push_str(&__sp(__indent));
					__s.push_str("# ");
					__s.push_str(line);
					__s.push('\n');
				}
				__s.push_str(&__sp(__indent));
				__s.push_str(#key_lit);
				__s.push(':');
			};

			let value_block = match (FieldKind::of(ty), demo) {
				(FieldKind::Nested, _) => quote! {
					__s.push('\n');
					__s.push_str(&<#ty>::demo_yaml_with_indent(__indent + 2));
				},
				(FieldKind::List | FieldKind::Map, Some(demo)) => {
					let demo_lit = syn::LitStr::new(&demo, Span::call_site());
					quote! {
						for line in #demo_lit.lines().filter(|l| !l.trim().is_empty()) {
							__s.push('\n');
							__s.push_str(&__sp(__indent + 2));
							__s.push_str(line.trim());
						}
						__s.push('\n');
					}
				}
				(FieldKind::List, None) => quote! { __s.push_str(" []\n"); },
				(FieldKind::Map, None) => quote! { __s.push_str(" {}\n"); },
				(FieldKind::Leaf, Some(demo)) => {
					let demo_lit = syn::LitStr::new(&demo, Span::call_site());
					quote! {
						__s.push(' ');
						__s.push_str(#demo_lit);
						__s.push('\n');
					}
				}
				(FieldKind::Leaf, None) => quote! { __s.push_str(" ~\n"); },
			};

			quote! {
				#doc_block
				#value_block
			}
		})
		.collect();

	let expanded = quote! {
		impl #name {
			/// Returns a commented YAML example of this configuration section.
			pub fn demo_yaml() -> String {
				Self::demo_yaml_with_indent(0)
			}

			pub(crate) fn demo_yaml_with_indent(__indent: usize) -> String {
				let mut __s = String::new();
				let __sp = |n: usize| -> String { " ".repeat(n) };
				#( { #blocks } )*
				__s
			}
		}
	};

	TokenStream::from(expanded)
}

#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let ContextArgs { move_token, format_args } = parse_macro_input!(args);
	let mut input = parse_macro_input!(input as syn::ItemFn);

	let body = &input.block;
	let return_type = &input.sig.output;
	let err = Ident::new("err", Span::mixed_site());

	let new_body = if input.sig.asyncness.is_some() {
		let return_type = match return_type {
			syn::ReturnType::Default => {
				return syn::Error::new_spanned(input, "function should return Result")
					.to_compile_error()
					.into();
			}
			syn::ReturnType::Type(_, return_type) => return_type,
		};
		let result = Ident::new("result", Span::mixed_site());
		quote! {
			let #result: #return_type = async #move_token { #body }.await;
			#result.map_err(|#err| #err.context(format!(#format_args)).into())
		}
	} else {
		let force_fn_once = Ident::new("force_fn_once", Span::mixed_site());
		quote! {
			// A moved non-`Copy` value makes borrowck treat the closure as `FnOnce`.
			let #force_fn_once = ::core::iter::empty::<()>();
			(#move_token || #return_type {
				::core::mem::drop(#force_fn_once);
				#body
			})().map_err(|#err| #err.context(format!(#format_args)).into())
		}
	};
	input.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	input.into_token_stream().into()
}
