use proc_macro2::TokenStream as TokenStream2;
use syn::Token;
use syn::parse::{self, Parse, ParseStream};

/// Arguments of `#[context(...)]`: an optional leading `move,` followed by `format!` arguments.
#[derive(Debug)]
pub struct ContextArgs {
	pub move_token: Option<Token![move]>,
	pub format_args: TokenStream2,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> parse::Result<Self> {
		let move_token = if input.peek(Token![move]) {
			let token = input.parse()?;
			input.parse::<Token![,]>()?;
			Some(token)
		} else {
			None
		};
		Ok(Self {
			move_token,
			format_args: input.parse()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::ContextArgs;
	use syn::parse_str;

	#[test]
	fn format_string_only() {
		let args: ContextArgs = parse_str(r#""reading raster""#).unwrap();
		assert!(args.move_token.is_none());
		assert_eq!(args.format_args.to_string(), r#""reading raster""#);
	}

	#[test]
	fn with_move_and_placeholders() {
		let args: ContextArgs = parse_str(r#"move, "resizing to {}x{}", width, height"#).unwrap();
		assert!(args.move_token.is_some());
		assert_eq!(args.format_args.to_string(), r#""resizing to {}x{}" , width , height"#);
	}

	#[test]
	fn move_without_comma_is_rejected() {
		let err = parse_str::<ContextArgs>("move foo").unwrap_err();
		assert!(err.to_string().contains(','), "Expected comma error, got: {err}");
	}
}
