use syn::{Attribute, Type};

/// How a config field is rendered in the demo YAML.
pub enum FieldKind {
	/// A struct that derives `ConfigDoc` itself and is rendered as an indented block.
	Nested,
	/// `Vec<T>`, rendered as a YAML sequence.
	List,
	/// `HashMap<K, V>` or `BTreeMap<K, V>`, rendered as a YAML mapping.
	Map,
	/// Scalars and `Option<T>`.
	Leaf,
}

impl FieldKind {
	pub fn of(ty: &Type) -> FieldKind {
		match path_ident(ty).map(|id| id.to_string()).as_deref() {
			Some("Vec") => FieldKind::List,
			Some("HashMap" | "BTreeMap") => FieldKind::Map,
			Some("Option") => FieldKind::Leaf,
			Some(_) if !is_primitive_like(ty) => FieldKind::Nested,
			_ => FieldKind::Leaf,
		}
	}
}

/// Joins all `///` lines of a field into one string, one line per doc line.
pub fn collect_doc(attrs: &[Attribute]) -> String {
	let mut lines: Vec<String> = Vec::new();
	for attr in attrs {
		if !attr.path().is_ident("doc") {
			continue;
		}
		if let syn::Meta::NameValue(nv) = &attr.meta
			&& let syn::Expr::Lit(expr_lit) = &nv.value
			&& let syn::Lit::Str(lit) = &expr_lit.lit
		{
			lines.push(lit.value().trim().to_string());
		}
	}
	lines.join("\n")
}

/// Reads `#[serde(rename = "...")]`.
pub fn serde_rename(attrs: &[Attribute]) -> Option<String> {
	for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
		let mut out: Option<String> = None;
		let _ = attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("rename")
				&& let Ok(v) = meta.value()
				&& let Ok(s) = v.parse::<syn::LitStr>()
			{
				out = Some(s.value());
			}
			Ok(())
		});
		if out.is_some() {
			return out;
		}
	}
	None
}

/// Reads `#[config_demo("...")]` or `#[config_demo(value = "...")]`.
pub fn config_demo(attrs: &[Attribute]) -> Option<String> {
	for attr in attrs.iter().filter(|a| a.path().is_ident("config_demo")) {
		if let Ok(lit) = attr.parse_args::<syn::LitStr>() {
			return Some(lit.value());
		}
		let mut out = None;
		let _ = attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("value")
				&& let Ok(v) = meta.value()
				&& let Ok(lit) = v.parse::<syn::LitStr>()
			{
				out = Some(lit.value());
			}
			Ok(())
		});
		if out.is_some() {
			return out;
		}
	}
	None
}

/// bool, integers, floats, `String` and `&str`.
pub fn is_primitive_like(ty: &Type) -> bool {
	match ty {
		Type::Path(_) => path_ident(ty).is_some_and(|ident| {
			matches!(
				ident.to_string().as_str(),
				"bool" | "String" | "u8" | "u16" | "u32" | "u64" | "u128" | "i8" | "i16" | "i32" | "i64" | "i128"
					| "usize" | "isize" | "f32" | "f64"
			)
		}),
		Type::Reference(r) => path_ident(&r.elem).is_some_and(|ident| ident == "str"),
		_ => false,
	}
}

/// Returns the last path segment ident if the type is a path.
pub fn path_ident(ty: &Type) -> Option<&syn::Ident> {
	if let Type::Path(tp) = ty {
		tp.path.segments.last().map(|seg| &seg.ident)
	} else {
		None
	}
}
