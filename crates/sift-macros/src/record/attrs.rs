//! Attribute parsing for the Record derive macro.
//!
//! This module parses the `#[query(...)]` field attributes used by the
//! `Record` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    /// Field may be used in query parameter filters.
    pub filterable: bool,
    /// Field may be used as the query sort key.
    pub sortable: bool,
    /// Hide the field from the engine entirely.
    pub skip: bool,
    /// External parameter name (default: snake_case of the field name).
    pub column: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            filterable: false,
            sortable: false,
            skip: false,
            column: None,
            span: Span::call_site(),
        }
    }
}

impl QueryAttr {
    /// Returns `true` if the field belongs in the query registry.
    pub fn is_registered(&self) -> bool {
        self.filterable || self.sortable
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr {
            span: input.span(),
            ..QueryAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("filterable") => attr.filterable = true,
                Meta::Path(p) if p.is_ident("sortable") => attr.sortable = true,
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,

                // column = "external_name"
                Meta::NameValue(nv) if nv.path.is_ident("column") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        if s.value().is_empty() {
                            return Err(Error::new(s.span(), "column must not be empty"));
                        }
                        attr.column = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "column must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: filterable, sortable, skip, or column = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && (attr.is_registered() || attr.column.is_some()) {
            return Err(Error::new(
                attr.span,
                "skip cannot be combined with filterable, sortable or column",
            ));
        }
        if attr.column.is_some() && !attr.is_registered() {
            return Err(Error::new(
                attr.span,
                "column requires filterable or sortable",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_query(tokens: &str) -> Result<QueryAttr> {
        syn::parse_str::<QueryAttr>(tokens)
    }

    #[test]
    fn test_query_filterable() {
        let attr = parse_query("filterable").unwrap();
        assert!(attr.filterable);
        assert!(!attr.sortable);
        assert!(attr.is_registered());
    }

    #[test]
    fn test_query_both_flags() {
        let attr = parse_query("filterable, sortable").unwrap();
        assert!(attr.filterable);
        assert!(attr.sortable);
    }

    #[test]
    fn test_query_column() {
        let attr = parse_query(r#"sortable, column = "created""#).unwrap();
        assert!(attr.sortable);
        assert_eq!(attr.column, Some("created".to_string()));
    }

    #[test]
    fn test_query_skip() {
        let attr = parse_query("skip").unwrap();
        assert!(attr.skip);
        assert!(!attr.is_registered());
    }

    #[test]
    fn test_query_skip_conflicts() {
        let result = parse_query("skip, filterable");
        assert!(result.unwrap_err().to_string().contains("skip cannot be combined"));
    }

    #[test]
    fn test_query_column_needs_flag() {
        let result = parse_query(r#"column = "x""#);
        assert!(result.unwrap_err().to_string().contains("requires filterable"));
    }

    #[test]
    fn test_query_empty_column() {
        assert!(parse_query(r#"filterable, column = """#).is_err());
    }

    #[test]
    fn test_query_column_not_string() {
        let result = parse_query("filterable, column = 5");
        assert!(result.unwrap_err().to_string().contains("string literal"));
    }

    #[test]
    fn test_query_unknown() {
        let result = parse_query("searchable");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown query attribute"));
    }

    #[test]
    fn test_query_empty() {
        let attr = parse_query("").unwrap();
        assert!(!attr.is_registered());
        assert!(!attr.skip);
    }
}
