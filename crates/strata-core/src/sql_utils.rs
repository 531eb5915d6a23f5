//! SQL identifier helpers for dynamically named tables.

/// Quote a SQL identifier, doubling any embedded double quotes.
///
/// ```
/// use strata_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("ledger"), r#""ledger""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote each `.`-separated component of a possibly schema-qualified name.
///
/// ```
/// use strata_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("ops.ledger"), r#""ops"."ledger""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether `name` is `ident` or `schema.ident`, where each part starts with a
/// letter or underscore and continues with letters, digits or underscores.
pub fn is_qualified_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    (1..=2).contains(&parts.len()) && parts.iter().all(|p| is_identifier(p))
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split `schema.table` into its schema (if any) and table parts.
pub fn split_schema(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((schema, table)) => (Some(schema), table),
        None => (None, name),
    }
}
