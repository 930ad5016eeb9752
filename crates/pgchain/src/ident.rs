//! SQL identifier quoting and column-name case conversion.
//!
//! Only identifiers passed through these helpers are escaped; everything else
//! a caller hands to a builder is raw SQL text.
//!
//! # Example
//! ```ignore
//! use pgchain::{quote_table_name, quote_column};
//!
//! assert_eq!(quote_table_name("users"), r#""users""#);
//! assert_eq!(quote_table_name("public.users"), "public.users");
//! assert_eq!(quote_column("createdAt"), r#""created_at""#);
//! ```

use heck::{ToLowerCamelCase, ToSnakeCase};

/// Quote a table name unless it is already quoted, schema-qualified, or
/// contains whitespace.
///
/// - `users` -> `"users"`
/// - `"public"."users"` -> unchanged
/// - `public.users` -> unchanged
/// - `my table` -> unchanged
pub fn quote_table_name(name: &str) -> String {
    let already_quoted = name.len() >= 2 && name.starts_with('"') && name.ends_with('"');
    let qualified = name.contains('.');
    let has_whitespace = name.chars().any(char::is_whitespace);

    if already_quoted || qualified || has_whitespace {
        name.to_string()
    } else {
        quote_ident(name)
    }
}

/// Turn a mapping key into a column reference: snake-cased, then double-quoted.
pub fn quote_column(key: &str) -> String {
    quote_ident(&snake_case(key))
}

/// Wrap a bare identifier in double quotes, escaping embedded quotes as `""`.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// `userId` -> `user_id`. Already snake-cased input is returned unchanged.
pub fn snake_case(s: &str) -> String {
    s.to_snake_case()
}

/// `user_id` -> `userId`. Already camel-cased input is returned unchanged.
pub fn camel_case(s: &str) -> String {
    s.to_lower_camel_case()
}
