use serde_json::Value;

/// Characters that end the key part of an item.
const KEY_TERMINATORS: [char; 3] = [':', '=', '@'];

/// Separators in match priority: two-character forms before their prefixes.
const SEPARATORS: [(&str, TokenKind); 4] = [
    ("==", TokenKind::Query),
    (":=", TokenKind::JsonField),
    ("=", TokenKind::Field),
    (":", TokenKind::Header),
];

/// Where an item ends up in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `name:value`
    Header,
    /// `name==value`
    Query,
    /// `path=value`, a string field
    Field,
    /// `path:=literal`, a JSON-typed field
    JsonField,
}

/// A request item split into its parts
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedToken {
    Header { name: String, value: String },
    Query { name: String, value: String },
    Field { path: String, value: String },
    JsonField { path: String, value: Value },
}

impl ClassifiedToken {
    pub fn kind(&self) -> TokenKind {
        match self {
            ClassifiedToken::Header { .. } => TokenKind::Header,
            ClassifiedToken::Query { .. } => TokenKind::Query,
            ClassifiedToken::Field { .. } => TokenKind::Field,
            ClassifiedToken::JsonField { .. } => TokenKind::JsonField,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ClassifiedToken::Header { name, .. } | ClassifiedToken::Query { name, .. } => name,
            ClassifiedToken::Field { path, .. } | ClassifiedToken::JsonField { path, .. } => path,
        }
    }
}

/// Splits `token` into key, separator and value.
///
/// The key is the leading run of characters up to the first `:`, `=` or `@`
/// and must not be empty. The separator is the highest-priority one that is
/// followed by a non-empty value, so `a:=` is the header `a` with value `=`.
/// Returns `None` for anything else, including keys ending in `@`.
pub fn classify(token: &str) -> Option<ClassifiedToken> {
    let key_end = token.find(KEY_TERMINATORS)?;
    if key_end == 0 {
        return None;
    }
    let (key, rest) = token.split_at(key_end);

    let (kind, value) = SEPARATORS.iter().find_map(|(separator, kind)| {
        rest.strip_prefix(separator)
            .filter(|value| !value.is_empty())
            .map(|value| (*kind, value))
    })?;

    let key = key.to_string();
    let classified = match kind {
        TokenKind::Header => ClassifiedToken::Header {
            name: key,
            value: value.to_string(),
        },
        TokenKind::Query => ClassifiedToken::Query {
            name: key,
            value: value.to_string(),
        },
        TokenKind::Field => ClassifiedToken::Field {
            path: key,
            value: value.to_string(),
        },
        TokenKind::JsonField => ClassifiedToken::JsonField {
            path: key,
            value: parse_literal(value),
        },
    };
    Some(classified)
}

/// Parses a JSON literal, keeping the raw text as a string when it is not one.
fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        tracing::debug!(value = raw, error = %err, "not a JSON literal, sending as a string");
        Value::String(raw.to_string())
    })
}
