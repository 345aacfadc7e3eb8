use crate::domain::errors::BuildError;
use crate::domain::field_tree::FieldTree;
use std::collections::BTreeMap;
use std::fmt;

/// Represents a validated request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub url::Url);

impl Url {
    /// Expands a terse host argument into a full URL
    ///
    /// # Arguments
    /// * `host` - What the user typed: `:`, `localhost`, `:8080/path`, `/path`,
    ///   `example.com/path` or a fully qualified `http(s)://` URL
    ///
    /// # Returns
    /// * `Ok(Url)` - The normalized URL
    /// * `Err(BuildError::HostParse)` - If the expanded string is not a URL
    pub fn normalize_host(host: &str) -> Result<Self, BuildError> {
        let expanded = match host {
            ":" | "localhost" => "http://localhost/".to_string(),
            local if local.starts_with(':') || local.starts_with('/') => {
                format!("http://localhost{local}")
            }
            qualified if qualified.starts_with("http://") || qualified.starts_with("https://") => {
                qualified.to_string()
            }
            bare => format!("http://{bare}"),
        };

        url::Url::parse(&expanded)
            .map(Url)
            .map_err(|source| BuildError::HostParse {
                host: host.to_string(),
                source,
            })
    }

    /// Appends query pairs after whatever query the host argument already carried
    pub fn append_query(&mut self, query: &QueryParams) {
        if query.is_empty() {
            return;
        }
        self.0.query_pairs_mut().extend_pairs(query.pairs());
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued query parameters, kept in key order with values in the order
/// they were given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattens to `(key, value)` pairs, one per value
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }
}

/// Represents an encoded JSON request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBody(pub Vec<u8>);

impl JsonBody {
    /// Encodes the field tree, or returns `None` when no fields were given
    ///
    /// # Returns
    /// * `Ok(Some(JsonBody))` - The encoded fields
    /// * `Ok(None)` - The tree is empty, the request carries no body
    /// * `Err(BuildError::Serialize)` - If encoding fails
    pub fn from_fields(fields: &FieldTree) -> Result<Option<Self>, BuildError> {
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(JsonBody(fields.to_json()?)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
