use crate::application::builders::token_classifier::{ClassifiedToken, classify};
use crate::domain::entities::{Method, Request};
use crate::domain::errors::BuildError;
use crate::domain::field_tree::FieldTree;
use crate::domain::value_objects::{JsonBody, QueryParams, Url};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// A built request plus the arguments that matched no item syntax
#[derive(Debug, Clone)]
pub struct AssembledRequest {
    pub request: Request,
    pub unrecognized: Vec<String>,
}

/// Accumulates request items on top of a resolved method and URL
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    query: QueryParams,
    fields: FieldTree,
    unrecognized: Vec<String>,
}

impl RequestBuilder {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            query: QueryParams::new(),
            fields: FieldTree::new(),
            unrecognized: Vec::new(),
        }
    }

    /// Builds a request from `[METHOD] HOST [ITEM...]`
    ///
    /// Nothing is returned on error; arguments that are not items are
    /// collected in [`AssembledRequest::unrecognized`] instead of failing.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<AssembledRequest, BuildError> {
        let (method, host, items) = match tokens {
            [] => return Err(BuildError::MissingHost),
            [first, rest @ ..] => match first.as_ref().parse::<Method>() {
                Ok(method) => match rest {
                    [] => return Err(BuildError::MissingHost),
                    [host, items @ ..] => (method, host.as_ref(), items),
                },
                Err(_) => (Method::Get, first.as_ref(), rest),
            },
        };

        let url = Url::normalize_host(host)?;
        items
            .iter()
            .try_fold(Self::new(method, url), |builder, token| builder.token(token.as_ref()))?
            .build()
    }

    /// Routes one argument into headers, query, or fields
    pub fn token(mut self, token: &str) -> Result<Self, BuildError> {
        if token.is_empty() {
            return Ok(self);
        }

        let classified = classify(token);
        if let Some(classified) = &classified {
            tracing::trace!(key = classified.key(), kind = ?classified.kind(), "classified argument");
        }

        match classified {
            None => self.unrecognized.push(token.to_string()),
            Some(ClassifiedToken::Header { name, value }) => {
                let (name, value) = header_pair(token, &name, &value)?;
                self.headers.append(name, value);
            }
            Some(ClassifiedToken::Query { name, value }) => self.query.append(name, value),
            Some(ClassifiedToken::Field { path, value }) => {
                self.field(token, &path, Value::String(value))?
            }
            Some(ClassifiedToken::JsonField { path, value }) => self.field(token, &path, value)?,
        }
        Ok(self)
    }

    fn field(&mut self, token: &str, path: &str, value: Value) -> Result<(), BuildError> {
        self.fields
            .insert(path, value)
            .map_err(|source| BuildError::FieldConflict {
                token: token.to_string(),
                source,
            })
    }

    pub fn build(self) -> Result<AssembledRequest, BuildError> {
        let body = JsonBody::from_fields(&self.fields)?;
        let mut url = self.url;
        url.append_query(&self.query);

        Ok(AssembledRequest {
            request: Request {
                method: self.method,
                url,
                headers: self.headers,
                query: self.query,
                body,
            },
            unrecognized: self.unrecognized,
        })
    }
}

fn header_pair(
    token: &str,
    name: &str,
    value: &str,
) -> Result<(HeaderName, HeaderValue), BuildError> {
    let invalid = |reason: String| BuildError::InvalidHeader {
        token: token.to_string(),
        reason,
    };
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((name, value))
}
