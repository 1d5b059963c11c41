use crate::ErrorKind;
use serde::Serialize;
use std::{convert::TryFrom, fmt::Display, str::FromStr};

/// A decoded API response.
///
/// Objects keep the key order of the response document.
pub type Payload = serde_json::Value;

/// Pacing policy for a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallMode {
    /// Sleep until the API cooldown has elapsed, then send
    Safe,
    /// Ignore the cooldown and send right away
    Force,
    /// Send only if the API is ready, drop the call otherwise
    Fast,
}

impl Default for CallMode {
    fn default() -> Self {
        CallMode::Safe
    }
}

impl CallMode {
    /// Whether transient failures are retried in this mode
    pub fn retries_failures(self) -> bool {
        !matches!(self, CallMode::Fast)
    }
}

impl Display for CallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let out = match self {
            CallMode::Safe => "safe",
            CallMode::Force => "force",
            CallMode::Fast => "fast",
        };
        write!(f, "{}", out)
    }
}

impl FromStr for CallMode {
    type Err = ErrorKind;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.to_lowercase().as_ref() {
            "safe" | "0" => Ok(CallMode::Safe),
            "force" | "1" => Ok(CallMode::Force),
            "fast" | "-1" => Ok(CallMode::Fast),
            _ => Err(ErrorKind::InvalidArgument(format!(
                "Only `safe`, `force` and `fast` modes allowed, got {}",
                mode
            ))),
        }
    }
}

/// Specifies how a request is sent to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
}

impl Default for RequestMethod {
    fn default() -> Self {
        RequestMethod::Get
    }
}

impl TryFrom<String> for RequestMethod {
    type Error = ErrorKind;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_ref() {
            "get" => Ok(RequestMethod::Get),
            "post" => Ok(RequestMethod::Post),
            _ => Err(ErrorKind::InvalidArgument(format!(
                "Only `get` and `post` allowed, got {}",
                value
            ))),
        }
    }
}

/// Ordered set of query or form parameters.
///
/// Serializes as a sequence of pairs, which is what `reqwest` expects for
/// both `query` and `form`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Params(Vec::new())
    }

    /// Set `key` to `value`, replacing an earlier value for the same key
    pub fn insert<K: Into<String>, V: ToString>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Add `key` without replacing earlier values, for list parameters
    /// such as `teamA=1&teamA=2`
    pub fn append<K: Into<String>, V: ToString>(&mut self, key: K, value: V) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Builder-style variant of [`Params::insert`]
    pub fn with<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TryFrom<&str> for Params {
    type Error = ErrorKind;

    /// Parse a `key=value` pair, as given on the command line.
    /// A bare `key` becomes a flag with an empty value.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Err(ErrorKind::InvalidArgument(
                "Parameter should be of the form key=value, got an empty string".to_string(),
            ));
        }
        let (key, value) = match s.find('=') {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => (s, ""),
        };
        if key.is_empty() {
            return Err(ErrorKind::InvalidArgument(format!(
                "Parameter should be of the form key=value, got {}",
                s
            )));
        }
        Ok(Params::new().with(key, value))
    }
}

impl Extend<(String, String)> for Params {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One outbound call: endpoint path relative to the API host, parameters
/// and the HTTP method to send them with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub endpoint: String,
    pub params: Params,
    pub method: RequestMethod,
}

impl Request {
    pub fn new<S: Into<String>>(endpoint: S, params: Params, method: RequestMethod) -> Self {
        Request {
            endpoint: endpoint.into(),
            params,
            method,
        }
    }

    pub fn get<S: Into<String>>(endpoint: S) -> Self {
        Request::new(endpoint, Params::new(), RequestMethod::Get)
    }

    pub fn post<S: Into<String>>(endpoint: S) -> Self {
        Request::new(endpoint, Params::new(), RequestMethod::Post)
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method = match self.method {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        };
        write!(f, "{} /{}", method, self.endpoint)
    }
}
