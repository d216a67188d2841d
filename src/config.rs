use std::collections::BTreeMap;

use url::Url;

/// Shared request defaults: base URL, headers and query parameters merged
/// into every request built against it.
///
/// Constructed once at wiring time and shared read-only; endpoint-supplied
/// values override these defaults on key collision.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    base_url: Url,
    headers: BTreeMap<String, String>,
    query_parameters: BTreeMap<String, String>,
}

impl NetworkConfig {
    /// Creates a configuration from an absolute base URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            base_url,
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
        })
    }

    /// Adds default headers sent with every request.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds default query parameters appended to every request URL.
    pub fn with_query_parameters<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_parameters
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_base_url() {
        assert!(NetworkConfig::new("/not/absolute").is_err());
        assert!(NetworkConfig::new("api.example.com").is_err());
    }

    #[test]
    fn accepts_absolute_base_url() {
        let config = NetworkConfig::new("https://api.example.com").unwrap();
        assert_eq!(config.base_url().scheme(), "https");
    }

    #[test]
    fn collects_defaults() {
        let config = NetworkConfig::new("https://api.example.com")
            .unwrap()
            .with_headers([("accept", "application/json")])
            .with_query_parameters([("api_key", "k")]);
        assert_eq!(
            config.headers().get("accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            config.query_parameters().get("api_key").map(String::as_str),
            Some("k")
        );
    }
}
