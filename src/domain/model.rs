use serde::Serialize;
use std::fmt;
use url::Url;

/// Result of a single remote call, consumed immediately by the report step.
pub type Outcome<T> = crate::utils::error::Result<T>;

/// Secret token read from the environment. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
}

impl Credential {
    /// Empty or whitespace-only values count as absent.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self { value })
        }
    }

    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    /// `...` followed by the last characters; short tokens are fully masked.
    pub fn hint(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("...{}", tail)
    }

    /// A stand-in whose value is the hint, for building requests that are
    /// displayed rather than sent.
    pub fn masked(&self) -> Self {
        Self { value: self.hint() }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.hint()).finish()
    }
}

/// The credential a command needs, together with the variable it comes from.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    pub var: String,
    pub credential: Option<Credential>,
}

impl EnvCredential {
    pub fn from_env(var: impl Into<String>) -> Self {
        let var = var.into();
        let credential = Credential::from_env(&var);
        Self { var, credential }
    }

    pub fn with_value(var: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            var: var.into(),
            credential: value.and_then(Credential::new),
        }
    }

    pub fn require(&self) -> crate::utils::error::Result<&Credential> {
        self.credential
            .as_ref()
            .ok_or_else(|| crate::utils::error::RunnerError::MissingCredential {
                var: self.var.clone(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Put,
    Post,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Put => f.write_str("PUT"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// A ready-to-send request. Fields are only reachable through getters, so a
/// descriptor cannot change once `build` has returned.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: Url,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

impl RequestDescriptor {
    pub fn builder(method: HttpMethod, url: Url) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder {
            method,
            url,
            headers: Vec::new(),
            body: serde_json::Value::Null,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        writeln!(f)?;
        let body = serde_json::to_string_pretty(&self.body).map_err(|_| fmt::Error)?;
        f.write_str(&body)
    }
}

pub struct RequestDescriptorBuilder {
    method: HttpMethod,
    url: Url,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

impl RequestDescriptorBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> RequestDescriptor {
        RequestDescriptor {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> crate::utils::error::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_rejects_blank_values() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        assert!(Credential::new("ghp_token").is_some());
    }

    #[test]
    fn test_env_credential_require() {
        let missing = EnvCredential::with_value("MAILERSEND_API_TOKEN", None);
        match missing.require() {
            Err(crate::utils::error::RunnerError::MissingCredential { var }) => {
                assert_eq!(var, "MAILERSEND_API_TOKEN")
            }
            other => panic!("expected MissingCredential, got {:?}", other),
        }

        let empty = EnvCredential::with_value("MAILERSEND_API_TOKEN", Some(""));
        assert!(empty.require().is_err());

        let present = EnvCredential::with_value("MAILERSEND_API_TOKEN", Some("token"));
        assert_eq!(present.require().unwrap().expose(), "token");
    }

    #[test]
    fn test_credential_hint_hides_secret() {
        let short = Credential::new("abc123").unwrap();
        assert_eq!(short.hint(), "******");

        let long = Credential::new("mlsn.0123456789abcdefXYZ").unwrap();
        assert_eq!(long.hint(), "...bcdefXYZ");
        assert!(!format!("{:?}", long).contains("mlsn.0123"));
    }

    #[test]
    fn test_masked_credential_carries_only_the_hint() {
        let credential = Credential::new("super-secret-token-value").unwrap();
        let masked = credential.masked();
        assert_eq!(masked.expose(), "...en-value");
        assert!(!masked.expose().contains("super-secret"));

        let short = Credential::new("main").unwrap();
        assert_eq!(short.masked().expose(), "****");
    }

    #[test]
    fn test_descriptor_display() {
        let request = RequestDescriptor::builder(
            HttpMethod::Put,
            Url::parse("https://db.example.com/config/github/token.json").unwrap(),
        )
        .header("Content-Type", "application/json")
        .json(serde_json::json!({"branch": "main"}))
        .build();

        assert_eq!(
            request.to_string(),
            "PUT https://db.example.com/config/github/token.json\n\
             Content-Type: application/json\n\
             \n\
             {\n  \"branch\": \"main\"\n}"
        );
    }

    #[test]
    fn test_raw_response_success_range() {
        let mut response = RawResponse {
            status: 200,
            headers: vec![("X-Message-Id".to_string(), "abc".to_string())],
            body: String::new(),
        };
        assert!(response.is_success());
        assert_eq!(response.header("x-message-id"), Some("abc"));
        response.status = 299;
        assert!(response.is_success());
        response.status = 300;
        assert!(!response.is_success());
        response.status = 199;
        assert!(!response.is_success());
    }
}
