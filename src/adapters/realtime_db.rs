use crate::adapters::endpoint;
use crate::core::report::Reportable;
use crate::domain::model::{Credential, HttpMethod, RawResponse, RequestDescriptor};
use crate::domain::ports::ApiCall;
use crate::utils::error::Result;
use crate::utils::validation::validate_remote_path;
use url::Url;

/// What gets written at the config path.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// The credential itself (the upload token shared with the web front-end).
    Credential,
    Json(serde_json::Value),
}

impl ConfigValue {
    /// Valid JSON is written as-is, anything else as a JSON string.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ConfigValue::Json(value),
            Err(_) => ConfigValue::Json(serde_json::Value::String(raw.to_string())),
        }
    }
}

/// `PUT {base}/config/<path>.json` on a realtime database REST endpoint.
#[derive(Debug, Clone)]
pub struct SetConfigValue {
    base_url: Url,
    path: String,
    value: ConfigValue,
}

impl SetConfigValue {
    pub fn new(base_url: Url, path: impl Into<String>, value: ConfigValue) -> Result<Self> {
        let path = path.into().trim_matches('/').to_string();
        validate_remote_path("realtime_db.path", &path)?;
        Ok(Self {
            base_url,
            path,
            value,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSaved {
    pub path: String,
}

impl Reportable for ConfigSaved {
    fn headline(&self) -> String {
        format!("config/{} saved to the realtime database", self.path)
    }
}

impl ApiCall for SetConfigValue {
    type Output = ConfigSaved;

    fn name(&self) -> &str {
        "set-config"
    }

    fn describe(&self, credential: &Credential) -> Result<RequestDescriptor> {
        let url = endpoint(&self.base_url, &format!("config/{}.json", self.path))?;
        let body = match &self.value {
            ConfigValue::Credential => serde_json::Value::String(credential.expose().to_string()),
            ConfigValue::Json(value) => value.clone(),
        };

        Ok(RequestDescriptor::builder(HttpMethod::Put, url)
            .header("Content-Type", "application/json")
            .json(body)
            .build())
    }

    /// The database echoes the stored value back. It may be the credential,
    /// so only the status matters; an empty body is still a write.
    fn interpret(&self, _response: RawResponse) -> Result<ConfigSaved> {
        Ok(ConfigSaved {
            path: self.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example-rtdb.firebaseio.com").unwrap()
    }

    #[test]
    fn test_describe_writes_credential_by_default() {
        let call = SetConfigValue::new(base(), "github/token", ConfigValue::Credential).unwrap();
        let credential = Credential::new("ghp_upload_token").unwrap();

        let request = call.describe(&credential).unwrap();

        assert_eq!(request.method(), HttpMethod::Put);
        assert_eq!(
            request.url().as_str(),
            "https://example-rtdb.firebaseio.com/config/github/token.json"
        );
        assert_eq!(request.body(), &serde_json::json!("ghp_upload_token"));
    }

    #[test]
    fn test_describe_with_explicit_value() {
        let call = SetConfigValue::new(base(), "/site/maintenance/", ConfigValue::parse("true"))
            .unwrap();
        let credential = Credential::new("ghp_upload_token").unwrap();

        let request = call.describe(&credential).unwrap();

        assert_eq!(call.path(), "site/maintenance");
        assert_eq!(request.body(), &serde_json::json!(true));
    }

    #[test]
    fn test_config_value_parse() {
        assert_eq!(ConfigValue::parse("42"), ConfigValue::Json(serde_json::json!(42)));
        assert_eq!(
            ConfigValue::parse("plain text"),
            ConfigValue::Json(serde_json::json!("plain text"))
        );
        assert_eq!(
            ConfigValue::parse("{\"a\":1}"),
            ConfigValue::Json(serde_json::json!({"a": 1}))
        );
    }

    #[test]
    fn test_rejects_traversal_path() {
        assert!(SetConfigValue::new(base(), "github/../secrets", ConfigValue::Credential).is_err());
        assert!(SetConfigValue::new(base(), "", ConfigValue::Credential).is_err());
    }

    #[test]
    fn test_interpret_tolerates_empty_body() {
        let call = SetConfigValue::new(base(), "github/token", ConfigValue::Credential).unwrap();
        let saved = call
            .interpret(RawResponse {
                status: 200,
                headers: vec![],
                body: String::new(),
            })
            .unwrap();
        assert_eq!(saved.path, "github/token");
        assert_eq!(saved.headline(), "config/github/token saved to the realtime database");
    }

    #[test]
    fn test_report_never_echoes_the_stored_credential() {
        let call = SetConfigValue::new(base(), "github/token", ConfigValue::Credential).unwrap();
        let saved = call
            .interpret(RawResponse {
                status: 200,
                headers: vec![],
                body: "\"ghp_upload_token\"".to_string(),
            })
            .unwrap();

        let mut out = Vec::new();
        crate::core::report::write_outcome(&mut out, "Saving config value", &Ok(saved)).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with("✅ config/github/token saved"));
        assert!(!report.contains("ghp_upload_token"));
    }
}
