use crate::utils::error::{Result, RunnerError};
use crate::utils::validation::{validate_email, validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const UPLOAD_TOKEN_ENV: &str = "IMAGE_UPLOAD_TOKEN";
pub const EMAIL_TOKEN_ENV: &str = "MAILERSEND_API_TOKEN";

/// Endpoints and defaults for every integration. Every section is optional
/// in the file; missing values fall back to the built-in deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub http: HttpConfig,
    pub realtime_db: RealtimeDbConfig,
    pub content: ContentConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeDbConfig {
    pub base_url: String,
    pub path: String,
    pub token_env: String,
}

impl Default for RealtimeDbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sgsa-kids-default-rtdb.firebaseio.com".to_string(),
            path: "github/token".to_string(),
            token_env: UPLOAD_TOKEN_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub directory: String,
    pub token_env: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            owner: "mbaskhairoun".to_string(),
            repo: "SGSA-Pics".to_string(),
            branch: "main".to_string(),
            directory: "announcements".to_string(),
            token_env: UPLOAD_TOKEN_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub base_url: String,
    pub token_env: String,
    pub from_email: String,
    pub from_name: Option<String>,
    pub to_email: Option<String>,
    pub to_name: Option<String>,
    pub subject: Option<String>,
    pub template_id: Option<String>,
    pub personalization: BTreeMap<String, String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mailersend.com".to_string(),
            token_env: EMAIL_TOKEN_ENV.to_string(),
            from_email: "info@sgsascouts.ca".to_string(),
            from_name: Some("SGSA Scouts".to_string()),
            to_email: None,
            to_name: None,
            subject: None,
            template_id: None,
            personalization: BTreeMap::new(),
        }
    }
}

impl ProfileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RunnerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RunnerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables stay as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RunnerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 600)?;

        validate_url("realtime_db.base_url", &self.realtime_db.base_url)?;
        validate_non_empty_string("realtime_db.token_env", &self.realtime_db.token_env)?;

        validate_url("content.base_url", &self.content.base_url)?;
        validate_non_empty_string("content.owner", &self.content.owner)?;
        validate_non_empty_string("content.repo", &self.content.repo)?;
        validate_non_empty_string("content.branch", &self.content.branch)?;
        validate_non_empty_string("content.token_env", &self.content.token_env)?;

        validate_url("email.base_url", &self.email.base_url)?;
        validate_non_empty_string("email.token_env", &self.email.token_env)?;
        validate_email("email.from_email", &self.email.from_email)?;
        if let Some(to) = &self.email.to_email {
            validate_email("email.to_email", to)?;
        }
        Ok(())
    }
}
