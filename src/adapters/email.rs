use crate::adapters::endpoint;
use crate::core::report::Reportable;
use crate::domain::model::{Credential, HttpMethod, RawResponse, RequestDescriptor};
use crate::domain::ports::ApiCall;
use crate::utils::error::{Result, RunnerError};
use crate::utils::validation::{validate_email, validate_non_empty_string, Validate};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mailbox {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mailbox {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmailContent {
    Template {
        template_id: String,
        variables: BTreeMap<String, String>,
    },
    Body {
        html: String,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub content: EmailContent,
}

impl EmailMessage {
    pub fn builder() -> EmailMessageBuilder {
        EmailMessageBuilder::default()
    }

    /// Provider wire format. Template variables are personalized per recipient.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "from": self.from,
            "to": self.to,
            "subject": self.subject,
        });

        match &self.content {
            EmailContent::Template {
                template_id,
                variables,
            } => {
                body["template_id"] = serde_json::json!(template_id);
                if !variables.is_empty() {
                    let personalization: Vec<serde_json::Value> = self
                        .to
                        .iter()
                        .map(|to| serde_json::json!({ "email": to.email, "data": variables }))
                        .collect();
                    body["personalization"] = serde_json::Value::Array(personalization);
                }
            }
            EmailContent::Body { html, text } => {
                body["html"] = serde_json::json!(html);
                body["text"] = serde_json::json!(text);
            }
        }
        body
    }
}

impl Validate for EmailMessage {
    fn validate(&self) -> Result<()> {
        validate_email("email.from", &self.from.email)?;
        if self.to.is_empty() {
            return Err(RunnerError::ConfigError {
                message: "email needs at least one recipient".to_string(),
            });
        }
        for to in &self.to {
            validate_email("email.to", &to.email)?;
        }
        validate_non_empty_string("email.subject", &self.subject)?;
        match &self.content {
            EmailContent::Template { template_id, .. } => {
                validate_non_empty_string("email.template_id", template_id)
            }
            EmailContent::Body { html, text } => {
                if html.trim().is_empty() && text.trim().is_empty() {
                    return Err(RunnerError::ConfigError {
                        message: "email needs an HTML or plain-text body".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct EmailMessageBuilder {
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    subject: Option<String>,
    template_id: Option<String>,
    variables: BTreeMap<String, String>,
    html: Option<String>,
    text: Option<String>,
}

impl EmailMessageBuilder {
    pub fn from_email(mut self, email: impl Into<String>, name: Option<String>) -> Self {
        self.from = Some(Mailbox::new(email, name));
        self
    }

    pub fn to(mut self, email: impl Into<String>, name: Option<String>) -> Self {
        self.to.push(Mailbox::new(email, name));
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn personalize(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// A template id wins over body content when both are set.
    pub fn build(self) -> Result<EmailMessage> {
        let from = self.from.ok_or_else(|| RunnerError::ConfigError {
            message: "email sender is not configured".to_string(),
        })?;
        let content = match self.template_id {
            Some(template_id) => EmailContent::Template {
                template_id,
                variables: self.variables,
            },
            None => EmailContent::Body {
                html: self.html.unwrap_or_default(),
                text: self.text.unwrap_or_default(),
            },
        };

        let message = EmailMessage {
            from,
            to: self.to,
            subject: self.subject.unwrap_or_default(),
            content,
        };
        message.validate()?;
        Ok(message)
    }
}

pub fn default_html(sent_at: DateTime<Local>) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h1 style="color: #2c5aa0;">Hello!</h1>
    <p>This is a simple test email sent through the transactional email API.</p>
    <p>If you received this email, the integration is working correctly.</p>
    <div style="background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <h3>Test Details:</h3>
        <ul>
            <li><strong>Sent at:</strong> {}</li>
            <li><strong>From:</strong> api-runner</li>
        </ul>
    </div>
</div>"#,
        sent_at.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn default_text(sent_at: DateTime<Local>) -> String {
    format!(
        "Hello!\n\n\
         This is a simple test email sent through the transactional email API.\n\
         If you received this email, the integration is working correctly.\n\n\
         Test Details:\n\
         - Sent at: {}\n\
         - From: api-runner\n",
        sent_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// `POST {base}/v1/email` with a bearer token.
#[derive(Debug, Clone)]
pub struct SendEmail {
    base_url: Url,
    message: EmailMessage,
}

impl SendEmail {
    pub fn new(base_url: Url, message: EmailMessage) -> Self {
        Self { base_url, message }
    }

    pub fn message(&self) -> &EmailMessage {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailAccepted {
    pub status: u16,
    pub message_id: Option<String>,
    pub recipients: Vec<String>,
}

impl Reportable for EmailAccepted {
    fn headline(&self) -> String {
        format!("Email sent successfully! (HTTP {})", self.status)
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![format!("To: {}", self.recipients.join(", "))];
        if let Some(id) = &self.message_id {
            lines.push(format!("Message id: {}", id));
        }
        lines
    }
}

impl ApiCall for SendEmail {
    type Output = EmailAccepted;

    fn name(&self) -> &str {
        match self.message.content {
            EmailContent::Template { .. } => "email-template",
            EmailContent::Body { .. } => "email-simple",
        }
    }

    fn describe(&self, credential: &Credential) -> Result<RequestDescriptor> {
        let url = endpoint(&self.base_url, "v1/email")?;
        Ok(RequestDescriptor::builder(HttpMethod::Post, url)
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .json(self.message.to_json())
            .build())
    }

    fn interpret(&self, response: RawResponse) -> Result<EmailAccepted> {
        Ok(EmailAccepted {
            status: response.status,
            message_id: response.header("x-message-id").map(str::to_string),
            recipients: self.message.to.iter().map(ToString::to_string).collect(),
        })
    }

    /// Validation failures (422) come back as `{"message", "errors"}`.
    fn reject(&self, response: RawResponse) -> RunnerError {
        if response.status == 422 {
            if let Ok(json) = response.json() {
                if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                    let mut message = message.to_string();
                    if let Some(errors) = json.get("errors").and_then(|e| e.as_object()) {
                        let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                        message = format!("{} [{}]", message, fields.join(", "));
                    }
                    return RunnerError::Provider {
                        status: response.status,
                        message,
                    };
                }
            }
        }
        RunnerError::NonSuccessStatus {
            status: response.status,
            body: response.body,
        }
    }
}
