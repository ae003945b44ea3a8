use crate::adapters::content_upload::{timestamped_name, Repository, UploadFile, TEST_CONTENT};
use crate::adapters::email::{default_html, default_text, EmailMessage, SendEmail};
use crate::adapters::realtime_db::{ConfigValue, SetConfigValue};
use crate::config::toml_config::ProfileConfig;
use crate::config::{Command, EmailArgs};
use crate::core::report::{self, Reportable};
use crate::core::runner::ApiCallRunner;
use crate::domain::model::EnvCredential;
use crate::domain::ports::{ApiCall, Transport};
use crate::utils::error::{Result, RunnerError};
use chrono::{DateTime, Local, Utc};
use std::io::Write;
use std::path::Path;
use url::Url;

/// A fully resolved command: one call plus the variable its credential lives in.
#[derive(Debug, Clone)]
pub struct PlannedCall {
    pub token_env: String,
    pub call: CallKind,
}

#[derive(Debug, Clone)]
pub enum CallKind {
    SetConfig(SetConfigValue),
    Upload(UploadFile),
    Email(SendEmail),
}

fn parse_url(field: &str, raw: &str) -> Result<Url> {
    crate::utils::validation::validate_url(field, raw)?;
    Url::parse(raw).map_err(|e| RunnerError::InvalidConfigValueError {
        field: field.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

impl PlannedCall {
    /// Merges command-line flags over the profile. `token_env` overrides the
    /// profile's variable for whichever command runs.
    pub fn plan(
        command: &Command,
        profile: &ProfileConfig,
        token_env: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let (default_env, call) = match command {
            Command::SetConfig {
                base_url,
                path,
                value,
            } => {
                let db = &profile.realtime_db;
                let base = parse_url(
                    "realtime_db.base_url",
                    base_url.as_deref().unwrap_or(&db.base_url),
                )?;
                let value = value
                    .as_deref()
                    .map(ConfigValue::parse)
                    .unwrap_or(ConfigValue::Credential);
                let call = SetConfigValue::new(base, path.as_deref().unwrap_or(&db.path), value)?;
                (db.token_env.clone(), CallKind::SetConfig(call))
            }
            Command::Upload {
                base_url,
                owner,
                repo,
                branch,
                dir,
                file,
                name,
                message,
            } => {
                let content_cfg = &profile.content;
                let repository = Repository {
                    base_url: parse_url(
                        "content.base_url",
                        base_url.as_deref().unwrap_or(&content_cfg.base_url),
                    )?,
                    owner: owner.clone().unwrap_or_else(|| content_cfg.owner.clone()),
                    repo: repo.clone().unwrap_or_else(|| content_cfg.repo.clone()),
                    branch: branch.clone().unwrap_or_else(|| content_cfg.branch.clone()),
                };

                let local = file.as_deref().map(Path::new);
                let content = match local {
                    Some(path) => std::fs::read(path)?,
                    None => TEST_CONTENT.to_vec(),
                };
                let file_name = name.clone().unwrap_or_else(|| timestamped_name(local, now));
                let directory = dir.as_deref().unwrap_or(&content_cfg.directory).trim_matches('/');
                let remote_path = if directory.is_empty() {
                    file_name
                } else {
                    format!("{}/{}", directory, file_name)
                };

                let mut call = UploadFile::new(repository, remote_path, content)?;
                if let Some(message) = message {
                    call = call.with_message(message.clone());
                }
                (content_cfg.token_env.clone(), CallKind::Upload(call))
            }
            Command::EmailTemplate {
                email,
                template_id,
                vars,
            } => {
                let cfg = &profile.email;
                let template_id = template_id
                    .clone()
                    .or_else(|| cfg.template_id.clone())
                    .ok_or_else(|| RunnerError::ConfigError {
                        message: "no template id: pass --template-id or set email.template_id"
                            .to_string(),
                    })?;

                let (builder, to_email, to_name) = email_base(email, profile)?;
                let mut variables = cfg.personalization.clone();
                variables.extend(vars.iter().cloned());
                if variables.is_empty() {
                    variables.insert(
                        "name".to_string(),
                        to_name.clone().unwrap_or_else(|| to_email.clone()),
                    );
                    if let Some(company) = email.from_name.clone().or_else(|| cfg.from_name.clone()) {
                        variables.insert("company".to_string(), company);
                    }
                }

                let builder = variables
                    .into_iter()
                    .fold(builder.template(template_id), |b, (k, v)| b.personalize(k, v));
                let subject = email
                    .subject
                    .clone()
                    .or_else(|| cfg.subject.clone())
                    .unwrap_or_else(|| "Test Email - Template".to_string());
                let message = builder.subject(subject).build()?;
                (
                    cfg.token_env.clone(),
                    CallKind::Email(SendEmail::new(email_url(email, profile)?, message)),
                )
            }
            Command::EmailSimple {
                email,
                html_file,
                text_file,
            } => {
                let cfg = &profile.email;
                let sent_at: DateTime<Local> = now.with_timezone(&Local);
                let html = match html_file {
                    Some(path) => std::fs::read_to_string(path)?,
                    None => default_html(sent_at),
                };
                let text = match text_file {
                    Some(path) => std::fs::read_to_string(path)?,
                    None => default_text(sent_at),
                };

                let (builder, _, _) = email_base(email, profile)?;
                let subject = email
                    .subject
                    .clone()
                    .or_else(|| cfg.subject.clone())
                    .unwrap_or_else(|| "Simple Test Email".to_string());
                let message = builder.subject(subject).html(html).text(text).build()?;
                (
                    cfg.token_env.clone(),
                    CallKind::Email(SendEmail::new(email_url(email, profile)?, message)),
                )
            }
        };

        Ok(Self {
            token_env: token_env.map(str::to_string).unwrap_or(default_env),
            call,
        })
    }

    /// Label used in failure lines, e.g. "Upload failed: 401".
    pub fn action(&self) -> &'static str {
        match self.call {
            CallKind::SetConfig(_) => "Saving config value",
            CallKind::Upload(_) => "Upload",
            CallKind::Email(_) => "Email send",
        }
    }

    pub fn credential_from_env(&self) -> EnvCredential {
        EnvCredential::from_env(&self.token_env)
    }

    /// Runs (or previews) the call and writes the report to `out`. The
    /// returned error is the same one already reported.
    pub async fn execute<T: Transport, W: Write>(
        &self,
        runner: &ApiCallRunner<T>,
        credential: &EnvCredential,
        dry_run: bool,
        out: &mut W,
    ) -> Result<()> {
        let action = self.action();
        match &self.call {
            CallKind::SetConfig(call) => run_one(runner, credential, call, action, dry_run, out).await,
            CallKind::Upload(call) => run_one(runner, credential, call, action, dry_run, out).await,
            CallKind::Email(call) => run_one(runner, credential, call, action, dry_run, out).await,
        }
    }
}

fn email_url(email: &EmailArgs, profile: &ProfileConfig) -> Result<Url> {
    parse_url(
        "email.base_url",
        email.base_url.as_deref().unwrap_or(&profile.email.base_url),
    )
}

fn email_base(
    email: &EmailArgs,
    profile: &ProfileConfig,
) -> Result<(crate::adapters::email::EmailMessageBuilder, String, Option<String>)> {
    let cfg = &profile.email;
    let to_email = email
        .to
        .clone()
        .or_else(|| cfg.to_email.clone())
        .ok_or_else(|| RunnerError::ConfigError {
            message: "no recipient: pass --to or set email.to_email".to_string(),
        })?;
    let to_name = email.to_name.clone().or_else(|| cfg.to_name.clone());
    let from_email = email.from.clone().unwrap_or_else(|| cfg.from_email.clone());
    let from_name = email.from_name.clone().or_else(|| cfg.from_name.clone());

    let builder = EmailMessage::builder()
        .from_email(from_email, from_name)
        .to(to_email.clone(), to_name.clone());
    Ok((builder, to_email, to_name))
}

async fn run_one<T, C, W>(
    runner: &ApiCallRunner<T>,
    credential: &EnvCredential,
    call: &C,
    action: &str,
    dry_run: bool,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    C: ApiCall,
    C::Output: Reportable,
    W: Write,
{
    if dry_run {
        return match runner.preview(credential, call) {
            Ok(preview) => {
                writeln!(out, "🔍 Dry run, nothing sent:")?;
                writeln!(out, "{}", preview)?;
                Ok(())
            }
            Err(e) => {
                for line in report::failure_lines(action, &e) {
                    writeln!(out, "{}", line)?;
                }
                Err(e)
            }
        };
    }

    if let Some(token) = &credential.credential {
        writeln!(out, "🔑 Token found ({}), sending request...", token.hint())?;
    }
    let outcome = runner.run(credential, call).await;
    report::write_outcome(out, action, &outcome)?;
    outcome.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn upload_command() -> Command {
        Command::Upload {
            base_url: None,
            owner: None,
            repo: None,
            branch: None,
            dir: None,
            file: None,
            name: None,
            message: None,
        }
    }

    #[test]
    fn test_plan_upload_uses_profile_defaults() {
        let planned = PlannedCall::plan(&upload_command(), &ProfileConfig::default(), None, now())
            .unwrap();

        assert_eq!(planned.token_env, "IMAGE_UPLOAD_TOKEN");
        match planned.call {
            CallKind::Upload(call) => {
                assert_eq!(call.remote_path(), "announcements/test-logo-1700000000.txt")
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_plan_token_env_override() {
        let planned = PlannedCall::plan(
            &upload_command(),
            &ProfileConfig::default(),
            Some("CI_UPLOAD_TOKEN"),
            now(),
        )
        .unwrap();
        assert_eq!(planned.token_env, "CI_UPLOAD_TOKEN");
    }

    #[test]
    fn test_plan_email_requires_recipient() {
        let command = Command::EmailSimple {
            email: EmailArgs::default(),
            html_file: None,
            text_file: None,
        };
        let err = PlannedCall::plan(&command, &ProfileConfig::default(), None, now()).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_plan_template_requires_template_id() {
        let command = Command::EmailTemplate {
            email: EmailArgs {
                to: Some("leader@example.org".to_string()),
                ..EmailArgs::default()
            },
            template_id: None,
            vars: vec![],
        };
        let err = PlannedCall::plan(&command, &ProfileConfig::default(), None, now()).unwrap_err();
        assert!(err.to_string().contains("template id"));
    }

    #[test]
    fn test_plan_template_default_personalization() {
        let command = Command::EmailTemplate {
            email: EmailArgs {
                to: Some("leader@example.org".to_string()),
                to_name: Some("Test Recipient".to_string()),
                ..EmailArgs::default()
            },
            template_id: Some("tmpl-1".to_string()),
            vars: vec![],
        };
        let planned = PlannedCall::plan(&command, &ProfileConfig::default(), None, now()).unwrap();

        match planned.call {
            CallKind::Email(call) => {
                let json = call.message().to_json();
                assert_eq!(json["personalization"][0]["data"]["name"], "Test Recipient");
                assert_eq!(json["personalization"][0]["data"]["company"], "SGSA Scouts");
                assert_eq!(json["template_id"], "tmpl-1");
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_plan_set_config_rejects_bad_base_url() {
        let command = Command::SetConfig {
            base_url: Some("ftp://db.example.com".to_string()),
            path: None,
            value: None,
        };
        assert!(PlannedCall::plan(&command, &ProfileConfig::default(), None, now()).is_err());
    }
}
