pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "api-runner")]
#[command(about = "Run one verified call against a remote HTTP API")]
pub struct CliConfig {
    /// TOML profile with endpoints and defaults
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the environment variable the credential is read from
    #[arg(long, global = true)]
    pub token_env: Option<String>,

    /// Request timeout in seconds (overrides the profile)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Print the request that would be sent, with the credential redacted
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a value under config/ in the realtime database
    SetConfig {
        #[arg(long)]
        base_url: Option<String>,

        /// Path under config/, e.g. github/token
        #[arg(long)]
        path: Option<String>,

        /// JSON or plain-string value; defaults to the credential itself
        #[arg(long)]
        value: Option<String>,
    },

    /// Upload a file to the repository contents API
    Upload {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        owner: Option<String>,

        #[arg(long)]
        repo: Option<String>,

        #[arg(long)]
        branch: Option<String>,

        /// Remote directory the file lands in
        #[arg(long)]
        dir: Option<String>,

        /// Local file to upload instead of the built-in test content
        #[arg(long)]
        file: Option<String>,

        /// Remote file name; defaults to a timestamped name
        #[arg(long)]
        name: Option<String>,

        /// Commit message
        #[arg(long)]
        message: Option<String>,
    },

    /// Send a template email with personalization variables
    EmailTemplate {
        #[command(flatten)]
        email: EmailArgs,

        #[arg(long)]
        template_id: Option<String>,

        /// Personalization variable, repeatable
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
    },

    /// Send an email with HTML and plain-text bodies
    EmailSimple {
        #[command(flatten)]
        email: EmailArgs,

        #[arg(long)]
        html_file: Option<String>,

        #[arg(long)]
        text_file: Option<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct EmailArgs {
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub from: Option<String>,

    #[arg(long)]
    pub from_name: Option<String>,

    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub to_name: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,
}

#[cfg(feature = "cli")]
fn parse_key_val(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}
