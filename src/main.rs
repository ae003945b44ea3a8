use api_runner::utils::{logger, validation::Validate};
use api_runner::{ApiCallRunner, CliConfig, HttpSettings, HttpTransport, PlannedCall, ProfileConfig};
use clap::Parser;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let mut profile = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading profile from: {}", path);
            match ProfileConfig::from_file(path) {
                Ok(profile) => profile,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(e.exit_code());
                }
            }
        }
        None => ProfileConfig::default(),
    };

    if let Some(timeout) = config.timeout_secs {
        profile.http.timeout_seconds = timeout;
    }

    if let Err(e) = profile.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let planned = match PlannedCall::plan(
        &config.command,
        &profile,
        config.token_env.as_deref(),
        chrono::Utc::now(),
    ) {
        Ok(planned) => planned,
        Err(e) => {
            tracing::error!("❌ Could not prepare request: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let settings = HttpSettings {
        timeout: Duration::from_secs(profile.http.timeout_seconds),
        user_agent: profile
            .http
            .user_agent
            .clone()
            .unwrap_or_else(|| HttpSettings::default().user_agent),
    };
    let transport = match HttpTransport::new(&settings) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    let runner = ApiCallRunner::new(transport);

    let credential = planned.credential_from_env();
    let mut stdout = std::io::stdout();

    if let Err(e) = planned
        .execute(&runner, &credential, config.dry_run, &mut stdout)
        .await
    {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            planned.action(),
            e,
            e.category(),
            e.severity()
        );
        std::process::exit(e.exit_code());
    }
}
