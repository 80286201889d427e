//! Catalog Web Server
//!
//! REST service for accounts and catalog items.

use anyhow::Context;
use catalog_core::{init_logging, AppConfig, LoggingConfig};
use catalog_web::config_validator::ConfigValidator;
use catalog_web::server::CatalogServerBuilder;
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Catalog Web Server - accounts and catalog items behind bearer token auth
#[derive(Parser)]
#[command(name = "catalog-web")]
#[command(about = "REST service for accounts and catalog items")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Database URL, e.g. sqlite:data/catalog.db
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.dev {
            config.server.dev_mode = true;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
    }
}

/// Parse arguments once `.env` is loaded, so its values back the `env` fallbacks
fn parse_args<I, T>(env_file: Option<&Path>, argv: I) -> Args
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    Args::parse_from(argv)
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env().context("reading environment")?;
    args.apply(&mut config);
    Ok(config)
}

fn logging_for(config: &AppConfig, args: &Args) -> LoggingConfig {
    let mut logging = if config.is_dev() {
        LoggingConfig::development()
    } else {
        config.logging.clone()
    };
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }
    logging
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args(None, std::env::args_os());
    let config = load_config(&args)?;

    init_logging(&logging_for(&config, &args))
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;

    let report = ConfigValidator::validate_config(&config);
    ConfigValidator::log_validation_result(&report);
    if !report.is_valid {
        anyhow::bail!("configuration is invalid");
    }

    info!(
        env = %config.app_env,
        database = config.database.url.as_deref().unwrap_or("memory"),
        "Starting catalog web server"
    );

    let server = CatalogServerBuilder::with_config(config)
        .build()
        .await
        .context("building server")?;

    server.start().await.context("running server")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["catalog-web"]);
        assert!(args.host.is_none());
        assert!(args.port.is_none());
        assert!(!args.dev);

        let args = Args::parse_from([
            "catalog-web",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--dev",
            "--database-url",
            "sqlite::memory:",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.dev_mode);
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_dotenv_feeds_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "CATALOG_CONFIG=/etc/catalog/from-dotenv.toml\n").unwrap();

        let args = parse_args(Some(&env_file), ["catalog-web"]);
        assert_eq!(
            args.config.as_deref(),
            Some(Path::new("/etc/catalog/from-dotenv.toml"))
        );
    }

    #[test]
    fn test_log_level_override() {
        let args = Args::parse_from(["catalog-web", "--log-level", "trace"]);
        let logging = logging_for(&AppConfig::default(), &args);
        assert_eq!(logging.level, "trace");
    }
}
