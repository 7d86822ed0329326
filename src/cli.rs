//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::clock::SystemClock;
use crate::db::Database;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Deployment platform.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    Dev,
    #[default]
    Prod,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Chirpy", about = "Short-form posting service")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "chirpy.db")]
    pub database: String,

    /// Deployment platform. `dev` enables the reset endpoint
    #[arg(long, env = "PLATFORM", default_value = "prod")]
    pub platform: Platform,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Load the payment provider's webhook key from `POLKA_KEY`.
/// Returns None and logs an error if it is missing or empty.
pub fn load_polka_key() -> Option<String> {
    match std::env::var("POLKA_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            // SAFETY: same as JWT_SECRET above, still single-threaded startup.
            unsafe { std::env::remove_var("POLKA_KEY") };
            Some(key.trim().to_string())
        }
        _ => {
            error!("POLKA_KEY environment variable is required");
            None
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    polka_key: String,
    platform: Platform,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        polka_key,
        platform,
        clock: Arc::new(SystemClock),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["chirpy"]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.database, "chirpy.db");
        assert!(args.jwt_secret_file.is_none());
    }

    #[test]
    fn test_platform_flag() {
        let args = Args::parse_from(["chirpy", "--platform", "dev"]);
        assert_eq!(args.platform, Platform::Dev);
        assert!(Args::try_parse_from(["chirpy", "--platform", "staging"]).is_err());
    }

    #[test]
    fn test_jwt_secret_file_is_trimmed_and_checked() {
        let dir = std::env::temp_dir().join(format!("chirpy-cli-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let long = dir.join("long");
        std::fs::write(&long, format!("{}\n", "s".repeat(40))).unwrap();
        let short = dir.join("short");
        std::fs::write(&short, "too-short").unwrap();

        // Only meaningful when JWT_SECRET is not set in the test environment.
        if std::env::var("JWT_SECRET").is_err() {
            assert_eq!(
                load_jwt_secret(long.to_str()),
                Some("s".repeat(40))
            );
            assert_eq!(load_jwt_secret(short.to_str()), None);
            assert_eq!(load_jwt_secret(dir.join("missing").to_str()), None);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
