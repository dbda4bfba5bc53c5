use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use shiftcheck_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Apply migrations and exit without serving.
    pub migrate_only: bool,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Origin allowed by CORS (the console frontend).
    pub frontend_url: String,
    /// Static bearer token guarding the admin routes.
    pub admin_token: String,
    /// Listen host.
    pub api_host: String,
    /// Listen port.
    pub api_port: u16,
}

impl ApiConfig {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let admin_token = required_env("ADMIN_TOKEN")?;
        if admin_token.len() < 16 {
            return Err(AppError::Validation(
                "ADMIN_TOKEN must be at least 16 characters".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            admin_token,
            api_host,
            api_port,
        })
    }

    /// Resolves the listen address.
    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

/// Initializes the tracing subscriber with env-filter support.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
