use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub users_path: String,
    pub service_token: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("AD_SERVER_PORT", "3000"),
            users_path: try_load("AD_USERS_PATH", "users.json"),
            service_token: read_secret("ad_service_token", "AD_SERVICE_TOKEN"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Docker-secret file first, environment variable as the fallback.
fn read_secret(secret_name: &str, env_key: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .or_else(|e| {
            warn!("Failed to read {secret_name} from file: {e}, trying {env_key}");
            env::var(env_key)
        })
        .expect("Secrets misconfigured!")
}
