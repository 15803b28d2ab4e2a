//! Runtime configuration from the environment.
//!
//! | Variable                 | Default                          |
//! |--------------------------|----------------------------------|
//! | `OPINIAUTO_API_URL`      | `http://localhost:3333`          |
//! | `OPINIAUTO_EMAIL`        | none (anonymous)                 |
//! | `OPINIAUTO_PASSWORD`     | none                             |
//! | `OPINIAUTO_TIMEOUT_SECS` | `30`                             |
//! | `LOG_FILE_PATH`          | `logs/opiniauto.log`             |

use anyhow::{Context, Result, bail};
use std::time::Duration;

use crate::infra::opiniauto::DEFAULT_BASE_URL;
use crate::submission::Credentials;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILE_PATH: &str = "logs/opiniauto.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    pub log_file_path: String,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match non_empty("OPINIAUTO_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| {
                    format!("OPINIAUTO_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: non_empty("OPINIAUTO_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            email: non_empty("OPINIAUTO_EMAIL"),
            password: lookup("OPINIAUTO_PASSWORD").filter(|v| !v.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
            log_file_path: non_empty("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
        })
    }

    /// Login credentials for commands that act as a signed-in user.
    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Ok(Credentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => bail!("OPINIAUTO_EMAIL and OPINIAUTO_PASSWORD must be set"),
        }
    }
}
