// File: src/config.rs

use std::path::PathBuf;

use tracing::debug;

use crate::batching::{DEFAULT_MESSAGE_BUDGET, PLATFORM_MESSAGE_LIMIT};
use crate::Error;

pub const TOKEN_KEY: &str = "DISCORD_TOKEN";
pub const BUDGET_KEY: &str = "ROLLCALL_MESSAGE_BUDGET";

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn check_dotenv(result: Result<PathBuf, dotenv::Error>) -> Result<(), Error> {
    match result {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(dotenv::Error::Io(e)) => Err(Error::Io(e)),
        Err(e) => Err(Error::Config(format!("could not parse .env: {e}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollcallConfig {
    pub discord_token: String,
    pub message_budget: usize,
}

impl RollcallConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, Error> {
        check_dotenv(dotenv::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. An unset token is kept empty here
    /// so CLI flags can still fill it in; [`validate`](Self::validate) catches it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup(TOKEN_KEY).unwrap_or_default();
        let message_budget = match lookup(BUDGET_KEY) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!("{BUDGET_KEY} must be a whole number, got {raw:?}"))
            })?,
            None => DEFAULT_MESSAGE_BUDGET,
        };
        Ok(Self { discord_token, message_budget })
    }

    pub fn with_overrides(mut self, token: Option<String>, budget: Option<usize>) -> Self {
        if let Some(token) = token {
            self.discord_token = token;
        }
        if let Some(budget) = budget {
            self.message_budget = budget;
        }
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.discord_token.trim().is_empty() {
            return Err(Error::Config(format!("Discord token is empty; set {TOKEN_KEY} or pass --token")));
        }
        if self.message_budget == 0 || self.message_budget > PLATFORM_MESSAGE_LIMIT {
            return Err(Error::Config(format!(
                "message budget must be between 1 and {PLATFORM_MESSAGE_LIMIT}, got {}",
                self.message_budget
            )));
        }
        Ok(())
    }
}
