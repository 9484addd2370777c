use std::{path::Path, time::Duration};

use anyhow::Result;
use serde::Deserialize;

use crate::targets::Target;

/// What a run does when one of its fetches fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure in its line and keep going.
    #[default]
    Isolate,
    /// Give up the whole run on the first failure.
    FailFast,
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub connection_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
    pub policy: FailurePolicy,
}

impl Config {
    pub fn connection_timeout(self, connection_timeout: Duration) -> Self {
        Self {
            connection_timeout: Some(connection_timeout),
            ..self
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    pub fn policy(self, policy: FailurePolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn fail_fast(self) -> Self {
        self.policy(FailurePolicy::FailFast)
    }
}

/// Optional TOML file read by the binary. Durations are in milliseconds.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub targets: Option<Vec<Target>>,
    pub timeout: Option<u64>,
    pub connection_timeout: Option<u64>,
    pub fail_fast: Option<bool>,
}

impl FileConfig {
    pub async fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = tokio::fs::read_to_string(path).await?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Lay the file's settings over `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(timeout) = self.timeout {
            config = config.timeout(Duration::from_millis(timeout));
        }
        if let Some(connection_timeout) = self.connection_timeout {
            config = config.connection_timeout(Duration::from_millis(connection_timeout));
        }
        match self.fail_fast {
            Some(true) => config.fail_fast(),
            Some(false) => config.policy(FailurePolicy::Isolate),
            None => config,
        }
    }
}
