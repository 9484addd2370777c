use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::Client;

use crate::{config::Config, error::FetchError, targets::Target};

/// Downloads the body of one target.
///
/// Implementors are shared between spawned tasks, so they must be
/// `Send + Sync` and should only hold immutable state.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &Target) -> Result<Bytes, FetchError>;
}

/// Fetches over HTTP(S) with `reqwest`, building a new client per request
/// so concurrent fetches never share a connection pool.
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    config: Config,
}

impl HttpFetcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn client(&self) -> Result<Client, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.config.connection_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> Result<Bytes, FetchError> {
        let response = self.client()?.get(target.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        debug!("{target}: {} bytes.", bytes.len());
        Ok(bytes)
    }
}
