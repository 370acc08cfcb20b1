use std::sync::Arc;

use crate::api_client::{JobAlignApi, JobAlignClient};
use crate::config::Config;
use crate::errors::ClientError;

/// Shared handles for a CLI invocation, handed to each command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Service client. Controllers take it as a trait object so tests can inject a fake.
    pub api: Arc<dyn JobAlignApi>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let api = JobAlignClient::new(&config.api_url, config.request_timeout)?;
        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }
}
