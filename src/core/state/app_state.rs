use reqwest::Client;

use super::settings::Settings;
use crate::core::error::PackResult;
use crate::core::http::build_http_client;
use crate::core::loaders::LoaderRegistry;
use crate::core::meta::HttpMetadataSource;

/// Everything a command needs, built once at process start.
pub struct AppState {
    pub settings: Settings,
    pub http_client: Client,
    pub loaders: LoaderRegistry,
}

impl AppState {
    pub fn new(settings: Settings) -> PackResult<Self> {
        settings.validate()?;
        let http_client = build_http_client(&settings)?;

        Ok(Self {
            settings,
            http_client,
            loaders: LoaderRegistry::default(),
        })
    }

    pub fn with_loaders(mut self, loaders: LoaderRegistry) -> Self {
        self.loaders = loaders;
        self
    }

    pub fn metadata_source(&self) -> HttpMetadataSource {
        HttpMetadataSource::new(self.http_client.clone(), self.settings.meta_endpoint.clone())
    }
}
