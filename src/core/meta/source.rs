use async_trait::async_trait;
use tracing::debug;

use super::model::{ComponentDescriptor, ComponentJson};
use crate::core::error::{PackError, PackResult};

/// Answers "describe component `uid` at `version`", one pair at a time.
///
/// Implementations are stateless from the resolver's point of view: any
/// failure (transport or malformed document) is reported as
/// [`PackError::Fetch`] and is never retried by the caller.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, uid: &str, version: &str) -> PackResult<ComponentDescriptor>;
}

/// Metadata service reachable over HTTP at `{endpoint}/{uid}/{version}.json`.
pub struct HttpMetadataSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMetadataSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn component_url(&self, uid: &str, version: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.endpoint.trim_end_matches('/'),
            uid,
            version
        )
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self, uid: &str, version: &str) -> PackResult<ComponentDescriptor> {
        let url = self.component_url(uid, version);
        debug!("Fetching component metadata: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PackError::fetch(uid, version, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PackError::fetch(
                uid,
                version,
                format!("{} returned HTTP {}", url, status.as_u16()),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PackError::fetch(uid, version, e))?;

        let json: ComponentJson = serde_json::from_str(&body).map_err(|e| {
            PackError::fetch(uid, version, format!("malformed descriptor at {}: {}", url, e))
        })?;

        Ok(ComponentDescriptor::from_json(uid, version, json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::meta::Requirement;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn component_url_trims_trailing_slash() {
        let source = HttpMetadataSource::new(reqwest::Client::new(), "https://meta.multimc.org/v1/");
        assert_eq!(
            source.component_url("net.minecraft", "1.20.1"),
            "https://meta.multimc.org/v1/net.minecraft/1.20.1.json"
        );
    }

    #[tokio::test]
    async fn fetch_parses_descriptor() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/net.fabricmc.fabric-loader/0.15.0.json");
                then.status(200).json_body(json!({
                    "name": "Fabric Loader",
                    "order": 10,
                    "requires": [
                        { "uid": "net.fabricmc.intermediary" }
                    ]
                }));
            })
            .await;

        let source = HttpMetadataSource::new(reqwest::Client::new(), server.base_url());
        let d = source
            .fetch("net.fabricmc.fabric-loader", "0.15.0")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(d.id, "net.fabricmc.fabric-loader");
        assert_eq!(d.version, "0.15.0");
        assert_eq!(d.display_name, "Fabric Loader");
        assert_eq!(d.order, 10);
        assert_eq!(
            d.requirements,
            vec![Requirement::new("net.fabricmc.intermediary")]
        );
    }

    #[tokio::test]
    async fn not_found_is_a_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/net.minecraft/0.0.0.json");
                then.status(404);
            })
            .await;

        let source = HttpMetadataSource::new(reqwest::Client::new(), server.base_url());
        let err = source.fetch("net.minecraft", "0.0.0").await.unwrap_err();

        match err {
            PackError::Fetch { uid, version, reason } => {
                assert_eq!(uid, "net.minecraft");
                assert_eq!(version, "0.0.0");
                assert!(reason.contains("HTTP 404"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn schema_violation_is_a_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/net.minecraft/1.20.1.json");
                then.status(200).json_body(json!({ "order": "first" }));
            })
            .await;

        let source = HttpMetadataSource::new(reqwest::Client::new(), server.base_url());
        let err = source.fetch("net.minecraft", "1.20.1").await.unwrap_err();
        assert!(matches!(err, PackError::Fetch { .. }), "{err}");
    }
}
