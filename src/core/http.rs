use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::Client;

use crate::core::state::Settings;

pub fn build_http_client(settings: &Settings) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(default_headers);

    // Per-fetch bound; the resolver itself imposes no timeout.
    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}
