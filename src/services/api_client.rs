use crate::config::Config;
use crate::errors::FetchError;
use async_trait::async_trait;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

/// The one HTTP operation the explorer needs. Swapped out in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}

/// Explorer API endpoint: base URL, static headers and a transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            headers: config.headers.clone(),
            transport,
        }
    }

    /// Appends `segments` to the base URL, percent-encoding each one, so a
    /// key containing `/`, `?` or `#` stays a single path segment.
    pub fn url(&self, segments: &[&str]) -> Result<String, FetchError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(FetchError::InvalidPath(bad.to_string()));
        }

        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| FetchError::Transport(format!("invalid API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("API URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    /// GETs the endpoint under `segments` and decodes the body. Anything
    /// but 200 is a failure.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
        let url = self.url(segments)?;
        info!("Making request to: {}", url);

        let response = self.transport.get(&url, &self.headers).await?;
        debug!("HTTP status {} from {}", response.status, url);

        if response.status != 200 {
            error!("API returned status code {} for {}", response.status, url);
            return Err(FetchError::Status {
                code: response.status,
                url: response.url,
            });
        }

        let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
        let decoded = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(FetchError::from)
            .and_then(|value: T| deserializer.end().map(|()| value).map_err(FetchError::from));
        if let Err(e) = &decoded {
            error!("{} from {}", e, url);
        }
        decoded
    }
}
