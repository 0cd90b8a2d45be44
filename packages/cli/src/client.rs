//! Blocking HTTP client for the resolver service.

use std::time::Duration;

use ldr::MappingTable;
use ldr_api::{
    CacheListResponse, CacheStatsResponse, ClearedResponse, DocumentRequest, ErrorResponse,
    HealthResponse, MappingsResponse, ResultResponse, SetMappingsRequest, SetMappingsResponse,
};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an error body.
    #[error("server returned {status}: {error} ({code})")]
    Server {
        status: u16,
        error: String,
        code: String,
    },
}

pub struct Client {
    base: String,
    http: HttpClient,
}

impl Client {
    pub fn new(server: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = server.trim_end_matches('/').to_string();
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Http {
                url: base.clone(),
                source,
            })?;
        Ok(Self { base, http })
    }

    pub fn expand(&self, url: &str, depth: Option<u32>) -> Result<ResultResponse, ClientError> {
        self.send(self.post("/expand").json(&DocumentRequest::new(url, depth)))
    }

    pub fn compact(&self, url: &str, depth: Option<u32>) -> Result<ResultResponse, ClientError> {
        self.send(self.post("/compact").json(&DocumentRequest::new(url, depth)))
    }

    pub fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.http.get(self.url("/health")))
    }

    pub fn get_mappings(&self) -> Result<MappingsResponse, ClientError> {
        self.send(self.http.get(self.url("/mappings")))
    }

    /// Install `mappings` inline.
    pub fn set_mappings(&self, mappings: MappingTable) -> Result<SetMappingsResponse, ClientError> {
        let body = SetMappingsRequest {
            file: None,
            mappings: Some(mappings),
        };
        self.send(self.post("/mappings").json(&body))
    }

    /// Ask the server to read a mapping file from its own filesystem.
    pub fn load_mappings(&self, path: &str) -> Result<SetMappingsResponse, ClientError> {
        let body = SetMappingsRequest {
            file: Some(path.to_string()),
            mappings: None,
        };
        self.send(self.post("/mappings").json(&body))
    }

    pub fn clear_mappings(&self) -> Result<ClearedResponse, ClientError> {
        self.send(self.http.delete(self.url("/mappings")))
    }

    pub fn cache_stats(&self) -> Result<CacheStatsResponse, ClientError> {
        self.send(self.http.get(self.url("/cache/stats")))
    }

    pub fn cache_list(&self) -> Result<CacheListResponse, ClientError> {
        self.send(self.http.get(self.url("/cache/list")))
    }

    pub fn cache_clear(&self) -> Result<ClearedResponse, ClientError> {
        self.send(self.http.delete(self.url("/cache")))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let http_err = |source: reqwest::Error| ClientError::Http {
            url: source
                .url()
                .map(ToString::to_string)
                .unwrap_or_else(|| self.base.clone()),
            source,
        };

        let response = request.send().map_err(http_err)?;
        let status = response.status();
        if status.is_success() {
            return response.json().map_err(http_err);
        }

        let status = status.as_u16();
        match response.json::<ErrorResponse>() {
            Ok(body) => Err(ClientError::Server {
                status,
                error: body.error,
                code: body.code,
            }),
            Err(e) => Err(ClientError::Server {
                status,
                error: e.to_string(),
                code: "unknown".into(),
            }),
        }
    }
}
