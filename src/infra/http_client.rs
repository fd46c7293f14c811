use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use std::time::SystemTime;
use tracing::debug;

use crate::config::AuthMode;
use crate::error::{CatalogError, Result};
use crate::infra::sigv4::RequestSigner;

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `CatalogError::Remote`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CatalogError::Remote {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// reqwest client that SigV4-signs every request when IAM auth is on
#[derive(Debug, Clone)]
pub struct SignedHttpClient {
    client: reqwest::Client,
    signer: Option<RequestSigner>,
}

impl SignedHttpClient {
    pub async fn new(auth_mode: AuthMode, region: &str, service: &str) -> Result<Self> {
        let signer = match auth_mode {
            AuthMode::Iam => Some(RequestSigner::from_default_chain(region, service).await?),
            AuthMode::None => None,
        };
        Ok(Self::with_signer(signer))
    }

    pub fn with_signer(signer: Option<RequestSigner>) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer,
        }
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(Method::GET, url, None, None).await
    }

    pub async fn head(&self, url: &str) -> Result<HttpResponse> {
        self.send(Method::HEAD, url, None, None).await
    }

    pub async fn put_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        let bytes = serde_json::to_vec(body)?;
        self.send(Method::PUT, url, Some(bytes), Some("application/json")).await
    }

    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        let bytes = serde_json::to_vec(body)?;
        self.send(Method::POST, url, Some(bytes), Some("application/json")).await
    }

    pub async fn post_ndjson(&self, url: &str, body: String) -> Result<HttpResponse> {
        self.send(Method::POST, url, Some(body.into_bytes()), Some("application/x-ndjson"))
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<HttpResponse> {
        let parsed = Url::parse(url).map_err(|e| CatalogError::Config(format!("Invalid URL '{}': {}", url, e)))?;
        let body = body.unwrap_or_default();

        let mut request = self.client.request(method.clone(), parsed.clone());
        if let Some(ct) = content_type {
            request = request.header(CONTENT_TYPE, ct);
        }
        if let Some(signer) = &self.signer {
            for (name, value) in signer.sign(method.as_str(), &parsed, &body, SystemTime::now()).await? {
                request = request.header(name, value);
            }
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        debug!("{} {}", method, parsed);
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}
