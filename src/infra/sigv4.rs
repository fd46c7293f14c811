//! AWS Signature Version 4 request signing.
//!
//! Credentials come from the default AWS provider chain and are resolved for
//! every request, so expiring role credentials are refreshed by the chain.
//! Payloads are always hashed into the signature.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningParams, SigningSettings};
use aws_sigv4::sign::v4;
use reqwest::Url;
use std::fmt;
use std::time::SystemTime;
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Every place the default chain looks, in lookup order
const CREDENTIAL_SOURCES: &str = "environment (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, \
     AWS_SESSION_TOKEN), shared config and credentials files (AWS_PROFILE, \
     AWS_CONFIG_FILE, AWS_SHARED_CREDENTIALS_FILE), SSO, web identity token, \
     ECS container role, EC2 instance role";

fn missing_credentials(cause: impl fmt::Display) -> CatalogError {
    CatalogError::MissingCredentials(format!(
        "IAM auth found no AWS credentials ({}); searched {}",
        cause, CREDENTIAL_SOURCES
    ))
}

fn signing_error(e: impl fmt::Display) -> CatalogError {
    CatalogError::Signing(e.to_string())
}

/// Signs requests for one service in one region
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: SharedCredentialsProvider,
    region: String,
    service: String,
}

impl RequestSigner {
    /// Signer backed by the default credential chain.
    ///
    /// Credentials are resolved once up front so a host without any fails
    /// here instead of on the first request.
    pub async fn from_default_chain(region: &str, service: &str) -> Result<Self> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        let credentials = config
            .credentials_provider()
            .ok_or_else(|| missing_credentials("no provider configured"))?;

        let signer = Self {
            credentials,
            region: region.to_string(),
            service: service.to_string(),
        };
        let resolved = signer.resolve_credentials().await?;
        debug!(
            access_key_id = resolved.access_key_id(),
            service, region, "Resolved AWS credentials"
        );
        Ok(signer)
    }

    /// Signer with fixed credentials
    pub fn with_credentials(credentials: Credentials, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            credentials: SharedCredentialsProvider::new(credentials),
            region: region.into(),
            service: service.into(),
        }
    }

    async fn resolve_credentials(&self) -> Result<Credentials> {
        self.credentials
            .provide_credentials()
            .await
            .map_err(missing_credentials)
    }

    /// Headers to attach to the request: `x-amz-date`, `authorization` and,
    /// for temporary credentials, `x-amz-security-token`
    pub async fn sign(&self, method: &str, url: &Url, body: &[u8], time: SystemTime) -> Result<Vec<(String, String)>> {
        let identity = self.resolve_credentials().await?.into();
        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(signing_error)?
            .into();

        let request = SignableRequest::new(method, url.as_str(), std::iter::empty(), SignableBody::Bytes(body))
            .map_err(signing_error)?;
        let (instructions, _signature) = sign(request, &params).map_err(signing_error)?.into_parts();
        let (headers, _query) = instructions.into_parts();

        Ok(headers
            .into_iter()
            .map(|h| (h.name().to_string(), h.value().to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    // 2015-08-30T12:36:00Z
    fn example_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_440_938_160)
    }

    fn example_signer(session_token: Option<&str>) -> RequestSigner {
        let credentials = Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            session_token.map(str::to_string),
            None,
            "example",
        );
        RequestSigner::with_credentials(credentials, "us-east-1", "service")
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn test_get_vanilla_signature() {
        let url = Url::parse("https://example.amazonaws.com/").unwrap();
        let headers = example_signer(None).sign("GET", &url, b"", example_time()).await.unwrap();

        assert_eq!(
            header(&headers, "authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                 SignedHeaders=host;x-amz-date, \
                 Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
            )
        );
        assert_eq!(header(&headers, "x-amz-date"), Some("20150830T123600Z"));
        assert_eq!(header(&headers, "x-amz-security-token"), None);
    }

    #[tokio::test]
    async fn test_session_token_is_signed() {
        let url = Url::parse("https://example.amazonaws.com/").unwrap();
        let headers = example_signer(Some("token"))
            .sign("GET", &url, b"", example_time())
            .await
            .unwrap();

        assert_eq!(header(&headers, "x-amz-security-token"), Some("token"));
        let auth = header(&headers, "authorization").unwrap();
        assert!(auth.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
    }

    #[tokio::test]
    async fn test_query_and_port_change_the_signature() {
        let signer = example_signer(None);
        let plain = Url::parse("https://db.example.com:8182/ml/modeltraining").unwrap();
        let query = Url::parse("https://db.example.com:8182/ml/modeltraining?b=2&a=x%20y").unwrap();

        let a = signer.sign("GET", &plain, b"", example_time()).await.unwrap();
        let b = signer.sign("GET", &query, b"", example_time()).await.unwrap();
        assert_ne!(header(&a, "authorization"), header(&b, "authorization"));
    }

    #[test]
    fn test_missing_credentials_lists_sources() {
        match missing_credentials("nothing found") {
            CatalogError::MissingCredentials(message) => {
                assert!(message.contains("nothing found"));
                assert!(message.contains("AWS_SHARED_CREDENTIALS_FILE"));
                assert!(message.contains("EC2 instance role"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
