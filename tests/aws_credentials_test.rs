use anyhow::Result;
use catalog_graph::config::AuthMode;
use catalog_graph::error::CatalogError;
use catalog_graph::infra::http_client::SignedHttpClient;
use catalog_graph::infra::sigv4::RequestSigner;
use reqwest::Url;
use std::fs;
use std::time::SystemTime;
use tempfile::tempdir;

const ENV_CREDENTIALS: [&str; 3] = ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN"];

/// Point the default chain at files under `dir` and switch off every
/// network-backed source.
fn isolate_chain(dir: &std::path::Path) {
    for key in ENV_CREDENTIALS
        .iter()
        .chain(["AWS_PROFILE", "AWS_WEB_IDENTITY_TOKEN_FILE", "AWS_ROLE_ARN"].iter())
        .chain(["AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "AWS_CONTAINER_CREDENTIALS_FULL_URI"].iter())
    {
        std::env::remove_var(key);
    }
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");
    std::env::set_var("AWS_CONFIG_FILE", dir.join("config"));
    std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", dir.join("credentials"));
}

// One test owns the process environment, so the cases run in sequence.
#[tokio::test]
async fn test_iam_credentials_come_from_the_default_chain() -> Result<()> {
    let dir = tempdir()?;
    isolate_chain(dir.path());

    match SignedHttpClient::new(AuthMode::Iam, "us-east-1", "neptune-db").await {
        Err(CatalogError::MissingCredentials(message)) => {
            assert!(message.contains("AWS_SHARED_CREDENTIALS_FILE"), "{message}");
            assert!(message.contains("EC2 instance role"), "{message}");
        }
        Err(other) => panic!("expected missing credentials, got {other}"),
        Ok(_) => panic!("expected missing credentials"),
    }

    fs::write(
        dir.path().join("credentials"),
        "[default]\naws_access_key_id = AKIDPROFILE\naws_secret_access_key = profile-secret\n",
    )?;
    SignedHttpClient::new(AuthMode::Iam, "us-east-1", "neptune-db").await?;

    let signer = RequestSigner::from_default_chain("us-east-1", "neptune-db").await?;
    let url = Url::parse("https://db.example.com:8182/ml/modeltraining")?;
    let headers = signer.sign("GET", &url, b"", SystemTime::now()).await?;
    let auth = headers
        .iter()
        .find(|(name, _)| name == "authorization")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDPROFILE/"), "{auth}");
    assert!(auth.contains("/us-east-1/neptune-db/aws4_request"), "{auth}");
    Ok(())
}
