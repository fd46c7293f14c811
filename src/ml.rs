//! Client for the graph database's ML subsystem.
//!
//! Only job bookkeeping lives here: naming a training job, checking that
//! the subsystem is reachable and looking up where a finished job wrote
//! its artifacts.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, instrument};

use crate::config::NeptuneConfig;
use crate::error::{CatalogError, Result};
use crate::infra::http_client::SignedHttpClient;

const SIGNING_SERVICE: &str = "neptune-db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlJobType {
    DataProcessing,
    ModelTraining,
    ModelTransform,
}

impl MlJobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MlJobType::DataProcessing => "dataprocessing",
            MlJobType::ModelTraining => "modeltraining",
            MlJobType::ModelTransform => "modeltransform",
        }
    }
}

impl FromStr for MlJobType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dataprocessing" => Ok(MlJobType::DataProcessing),
            "modeltraining" => Ok(MlJobType::ModelTraining),
            "modeltransform" => Ok(MlJobType::ModelTransform),
            other => Err(CatalogError::InvalidJobType(other.to_string())),
        }
    }
}

impl fmt::Display for MlJobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<prefix>-<unix seconds>`
pub fn training_job_name(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp())
}

/// Outcome of probing the ML endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlStatus {
    Enabled,
    NotConfigured { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDescription {
    status: Option<String>,
    processing_job: Option<ProcessingJob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessingJob {
    output_location: Option<String>,
}

pub struct MlClient {
    config: NeptuneConfig,
    http: SignedHttpClient,
}

impl MlClient {
    pub async fn new(config: NeptuneConfig) -> Result<Self> {
        let http = SignedHttpClient::new(config.auth_mode, &config.region, SIGNING_SERVICE).await?;
        Ok(Self::with_http(config, http))
    }

    pub fn with_http(config: NeptuneConfig, http: SignedHttpClient) -> Self {
        Self { config, http }
    }

    pub async fn check_ml_enabled(&self) -> Result<MlStatus> {
        let url = format!("{}/ml/modeltraining", self.config.base_url());
        let resp = self.http.get(&url).await?;
        if resp.status == 200 {
            info!("ML subsystem is enabled on {}", self.config.host);
            Ok(MlStatus::Enabled)
        } else {
            error!(
                "ML subsystem is not configured on {} (status {})",
                self.config.host, resp.status
            );
            Ok(MlStatus::NotConfigured {
                status: resp.status,
                body: resp.body,
            })
        }
    }

    /// Output location of a completed job; `None` while the job is not done.
    #[instrument(skip(self))]
    pub async fn job_output_location(&self, job_name: &str, job_type: MlJobType) -> Result<Option<String>> {
        let url = format!("{}/ml/{}/{}", self.config.base_url(), job_type, job_name);
        let resp = self.http.get(&url).await?.error_for_status()?;
        output_location(resp.json()?, job_name)
    }

    pub async fn modeltraining_output_location(&self, job_name: &str) -> Result<Option<String>> {
        self.job_output_location(job_name, MlJobType::ModelTraining).await
    }
}

fn output_location(job: JobDescription, job_name: &str) -> Result<Option<String>> {
    let status = job.status.as_deref().unwrap_or("Unknown");
    if status != "Completed" {
        error!("ML job {} is not Completed (status {})", job_name, status);
        return Ok(None);
    }
    job.processing_job
        .and_then(|p| p.output_location)
        .map(Some)
        .ok_or_else(|| CatalogError::MissingField("processingJob.outputLocation".to_string()))
}
