use crate::gateway::domain::{Registration, RegistrationReply};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// HTTP client for the gateway's registration API.
pub struct GatewayClient {
    base_url: String,
    client: Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> GatewayClient {
        GatewayClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    #[instrument(skip_all, fields(di = %registration.di))]
    pub async fn register(&self, registration: &Registration) -> Result<RegistrationReply, GatewayClientError> {
        let response = self
            .client
            .post(format!("{}/api/registry", self.base_url))
            .json(registration)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(response.json().await?),
            status => Err(GatewayClientError::UnexpectedStatus {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    #[instrument(skip_all, fields(%di))]
    pub async fn unregister(&self, di: &Uuid) -> Result<(), GatewayClientError> {
        let response = self
            .client
            .delete(format!("{}/api/registry/{di}", self.base_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(GatewayClientError::UnexpectedStatus {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayClientError {
    #[error("request to the gateway failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gateway answered {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}
