//! HTTP layer: the POST, status mapping and envelope handling.
//!
//! This is the only place that looks at status codes. Requests are sent once;
//! nothing is retried.

use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::envelope::Envelope;
use crate::error::{ClientError, ClientResult};
use crate::query::QueryDocument;

use super::helpers::truncate_body;

#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) endpoint: Url,
}

impl HttpBackend {
    /// Run one query and return its `data` object.
    pub(crate) async fn query(
        &self,
        document: &QueryDocument,
        variables: Value,
    ) -> ClientResult<Map<String, Value>> {
        debug!(
            url = %self.endpoint,
            operation = document.operation_name,
            "sending query"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(&document.request(variables))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, operation = document.operation_name, "query request failed");
                ClientError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::Network {
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), operation = document.operation_name, "query rejected");
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                truncate_body(&body)
            };
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "query answered");
        Envelope::parse(&body)?.into_data()
    }
}
