//! HTTP transport for the Aha! REST and GraphQL APIs.
//!
//! The record service only talks to the [`Transport`] trait so it can be
//! driven by a scripted fake in tests. [`AhaClient`] is the real
//! implementation, bound to one account's URL and API token.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use rmcp::ErrorData as McpError;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::request::{GraphqlRequest, RestRequest};

const USER_AGENT: &str = concat!("aha-mcp/", env!("CARGO_PKG_VERSION"));

/// Transport errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: API token missing or invalid")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Pagination stopped after {0} pages")]
    PageLimit(u32),

    /// An error already shaped for the tool protocol.
    #[error("{}", .0.message)]
    Protocol(McpError),
}

/// Executes request descriptors against the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run a GraphQL operation and return its `data` object.
    async fn graphql(&self, request: &GraphqlRequest) -> Result<Value, ClientError>;

    /// Run a REST call and return the decoded JSON body.
    async fn rest(&self, request: &RestRequest) -> Result<Value, ClientError>;
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// HTTP client bound to one Aha! account.
#[derive(Debug, Clone)]
pub struct AhaClient {
    rest_base: String,
    graphql_url: String,
    api_token: String,
    client: Client,
}

impl AhaClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            rest_base: config.rest_base(),
            graphql_url: config.graphql_url(),
            api_token: config.api_token.clone(),
            client,
        })
    }

    /// Build a request with auth and JSON accept headers.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header(header::ACCEPT, "application/json")
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
        } else {
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::BadRequest(body))
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }
}

#[async_trait]
impl Transport for AhaClient {
    async fn graphql(&self, request: &GraphqlRequest) -> Result<Value, ClientError> {
        tracing::debug!(operation = request.root_field(), "GraphQL request");

        let response = self
            .request(reqwest::Method::POST, &self.graphql_url)
            .json(request)
            .send()
            .await?;
        let body = self.handle_response(response).await?;

        let envelope: GraphqlEnvelope =
            serde_json::from_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        if !envelope.errors.is_empty() {
            let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(ClientError::Graphql(messages.join("; ")));
        }
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    async fn rest(&self, request: &RestRequest) -> Result<Value, ClientError> {
        tracing::debug!(method = %request.method, path = %request.path, query = ?request.query, "REST request");

        let url = format!("{}{}", self.rest_base, request.path);
        let mut req = self.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(ref body) = request.body {
            req = req.json(body);
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }
}
