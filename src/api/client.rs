//! Blocking `ureq` transport bridged onto the tokio runtime

use crate::api::actions::{ContainerAction, HostCheck, ResourceActions};
use crate::cache::ResourceFetcher;
use crate::config::schema::ApiConfig;
use crate::error::TransportError;
use crate::hosts::{Host, HostSource};
use crate::resource::{
    ComposeProject, Container, ContainerStats, HostId, Image, Network, Volume,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;
use ureq::Agent;

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
}

/// Client for the backend API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: Agent,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build();

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent: Agent::new_with_config(agent_config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check backend liveness
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        Ok(self.get("/health", Vec::new()).await?.unwrap_or_default())
    }

    async fn list<T>(&self, path: &str, host: &HostId) -> Result<Vec<T>, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let query = vec![("host_id", host.to_string())];
        Ok(self.get(path, query).await?.unwrap_or_default())
    }

    async fn get<T>(
        &self,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<Option<T>, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Get, path, query).await
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<Option<T>, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let url = format!("{}{}", self.base_url, path);

        tokio::task::spawn_blocking(move || send_blocking(&agent, &method, &url, &query))
            .await
            .map_err(|e| TransportError::Task(e.to_string()))?
    }
}

/// HTTP verb, with the JSON body for POST
#[derive(Debug, Clone, PartialEq, Eq)]
enum Method {
    Get,
    Post(Option<String>),
    Delete,
}

impl Method {
    fn name(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post(_) => "POST",
            Self::Delete => "DELETE",
        }
    }
}

fn with_query<B>(
    mut request: ureq::RequestBuilder<B>,
    query: &[(&'static str, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in query {
        request = request.query(*key, value);
    }
    request.header("Accept", "application/json")
}

fn send_blocking<T: DeserializeOwned>(
    agent: &Agent,
    method: &Method,
    url: &str,
    query: &[(&'static str, String)],
) -> Result<Option<T>, TransportError> {
    let request_failed = |e: ureq::Error| TransportError::Request {
        url: url.to_string(),
        reason: e.to_string(),
    };

    trace!(url, method = method.name(), "request");
    let mut response = match method {
        Method::Get => with_query(agent.get(url), query).call(),
        Method::Delete => with_query(agent.delete(url), query).call(),
        Method::Post(None) => with_query(agent.post(url), query).send_empty(),
        Method::Post(Some(body)) => with_query(agent.post(url), query)
            .header("Content-Type", "application/json")
            .send(body.as_str()),
    }
    .map_err(request_failed)?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(request_failed)?;

    decode_envelope(url, status, &body)
}

/// Method, path and query of a container lifecycle call
fn action_request(
    host: &HostId,
    container_id: &str,
    action: ContainerAction,
) -> (Method, String, Vec<(&'static str, String)>) {
    let mut query = vec![("host_id", host.to_string())];
    let timeout_body =
        |timeout: Option<u32>| timeout.map(|t| serde_json::json!({ "timeout": t }).to_string());

    match action {
        ContainerAction::Start => (
            Method::Post(None),
            format!("/containers/{}/start", container_id),
            query,
        ),
        ContainerAction::Stop { timeout } => (
            Method::Post(timeout_body(timeout)),
            format!("/containers/{}/stop", container_id),
            query,
        ),
        ContainerAction::Restart { timeout } => (
            Method::Post(timeout_body(timeout)),
            format!("/containers/{}/restart", container_id),
            query,
        ),
        ContainerAction::Remove { force, volumes } => {
            query.push(("force", force.to_string()));
            query.push(("volumes", volumes.to_string()));
            (Method::Delete, format!("/containers/{}", container_id), query)
        }
    }
}

#[async_trait]
impl ResourceFetcher for ApiClient {
    async fn containers(&self, host: &HostId) -> Result<Vec<Container>, TransportError> {
        let query = vec![("host_id", host.to_string()), ("all", "true".to_string())];
        Ok(self.get("/containers", query).await?.unwrap_or_default())
    }

    async fn images(&self, host: &HostId) -> Result<Vec<Image>, TransportError> {
        self.list("/images", host).await
    }

    async fn volumes(&self, host: &HostId) -> Result<Vec<Volume>, TransportError> {
        self.list("/volumes", host).await
    }

    async fn networks(&self, host: &HostId) -> Result<Vec<Network>, TransportError> {
        self.list("/networks", host).await
    }

    async fn compose_projects(
        &self,
        host: &HostId,
    ) -> Result<Vec<ComposeProject>, TransportError> {
        self.list("/compose/projects", host).await
    }
}

#[async_trait]
impl HostSource for ApiClient {
    async fn hosts(&self) -> Result<Vec<Host>, TransportError> {
        Ok(self.get("/hosts", Vec::new()).await?.unwrap_or_default())
    }
}

#[async_trait]
impl ResourceActions for ApiClient {
    async fn container_action(
        &self,
        host: &HostId,
        container_id: &str,
        action: ContainerAction,
    ) -> Result<(), TransportError> {
        let (method, path, query) = action_request(host, container_id, action);
        self.request::<serde_json::Value>(method, &path, query).await?;
        Ok(())
    }

    async fn container_stats(
        &self,
        host: &HostId,
        container_id: &str,
    ) -> Result<ContainerStats, TransportError> {
        let path = format!("/containers/{}/stats", container_id);
        let query = vec![("host_id", host.to_string())];
        Ok(self.get(&path, query).await?.unwrap_or_default())
    }

    async fn test_host(&self, host: &HostId) -> Result<HostCheck, TransportError> {
        let path = format!("/hosts/{}/test", host);
        Ok(self
            .request(Method::Post(None), &path, Vec::new())
            .await?
            .unwrap_or_default())
    }
}
