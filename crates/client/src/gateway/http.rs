//! reqwest-backed gateway against the admin API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use huddle_core::{CategoryId, GroupId};
use huddle_directory::dto::{DeleteRequest, DeleteResponse, ErrorBody, UpdateRequest};
use huddle_directory::{
    AttendeeGroup, CategoryPatch, CategoryWithGroups, GroupPatch, NewCategory, NewGroup,
};

use super::{GatewayError, GatewayResult, RemoteGateway};
use crate::config::ClientConfig;

const GROUPS_PATH: &str = "/api/admin/groups";
const CATEGORIES_PATH: &str = "/api/admin/categories";

pub struct HttpGateway {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
        })
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        self.request(Method::GET, "/health")
            .send()
            .await
            .is_ok_and(|resp| resp.status().is_success())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, format!("{}{}", self.api_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> GatewayResult<T> {
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Network(format!("request timed out: {e}"))
            } else {
                GatewayError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // Prefer the service's `{error, message}` body; fall back to the raw text.
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        resp.json().await.map_err(|e| GatewayError::Parse(e.to_string()))
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(self.request(method, path).json(body)).await
    }

    async fn delete<I: Serialize + Sync>(&self, path: &str, id: &I) -> GatewayResult<()> {
        let resp: DeleteResponse = self
            .send_json(Method::DELETE, path, &DeleteRequest { id })
            .await?;
        if resp.success {
            Ok(())
        } else {
            Err(GatewayError::Parse("delete response reported failure".to_string()))
        }
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn list_groups(&self) -> GatewayResult<Vec<AttendeeGroup>> {
        self.send(self.request(Method::GET, GROUPS_PATH)).await
    }

    async fn create_group(&self, new: &NewGroup) -> GatewayResult<AttendeeGroup> {
        self.send_json(Method::POST, GROUPS_PATH, new).await
    }

    async fn update_group(&self, id: &GroupId, patch: &GroupPatch) -> GatewayResult<AttendeeGroup> {
        let body = UpdateRequest { id, patch };
        self.send_json(Method::PUT, GROUPS_PATH, &body).await
    }

    async fn delete_group(&self, id: &GroupId) -> GatewayResult<()> {
        self.delete(GROUPS_PATH, id).await
    }

    async fn list_categories(&self) -> GatewayResult<Vec<CategoryWithGroups>> {
        self.send(self.request(Method::GET, CATEGORIES_PATH)).await
    }

    async fn create_category(&self, new: &NewCategory) -> GatewayResult<CategoryWithGroups> {
        self.send_json(Method::POST, CATEGORIES_PATH, new).await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> GatewayResult<CategoryWithGroups> {
        let body = UpdateRequest { id, patch };
        self.send_json(Method::PUT, CATEGORIES_PATH, &body).await
    }

    async fn delete_category(&self, id: &CategoryId) -> GatewayResult<()> {
        self.delete(CATEGORIES_PATH, id).await
    }
}
