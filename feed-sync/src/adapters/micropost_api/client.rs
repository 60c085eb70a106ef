//! Micropost API client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::session::TokenSession;
use crate::domain::entities::{Micropost, MicropostId};
use crate::domain::ports::{FeedPort, MicropostPort};
use crate::error::FetchError;

/// Implementation of the micropost REST client
///
/// The bearer token is read from the session on every request, so a logout
/// takes effect immediately.
pub struct MicropostApiClient {
    http: Client,
    base_url: String,
    session: Arc<TokenSession>,
    page_size: u32,
}

impl MicropostApiClient {
    pub fn new(base_url: &str, session: Arc<TokenSession>, page_size: u32) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            page_size,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn get_feed(&self, query: &FeedQuery) -> Result<Vec<Micropost>, FetchError> {
        let request = self.http.get(self.api_url("/feed")).query(query);
        let response = self.authorized(request).send().await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| FetchError::Deserialization(e.to_string()))
        } else if status.as_u16() == 401 {
            Err(FetchError::Unauthorized)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(FetchError::Http {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Query parameters for `GET /api/feed`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    since_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_id: Option<i64>,
    max_size: u32,
}

#[derive(Serialize)]
struct CreateMicropostRequest<'a> {
    content: &'a str,
}

#[async_trait]
impl FeedPort for MicropostApiClient {
    async fn fetch_newer(&self, cursor: Option<MicropostId>) -> Result<Vec<Micropost>, FetchError> {
        self.get_feed(&FeedQuery {
            since_id: cursor.map(|c| c.0),
            max_id: None,
            max_size: self.page_size,
        })
        .await
    }

    async fn fetch_older(&self, cursor: Option<MicropostId>) -> Result<Vec<Micropost>, FetchError> {
        self.get_feed(&FeedQuery {
            since_id: None,
            max_id: cursor.map(|c| c.0),
            max_size: self.page_size,
        })
        .await
    }
}

#[async_trait]
impl MicropostPort for MicropostApiClient {
    async fn create(&self, content: &str) -> Result<Micropost, FetchError> {
        let request = self
            .http
            .post(self.api_url("/microposts"))
            .json(&CreateMicropostRequest { content });
        let response = self.authorized(request).send().await?;

        self.handle_response(response).await
    }
}
