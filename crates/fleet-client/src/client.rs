//! HTTP client for the fleet backend

use std::sync::Arc;
use std::time::{Duration, Instant};

use fleet_access::SessionStore;
use fleet_shared::config::ApiSettings;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::envelope::ApiEnvelope;
use crate::error::ClientError;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<Arc<SessionStore>>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, session: Arc<SessionStore>) -> Result<Self, ClientError> {
        Self::build(
            &settings.base_url,
            Duration::from_secs(settings.timeout_seconds),
            Some(session),
        )
    }

    /// Client that never sends credentials.
    pub fn anonymous(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Self::build(base_url, timeout, None)
    }

    fn build(
        base_url: &str,
        timeout: Duration,
        session: Option<Arc<SessionStore>>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::InvalidConfig("base URL is empty".into()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        decode(response).await
    }

    /// GET against an endpoint that wraps its payload in [`ApiEnvelope`].
    pub async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.get::<ApiEnvelope<T>>(path).await?.into_data()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        decode(response).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = self.session.as_ref().and_then(|s| s.token()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("{} {}", method, url);
        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("{} {} failed: {}", method, url, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        debug!(
            "{} {} -> {} in {}ms",
            method,
            url,
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} {} returned {}: {}", method, url, status.as_u16(), body);
            return Err(ClientError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let url = response.url().to_string();
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| {
        error!("Failed to decode response from {}: {}", url, source);
        ClientError::Decode { url, source }
    })
}
