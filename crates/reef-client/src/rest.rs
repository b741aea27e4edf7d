//! `reqwest`-backed implementation of the server effect traits.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use reef_app::effects::{CategoryEffects, EffectError, PreferenceEffects};
use reef_app::{ChannelCategory, Preference};
use reef_core::{CategoryId, TeamId, UserId};

use crate::routes;

/// HTTP transport for the Reef data layer.
///
/// Thin by design: it serializes the wire types, attaches the session
/// token, and maps failures into [`EffectError`]. All retry/rollback
/// policy lives in the workflows, not here.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl RestClient {
    /// Create a client for a server base URL and session token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, EffectError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| EffectError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body),
                Err(_) => String::new(),
            };
            debug!(status = status.as_u16(), "server rejected request");
            return Err(EffectError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| EffectError::Transport(e.to_string()))
    }

    /// Like [`Self::send`] for endpoints whose success body is ignored.
    async fn send_unit(&self, request: reqwest::RequestBuilder) -> Result<(), EffectError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| EffectError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body),
                Err(_) => String::new(),
            };
            return Err(EffectError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryEffects for RestClient {
    async fn create_category(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        category: &ChannelCategory,
    ) -> Result<ChannelCategory, EffectError> {
        let url = self.url(&routes::categories(user_id, team_id));
        self.send(self.http.post(url).json(category)).await
    }

    async fn update_category(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        category: &ChannelCategory,
    ) -> Result<ChannelCategory, EffectError> {
        let url = self.url(&routes::category(user_id, team_id, &category.id));
        self.send(self.http.put(url).json(category)).await
    }

    async fn update_categories(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        categories: &[ChannelCategory],
    ) -> Result<Vec<ChannelCategory>, EffectError> {
        let url = self.url(&routes::categories(user_id, team_id));
        self.send(self.http.put(url).json(categories)).await
    }

    async fn delete_category(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        category_id: &CategoryId,
    ) -> Result<(), EffectError> {
        let url = self.url(&routes::category(user_id, team_id, category_id));
        self.send_unit(self.http.delete(url)).await
    }

    async fn update_category_order(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        order: &[CategoryId],
    ) -> Result<Vec<CategoryId>, EffectError> {
        let url = self.url(&routes::categories_order(user_id, team_id));
        self.send(self.http.put(url).json(order)).await
    }
}

#[async_trait]
impl PreferenceEffects for RestClient {
    async fn save_preferences(
        &self,
        user_id: &UserId,
        preferences: &[Preference],
    ) -> Result<(), EffectError> {
        let url = self.url(&routes::preferences(user_id));
        self.send_unit(self.http.put(url).json(preferences)).await
    }

    async fn delete_preferences(
        &self,
        user_id: &UserId,
        preferences: &[Preference],
    ) -> Result<(), EffectError> {
        let url = self.url(&routes::preferences_delete(user_id));
        self.send_unit(self.http.post(url).json(preferences)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = RestClient::new("https://chat.example.com///", "token");
        assert_eq!(
            client.url("/api/v4/users/u1/preferences"),
            "https://chat.example.com/api/v4/users/u1/preferences"
        );
    }
}
