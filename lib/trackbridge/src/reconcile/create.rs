use std::sync::Arc;

use shared::{
    platform::Platform,
    session::{CreatePlaylistResponse, IncomingMessage},
};
use tracing::{info, warn};

use super::Bridge;
use crate::error::BridgeError;

/// A validated `create_playlist` message.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub user_id: String,
    pub platform: Platform,
    pub title: String,
    pub track_ids: Vec<String>,
}

impl CreateRequest {
    pub fn from_message(message: &IncomingMessage) -> Result<Self, BridgeError> {
        let user_id = message
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BridgeError::MalformedMessage("userid is required".to_string()))?;
        let payload = message
            .payload
            .as_ref()
            .ok_or_else(|| BridgeError::MalformedMessage("payload is required".to_string()))?;
        if payload.title.trim().is_empty() {
            return Err(BridgeError::MalformedMessage(
                "payload.title is required".to_string(),
            ));
        }
        let platform = payload
            .platform
            .parse::<Platform>()
            .map_err(|e| BridgeError::MalformedMessage(e.to_string()))?;

        Ok(Self {
            user_id: user_id.to_string(),
            platform,
            title: payload.title.trim().to_string(),
            track_ids: payload.tracks.clone(),
        })
    }
}

impl Bridge {
    /// Creates the playlist on the user's behalf. The upstream call runs as
    /// its own task; its handle is the only way the result comes back.
    pub async fn create_playlist(
        &self,
        request: CreateRequest,
    ) -> Result<CreatePlaylistResponse, BridgeError> {
        let user = self
            .users
            .find_user_by_platform_id(&request.user_id)
            .await?
            .ok_or_else(|| BridgeError::UserNotFound(request.user_id.clone()))?;

        if user.platform != request.platform {
            warn!(
                "User {} registered with {} is creating a playlist on {}",
                user.platform_id, user.platform, request.platform
            );
        }

        let adapter = Arc::clone(self.platforms.get(request.platform));
        let platform = request.platform;
        let title = request.title;
        let track_ids = request.track_ids;
        let user_platform_id = user.platform_id;
        let token = user.token;

        info!(
            "Creating {} playlist '{}' with {} tracks for {}",
            platform,
            title,
            track_ids.len(),
            user_platform_id
        );

        let task = tokio::spawn(async move {
            adapter
                .create_playlist(&user_platform_id, &title, &token, &track_ids)
                .await
        });

        match task.await {
            Ok(Ok(created)) => Ok(CreatePlaylistResponse::new(created)),
            Ok(Err(e)) => Err(BridgeError::UpstreamCreate {
                platform,
                message: e.to_string(),
            }),
            Err(join_error) => Err(BridgeError::UpstreamCreate {
                platform,
                message: join_error.to_string(),
            }),
        }
    }
}
