//! Messages exchanged over the bridge WebSocket.

use serde::{Deserialize, Serialize};

use crate::music::{PlaylistMeta, PlaylistOwner, Track};

/// The `action_type` of an inbound message. Anything unrecognised is kept
/// verbatim so the gateway can log it before closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Track,
    Playlist,
    CreatePlaylist,
    Unknown(String),
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "track" => ActionType::Track,
            "playlist" => ActionType::Playlist,
            "create_playlist" => ActionType::CreatePlaylist,
            _ => ActionType::Unknown(s),
        }
    }
}

impl From<ActionType> for String {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Track => "track".to_string(),
            ActionType::Playlist => "playlist".to_string(),
            ActionType::CreatePlaylist => "create_playlist".to_string(),
            ActionType::Unknown(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePlaylistPayload {
    #[serde(default)]
    pub title: String,
    /// Track ids on the destination platform.
    #[serde(default)]
    pub tracks: Vec<String>,
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "action_type")]
    pub action: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<CreatePlaylistPayload>,
    #[serde(default, rename = "userid", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// `[[deezer], [spotify]]` for a single-track lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPair(pub Vec<Track>, pub Vec<Track>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformTracks {
    pub deezer: Vec<Track>,
    pub spotify: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub playlist_title: String,
    /// `[deezer, spotify]`, same lists as `platforms`.
    pub payload: (Vec<Track>, Vec<Track>),
    pub owner: PlaylistOwner,
    pub playlist_meta: PlaylistMeta,
    pub platforms: PlatformTracks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub action: String,
    pub payload: bool,
}

impl CreatePlaylistResponse {
    pub fn new(created: bool) -> Self {
        Self {
            action: "create".to_string(),
            payload: created,
        }
    }
}

/// The one error shape every failure is reported with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub desc: String,
    pub message: String,
}

/// Anything the gateway writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Track(TrackPair),
    Playlist(PlaylistResponse),
    Created(CreatePlaylistResponse),
    Error(ErrorFrame),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    #[test]
    fn decodes_track_message() {
        let msg: IncomingMessage = serde_json::from_str(
            r#"{"action_type":"track","url":"https://www.deezer.com/track/3135556"}"#,
        )
        .unwrap();
        assert_eq!(msg.action, ActionType::Track);
        assert_eq!(msg.url.as_deref(), Some("https://www.deezer.com/track/3135556"));
        assert!(msg.payload.is_none());
    }

    #[test]
    fn decodes_create_playlist_message() {
        let msg: IncomingMessage = serde_json::from_str(
            r#"{"action_type":"create_playlist","userid":"42",
                "payload":{"title":"Mix","tracks":["1","2"],"platform":"deezer"}}"#,
        )
        .unwrap();
        assert_eq!(msg.action, ActionType::CreatePlaylist);
        assert_eq!(msg.user_id.as_deref(), Some("42"));
        let payload = msg.payload.unwrap();
        assert_eq!(payload.tracks, vec!["1", "2"]);
        assert_eq!(payload.platform, "deezer");
    }

    #[test]
    fn keeps_unknown_action() {
        let msg: IncomingMessage =
            serde_json::from_str(r#"{"action_type":"dance"}"#).unwrap();
        assert_eq!(msg.action, ActionType::Unknown("dance".to_string()));
    }

    #[test]
    fn track_pair_is_nested_arrays() {
        let pair = TrackPair(
            vec![Track::placeholder(Platform::Deezer)],
            vec![Track::placeholder(Platform::Spotify)],
        );
        let json = serde_json::to_value(ServerFrame::Track(pair)).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0][0]["platform"], "deezer");
        assert_eq!(json[1][0]["platform"], "spotify");
    }

    #[test]
    fn create_response_shape() {
        let json = serde_json::to_value(CreatePlaylistResponse::new(true)).unwrap();
        assert_eq!(json, serde_json::json!({"action": "create", "payload": true}));
    }
}
