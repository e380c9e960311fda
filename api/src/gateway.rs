//! The bridge WebSocket. A session answers exactly one message and closes.

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use shared::session::{ActionType, IncomingMessage, ServerFrame};
use tracing::{debug, info, info_span, warn, Instrument};
use trackbridge::{Bridge, BridgeError, CreateRequest};
use uuid::Uuid;

use crate::state::AppState;

pub async fn ws_connect(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| {
        let span = info_span!("session", id = %Uuid::new_v4());
        run_session(socket, state).instrument(span)
    })
}

/// Decodes one inbound message and runs it to completion.
///
/// `None` means the action type is not one this gateway serves; the caller
/// closes without answering.
pub async fn handle_text(bridge: &Bridge, text: &str) -> Option<ServerFrame> {
    let message: IncomingMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Undecodable message: {}", e);
            return Some(ServerFrame::Error(
                BridgeError::MalformedMessage(e.to_string()).to_frame(),
            ));
        }
    };

    let result = match &message.action {
        ActionType::Track => match required_url(&message) {
            Ok(url) => bridge.track_from_url(url).await.map(ServerFrame::Track),
            Err(e) => Err(e),
        },
        ActionType::Playlist => match required_url(&message) {
            Ok(url) => bridge.playlist_from_url(url).await.map(ServerFrame::Playlist),
            Err(e) => Err(e),
        },
        ActionType::CreatePlaylist => match CreateRequest::from_message(&message) {
            Ok(request) => bridge.create_playlist(request).await.map(ServerFrame::Created),
            Err(e) => Err(e),
        },
        ActionType::Unknown(kind) => {
            info!("Unknown action type '{}', closing", kind);
            return None;
        }
    };

    Some(result.unwrap_or_else(|e| {
        warn!("{}", e);
        ServerFrame::Error(e.to_frame())
    }))
}

fn required_url(message: &IncomingMessage) -> Result<&str, BridgeError> {
    message
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| BridgeError::MalformedMessage("url is required".to_string()))
}

async fn run_session(mut socket: WebSocket, state: AppState) {
    debug!("Session opened");

    let text = loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                close(socket, close_code::AWAY).await;
                return;
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => break text.as_str().to_owned(),
                Some(Ok(Message::Binary(bytes))) => break String::from_utf8_lossy(&bytes).into_owned(),
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Closed by client before any message");
                    return;
                }
                // ping/pong are answered by axum
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("WebSocket read failed: {}", e);
                    return;
                }
            }
        }
    };

    let work = handle_text(&state.bridge, &text);
    tokio::pin!(work);

    let frame = loop {
        tokio::select! {
            frame = &mut work => break frame,
            _ = state.shutdown.cancelled() => {
                info!("Shutting down, abandoning in-flight message");
                close(socket, close_code::AWAY).await;
                return;
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                    info!("Client left, abandoning in-flight message");
                    return;
                }
                Some(Ok(_)) => continue,
            }
        }
    };

    if let Some(frame) = frame {
        match serde_json::to_string(&frame) {
            Ok(json) => {
                if let Err(e) = socket.send(Message::Text(json.into())).await {
                    warn!("Could not send response: {}", e);
                    return;
                }
            }
            Err(e) => warn!("Could not encode response: {}", e),
        }
    }

    close(socket, close_code::NORMAL).await;
}

async fn close(mut socket: WebSocket, code: u16) {
    let frame = CloseFrame {
        code,
        reason: Utf8Bytes::from_static(""),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        debug!("Close frame not delivered: {}", e);
    }
    debug!("Session closed ({})", code);
}
