mod common;

use api::gateway::handle_text;
use common::bridge;
use shared::{platform::Platform, session::ServerFrame};
use trackbridge::counter::SEARCHES_KEY;

fn error_desc(frame: Option<ServerFrame>) -> String {
    match frame {
        Some(ServerFrame::Error(e)) => e.desc,
        other => panic!("expected an error frame, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_gets_error_frame() {
    let (bridge, _) = bridge();
    assert_eq!(error_desc(handle_text(&bridge, "{not json").await), "malformed_message");
}

#[tokio::test]
async fn unknown_action_gets_no_answer() {
    let (bridge, store) = bridge();
    let frame = handle_text(&bridge, r#"{"action_type":"album","url":"x"}"#).await;
    assert!(frame.is_none());
    assert_eq!(store.get(SEARCHES_KEY), None);
}

#[tokio::test]
async fn track_message_answers_with_pair() {
    let (bridge, store) = bridge();
    let frame = handle_text(
        &bridge,
        r#"{"action_type":"track","url":"https://www.deezer.com/track/7"}"#,
    )
    .await;

    let pair = match frame {
        Some(ServerFrame::Track(pair)) => pair,
        other => panic!("expected a track pair, got {other:?}"),
    };
    assert_eq!(pair.0.len(), 1);
    assert_eq!(pair.1.len(), 1);
    assert_eq!(pair.0[0].platform, Platform::Deezer);
    assert_eq!(pair.1[0].platform, Platform::Spotify);
    assert_eq!(store.get(SEARCHES_KEY), Some(1));

    // wire shape: [[deezer], [spotify]]
    let json = serde_json::to_value(ServerFrame::Track(pair)).unwrap();
    assert!(json.as_array().is_some_and(|sides| sides.len() == 2));
}

#[tokio::test]
async fn each_message_counts_once() {
    let (bridge, store) = bridge();
    let msg = r#"{"action_type":"track","url":"https://www.deezer.com/track/7"}"#;
    handle_text(&bridge, msg).await;
    handle_text(&bridge, msg).await;
    assert_eq!(store.get(SEARCHES_KEY), Some(2));
}

#[tokio::test]
async fn missing_url_is_malformed() {
    let (bridge, _) = bridge();
    assert_eq!(
        error_desc(handle_text(&bridge, r#"{"action_type":"playlist"}"#).await),
        "malformed_message"
    );
}

#[tokio::test]
async fn unsupported_link_is_reported() {
    let (bridge, _) = bridge();
    assert_eq!(
        error_desc(
            handle_text(&bridge, r#"{"action_type":"track","url":"https://tidal.com/track/1"}"#)
                .await
        ),
        "unsupported_host"
    );
}

#[tokio::test]
async fn create_for_unknown_user_is_reported() {
    let (bridge, _) = bridge();
    let msg = r#"{"action_type":"create_playlist","userid":"ghost",
                  "payload":{"title":"Mix","tracks":["1"],"platform":"spotify"}}"#;
    assert_eq!(error_desc(handle_text(&bridge, msg).await), "user_not_found");
}

#[tokio::test]
async fn missing_playlist_answers_empty() {
    let (bridge, _) = bridge();
    let frame = handle_text(
        &bridge,
        r#"{"action_type":"playlist","url":"https://www.deezer.com/playlist/1"}"#,
    )
    .await;
    let response = match frame {
        Some(ServerFrame::Playlist(response)) => response,
        other => panic!("expected a playlist response, got {other:?}"),
    };
    assert!(response.payload.0.is_empty() && response.payload.1.is_empty());
}
