//! Turns a shared link into the platform and id it points at.

use shared::platform::{EntityKind, Platform};
use url::Url;

use crate::error::BridgeError;

/// Spotify ids are 22 base62 characters.
const SPOTIFY_ID_LEN: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedIdentifier {
    pub host: Platform,
    pub kind: EntityKind,
    pub id: String,
}

/// Resolves a Deezer or Spotify link (web URL, app deep link or
/// `spotify:` URI) to `{host, kind, id}`.
pub fn extract(raw: &str) -> Result<ExtractedIdentifier, BridgeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BridgeError::UnsupportedHost(raw.to_string()));
    }

    if let Some(rest) = raw.strip_prefix("spotify:") {
        return extract_spotify_uri(raw, rest);
    }

    let url = parse_loose(raw).ok_or_else(|| BridgeError::UnsupportedHost(raw.to_string()))?;
    let host = url
        .host_str()
        .map(|h| h.to_ascii_lowercase())
        .unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let platform = match host {
        "deezer.com" => Platform::Deezer,
        "open.spotify.com" | "play.spotify.com" => Platform::Spotify,
        _ => return Err(BridgeError::UnsupportedHost(raw.to_string())),
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    // Locale prefixes come first: deezer.com/fr/track/1, open.spotify.com/intl-de/track/x
    let (kind_at, kind) = segments
        .iter()
        .take(2)
        .enumerate()
        .find_map(|(at, seg)| parse_kind(seg).map(|kind| (at, kind)))
        .ok_or_else(|| malformed(platform, raw, "no track or playlist in path"))?;
    let id = segments
        .get(kind_at + 1)
        .ok_or_else(|| malformed(platform, raw, "missing id"))?;

    validate_id(platform, raw, id)?;

    Ok(ExtractedIdentifier {
        host: platform,
        kind,
        id: id.to_string(),
    })
}

fn extract_spotify_uri(raw: &str, rest: &str) -> Result<ExtractedIdentifier, BridgeError> {
    let mut parts = rest.split(':');
    let kind = parts
        .next()
        .and_then(parse_kind)
        .ok_or_else(|| malformed(Platform::Spotify, raw, "no track or playlist in URI"))?;
    let id = parts
        .next()
        .ok_or_else(|| malformed(Platform::Spotify, raw, "missing id"))?;
    if parts.next().is_some() {
        return Err(malformed(Platform::Spotify, raw, "unexpected segments after id"));
    }
    validate_id(Platform::Spotify, raw, id)?;

    Ok(ExtractedIdentifier {
        host: Platform::Spotify,
        kind,
        id: id.to_string(),
    })
}

/// Accepts links pasted without a scheme (`deezer.com/track/1`).
fn parse_loose(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")).ok(),
        Err(_) => None,
    }
}

fn parse_kind(segment: &str) -> Option<EntityKind> {
    match segment {
        "track" => Some(EntityKind::Track),
        "playlist" => Some(EntityKind::Playlist),
        _ => None,
    }
}

fn validate_id(platform: Platform, raw: &str, id: &str) -> Result<(), BridgeError> {
    let valid = match platform {
        Platform::Deezer => !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()),
        Platform::Spotify => {
            id.len() == SPOTIFY_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())
        }
    };
    if valid {
        Ok(())
    } else {
        Err(malformed(platform, raw, "invalid id"))
    }
}

fn malformed(platform: Platform, raw: &str, reason: &str) -> BridgeError {
    BridgeError::MalformedUrl {
        platform,
        url: raw.to_string(),
        reason: reason.to_string(),
    }
}
