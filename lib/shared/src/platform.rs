use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The streaming platforms the bridge can talk to.
///
/// Deezer is platform A and Spotify is platform B: responses always list
/// the Deezer side first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Deezer,
    Spotify,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Deezer, Platform::Spotify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Deezer => "deezer",
            Platform::Spotify => "spotify",
        }
    }

    /// The other platform of the pair.
    pub fn counterpart(&self) -> Platform {
        match self {
            Platform::Deezer => Platform::Spotify,
            Platform::Spotify => Platform::Deezer,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform '{}'", self.0)
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deezer" => Ok(Platform::Deezer),
            "spotify" => Ok(Platform::Spotify),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// What a shared link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Track,
    Playlist,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_swaps_platforms() {
        assert_eq!(Platform::Deezer.counterpart(), Platform::Spotify);
        assert_eq!(Platform::Spotify.counterpart(), Platform::Deezer);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Spotify".parse::<Platform>(), Ok(Platform::Spotify));
        assert_eq!(" deezer ".parse::<Platform>(), Ok(Platform::Deezer));
        assert!("tidal".parse::<Platform>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Platform::Deezer).unwrap(),
            "\"deezer\""
        );
    }
}
