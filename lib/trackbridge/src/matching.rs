//! Deciding whether two platform records describe the same recording.

use std::sync::LazyLock;

use regex::Regex;
use shared::music::Track;

/// Minimum similarity for two records to count as the same recording.
pub const SAME_RECORDING_THRESHOLD: f64 = 0.85;

/// Minimum similarity for a search hit to be accepted at all.
pub const SEARCH_ACCEPT_THRESHOLD: f64 = 0.5;

static RE_FEATURING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\(\[]\s*(feat\.?|ft\.?|featuring|with)\s[^\)\]]*[\)\]]")
        .expect("valid featuring regex")
});
static RE_VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+-\s+.*\b(remaster(ed)?|version|edit|live|mono|stereo)\b.*$")
        .expect("valid version suffix regex")
});
static RE_VERSION_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\(\[][^\)\]]*\b(remaster(ed)?|version|edit|mono|stereo)\b[^\)\]]*[\)\]]")
        .expect("valid version bracket regex")
});
static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));

/// Lowercases and strips featuring credits, remaster/edit tags and
/// punctuation so "Song (feat. X) - 2011 Remaster" compares equal to "song".
pub fn normalize(s: &str) -> String {
    let s = RE_FEATURING.replace_all(s, "");
    let s = RE_VERSION_BRACKET.replace_all(&s, "");
    let s = RE_VERSION_SUFFIX.replace(&s, "");
    let s = RE_NON_WORD.replace_all(&s, " ");
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of a candidate to a wanted title/artist, in `[0, 1]`.
pub fn score(title: &str, artist: &str, candidate: &Track) -> f64 {
    let title_sim = strsim::jaro_winkler(&normalize(title), &normalize(&candidate.title));

    let wanted_artist = normalize(artist);
    if wanted_artist.is_empty() || candidate.artists.is_empty() {
        return title_sim;
    }

    let artist_sim = candidate
        .artists
        .iter()
        .map(|a| strsim::jaro_winkler(&wanted_artist, &normalize(a)))
        .fold(0.0, f64::max);

    0.7 * title_sim + 0.3 * artist_sim
}

/// Identity comparison between two real records. Placeholders never match.
pub fn similarity(a: &Track, b: &Track) -> f64 {
    if a.is_placeholder() || b.is_placeholder() {
        return 0.0;
    }
    score(&a.title, a.primary_artist(), b)
}

/// Close overall and equal titles once decorations are stripped. Fuzzy
/// title closeness alone would pair "Part 1" with "Part 2".
pub fn is_same_recording(a: &Track, b: &Track) -> bool {
    similarity(a, b) >= SAME_RECORDING_THRESHOLD && normalize(&a.title) == normalize(&b.title)
}

/// Picks the search hit closest to the wanted title/artist. Ties keep the
/// platform's own relevance order.
pub fn best_candidate(title: &str, artist: &str, candidates: Vec<Track>) -> Option<Track> {
    let mut best: Option<(f64, Track)> = None;
    for candidate in candidates {
        let s = score(title, artist, &candidate);
        if s < SEARCH_ACCEPT_THRESHOLD {
            continue;
        }
        match &best {
            Some((top, _)) if *top >= s => {}
            _ => best = Some((s, candidate)),
        }
    }
    best.map(|(_, track)| track)
}
