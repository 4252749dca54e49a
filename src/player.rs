//! Thin adapter in front of songbird's input layer. Search-source dispatch
//! happens on a closed enum rather than free-text tags; everything past this
//! boundary (queueing, decoding, playback state) is songbird's.

use songbird::input::error::Error as InputError;
use songbird::input::restartable::Restartable;
use songbird::tracks::TrackHandle;
use tracing::warn;

use crate::util::format_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    YouTube,
    SoundCloud,
    Spotify,
    Direct,
}

impl SearchMode {
    /// Recognizes the user-facing mode tags. Unknown tags are not an error;
    /// the play command folds them back into the search text.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "yt" | "youtube" => Some(Self::YouTube),
            "sc" | "soundcloud" => Some(Self::SoundCloud),
            "spt" | "spotify" => Some(Self::Spotify),
            "direct" | "direct_mode" => Some(Self::Direct),
            _ => None,
        }
    }
}

pub enum QueryOutcome {
    Track(Restartable),
    NotFound,
    Unsupported,
}

/// Resolves a query to a lazy restartable source. Lazy sources defer the
/// actual download until the track goes live, so queueing stays cheap.
pub async fn query_tracks(mode: SearchMode, query: &str) -> Result<QueryOutcome, InputError> {
    match mode {
        SearchMode::YouTube => {
            if query.starts_with("http") {
                Ok(QueryOutcome::Track(Restartable::ytdl(query.to_string(), true).await?))
            } else {
                search(query.to_string()).await
            }
        }
        SearchMode::SoundCloud => {
            if query.starts_with("http") {
                Ok(QueryOutcome::Track(Restartable::ytdl(query.to_string(), true).await?))
            } else {
                // yt-dlp understands scsearch: the same way it does ytsearch:.
                match Restartable::ytdl(format!("scsearch1:{}", query), true).await {
                    Ok(source) => Ok(QueryOutcome::Track(source)),
                    Err(e) => {
                        warn!("soundcloud search for {:?} failed: {e:?}", query);
                        Ok(QueryOutcome::NotFound)
                    }
                }
            }
        }
        SearchMode::Spotify => Ok(QueryOutcome::Unsupported),
        SearchMode::Direct => {
            if query.starts_with("http") {
                Ok(QueryOutcome::Track(Restartable::ytdl(query.to_string(), true).await?))
            } else {
                Ok(QueryOutcome::NotFound)
            }
        }
    }
}

async fn search(query: String) -> Result<QueryOutcome, InputError> {
    match Restartable::ytdl_search(query.clone(), true).await {
        Ok(source) => Ok(QueryOutcome::Track(source)),
        Err(e) => {
            // A miss and a backend failure look alike from here; treat both
            // as "not found" and leave the details in the log.
            warn!("youtube search for {:?} failed: {e:?}", query);
            Ok(QueryOutcome::NotFound)
        }
    }
}

pub fn track_title(handle: &TrackHandle) -> String {
    handle
        .metadata()
        .title
        .clone()
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn track_artist(handle: &TrackHandle) -> String {
    let meta = handle.metadata();
    meta.artist
        .clone()
        .or_else(|| meta.channel.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// `▶ Now Playing: ...` line with live position, used by both the
/// `now_playing` command and the track-start announcement.
pub async fn now_playing_line(handle: &TrackHandle) -> String {
    let position = handle
        .get_info()
        .await
        .map(|info| info.position)
        .unwrap_or_default();
    let duration = handle.metadata().duration.unwrap_or_default();

    format!(
        "▶ Now Playing: `{}` by **{}** [{} / {}]",
        track_title(handle),
        track_artist(handle),
        format_duration(position.as_secs()),
        format_duration(duration.as_secs()),
    )
}

/// One queue-listing row, numbered from the caller's point of view (entry 1
/// is the first queued track after the one currently playing).
pub fn queue_line(handle: &TrackHandle, entry: usize) -> String {
    let duration = handle.metadata().duration.unwrap_or_default();
    format!(
        "[#{}] `{}` by **{}** [{}]",
        entry,
        track_title(handle),
        track_artist(handle),
        format_duration(duration.as_secs()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tags_parse() {
        assert_eq!(SearchMode::parse("yt"), Some(SearchMode::YouTube));
        assert_eq!(SearchMode::parse("YouTube"), Some(SearchMode::YouTube));
        assert_eq!(SearchMode::parse("sc"), Some(SearchMode::SoundCloud));
        assert_eq!(SearchMode::parse("SPT"), Some(SearchMode::Spotify));
        assert_eq!(SearchMode::parse("direct_mode"), Some(SearchMode::Direct));
        assert_eq!(SearchMode::parse("never mind"), None);
    }
}
