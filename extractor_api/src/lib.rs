#[macro_use]
extern crate smart_default;

mod context;
mod transport;

pub use context::{
    accept_language, build_http, system_locales, ExtractionContext, JsonRequestError,
    DEFAULT_TIMEOUT,
};
pub use transport::{HttpTransport, Method, Transport, TransportError};

pub use anyhow;
pub use async_trait::async_trait;
pub use chrono::{self, DateTime, Utc};
pub use reqwest;
pub use url;

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

pub trait NewExtractor {
    fn new() -> Self;
}

pub trait URLMatcher {
    fn match_extractor(&self, url: &Url) -> bool;
}

#[async_trait]
pub trait StreamExtractor: URLMatcher + Sync + Send {
    /// Resolves a content page into every playable stream the service exposes for it.
    ///
    /// Failures of individual translations are not errors here, they are left out of
    /// [`StreamExtraction::streams`]. An `Err` means nothing could be extracted at all.
    async fn extract_streams(&self, ctx: &ExtractionContext, url: &Url)
        -> Result<StreamExtraction>;
}

/// Content type, as the service tells them apart.
#[derive(Serialize, SmartDefault, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    /// Single video, one quality list per translation
    Movie,
    /// Episodic content, qualities live under episode groups and folders
    #[default]
    Series,
}

/// Quality label (`480p`, `1080p Ultra+`, ...) to playable URL.
pub type QualityMap = BTreeMap<String, String>;

#[derive(Serialize, Default, PartialEq, Eq, Clone, Debug)]
pub struct Folder {
    pub title: String,
    pub quality: QualityMap,
}

/// Folder id to folder, within one episode group.
pub type FolderMap = BTreeMap<String, Folder>;

/// Episode group title (usually a season) to its folders.
pub type EpisodeGroupMap = BTreeMap<String, FolderMap>;

/// Everything playable in one translation (dub, voice-over, subtitles track).
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
#[serde(untagged)]
pub enum TranslationTrack {
    Movie(QualityMap),
    Series(EpisodeGroupMap),
}

impl TranslationTrack {
    pub fn movie(&self) -> Option<&QualityMap> {
        match self {
            TranslationTrack::Movie(qualities) => Some(qualities),
            _ => None,
        }
    }

    pub fn series(&self) -> Option<&EpisodeGroupMap> {
        match self {
            TranslationTrack::Series(groups) => Some(groups),
            _ => None,
        }
    }
}

/// Translation label to its track.
pub type StreamTree = BTreeMap<String, TranslationTrack>;

/// What the stream extractor spits out at you.
#[derive(Serialize, Default, PartialEq, Clone, Debug)]
pub struct StreamExtraction {
    pub id: String,
    pub category: ContentCategory,
    pub streams: StreamTree,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stream_tree_serializes_untagged() {
        let mut movie = QualityMap::new();
        movie.insert("720p".to_string(), "http://a/720.mp4".to_string());

        let mut folders = FolderMap::new();
        folders.insert(
            "s01e01".to_string(),
            Folder {
                title: "Episode 1".to_string(),
                quality: movie.clone(),
            },
        );
        let mut groups = EpisodeGroupMap::new();
        groups.insert("Season 1".to_string(), folders);

        let mut tree = StreamTree::new();
        tree.insert("Dub".to_string(), TranslationTrack::Movie(movie));
        tree.insert("Original".to_string(), TranslationTrack::Series(groups));

        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "Dub": { "720p": "http://a/720.mp4" },
                "Original": {
                    "Season 1": {
                        "s01e01": {
                            "title": "Episode 1",
                            "quality": { "720p": "http://a/720.mp4" }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn category_defaults_to_series() {
        assert_eq!(ContentCategory::default(), ContentCategory::Series);
        assert_eq!(
            serde_json::to_value(ContentCategory::Movie).unwrap(),
            json!("movie")
        );
    }

    #[test]
    fn track_accessors() {
        let track = TranslationTrack::Movie(QualityMap::new());
        assert!(track.movie().is_some());
        assert!(track.series().is_none());
    }
}
