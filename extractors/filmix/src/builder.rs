use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};
use vidtree_extractor_api::{
    ContentCategory, EpisodeGroupMap, ExtractionContext, Folder, Method, StreamTree,
    TranslationTrack,
};

use crate::decoder::ObfuscationDecoder;
use crate::error::FilmixError;
use crate::quality::parse_quality_list;
use crate::types::{EpisodeGroup, PlayerDataEnvelope, PlayerMessage};

/// Normalizes a player-data response into a [`StreamTree`].
///
/// The shape of every track follows `category`, never the payload: movies decode their
/// quality list in place, series translations each cost one more request for the playlist.
pub struct StreamTreeBuilder<'a> {
    ctx: &'a ExtractionContext,
    decoder: &'a ObfuscationDecoder,
}

impl<'a> StreamTreeBuilder<'a> {
    pub fn new(ctx: &'a ExtractionContext, decoder: &'a ObfuscationDecoder) -> Self {
        StreamTreeBuilder { ctx, decoder }
    }

    /// Never fails. An unsuccessful or malformed response gives an empty tree.
    pub async fn build(
        &self,
        response: PlayerDataEnvelope,
        category: ContentCategory,
    ) -> StreamTree {
        match self.try_build(response, category).await {
            Ok(tree) => tree,
            Err(e) => {
                warn!(error = %e, "unusable player data");
                StreamTree::new()
            }
        }
    }

    /// Fails only on an unsuccessful or malformed response as a whole.
    /// Translations that cannot be extracted are left out.
    pub async fn try_build(
        &self,
        response: PlayerDataEnvelope,
        category: ContentCategory,
    ) -> Result<StreamTree, FilmixError> {
        if !response.is_success() {
            return Err(FilmixError::MalformedResponse(format!(
                "type {:?}: {}",
                response.kind, response.message
            )));
        }
        let message: PlayerMessage = serde_json::from_value(response.message)
            .map_err(|e| FilmixError::MalformedResponse(e.to_string()))?;

        let mut videos = Vec::new();
        for (translation, video) in message.translations.video.into_map() {
            match video {
                Value::String(video) => videos.push((translation, video)),
                other => {
                    warn!(translation = %translation, video = %other, "video field is not a string")
                }
            }
        }

        Ok(match category {
            ContentCategory::Movie => self.build_movie(videos),
            ContentCategory::Series => self.build_series(videos).await,
        })
    }

    fn build_movie(&self, videos: Vec<(String, String)>) -> StreamTree {
        videos
            .into_iter()
            .filter_map(|(translation, video)| match self.decoder.decode(&video) {
                Ok(decoded) => Some((
                    translation,
                    TranslationTrack::Movie(parse_quality_list(decoded.split(','))),
                )),
                Err(e) => {
                    warn!(translation = %translation, error = %e, "cannot decode video field");
                    None
                }
            })
            .collect()
    }

    /// Fetches every playlist at once and returns only after the last one settled.
    /// Dropping the future drops whatever is still in flight.
    async fn build_series(&self, videos: Vec<(String, String)>) -> StreamTree {
        let mut fetches: FuturesUnordered<_> = videos
            .into_iter()
            .map(|(translation, video)| async move {
                let groups = self.fetch_episode_groups(&video).await;
                (translation, groups)
            })
            .collect();

        let mut tree = StreamTree::new();
        while let Some((translation, groups)) = fetches.next().await {
            debug!(translation = %translation, remaining = fetches.len(), "playlist settled");
            match groups {
                Ok(groups) => {
                    tree.insert(translation, TranslationTrack::Series(groups));
                }
                Err(e) => {
                    warn!(translation = %translation, error = %e, "dropping translation")
                }
            }
        }
        tree
    }

    async fn fetch_episode_groups(&self, video: &str) -> Result<EpisodeGroupMap, FilmixError> {
        let playlist_url = self.decoder.decode(video)?;
        let body = self
            .ctx
            .request("series playlist", Method::Get, &playlist_url, &[], None)
            .await?;
        Ok(episode_group_map(self.parse_playlist(&body)?))
    }

    fn parse_playlist(&self, body: &[u8]) -> Result<Vec<EpisodeGroup>, FilmixError> {
        match serde_json::from_slice(body) {
            Ok(groups) => Ok(groups),
            Err(e) => {
                // some mirrors obfuscate the playlist body as well
                let text = String::from_utf8_lossy(body);
                match self.decoder.decode(text.trim()) {
                    Ok(decoded) => Ok(serde_json::from_str(&decoded)?),
                    Err(_) => Err(e.into()),
                }
            }
        }
    }
}

/// Groups with the same title are merged, a repeated folder id keeps the last folder.
fn episode_group_map(groups: Vec<EpisodeGroup>) -> EpisodeGroupMap {
    let mut map = EpisodeGroupMap::new();
    for group in groups {
        let folders = map.entry(group.title.trim().to_string()).or_default();
        for folder in group.folder {
            folders.insert(
                folder.id,
                Folder {
                    title: folder.title.trim().to_string(),
                    quality: parse_quality_list(folder.file.split(',')),
                },
            );
        }
    }
    map
}
