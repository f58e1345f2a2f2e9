use tracing::warn;
use vidtree_extractor_api::url::{form_urlencoded, Url};
use vidtree_extractor_api::{ContentCategory, ExtractionContext, Method, StreamTree};

use crate::builder::StreamTreeBuilder;
use crate::config::FilmixConfig;
use crate::decoder::ObfuscationDecoder;
use crate::error::FilmixError;
use crate::locator::{player_data_endpoint, ContentIdentifier};
use crate::types::PlayerDataEnvelope;

/// One content page and everything needed to pull its streams.
///
/// Id and category are read from the page URL once, on construction.
pub struct StreamProvider {
    url: Url,
    identifier: ContentIdentifier,
    config: FilmixConfig,
    decoder: ObfuscationDecoder,
    ctx: ExtractionContext,
}

impl StreamProvider {
    pub fn new(ctx: ExtractionContext, url: &str) -> Result<Self, FilmixError> {
        Self::with_config(ctx, url, FilmixConfig::default())
    }

    pub fn with_config(
        ctx: ExtractionContext,
        url: &str,
        config: FilmixConfig,
    ) -> Result<Self, FilmixError> {
        let parsed = Url::parse(url).map_err(|e| FilmixError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(ctx, &parsed, config)
    }

    pub fn from_url(
        ctx: ExtractionContext,
        url: &Url,
        config: FilmixConfig,
    ) -> Result<Self, FilmixError> {
        if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
            return Err(FilmixError::InvalidUrl {
                url: url.to_string(),
                reason: "no host".to_string(),
            });
        }
        Ok(StreamProvider {
            url: url.clone(),
            identifier: ContentIdentifier::from_url(url),
            decoder: ObfuscationDecoder::new(config.filler_tokens.clone()),
            config,
            ctx,
        })
    }

    pub fn identifier(&self) -> ContentIdentifier {
        self.identifier
    }

    pub fn is_movie(&self) -> bool {
        self.identifier.category == ContentCategory::Movie
    }

    pub async fn fetch_player_data(&self) -> Result<PlayerDataEnvelope, FilmixError> {
        let endpoint = player_data_endpoint(&self.url);
        let cookie = self.config.cookie_header();
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("post_id", &self.identifier.id.to_string())
            .append_pair("showfull", "true")
            .finish();
        Ok(self
            .ctx
            .get_json(
                "player data",
                Method::Post,
                endpoint.as_str(),
                &[
                    ("x-requested-with", "XMLHttpRequest"),
                    ("Cookie", cookie.as_str()),
                    ("Content-Type", "application/x-www-form-urlencoded"),
                ],
                Some(body.as_str()),
            )
            .await?)
    }

    /// Like [`StreamProvider::get_stream_data`], but a failed, unsuccessful or malformed
    /// player-data response is an error instead of an empty tree.
    pub async fn try_get_stream_data(&self) -> Result<StreamTree, FilmixError> {
        let response = self.fetch_player_data().await?;
        StreamTreeBuilder::new(&self.ctx, &self.decoder)
            .try_build(response, self.identifier.category)
            .await
    }

    pub async fn get_stream_data(&self) -> StreamTree {
        match self.try_get_stream_data().await {
            Ok(tree) => tree,
            Err(e) => {
                warn!(url = %self.url, error = %e, "no player data");
                StreamTree::new()
            }
        }
    }
}
