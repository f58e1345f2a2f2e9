use vidtree_extractor_api::anyhow::Result;
use vidtree_extractor_api::url::Url;
use vidtree_extractor_api::{
    async_trait, ExtractionContext, NewExtractor, StreamExtraction, StreamExtractor, URLMatcher,
};

use crate::config::FilmixConfig;
use crate::provider::StreamProvider;

pub struct FilmixSE {
    config: FilmixConfig,
}

impl NewExtractor for FilmixSE {
    fn new() -> Self {
        FilmixSE {
            config: FilmixConfig::default(),
        }
    }
}

impl FilmixSE {
    pub fn with_config(config: FilmixConfig) -> Self {
        FilmixSE { config }
    }
}

impl URLMatcher for FilmixSE {
    fn match_extractor(&self, url: &Url) -> bool {
        Some(url)
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            // mirrors come and go: filmix.my, filmix.ac, m.filmix.fm...
            .filter(|u| {
                u.host_str()
                    .and_then(|h| h.rsplit('.').nth(1))
                    .map_or(false, |label| label.starts_with("filmix"))
            })
            .filter(|u| {
                u.path_segments()
                    .map_or(0, |segments| segments.filter(|s| !s.is_empty()).count())
                    >= 2
            })
            .is_some()
    }
}

#[async_trait]
impl StreamExtractor for FilmixSE {
    async fn extract_streams(
        &self,
        ctx: &ExtractionContext,
        url: &Url,
    ) -> Result<StreamExtraction> {
        let provider = StreamProvider::from_url(ctx.clone(), url, self.config.clone())?;
        let streams = provider.try_get_stream_data().await?;
        let identifier = provider.identifier();
        Ok(StreamExtraction {
            id: identifier.id.to_string(),
            category: identifier.category,
            streams,
        })
    }
}
