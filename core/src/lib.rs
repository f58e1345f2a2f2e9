use once_cell::sync::Lazy;
use tracing::debug;
use vidtree_extractor_api::anyhow::Result;
use vidtree_extractor_api::url::Url;
pub use vidtree_extractor_api::*;

#[cfg(feature = "filmix")]
pub use vidtree_extractor_filmix::{FilmixConfig, FilmixSE};

pub static DEFAULT_EXTRACTOR_LIST: Lazy<Vec<&dyn StreamExtractor>> = Lazy::new(|| {
    let l = vec![].into_iter();

    #[cfg(feature = "filmix")]
    let l = l.chain(vidtree_extractor_filmix::EXTRACTORS.iter().map(Box::as_ref));

    l.collect()
});

pub struct CoreClient<'a> {
    extractors: Vec<&'a dyn StreamExtractor>,
    context: ExtractionContext,
}

impl CoreClient<'static> {
    pub fn new() -> Result<Self> {
        Ok(CoreClient {
            extractors: DEFAULT_EXTRACTOR_LIST.to_vec(),
            context: ExtractionContext::new()?,
        })
    }
}

impl<'a> CoreClient<'a> {
    pub fn with_extractors(
        context: ExtractionContext,
        extractors: Vec<&'a dyn StreamExtractor>,
    ) -> Self {
        CoreClient {
            extractors,
            context,
        }
    }

    /// `None` if no extractor takes the URL.
    pub async fn extract_url(&self, url: &Url) -> Result<Option<StreamExtraction>> {
        for extractor in &self.extractors {
            if extractor.match_extractor(url) {
                debug!(%url, "extractor matched");
                return extractor
                    .extract_streams(&self.context, url)
                    .await
                    .map(Option::Some);
            }
        }
        Ok(None)
    }
}
