#[macro_use]
extern crate smart_default;

mod builder;
pub mod config;
mod decoder;
pub mod error;
pub mod extractor;
mod locator;
pub mod provider;
mod quality;
pub mod types;

#[cfg(test)]
mod testing;

pub use builder::StreamTreeBuilder;
pub use config::FilmixConfig;
pub use decoder::ObfuscationDecoder;
pub use error::{DecodeError, FilmixError};
pub use extractor::FilmixSE;
pub use locator::{category_from_url, identifier_from_url, player_data_endpoint, ContentIdentifier};
pub use provider::StreamProvider;
pub use quality::parse_quality_list;

use once_cell::sync::Lazy;
use vidtree_extractor_api::{NewExtractor, StreamExtractor};

pub static EXTRACTORS: Lazy<Vec<Box<dyn StreamExtractor>>> =
    Lazy::new(|| vec![Box::new(FilmixSE::new())]);
