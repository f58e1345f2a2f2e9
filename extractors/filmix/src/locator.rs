use vidtree_extractor_api::url::Url;
use vidtree_extractor_api::{ContentCategory, Utc};

/// First path segment of every movie page, anything else is episodic.
const MOVIE_SEGMENT: &str = "film";

const PLAYER_DATA_PATH: &str = "/api/movies/player-data";

/// Where a content page points to, fixed once the page URL is known.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ContentIdentifier {
    pub id: u64,
    pub category: ContentCategory,
}

impl ContentIdentifier {
    pub fn from_url(url: &Url) -> Self {
        ContentIdentifier {
            id: identifier_from_url(url.as_str()),
            category: category_from_url(url),
        }
    }
}

/// Numeric id out of the last URL segment, e.g. `173398` from
/// `/film/triller/173398-v-megan-k-vashim-uslugam-2024.html`.
///
/// The segment is split once at its first `-` and the part before it must be a number.
/// When it is not, the digits leading the part after the `-` are used. Anything else is id 0.
pub fn identifier_from_url(url: &str) -> u64 {
    let last = url.rsplit('/').next().unwrap_or_default();
    let Some((prefix, rest)) = last.split_once('-') else {
        return 0;
    };
    prefix
        .parse()
        .ok()
        .or_else(|| leading_digits(rest).parse().ok())
        .unwrap_or(0)
}

fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

pub fn category_from_url(url: &Url) -> ContentCategory {
    let first_segment = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()));
    if first_segment == Some(MOVIE_SEGMENT) {
        ContentCategory::Movie
    } else {
        ContentCategory::Series
    }
}

/// Player-data endpoint on the same scheme, host and port as the content page.
/// The `t` parameter is the current unix time, only there to get past caches.
pub fn player_data_endpoint(url: &Url) -> Url {
    let mut endpoint = url.clone();
    endpoint.set_path(PLAYER_DATA_PATH);
    endpoint.set_query(Some(&format!("t={}", Utc::now().timestamp())));
    endpoint.set_fragment(None);
    endpoint
}
