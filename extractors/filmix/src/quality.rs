use once_cell::sync::Lazy;
use regex::Regex;
use vidtree_extractor_api::QualityMap;

static QUALITY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// Turns `[label]url` entries into a label to URL map.
///
/// Entries without a bracketed tag are dropped, repeated labels keep the last URL.
pub fn parse_quality_list<'a, I>(entries: I) -> QualityMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut qualities = QualityMap::new();
    for entry in entries {
        let Some(captures) = QUALITY_TAG.captures(entry) else {
            continue;
        };
        let (Some(tag), Some(label)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let url = format!("{}{}", &entry[..tag.start()], &entry[tag.end()..]);
        qualities.insert(label.as_str().to_string(), url.trim().to_string());
    }
    qualities
}
