use std::collections::BTreeMap;

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_string_from_number;
use serde_json::Value;

pub const SUCCESS: &str = "success";

/// Outer shape of the player-data response. `message` is an error string on failure,
/// so it is only looked into once `type` says so.
#[derive(Deserialize, Debug)]
pub struct PlayerDataEnvelope {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: Value,
}

impl PlayerDataEnvelope {
    pub fn is_success(&self) -> bool {
        self.kind == SUCCESS
    }
}

#[derive(Deserialize, Debug)]
pub struct PlayerMessage {
    pub translations: Translations,
}

#[derive(Deserialize, Debug)]
pub struct Translations {
    pub video: VideoSources,
}

/// Translation label to obfuscated video field.
/// An empty object comes out of the PHP backend as `[]`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum VideoSources {
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl VideoSources {
    pub fn into_map(self) -> BTreeMap<String, Value> {
        match self {
            VideoSources::Map(map) => map,
            VideoSources::List(_) => BTreeMap::new(),
        }
    }
}

/// One entry of a series playlist, usually a season.
#[derive(Deserialize, Debug)]
pub struct EpisodeGroup {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub folder: Vec<EpisodeFolder>,
}

#[derive(Deserialize, Debug)]
pub struct EpisodeFolder {
    #[serde(default, deserialize_with = "deserialize_string_from_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// `[label]url` entries, comma separated, not obfuscated
    #[serde(default)]
    pub file: String,
}
