use serde::Deserialize;

/// Cookie name the player-data endpoint wants the session under.
pub const SESSION_COOKIE_NAME: &str = "FILMIXNET";

/// Credentials and de-obfuscation key. Both rotate upstream now and then,
/// so they are loadable instead of baked into the extraction code.
#[derive(Deserialize, SmartDefault, PartialEq, Clone, Debug)]
#[serde(default)]
pub struct FilmixConfig {
    #[default = "ah3mgjr8vgfe84u86vcvu5gcp9"]
    pub session_cookie: String,
    #[default(_code = "default_filler_tokens()")]
    pub filler_tokens: Vec<String>,
}

impl FilmixConfig {
    pub fn cookie_header(&self) -> String {
        format!("{}={}", SESSION_COOKIE_NAME, self.session_cookie)
    }
}

pub fn default_filler_tokens() -> Vec<String> {
    [
        ":<:bzl3UHQwaWk0MkdXZVM3TDdB",
        ":<:SURhQnQwOEM5V2Y3bFlyMGVI",
        ":<:bE5qSTlWNVUxZ01uc3h0NFFy",
        ":<:Mm93S0RVb0d6c3VMTkV5aE54",
        ":<:MTluMWlLQnI4OXVic2tTNXpU",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
