use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::config::default_filler_tokens;
use crate::error::DecodeError;

/// Version tag in front of every obfuscated string, content ignored.
const MARKER_LEN: usize = 2;

/// Common prefix of all filler tokens. Seeing it after cleanup means an unknown token.
pub const TOKEN_MARKER: &str = ":<:";

// the player pads inconsistently
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reverses the player's string obfuscation: a 2-char marker, JSON-escaped slashes
/// and filler tokens sprinkled over plain base64.
#[derive(Clone, Debug)]
pub struct ObfuscationDecoder {
    tokens: Vec<String>,
}

impl Default for ObfuscationDecoder {
    fn default() -> Self {
        ObfuscationDecoder::new(default_filler_tokens())
    }
}

impl ObfuscationDecoder {
    pub fn new(tokens: Vec<String>) -> Self {
        ObfuscationDecoder {
            tokens: tokens.into_iter().filter(|t| !t.is_empty()).collect(),
        }
    }

    /// Everything except the base64 step.
    pub fn clean(&self, input: &str) -> String {
        let mut clean = input
            .chars()
            .skip(MARKER_LEN)
            .collect::<String>()
            .replace("\\/", "/");

        // removing one token can glue the halves of another one together
        loop {
            let before = clean.len();
            for token in &self.tokens {
                clean = clean.replace(token.as_str(), "");
            }
            if clean.len() == before {
                break;
            }
        }
        clean
    }

    pub fn decode(&self, input: &str) -> Result<String, DecodeError> {
        let clean = self.clean(input);
        if clean.contains(TOKEN_MARKER) {
            return Err(DecodeError::ResidualToken);
        }
        let clean = clean.trim();
        if clean.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(String::from_utf8(BASE64.decode(clean)?)?)
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::ObfuscationDecoder;
    use crate::config::default_filler_tokens;
    use crate::error::DecodeError;

    const PLAIN: &str = "???[720p]https://cdn.example/s/1/720.mp4";

    /// Encodes like the player does, pushing `tokens` in at the given byte offsets.
    fn obfuscate(plain: &str, insertions: &[(usize, &str)]) -> String {
        let mut encoded = STANDARD.encode(plain);
        for (at, token) in insertions.iter().rev() {
            encoded.insert_str(*at, token);
        }
        format!("#2{}", encoded.replace('/', "\\/"))
    }

    #[test]
    fn decodes_without_tokens() {
        let encoded = obfuscate(PLAIN, &[]);
        assert!(encoded.contains("\\/"));
        assert_eq!(ObfuscationDecoder::default().decode(&encoded).unwrap(), PLAIN);
    }

    #[test]
    fn strips_every_token_everywhere() {
        let tokens = default_filler_tokens();
        let encoded = obfuscate(
            PLAIN,
            &[
                (0, tokens[0].as_str()),
                (4, tokens[1].as_str()),
                (4, tokens[1].as_str()),
                (9, tokens[2].as_str()),
                (20, tokens[3].as_str()),
                (20, tokens[4].as_str()),
                (20, tokens[0].as_str()),
            ],
        );
        assert_eq!(ObfuscationDecoder::default().decode(&encoded).unwrap(), PLAIN);
    }

    #[test]
    fn strips_tokens_exposed_by_removal() {
        let tokens = default_filler_tokens();
        // tokens[0] only becomes contiguous once tokens[1] is gone from its middle
        let (head, tail) = tokens[0].split_at(7);
        let nested = format!("{head}{}{tail}", tokens[1]);
        let encoded = obfuscate(PLAIN, &[(8, nested.as_str()), (12, tokens[4].as_str())]);

        let decoder = ObfuscationDecoder::default();
        assert!(!decoder.clean(&encoded).contains(":<:"));
        assert_eq!(decoder.decode(&encoded).unwrap(), PLAIN);
    }

    #[test]
    fn tokens_are_configurable() {
        let encoded = obfuscate(PLAIN, &[(4, "@@rotated@@")]);
        let decoder = ObfuscationDecoder::new(vec!["@@rotated@@".to_string(), String::new()]);
        assert_eq!(decoder.decode(&encoded).unwrap(), PLAIN);
    }

    #[test]
    fn unknown_token_fails() {
        let encoded = obfuscate(PLAIN, &[(4, ":<:bm90IGEgdG9rZW4")]);
        assert!(matches!(
            ObfuscationDecoder::default().decode(&encoded),
            Err(DecodeError::ResidualToken)
        ));
    }

    #[test]
    fn nothing_left_fails() {
        let decoder = ObfuscationDecoder::default();
        assert!(matches!(decoder.decode("#2"), Err(DecodeError::Empty)));
        assert!(matches!(decoder.decode(""), Err(DecodeError::Empty)));
        let only_tokens = format!("#2{}", default_filler_tokens().concat());
        assert!(matches!(decoder.decode(&only_tokens), Err(DecodeError::Empty)));
    }

    #[test]
    fn garbage_fails() {
        assert!(matches!(
            ObfuscationDecoder::default().decode("#2this is !not! base64"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn non_utf8_fails() {
        let encoded = format!("#2{}", STANDARD.encode([0xffu8, 0xfe, 0xfd]));
        assert!(matches!(
            ObfuscationDecoder::default().decode(&encoded),
            Err(DecodeError::Utf8(_))
        ));
    }

    #[test]
    fn missing_padding_is_fine() {
        let encoded = STANDARD.encode("[480p]http://a");
        let unpadded = format!("#2{}", encoded.trim_end_matches('='));
        assert_eq!(
            ObfuscationDecoder::default().decode(&unpadded).unwrap(),
            "[480p]http://a"
        );
    }
}
