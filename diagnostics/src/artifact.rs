//! Self-contained image artifacts: `data:image/<format>;base64,<payload>`.
//!
//! The base64 payload is percent-encoded on top, so the artifact can travel
//! through HTML attributes and URLs untouched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Bytes left untouched by the percent-encoding step.
const PAYLOAD_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

const PLACEHOLDER_SVG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1" viewBox="0 0 1 1"/>"#;

/// Encoding of the rendered figure before it is wrapped in a data URI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    /// Media subtype as it appears after `image/`.
    pub fn media_subtype(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg+xml",
            ImageFormat::Png => "png",
        }
    }
}

/// An encoded, immutable image string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageArtifact(String);

impl ImageArtifact {
    pub fn encode(format: ImageFormat, bytes: &[u8]) -> Self {
        let b64 = STANDARD.encode(bytes);
        ImageArtifact(format!(
            "data:image/{};base64,{}",
            format.media_subtype(),
            utf8_percent_encode(&b64, PAYLOAD_SAFE)
        ))
    }

    /// Blank figure used when a renderer cannot draw its input.
    pub fn placeholder() -> Self {
        Self::encode(ImageFormat::Svg, PLACEHOLDER_SVG.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Media subtype, e.g. `png` or `svg+xml`.
    pub fn media_subtype(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:image/")
            .and_then(|rest| rest.split_once(';'))
            .map(|(subtype, _)| subtype)
    }

    /// The percent-encoded payload after the comma.
    pub fn payload(&self) -> &str {
        self.0.split_once(',').map(|(_, p)| p).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    /// Undo both encoding layers and return the raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let b64 = percent_decode_str(self.payload())
            .decode_utf8()
            .map_err(|e| ReportError::Decode(e.to_string()))?;
        STANDARD
            .decode(b64.as_bytes())
            .map_err(|e| ReportError::Decode(e.to_string()))
    }
}

impl std::fmt::Display for ImageArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_prefix() {
        let artifact = ImageArtifact::encode(ImageFormat::Png, b"\x89PNG");
        assert!(artifact.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(artifact.media_subtype(), Some("png"));
        assert!(!artifact.is_empty());
    }

    #[test]
    fn test_payload_escapes_plus_and_padding() {
        // 0xfb 0xff encodes to "+/8=" in standard base64.
        let artifact = ImageArtifact::encode(ImageFormat::Svg, &[0xfb, 0xff]);
        assert_eq!(artifact.payload(), "%2B/8%3D");
        assert_eq!(artifact.decode().unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_placeholder_is_blank_svg() {
        let artifact = ImageArtifact::placeholder();
        assert_eq!(artifact.media_subtype(), Some("svg+xml"));
        let svg = String::from_utf8(artifact.decode().unwrap()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(artifact.is_placeholder());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let artifact = ImageArtifact("data:image/png;base64,%%%".to_string());
        assert!(artifact.decode().is_err());
    }
}
