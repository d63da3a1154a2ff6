//! Code128 barcode rendering for bin labels
//!
//! Bin ids are encoded with Code128 character set B and rendered as PNG
//! without human-readable text underneath. The queue view embeds them as
//! `data:` URIs so no image files are ever written by the server.

use barcoders::generators::image::Image;
use barcoders::sym::code128::Code128;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::DEFAULT_BARCODE_HEIGHT;
use crate::error::BarcodeError;

/// Selects Code128 character set B (printable ASCII)
const CHARSET_B: char = 'Ɓ';

/// Prefix of an inline PNG image
const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Renders bin ids as Code128 PNG images
#[derive(Debug, Clone, Copy)]
pub struct BarcodeRenderer {
    height: u32,
}

impl Default for BarcodeRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BARCODE_HEIGHT)
    }
}

impl BarcodeRenderer {
    /// Create a renderer producing bars `height` pixels tall
    pub fn new(height: u32) -> Self {
        Self { height }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encode `data` into Code128 modules
    pub fn encode(&self, data: &str) -> Result<Vec<u8>, BarcodeError> {
        validate(data)?;

        let symbol = Code128::new(&format!("{CHARSET_B}{data}")).map_err(|e| BarcodeError::Encode {
            input: data.to_string(),
            reason: e.to_string(),
        })?;

        Ok(symbol.encode())
    }

    /// Render `data` as PNG bytes
    pub fn render_png(&self, data: &str) -> Result<Vec<u8>, BarcodeError> {
        let encoded = self.encode(data)?;

        Image::png(self.height)
            .generate(&encoded[..])
            .map_err(|e| BarcodeError::Encode {
                input: data.to_string(),
                reason: e.to_string(),
            })
    }

    /// Render `data` as an inline `data:image/png;base64,...` URI
    pub fn render_data_uri(&self, data: &str) -> Result<String, BarcodeError> {
        let png = self.render_png(data)?;
        Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png)))
    }
}

/// Code128 set B covers ASCII 32..=126
fn validate(data: &str) -> Result<(), BarcodeError> {
    if data.is_empty() {
        return Err(BarcodeError::Empty);
    }

    if let Some(ch) = data.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(BarcodeError::UnsupportedCharacter {
            input: data.to_string(),
            ch,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[test]
    fn test_render_png_has_png_header() {
        let png = BarcodeRenderer::default().render_png("A1-03").unwrap();
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_render_data_uri() {
        let uri = BarcodeRenderer::default().render_data_uri("B2").unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let payload = &uri[PNG_DATA_URI_PREFIX.len()..];
        let decoded = STANDARD.decode(payload).unwrap();
        assert!(decoded.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_longer_ids_encode_to_more_modules() {
        let renderer = BarcodeRenderer::default();
        let short = renderer.encode("A1").unwrap();
        let long = renderer.encode("A1-03-LEFT").unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            BarcodeRenderer::default().render_png(""),
            Err(BarcodeError::Empty)
        );
    }

    #[test]
    fn test_rejects_non_ascii() {
        let err = BarcodeRenderer::default().render_data_uri("揀位1").unwrap_err();
        assert!(matches!(err, BarcodeError::UnsupportedCharacter { ch: '揀', .. }));
    }

    #[test]
    fn test_rejects_control_characters() {
        let err = BarcodeRenderer::default().encode("A\n1").unwrap_err();
        assert!(matches!(err, BarcodeError::UnsupportedCharacter { ch: '\n', .. }));
    }
}
