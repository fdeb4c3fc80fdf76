//! QR image generation rendered as an SVG data URL.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;
use serde_json::json;

use crate::domain::ports::QrGenerator;
use crate::error::AppError;

/// Renders QR codes as base64-encoded SVG data URLs, embeddable directly in
/// an `img` tag without a separate asset fetch.
pub struct SvgQrGenerator;

impl QrGenerator for SvgQrGenerator {
    fn generate(&self, url: &str) -> Result<String, AppError> {
        let code = QrCode::new(url.as_bytes()).map_err(|e| {
            AppError::dependency(
                "Failed to generate QR code",
                json!({ "source": e.to_string() }),
            )
        })?;

        let image = code
            .render::<svg::Color>()
            .min_dimensions(256, 256)
            .build();

        Ok(format!(
            "data:image/svg+xml;base64,{}",
            BASE64.encode(image.as_bytes())
        ))
    }
}
