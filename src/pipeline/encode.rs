//! Image encoding: upload bytes → base64 [`ImageData`] for the API request.
//!
//! Multimodal APIs accept images as base64 data embedded in the JSON request
//! body. The bytes are wrapped exactly as uploaded — JPEG stays JPEG, PNG
//! stays PNG — so the model sees the same pixels the user saw in their
//! preview. `detail: "high"` instructs GPT-4-class models to use the full
//! image tile budget; without it the fine print on invoices is lost.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use tracing::debug;

/// Wrap raw image bytes as base64 `ImageData` ready for the multimodal API.
pub fn encode_image(mime_type: &str, bytes: &[u8]) -> ImageData {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded image → {} bytes base64 ({})", b64.len(), mime_type);
    ImageData::new(b64, mime_type).with_detail("high")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_round_trips_bytes() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let data = encode_image("image/jpeg", &bytes);
        assert_eq!(data.mime_type, "image/jpeg");
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        assert_eq!(decoded, bytes);
    }
}
