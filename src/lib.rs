pub mod stego;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeResult {
    pub ok: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeResult {
    pub ok: bool,
    pub path: Option<String>,
    pub error: Option<String>,
}

/// Recover the stored string from the image at `path`.
pub fn decode_image(path: &str) -> DecodeResult {
    match stego::decode(Path::new(path)) {
        Ok(message) => DecodeResult {
            ok: true,
            message: Some(message),
            error: None,
        },
        Err(e) => DecodeResult {
            ok: false,
            message: None,
            error: Some(e),
        },
    }
}

/// Embed `message` into the image at `cover_path` and write the result as a
/// PNG at `output_path`.
pub fn encode_image(cover_path: &str, output_path: &str, message: &str) -> EncodeResult {
    match stego::encode(Path::new(cover_path), message) {
        Ok(png_bytes) => match std::fs::write(output_path, png_bytes) {
            Ok(()) => EncodeResult {
                ok: true,
                path: Some(output_path.to_string()),
                error: None,
            },
            Err(e) => EncodeResult {
                ok: false,
                path: None,
                error: Some(e.to_string()),
            },
        },
        Err(e) => EncodeResult {
            ok: false,
            path: None,
            error: Some(e),
        },
    }
}
