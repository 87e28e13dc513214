//! Image intake: precondition checks and base64 encoding.
//!
//! Everything here runs before the first network call, so a missing key or a
//! wrong file never costs a request.

use crate::ai::mime::detect_image_mime;
use crate::error::IntakeError;
use crate::models::{EncodedImage, ImageInput};
use crate::Result;
use base64::Engine as _;
use std::path::Path;

/// Encoded image plus the credential it will be sent with.
#[derive(Debug)]
pub struct Prepared<'a> {
    pub image: EncodedImage,
    pub api_key: &'a str,
}

/// Validate an analysis request and encode its image.
///
/// `credential_var` names the variable the key should come from and is only
/// used to build the error message.
pub fn prepare<'a>(
    image: Option<&ImageInput>,
    credential: Option<&'a str>,
    credential_var: &'static str,
) -> std::result::Result<Prepared<'a>, IntakeError> {
    let image = match image {
        Some(image) if !image.bytes.is_empty() => image,
        _ => return Err(IntakeError::NoImageSelected),
    };

    if !is_image_mime(&image.mime_type) {
        return Err(IntakeError::UnsupportedMediaType(image.mime_type.clone()));
    }

    let api_key = credential
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(IntakeError::MissingCredential {
            env_var: credential_var,
        })?;

    Ok(Prepared {
        image: encode(image),
        api_key,
    })
}

/// Standard padded base64 of the image bytes.
pub fn encode(image: &ImageInput) -> EncodedImage {
    EncodedImage {
        data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
        mime_type: image.mime_type.clone(),
    }
}

fn is_image_mime(mime: &str) -> bool {
    mime.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Read an image from disk, sniffing its MIME type unless one is given.
///
/// Unrecognised files get `application/octet-stream`, which [`prepare`]
/// then refuses.
pub fn load_image(path: &Path, mime_override: Option<&str>) -> Result<ImageInput> {
    let bytes = std::fs::read(path)?;
    let mime = match mime_override {
        Some(mime) => mime.to_string(),
        None => detect_image_mime(&bytes)
            .unwrap_or("application/octet-stream")
            .to_string(),
    };
    tracing::debug!(
        "Loaded {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime
    );
    Ok(ImageInput::new(bytes, mime))
}
