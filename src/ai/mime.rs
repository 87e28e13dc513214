/// Sniff an image MIME type from magic bytes.
///
/// Returns `None` for anything that is not a recognised image so hosts that
/// only have a file path can refuse it before intake.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    let mime = match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [_, _, _, _, 0x66, 0x74, 0x79, 0x70, b'h', b'e', b'i', b'c', ..] => "image/heic",
        [_, _, _, _, 0x66, 0x74, 0x79, 0x70, b'm', b'i', b'f', b'1', ..] => "image/heif",
        [0x42, 0x4D, ..] => "image/bmp",
        _ => {
            tracing::debug!(
                "Unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            return None;
        }
    };
    Some(mime)
}
