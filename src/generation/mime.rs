use base64::Engine as _;

/// Identify common image formats by their leading signature bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        _ => None,
    }
}

/// Wrap a base64 payload as the normalized `data:image/png;base64,` URI.
pub fn png_data_uri(payload: &str) -> String {
    format!("data:image/png;base64,{}", payload)
}

pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Accept `payload` only if it is non-empty standard base64.
///
/// A leading `data:...;base64,` prefix is stripped first.
pub fn usable_base64(payload: &str) -> Option<&str> {
    let payload = payload.trim();
    let payload = match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(";base64,")?.1,
        None => payload,
    };
    if payload.is_empty() {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()
        .map(|_| payload)
}
