//! Success-response shapes for providers that answer in more than one format.
//!
//! Each shape has a decoder returning the base64 payload when the response
//! matches it. Shapes are tried in their declared order; the first hit wins.

use super::client::RawResponse;
use super::mime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The body is the image itself.
    RawImage,
    /// The body is a JSON object with a base64 string under this key.
    JsonField(&'static str),
}

/// Order in which raw-or-JSON providers are probed.
pub const RAW_OR_JSON_SHAPES: [ResponseShape; 4] = [
    ResponseShape::RawImage,
    ResponseShape::JsonField("image_base64"),
    ResponseShape::JsonField("image"),
    ResponseShape::JsonField("data"),
];

impl ResponseShape {
    pub fn decode(&self, response: &RawResponse) -> Option<String> {
        match self {
            ResponseShape::RawImage => decode_raw_image(response),
            ResponseShape::JsonField(key) => decode_json_field(response, key),
        }
    }
}

/// Try `shapes` in order, returning the first matching shape and its payload.
pub fn decode_first(
    shapes: &[ResponseShape],
    response: &RawResponse,
) -> Option<(ResponseShape, String)> {
    shapes
        .iter()
        .find_map(|shape| shape.decode(response).map(|payload| (*shape, payload)))
}

fn decode_raw_image(response: &RawResponse) -> Option<String> {
    if response.body.is_empty() || response.is_declared_json() {
        return None;
    }

    let binary = match response.media_type().as_deref() {
        Some(mt) => mt.starts_with("image/") || mt == "application/octet-stream",
        None => response.json_value().is_none(),
    };

    if binary || mime::sniff_image_mime(&response.body).is_some() {
        Some(mime::encode(&response.body))
    } else {
        None
    }
}

fn decode_json_field(response: &RawResponse, key: &str) -> Option<String> {
    let json = response.json_value()?;
    let value = json.get(key)?.as_str()?;
    mime::usable_base64(value).map(str::to_string)
}
