//! Item payload decoding
//!
//! Auction payloads are base64 strings holding gzip-compressed NBT with a root
//! compound `{ i: [ItemStack] }`. Only the first stack is relevant.

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Formatting code prefix used in display names.
const FORMAT_PREFIX: char = '§';

// == NBT Layout ==
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPayload {
    pub i: Vec<ItemStack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemStack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i16>,
    #[serde(rename = "Count")]
    pub count: i8,
    #[serde(rename = "Damage", default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<ItemTag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<ItemDisplay>,
    #[serde(rename = "ExtraAttributes", default, skip_serializing_if = "Option::is_none")]
    pub extra_attributes: Option<ExtraAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDisplay {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Lore", default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// == Decoded Item ==
/// The parts of an item payload the service uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedItem {
    /// Display name without formatting codes; the grouping identity
    pub display_name: String,
    /// Display name as stored in the payload
    pub raw_name: String,
    pub stack_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
}

/// Decodes an auction's base64 item payload.
///
/// Errors are returned as a human readable reason; the caller attaches the
/// auction id.
pub fn decode_item(encoded: &str) -> Result<DecodedItem, String> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("invalid base64: {}", e))?;

    let nbt = if compressed.starts_with(&GZIP_MAGIC) {
        let mut raw = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut raw)
            .map_err(|e| format!("invalid gzip stream: {}", e))?;
        raw
    } else {
        compressed
    };

    let payload: ItemPayload =
        fastnbt::from_bytes(&nbt).map_err(|e| format!("invalid NBT: {}", e))?;
    let stack = payload
        .i
        .into_iter()
        .next()
        .ok_or_else(|| "payload holds no item".to_string())?;

    let stack_size = u32::try_from(stack.count)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| format!("invalid stack size {}", stack.count))?;

    let tag = stack.tag.unwrap_or_default();
    let display = tag.display.unwrap_or_default();
    let raw_name = display
        .name
        .ok_or_else(|| "item has no display name".to_string())?;

    Ok(DecodedItem {
        display_name: strip_formatting(&raw_name),
        raw_name,
        stack_size,
        item_id: tag.extra_attributes.and_then(|attrs| attrs.id),
        lore: display.lore.unwrap_or_default(),
    })
}

/// Encodes a payload the way the upstream API ships it (NBT, gzip, base64).
#[cfg(test)]
pub(crate) fn encode_item(payload: &ItemPayload) -> Result<String, String> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let nbt = fastnbt::to_bytes(payload).map_err(|e| format!("NBT encoding failed: {}", e))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&nbt)
        .map_err(|e| format!("gzip encoding failed: {}", e))?;
    let compressed = encoder
        .finish()
        .map_err(|e| format!("gzip encoding failed: {}", e))?;
    Ok(STANDARD.encode(compressed))
}

/// Removes `§x` formatting codes from a display string.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == FORMAT_PREFIX {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Builds a single-stack payload with a display name.
#[cfg(test)]
pub(crate) fn simple_payload(name: &str, count: i8) -> ItemPayload {
    ItemPayload {
        i: vec![ItemStack {
            id: Some(1),
            count,
            damage: Some(0),
            tag: Some(ItemTag {
                display: Some(ItemDisplay {
                    name: Some(name.to_string()),
                    lore: None,
                }),
                extra_attributes: None,
            }),
        }],
    }
}
