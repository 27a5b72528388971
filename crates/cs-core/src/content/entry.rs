use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// The two independent index spaces of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
}

impl ContentKind {
    /// Processing order for export and import.
    pub const ALL: [ContentKind; 2] = [ContentKind::Text, ContentKind::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an entry inside its kind's sequence, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryIndex(u32);

impl EntryIndex {
    pub const FIRST: EntryIndex = EntryIndex(1);

    /// Returns `None` for zero, which is never a valid index.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub(crate) fn after(count: usize) -> Self {
        Self(count as u32 + 1)
    }
}

impl fmt::Display for EntryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PNG-encoded image captured from the clipboard.
///
/// The bytes are opaque to the core; persistence only needs the reversible
/// text form produced by [`ImagePayload::to_text`].
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload(Vec<u8>);

impl ImagePayload {
    pub fn from_png(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard base64 text form used before encryption.
    pub fn to_text(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn from_text(text: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(text).map(Self)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImagePayload({} bytes)", self.0.len())
    }
}

/// Classified clipboard content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPayload {
    Text(String),
    Image(ImagePayload),
}

impl ContentPayload {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentPayload::Text(_) => ContentKind::Text,
            ContentPayload::Image(_) => ContentKind::Image,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPayload::Text(text) => Some(text),
            ContentPayload::Image(_) => None,
        }
    }

    /// Text handed to the field cipher: the text itself, or base64 for images.
    pub fn to_persisted_text(&self) -> String {
        match self {
            ContentPayload::Text(text) => text.clone(),
            ContentPayload::Image(image) => image.to_text(),
        }
    }

    /// Inverse of [`ContentPayload::to_persisted_text`].
    pub fn from_persisted_text(
        kind: ContentKind,
        text: String,
    ) -> Result<Self, base64::DecodeError> {
        match kind {
            ContentKind::Text => Ok(ContentPayload::Text(text)),
            ContentKind::Image => ImagePayload::from_text(&text).map(ContentPayload::Image),
        }
    }

    /// Stable fingerprint used for change detection.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.kind().as_str().as_bytes());
        match self {
            ContentPayload::Text(text) => hasher.update(text.as_bytes()),
            ContentPayload::Image(image) => hasher.update(image.as_bytes()),
        };
        *hasher.finalize().as_bytes()
    }
}

/// One captured clipboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub index: EntryIndex,
    /// Capture time in milliseconds since the Unix epoch. Display only.
    pub timestamp_ms: i64,
    pub payload: ContentPayload,
}

impl ContentEntry {
    pub fn new(index: EntryIndex, timestamp_ms: i64, payload: ContentPayload) -> Self {
        Self {
            index,
            timestamp_ms,
            payload,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_index_rejects_zero() {
        assert!(EntryIndex::new(0).is_none());
        assert_eq!(EntryIndex::new(3).map(|i| i.get()), Some(3));
    }

    #[test]
    fn image_payload_text_form_is_reversible() {
        let image = ImagePayload::from_png(vec![0x89, b'P', b'N', b'G', 0, 255, 17]);
        let restored = ImagePayload::from_text(&image.to_text()).expect("decode");
        assert_eq!(restored, image);
    }

    #[test]
    fn persisted_text_rejects_invalid_image_encoding() {
        let result = ContentPayload::from_persisted_text(ContentKind::Image, "%%%".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn fingerprint_distinguishes_kinds() {
        let text = ContentPayload::Text("abc".to_string());
        let image = ContentPayload::Image(ImagePayload::from_png(b"abc".to_vec()));
        assert_ne!(text.fingerprint(), image.fingerprint());
        assert_eq!(
            text.fingerprint(),
            ContentPayload::Text("abc".to_string()).fingerprint()
        );
    }
}
