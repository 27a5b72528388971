use thiserror::Error;

use super::{ContentEntry, ContentKind, ContentPayload, EntryIndex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("{kind} entry {index} not found")]
    NotFound { kind: ContentKind, index: u32 },

    #[error("{kind} entry {index} is out of sequence (expected {expected})")]
    OutOfSequence {
        kind: ContentKind,
        index: EntryIndex,
        expected: EntryIndex,
    },
}

/// Ordered text and image sequences, insertion order = capture order.
///
/// Indices are contiguous from 1 within each sequence and never edited once
/// appended. [`ContentRegistry`](super::ContentRegistry) wraps one of these
/// behind a lock; this type is the plain value used for snapshots and for
/// staging an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentHistory {
    texts: Vec<ContentEntry>,
    images: Vec<ContentEntry>,
}

impl ContentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn sequence(&self, kind: ContentKind) -> &Vec<ContentEntry> {
        match kind {
            ContentKind::Text => &self.texts,
            ContentKind::Image => &self.images,
        }
    }

    fn sequence_mut(&mut self, kind: ContentKind) -> &mut Vec<ContentEntry> {
        match kind {
            ContentKind::Text => &mut self.texts,
            ContentKind::Image => &mut self.images,
        }
    }

    /// Appends a captured payload and returns its newly assigned index.
    pub fn append(&mut self, payload: ContentPayload, timestamp_ms: i64) -> EntryIndex {
        self.push_captured(payload, timestamp_ms).index
    }

    pub(crate) fn push_captured(
        &mut self,
        payload: ContentPayload,
        timestamp_ms: i64,
    ) -> &ContentEntry {
        let sequence = self.sequence_mut(payload.kind());
        let position = sequence.len();
        sequence.push(ContentEntry::new(
            EntryIndex::after(position),
            timestamp_ms,
            payload,
        ));
        &sequence[position]
    }

    /// Re-inserts a persisted entry, keeping its stored index.
    ///
    /// The index must be exactly the next one for its kind.
    pub fn restore(&mut self, entry: ContentEntry) -> Result<(), HistoryError> {
        let kind = entry.kind();
        let sequence = self.sequence_mut(kind);
        let expected = EntryIndex::after(sequence.len());
        if entry.index != expected {
            return Err(HistoryError::OutOfSequence {
                kind,
                index: entry.index,
                expected,
            });
        }
        sequence.push(entry);
        Ok(())
    }

    pub fn get(&self, kind: ContentKind, index: u32) -> Result<&ContentEntry, HistoryError> {
        let sequence = self.sequence(kind);
        index
            .checked_sub(1)
            .and_then(|position| sequence.get(position as usize))
            .ok_or(HistoryError::NotFound { kind, index })
    }

    pub fn all(&self, kind: ContentKind) -> &[ContentEntry] {
        self.sequence(kind)
    }

    pub fn count(&self, kind: ContentKind) -> usize {
        self.sequence(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty()
    }

    pub fn clear_all(&mut self) {
        self.texts.clear();
        self.images.clear();
    }

    /// Text at reverse position `slot` (1 = most recent).
    pub fn recent_text(&self, slot: usize) -> Option<&str> {
        if slot == 0 || slot > self.texts.len() {
            return None;
        }
        self.texts[self.texts.len() - slot].payload.as_text()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ContentEntry> {
        self.texts.iter().chain(self.images.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ImagePayload;

    fn text(s: &str) -> ContentPayload {
        ContentPayload::Text(s.to_string())
    }

    fn image(bytes: &[u8]) -> ContentPayload {
        ContentPayload::Image(ImagePayload::from_png(bytes.to_vec()))
    }

    #[test]
    fn append_assigns_contiguous_indices_per_kind() {
        let mut history = ContentHistory::new();

        let indices: Vec<u32> = ["a", "b", "c"]
            .iter()
            .map(|s| history.append(text(s), 0).get())
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);

        assert_eq!(history.append(image(b"x"), 0).get(), 1);
        assert_eq!(history.append(text("d"), 0).get(), 4);
        assert_eq!(history.append(image(b"y"), 0).get(), 2);
    }

    #[test]
    fn clear_all_resets_numbering() {
        let mut history = ContentHistory::new();
        history.append(text("a"), 0);
        history.append(image(b"x"), 0);

        history.clear_all();

        assert!(history.is_empty());
        assert_eq!(history.append(text("b"), 0).get(), 1);
        assert_eq!(history.append(image(b"y"), 0).get(), 1);
    }

    #[test]
    fn get_reports_not_found_out_of_range() {
        let mut history = ContentHistory::new();
        history.append(text("a"), 42);

        assert_eq!(history.get(ContentKind::Text, 1).unwrap().timestamp_ms, 42);
        assert_eq!(
            history.get(ContentKind::Text, 2),
            Err(HistoryError::NotFound {
                kind: ContentKind::Text,
                index: 2
            })
        );
        assert!(history.get(ContentKind::Text, 0).is_err());
        assert!(history.get(ContentKind::Image, 1).is_err());
    }

    #[test]
    fn recent_text_counts_from_most_recent() {
        let mut history = ContentHistory::new();
        for s in ["one", "two", "three"] {
            history.append(text(s), 0);
        }

        assert_eq!(history.recent_text(1), Some("three"));
        assert_eq!(history.recent_text(3), Some("one"));
        assert_eq!(history.recent_text(4), None);
        assert_eq!(history.recent_text(0), None);
    }

    #[test]
    fn restore_requires_next_index() {
        let mut history = ContentHistory::new();
        let first = ContentEntry::new(EntryIndex::FIRST, 1, text("a"));
        history.restore(first).expect("first restore");

        let skipped = ContentEntry::new(EntryIndex::new(3).unwrap(), 2, text("c"));
        let err = history.restore(skipped).expect_err("gap must be rejected");
        assert!(matches!(err, HistoryError::OutOfSequence { .. }));
        assert_eq!(history.count(ContentKind::Text), 1);
    }
}
