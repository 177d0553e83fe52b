use crate::id::{EpochIdGen, IdGenerator, epoch_ms};
use crate::keywords::KeywordSet;
use crate::types::{PartialFragment, Speaker, TranscriptEntry, TranscriptFrame, TranscriptUpdate};

/// Stateful core of one call transcript: an append-only entry log plus one
/// transient partial utterance.
///
/// Synchronous and single-owner. Concurrent producers must serialize their
/// fragments through one owner (the `call-session` event loop does exactly
/// that) rather than share this type behind a lock.
pub struct TranscriptAnnotator {
    keywords: KeywordSet,
    id_gen: Box<dyn IdGenerator>,
    entries: Vec<TranscriptEntry>,
    partial: Option<PartialFragment>,
}

impl TranscriptAnnotator {
    pub fn new() -> Self {
        Self::with_config(KeywordSet::emergency(), EpochIdGen::new())
    }

    pub fn with_config(keywords: KeywordSet, id_gen: impl IdGenerator + 'static) -> Self {
        Self {
            keywords,
            id_gen: Box::new(id_gen),
            entries: Vec::new(),
            partial: None,
        }
    }

    /// Feed one speech fragment.
    ///
    /// - Whitespace-only `text` is a no-op and returns `None`, final or not.
    /// - `is_final == false` stores the trimmed text as the transient
    ///   partial, overwriting any previous partial. Nothing is appended.
    /// - `is_final == true` appends one entry (id, timestamp and keyword flag
    ///   assigned here, text trimmed) and clears the transient partial.
    ///
    /// Entries are never mutated, removed or reordered after this returns.
    pub fn ingest(
        &mut self,
        speaker: Speaker,
        text: &str,
        is_final: bool,
    ) -> Option<TranscriptUpdate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if !is_final {
            let fragment = PartialFragment {
                speaker,
                text: text.to_string(),
            };
            self.partial = Some(fragment.clone());
            return Some(TranscriptUpdate {
                appended: None,
                partial: Some(fragment),
            });
        }

        let entry = self.append(speaker, text)?;
        self.partial = None;
        Some(TranscriptUpdate {
            appended: Some(entry),
            partial: None,
        })
    }

    /// Appends a final entry directly, leaving any in-progress partial alone.
    ///
    /// This is the path for lines that do not come from the speech producer
    /// (the scripted dispatcher's greeting and replies): a caller's live
    /// partial must survive them. Whitespace-only `text` is a no-op.
    pub fn append(&mut self, speaker: Speaker, text: &str) -> Option<TranscriptEntry> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let entry = TranscriptEntry {
            id: self.id_gen.next_id(),
            speaker,
            text: text.to_string(),
            timestamp_ms: epoch_ms(),
            contains_emergency_keyword: self.keywords.contains_match(text),
        };
        self.entries.push(entry.clone());
        Some(entry)
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn partial(&self) -> Option<&PartialFragment> {
        self.partial.as_ref()
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Render-time markup for `text` against this transcript's vocabulary.
    /// Pure; see [`KeywordSet::highlight`].
    pub fn highlight(&self, text: &str) -> String {
        self.keywords.highlight(text)
    }

    /// Returns the complete snapshot needed to render the current transcript.
    pub fn frame(&self) -> TranscriptFrame {
        TranscriptFrame {
            entries: self.entries.clone(),
            partial: self.partial.clone(),
        }
    }
}

impl Default for TranscriptAnnotator {
    fn default() -> Self {
        Self::new()
    }
}
