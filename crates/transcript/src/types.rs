/// Which side of the call produced an entry. The demo models exactly two
/// parties; there is no diarization beyond this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, strum::Display)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub enum Speaker {
    User,
    Dispatcher,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct TranscriptEntry {
    /// Unique, assigned in creation order by the session's id generator.
    pub id: String,
    pub speaker: Speaker,
    /// Exact words as ingested (trimmed). Never carries highlight markup;
    /// highlighting happens at render time only.
    pub text: String,
    /// Unix epoch milliseconds at creation.
    pub timestamp_ms: u64,
    /// Whether `text` contained an emergency keyword at creation time,
    /// whole-word and case-insensitive. Computed once against the session
    /// vocabulary; recomputing against the same vocabulary yields the same
    /// value.
    pub contains_emergency_keyword: bool,
}

impl TranscriptEntry {
    /// Local wall-clock rendering of [`Self::timestamp_ms`], the form a call
    /// log shows next to each line.
    pub fn display_time(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.timestamp_ms as i64)
            .unwrap_or_default()
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// In-progress utterance. At most one exists at a time; it is display state,
/// not part of the log.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct PartialFragment {
    pub speaker: Speaker,
    pub text: String,
}

/// What one non-no-op ingest changed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct TranscriptUpdate {
    /// Set when a final fragment landed in the log.
    pub appended: Option<TranscriptEntry>,
    /// The transient partial as it stands after this ingest, a full snapshot
    /// rather than a delta. `None` after a final, since the partial clears
    /// once its utterance is logged.
    pub partial: Option<PartialFragment>,
}

/// Complete snapshot of call-transcript state at a point in time.
///
/// This is the rendering contract: everything a display layer needs to draw
/// one frame, whether that is the terminal replay tool or a test assertion.
/// Produced by [`crate::annotator::TranscriptAnnotator::frame`].
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct TranscriptFrame {
    pub entries: Vec<TranscriptEntry>,
    pub partial: Option<PartialFragment>,
}
