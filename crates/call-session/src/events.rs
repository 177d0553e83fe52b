use ems_transcript::{PartialFragment, TranscriptEntry, TranscriptFrame};

/// Everything a consumer can observe from a running call session.
///
/// `Ended` is terminal: nothing is emitted after it, and in particular no
/// pending dispatcher reply survives it.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "listeningChanged")]
    ListeningChanged { listening: bool },
    #[serde(rename = "entryAdded")]
    EntryAdded { entry: TranscriptEntry },
    #[serde(rename = "partialUpdated")]
    PartialUpdated { partial: Option<PartialFragment> },
    #[serde(rename = "speechUnavailable")]
    SpeechUnavailable { reason: String },
    #[serde(rename = "ended")]
    Ended { frame: TranscriptFrame },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems_transcript::Speaker;

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = SessionEvent::EntryAdded {
            entry: TranscriptEntry {
                id: "0".into(),
                speaker: Speaker::User,
                text: "send help".into(),
                timestamp_ms: 0,
                contains_emergency_keyword: true,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "entryAdded");
        assert_eq!(json["entry"]["speaker"], "User");
        assert_eq!(json["entry"]["contains_emergency_keyword"], true);
    }

    #[test]
    fn partial_clear_serializes_as_null() {
        let event = SessionEvent::PartialUpdated { partial: None };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "partialUpdated");
        assert!(json["partial"].is_null());
    }

    #[cfg(feature = "specta")]
    #[test]
    fn specta_derive_covers_the_event_enum() {
        fn exported<T: specta::Type>() {}
        exported::<SessionEvent>();
        exported::<crate::config::SessionConfig>();
        exported::<crate::config::SessionParams>();
    }
}
