pub mod annotator;
pub mod id;
pub mod keywords;
pub mod types;

pub use annotator::TranscriptAnnotator;
pub use id::{EpochIdGen, IdGenerator, SequentialIdGen};
pub use keywords::{EMERGENCY_KEYWORDS, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, KeywordSet};
pub use types::{PartialFragment, Speaker, TranscriptEntry, TranscriptFrame, TranscriptUpdate};
