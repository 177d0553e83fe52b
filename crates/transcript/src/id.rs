use std::time::{SystemTime, UNIX_EPOCH};

pub trait IdGenerator: Send + Sync {
    fn next_id(&mut self) -> String;
}

pub(crate) fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Wall-clock entry ids: epoch milliseconds plus a sequence suffix, so ids
/// stay unique when several entries land in the same millisecond and keep
/// their assignment order even if the clock steps backwards.
pub struct EpochIdGen {
    last_ms: u64,
    seq: u32,
}

impl EpochIdGen {
    pub fn new() -> Self {
        Self { last_ms: 0, seq: 0 }
    }
}

impl Default for EpochIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for EpochIdGen {
    fn next_id(&mut self) -> String {
        let now_ms = epoch_ms();
        if now_ms > self.last_ms {
            self.last_ms = now_ms;
            self.seq = 0;
        } else {
            self.seq += 1;
        }
        format!("{}-{}", self.last_ms, self.seq)
    }
}

/// Deterministic counter ids for tests where stable, reproducible entry ids
/// are required.
pub struct SequentialIdGen(u64);

impl SequentialIdGen {
    pub fn new() -> Self {
        Self(0)
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGen {
    fn next_id(&mut self) -> String {
        let id = self.0;
        self.0 += 1;
        id.to_string()
    }
}
