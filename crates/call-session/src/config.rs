use std::time::Duration;

use ems_transcript::EMERGENCY_KEYWORDS;

/// Dispatcher line that opens every call.
pub const DEFAULT_GREETING: &str = "Emergency services, what's your emergency?";

/// Canned dispatcher replies. Picked uniformly at random per user turn,
/// independent of what the user said; this is a demo script, not an agent.
pub const DEFAULT_RESPONSES: &[&str] = &[
    "Stay calm. Help is on the way.",
    "Can you describe what you see?",
    "Keep the person comfortable and don't move them.",
    "Emergency services have been dispatched to your location.",
    "Is the person conscious and breathing?",
    "Apply pressure to any bleeding wounds.",
    "I'm staying on the line with you until help arrives.",
];

pub const DEFAULT_REPLY_DELAY_MIN_MS: u64 = 2_000;
pub const DEFAULT_REPLY_DELAY_MAX_MS: u64 = 5_000;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct SessionConfig {
    /// Vocabulary used to flag and highlight entries.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Appended as a Dispatcher entry when the session starts. `None` opens
    /// the call silent.
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
    /// Pool the simulated dispatcher draws from. An empty pool disables
    /// replies.
    #[serde(default = "default_responses")]
    pub responses: Vec<String>,
    #[serde(default = "default_reply_delay_min_ms")]
    pub reply_delay_min_ms: u64,
    #[serde(default = "default_reply_delay_max_ms")]
    pub reply_delay_max_ms: u64,
}

impl SessionConfig {
    /// Delay window as durations, reordered if the fields arrived swapped.
    pub fn reply_delay_bounds(&self) -> (Duration, Duration) {
        let min = self.reply_delay_min_ms.min(self.reply_delay_max_ms);
        let max = self.reply_delay_min_ms.max(self.reply_delay_max_ms);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            greeting: default_greeting(),
            responses: default_responses(),
            reply_delay_min_ms: default_reply_delay_min_ms(),
            reply_delay_max_ms: default_reply_delay_max_ms(),
        }
    }
}

fn default_keywords() -> Vec<String> {
    EMERGENCY_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_greeting() -> Option<String> {
    Some(DEFAULT_GREETING.to_string())
}

fn default_responses() -> Vec<String> {
    DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect()
}

fn default_reply_delay_min_ms() -> u64 {
    DEFAULT_REPLY_DELAY_MIN_MS
}

fn default_reply_delay_max_ms() -> u64 {
    DEFAULT_REPLY_DELAY_MAX_MS
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct SessionParams {
    pub session_id: String,
    #[serde(default)]
    pub config: SessionConfig,
}

impl SessionParams {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            config: SessionConfig::default(),
        }
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_carries_the_demo_script() {
        let config = SessionConfig::default();
        assert_eq!(config.keywords.len(), 16);
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(config.responses.len(), 7);
        assert_eq!(
            config.reply_delay_bounds(),
            (Duration::from_millis(2_000), Duration::from_millis(5_000))
        );
    }

    #[test]
    fn config_fields_all_default_from_empty_json() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.responses.len(), 7);
        assert_eq!(config.reply_delay_min_ms, 2_000);
    }

    #[test]
    fn swapped_delay_bounds_are_reordered() {
        let config = SessionConfig {
            reply_delay_min_ms: 900,
            reply_delay_max_ms: 300,
            ..Default::default()
        };
        assert_eq!(
            config.reply_delay_bounds(),
            (Duration::from_millis(300), Duration::from_millis(900))
        );
    }

    #[test]
    fn params_generate_distinct_session_ids() {
        assert_ne!(SessionParams::new().session_id, SessionParams::new().session_id);
    }
}
