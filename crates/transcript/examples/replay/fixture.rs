use transcript::Speaker;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ScriptedFragment {
    pub speaker: Speaker,
    pub text: String,
    pub is_final: bool,
}

#[derive(Clone, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Fixture {
    #[strum(serialize = "medical-call")]
    #[value(name = "medical-call")]
    Medical,
    #[strum(serialize = "fire-call")]
    #[value(name = "fire-call")]
    Fire,
}

impl Fixture {
    pub fn json(&self) -> &'static str {
        match self {
            Self::Medical => MEDICAL_JSON,
            Self::Fire => FIRE_JSON,
        }
    }
}

const MEDICAL_JSON: &str = r#"[
  { "speaker": "Dispatcher", "text": "Emergency services, what's your emergency?", "is_final": true },
  { "speaker": "User", "text": "my bro", "is_final": false },
  { "speaker": "User", "text": "my brother fell down", "is_final": false },
  { "speaker": "User", "text": "My brother fell down the stairs", "is_final": true },
  { "speaker": "Dispatcher", "text": "Is the person conscious and breathing?", "is_final": true },
  { "speaker": "User", "text": "he's uncon", "is_final": false },
  { "speaker": "User", "text": "he's unconscious and blee", "is_final": false },
  { "speaker": "User", "text": "He's unconscious and bleeding from his head", "is_final": true },
  { "speaker": "Dispatcher", "text": "Stay calm. Help is on the way.", "is_final": true },
  { "speaker": "User", "text": "please hur", "is_final": false },
  { "speaker": "User", "text": "Please hurry, send an ambulance", "is_final": true },
  { "speaker": "Dispatcher", "text": "Emergency services have been dispatched to your location.", "is_final": true },
  { "speaker": "Dispatcher", "text": "Apply pressure to any bleeding wounds.", "is_final": true }
]"#;

const FIRE_JSON: &str = r#"[
  { "speaker": "Dispatcher", "text": "Emergency services, what's your emergency?", "is_final": true },
  { "speaker": "User", "text": "there's a f", "is_final": false },
  { "speaker": "User", "text": "there's a fire in my", "is_final": false },
  { "speaker": "User", "text": "There's a fire in my apartment building", "is_final": true },
  { "speaker": "Dispatcher", "text": "Emergency services have been dispatched to your location.", "is_final": true },
  { "speaker": "User", "text": "my neighbour is still ins", "is_final": false },
  { "speaker": "User", "text": "My neighbour is still inside, she needs help", "is_final": true },
  { "speaker": "Dispatcher", "text": "Can you describe what you see?", "is_final": true },
  { "speaker": "User", "text": "smoke everywhe", "is_final": false },
  { "speaker": "User", "text": "Smoke everywhere, someone is choking on it", "is_final": true },
  { "speaker": "Dispatcher", "text": "I'm staying on the line with you until help arrives.", "is_final": true }
]"#;
