use std::ops::Range;

/// Default emergency vocabulary. Lowercase single words; the dispatch demo
/// script recognizes exactly these.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "unconscious",
    "bleeding",
    "accident",
    "help",
    "emergency",
    "hurt",
    "pain",
    "ambulance",
    "fire",
    "police",
    "cardiac",
    "stroke",
    "breathing",
    "choking",
    "fell",
    "broken",
];

pub const HIGHLIGHT_OPEN: &str = "<mark class=\"emergency-keyword\">";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Fixed keyword vocabulary compiled into one whole-word, case-insensitive
/// matcher.
///
/// Matching is a single left-to-right pass over one alternation, with terms
/// ordered longest-first so that when one term extends another (`"heart"` vs
/// `"heart attack"`) the longer term wins at that position. Hits never nest
/// and never overlap, so highlighted output never wraps a word twice.
pub struct KeywordSet {
    terms: Vec<String>,
    matcher: Option<regex::Regex>,
}

impl KeywordSet {
    /// Builds a set from `terms`. Terms are lowercased, trimmed and deduped;
    /// blank terms are dropped. An empty set matches nothing.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();

        let matcher = if terms.is_empty() {
            None
        } else {
            let mut by_length = terms.clone();
            by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            let alternation = by_length
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            regex::Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).ok()
        };

        Self { terms, matcher }
    }

    /// The 16-term default vocabulary ([`EMERGENCY_KEYWORDS`]).
    pub fn emergency() -> Self {
        Self::new(EMERGENCY_KEYWORDS.iter().copied())
    }

    /// Normalized vocabulary, sorted. The replay tool renders this as the
    /// keyword legend.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whole-word, case-insensitive containment test. `"bleedingly"` does not
    /// match a `bleeding` vocabulary; `"BLEEDING"` does.
    pub fn contains_match(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(text))
    }

    /// Byte ranges of every hit in `text`, left to right, non-overlapping.
    pub fn find_matches(&self, text: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Some(matcher) => matcher.find_iter(text).map(|hit| hit.range()).collect(),
            None => Vec::new(),
        }
    }

    /// Wraps each hit in [`HIGHLIGHT_OPEN`]/[`HIGHLIGHT_CLOSE`], preserving
    /// the matched word's original casing.
    ///
    /// Pure: output depends only on this set and `text`, and `text` itself is
    /// never modified or stored. Safe to call any number of times, including
    /// on every render.
    pub fn highlight(&self, text: &str) -> String {
        let Some(matcher) = &self.matcher else {
            return text.to_string();
        };
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for hit in matcher.find_iter(text) {
            out.push_str(&text[last..hit.start()]);
            out.push_str(HIGHLIGHT_OPEN);
            out.push_str(hit.as_str());
            out.push_str(HIGHLIGHT_CLOSE);
            last = hit.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::emergency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(word: &str) -> String {
        format!("{HIGHLIGHT_OPEN}{word}{HIGHLIGHT_CLOSE}")
    }

    #[test]
    fn matches_whole_words_only() {
        let set = KeywordSet::emergency();
        assert!(set.contains_match("she is bleeding badly"));
        assert!(!set.contains_match("the wound was bleedingly obvious"));
        assert!(!set.contains_match("helpful neighbours arrived"));
    }

    #[test]
    fn matches_regardless_of_case() {
        let set = KeywordSet::emergency();
        assert!(set.contains_match("BLEEDING"));
        assert!(set.contains_match("Send An Ambulance"));
    }

    #[test]
    fn highlight_wraps_each_hit_and_keeps_casing() {
        let set = KeywordSet::emergency();
        let out = set.highlight("HELP, there was an Accident");
        assert_eq!(
            out,
            format!("{}, there was an {}", wrapped("HELP"), wrapped("Accident"))
        );
    }

    #[test]
    fn highlight_is_pure() {
        let set = KeywordSet::emergency();
        let text = "fire and police are needed";
        assert_eq!(set.highlight(text), set.highlight(text));
        assert_eq!(text, "fire and police are needed");
    }

    #[test]
    fn highlight_leaves_non_matching_text_alone() {
        let set = KeywordSet::emergency();
        assert_eq!(set.highlight("good morning"), "good morning");
        assert_eq!(set.highlight(""), "");
    }

    #[test]
    fn longer_terms_win_and_hits_never_nest() {
        let set = KeywordSet::new(["heart", "heart attack"]);
        let out = set.highlight("he had a heart attack");
        assert_eq!(out, format!("he had a {}", wrapped("heart attack")));
        assert!(!out.contains(&format!("{HIGHLIGHT_OPEN}{HIGHLIGHT_OPEN}")));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = KeywordSet::new(Vec::<String>::new());
        assert!(set.is_empty());
        assert!(!set.contains_match("help"));
        assert_eq!(set.highlight("help"), "help");
        assert!(set.find_matches("help").is_empty());
    }

    #[test]
    fn terms_are_normalized_and_deduped() {
        let set = KeywordSet::new(["  Fire ", "fire", "", "POLICE"]);
        assert_eq!(set.terms(), ["fire", "police"]);
    }

    #[test]
    fn find_matches_returns_ordered_ranges() {
        let set = KeywordSet::emergency();
        let text = "help me, she fell";
        let ranges = set.find_matches(text);
        assert_eq!(ranges.len(), 2);
        assert_eq!(&text[ranges[0].clone()], "help");
        assert_eq!(&text[ranges[1].clone()], "fell");
    }

    #[test]
    fn default_vocabulary_is_the_demo_script() {
        let set = KeywordSet::default();
        assert_eq!(set.terms().len(), EMERGENCY_KEYWORDS.len());
        assert!(set.contains_match("cardiac arrest"));
        assert!(set.contains_match("not breathing"));
    }
}
