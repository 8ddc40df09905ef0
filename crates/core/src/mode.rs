//! Interaction Mode Classification
//!
//! Every user utterance is scored against two fixed vocabularies. Decision and
//! negotiation language pulls the conversation into `Bargain` mode; anything
//! else, including ties and utterances with no trigger terms at all, keeps it
//! in the exploratory `Gitter` mode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The conversational style the assistant adopts for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Exploratory, question-driven conversation. The default for every new session.
    #[default]
    Gitter,
    /// Decisive, option-driven conversation aimed at reaching a conclusion.
    Bargain,
}

impl Mode {
    /// Upper-case label used in the visible mode-change tag, e.g. `BARGAIN`.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Gitter => "GITTER",
            Mode::Bargain => "BARGAIN",
        }
    }

    /// The tag prepended to a reply when this mode was just entered.
    pub fn indicator(&self) -> String {
        format!("[{} MODE] ", self.label())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Gitter => write!(f, "gitter"),
            Mode::Bargain => write!(f, "bargain"),
        }
    }
}

/// Decision and negotiation vocabulary.
pub const BARGAIN_TERMS: &[&str] = &[
    "decide", "choose", "negotiate", "price", "deal", "agree", "option", "decision", "select",
    "pick", "conclude", "finalize", "settle",
];

/// Exploratory vocabulary.
pub const GITTER_TERMS: &[&str] = &[
    "tell me",
    "explain",
    "what about",
    "how",
    "why",
    "interesting",
    "think",
    "feel",
    "experience",
    "story",
    "example",
];

/// The two trigger vocabularies the classifier scores an utterance against.
///
/// Terms are matched as lower-case substrings, so they must be stored in
/// lower case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSets {
    pub bargain: Vec<String>,
    pub gitter: Vec<String>,
}

impl TermSets {
    pub fn new<B, G>(bargain: B, gitter: G) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            bargain: normalize(bargain),
            gitter: normalize(gitter),
        }
    }
}

impl Default for TermSets {
    fn default() -> Self {
        Self::new(BARGAIN_TERMS.iter().copied(), GITTER_TERMS.iter().copied())
    }
}

fn normalize<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.into().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

/// Per-vocabulary scores for a single utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeScore {
    pub bargain: usize,
    pub gitter: usize,
}

impl ModeScore {
    /// `Bargain` only on a strict majority; ties and zero scores stay `Gitter`.
    pub fn mode(&self) -> Mode {
        if self.bargain > self.gitter {
            Mode::Bargain
        } else {
            Mode::Gitter
        }
    }
}

/// Keyword-scoring classifier over a pair of [`TermSets`].
#[derive(Debug, Clone, Default)]
pub struct ModeClassifier {
    terms: TermSets,
}

impl ModeClassifier {
    pub fn new(terms: TermSets) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &TermSets {
        &self.terms
    }

    /// Counts the distinct terms of each vocabulary contained in the utterance.
    pub fn score(&self, utterance: &str) -> ModeScore {
        let lowered = utterance.to_lowercase();
        let count = |terms: &[String]| terms.iter().filter(|t| lowered.contains(t.as_str())).count();
        ModeScore {
            bargain: count(&self.terms.bargain),
            gitter: count(&self.terms.gitter),
        }
    }

    pub fn classify(&self, utterance: &str) -> Mode {
        self.score(utterance).mode()
    }
}

/// Classifies an utterance with the default vocabularies.
pub fn classify(utterance: &str) -> Mode {
    ModeClassifier::default().classify(utterance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_neutral_utterances_stay_gitter() {
        assert_eq!(classify(""), Mode::Gitter);
        assert_eq!(classify("   "), Mode::Gitter);
        assert_eq!(classify("The weather is nice today."), Mode::Gitter);
    }

    #[test]
    fn test_exploratory_question_is_gitter() {
        let classifier = ModeClassifier::default();
        let score = classifier.score("What do you think about life on Mars?");
        assert_eq!(score.bargain, 0);
        assert!(score.gitter >= 1);
        assert_eq!(score.mode(), Mode::Gitter);
    }

    #[test]
    fn test_decision_language_is_bargain() {
        let classifier = ModeClassifier::default();
        let score = classifier.score("Let's decide and finalize the best option");
        assert_eq!(score, ModeScore { bargain: 3, gitter: 0 });
        assert_eq!(score.mode(), Mode::Bargain);
    }

    #[test]
    fn test_tie_defaults_to_gitter() {
        // "decide" vs "why"
        assert_eq!(classify("why should we decide"), Mode::Gitter);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify("DECIDE, CHOOSE, SETTLE!"), Mode::Bargain);
    }

    #[test]
    fn test_repeated_terms_count_once() {
        let classifier = ModeClassifier::default();
        let score = classifier.score("deal deal deal deal, but why and how?");
        assert_eq!(score.bargain, 1);
        assert_eq!(score.gitter, 2);
        assert_eq!(score.mode(), Mode::Gitter);
    }

    #[test]
    fn test_substring_containment_matches_inside_words() {
        // "price" inside "pricey", "option" inside "options"
        assert_eq!(classify("pricey options"), Mode::Bargain);
    }

    #[test]
    fn test_custom_term_sets_are_lowercased_and_deduplicated() {
        let terms = TermSets::new(["Buy", "buy", ""], ["Wonder"]);
        assert_eq!(terms.bargain, vec!["buy".to_string()]);
        assert_eq!(terms.gitter, vec!["wonder".to_string()]);

        let classifier = ModeClassifier::new(terms);
        assert_eq!(classifier.classify("I want to BUY it"), Mode::Bargain);
        assert_eq!(classifier.classify("I wonder about buying"), Mode::Gitter);
    }

    #[test]
    fn test_mode_labels_and_indicator() {
        assert_eq!(Mode::default(), Mode::Gitter);
        assert_eq!(Mode::Bargain.indicator(), "[BARGAIN MODE] ");
        assert_eq!(Mode::Gitter.indicator(), "[GITTER MODE] ");
        assert_eq!(format!("{}", Mode::Bargain), "bargain");
    }

    #[test]
    fn test_mode_serialization() {
        assert_eq!(serde_json::to_string(&Mode::Bargain).unwrap(), "\"bargain\"");
        let mode: Mode = serde_json::from_str("\"gitter\"").unwrap();
        assert_eq!(mode, Mode::Gitter);
    }
}
