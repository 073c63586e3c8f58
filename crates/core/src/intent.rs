//! Keyword detection of an accepted test-drive offer.
//!
//! This is a heuristic, not language understanding. It checks whether the
//! salesperson's last reply mentions a visit or a test drive, and whether
//! the customer's answer contains an affirmative phrase. Matching is plain
//! case-insensitive substring containment: "no test drive... sure,
//! whatever" triggers, and "ok" matches inside "book". Callers should treat
//! a positive result as a reason to offer the intake form, nothing more.

/// Phrases in an assistant reply that suggest a visit or test drive.
pub const VISIT_PHRASES: &[&str] = &[
    "test drive",
    "test-drive",
    "come see",
    "visit us",
    "schedule a visit",
    "book an appointment",
    "come by",
    "check it out",
    "see it in person",
];

/// Phrases in a user reply that read as agreement.
pub const AFFIRMATIVE_PHRASES: &[&str] = &[
    "yes",
    "sure",
    "okay",
    "ok",
    "definitely",
    "absolutely",
    "would love to",
    "let's do it",
    "sounds good",
    "great",
    "perfect",
];

/// Decides whether an exchange should start the appointment intake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentDetector {
    visit_phrases: Vec<String>,
    affirmative_phrases: Vec<String>,
}

impl IntentDetector {
    /// Creates a detector with custom phrase lists.
    pub fn new<I, J, S, T>(visit_phrases: I, affirmative_phrases: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            visit_phrases: normalize(visit_phrases),
            affirmative_phrases: normalize(affirmative_phrases),
        }
    }

    /// Returns `true` if `assistant_message` suggests a visit or test drive
    /// and `user_message` agrees to it.
    pub fn detect_test_drive(
        &self,
        assistant_message: &str,
        user_message: &str,
    ) -> bool {
        let suggested = contains_any(assistant_message, &self.visit_phrases);
        let accepted = contains_any(user_message, &self.affirmative_phrases);
        trace!("test drive suggested: {suggested}, accepted: {accepted}");
        suggested && accepted
    }
}

impl Default for IntentDetector {
    #[inline]
    fn default() -> Self {
        Self::new(VISIT_PHRASES, AFFIRMATIVE_PHRASES)
    }
}

fn normalize<I, S>(phrases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .map(|p| p.as_ref().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

#[inline]
fn contains_any(text: &str, phrases: &[String]) -> bool {
    let text = text.to_lowercase();
    phrases.iter().any(|phrase| text.contains(phrase.as_str()))
}
