//! Fallback text CAPTCHA

/// Message shown when the submitted answer does not match
pub const INCORRECT_MESSAGE: &str = "Incorrect CAPTCHA";

const SECRET_WORD: &str = "robot";

/// Alternate "type the word" challenge
///
/// Matching is a case-insensitive exact comparison with surrounding
/// whitespace ignored. There is no retry limit; the owner decides when
/// to stop asking.
pub struct TextChallenge {
    secret: String,
}

impl Default for TextChallenge {
    fn default() -> Self {
        Self::new(SECRET_WORD)
    }
}

impl TextChallenge {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The word the visitor is asked to type
    pub fn prompt_word(&self) -> &str {
        &self.secret
    }

    /// Check a submitted answer
    ///
    /// # Examples
    /// ```
    /// use maze_captcha::text_challenge::TextChallenge;
    ///
    /// let challenge = TextChallenge::default();
    /// assert!(challenge.verify("Robot"));
    /// assert!(!challenge.verify("human"));
    /// ```
    pub fn verify(&self, input: &str) -> bool {
        input.trim().eq_ignore_ascii_case(&self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive() {
        let challenge = TextChallenge::default();
        assert!(challenge.verify("ROBOT"));
        assert!(challenge.verify("Robot"));
        assert!(challenge.verify("robot"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let challenge = TextChallenge::default();
        assert!(challenge.verify("  robot\n"));
    }

    #[test]
    fn wrong_answers_fail() {
        let challenge = TextChallenge::default();
        assert!(!challenge.verify("human"));
        assert!(!challenge.verify(""));
        assert!(!challenge.verify("robots"));
    }

    #[test]
    fn custom_secret_word() {
        let challenge = TextChallenge::new("orange");
        assert!(challenge.verify("ORANGE"));
        assert!(!challenge.verify("robot"));
    }
}
