use std::error::Error;
use std::fmt;

/// The least number of words a question must have.
pub const MIN_QUESTION_TOKENS: usize = 3;

/// A reason for refusing to submit a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// The question has fewer words than required.
    TooShort {
        /// Words found in the question.
        tokens: usize,
        /// Words required.
        required: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { tokens, required } => write!(
                f,
                "question has {tokens} word(s), at least {required} required"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks whether `candidate` may be submitted as a question.
///
/// Words are separated by runs of whitespace. Leading and trailing
/// whitespace never count as words, so a blank input has zero words.
/// There is no upper bound on the length.
pub fn validate(candidate: &str) -> Result<(), ValidationError> {
    let tokens = candidate.split_whitespace().count();
    if tokens < MIN_QUESTION_TOKENS {
        return Err(ValidationError::TooShort {
            tokens,
            required: MIN_QUESTION_TOKENS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn too_short(tokens: usize) -> Result<(), ValidationError> {
        Err(ValidationError::TooShort {
            tokens,
            required: MIN_QUESTION_TOKENS,
        })
    }

    #[test]
    fn test_blank() {
        assert_eq!(validate(""), too_short(0));
        assert_eq!(validate("   \t\n "), too_short(0));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(validate("سؤال قصير"), too_short(2));
        assert_eq!(validate("ما هي حقوقي"), Ok(()));
        assert_eq!(validate("one two three four five"), Ok(()));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(validate("  سؤال   قصير  "), too_short(2));
        assert_eq!(validate("\tما\nهي  حقوقي \n"), Ok(()));
        // Non-breaking spaces separate words too.
        assert_eq!(validate("ما\u{a0}هي\u{a0}حقوقي"), Ok(()));
    }

    #[test]
    fn test_no_upper_bound() {
        let long = "كلمة ".repeat(10_000);
        assert_eq!(validate(&long), Ok(()));
    }
}
