use serde::{Deserialize, Serialize};

/// A question to be sent to the answering service.
///
/// This is also the wire body of the request, it serializes to
/// `{"question": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// The question text, exactly as the user submitted it.
    pub question: String,
}

impl QuestionRequest {
    /// Creates a new `QuestionRequest`.
    #[inline]
    pub fn new<S: Into<String>>(question: S) -> Self {
        Self {
            question: question.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_body() {
        let req = QuestionRequest::new("ما هي حقوقي");
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"question":"ما هي حقوقي"}"#
        );
    }

    #[test]
    fn test_escaping() {
        let req = QuestionRequest::new("say \"hi\"\n");
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"question":"say \"hi\"\n"}"#);
        let back: QuestionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }
}
