use serde::{Deserialize, Serialize};

/// How a preset response ends.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresetEnding {
    /// The server closes the connection normally.
    Close,
    /// Reading the body fails after all slices were delivered.
    Interrupted,
}

/// The preset response for one question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// The status code. `None` means the server cannot be reached at all.
    pub status: Option<u16>,
    /// Body slices, delivered one per read.
    pub slices: Vec<Vec<u8>>,
    /// What happens after the last slice.
    pub ending: PresetEnding,
}

impl PresetResponse {
    /// Creates a successful response that streams the given slices.
    #[inline]
    pub fn with_slices<I, S>(slices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            status: Some(200),
            slices: slices.into_iter().map(|s| s.as_ref().to_vec()).collect(),
            ending: PresetEnding::Close,
        }
    }

    /// Creates a response with the given status and a plain text body.
    #[inline]
    pub fn with_status<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status: Some(status),
            slices: vec![body.into().into_bytes()],
            ending: PresetEnding::Close,
        }
    }

    /// Creates a response for a server that cannot be reached.
    #[inline]
    pub fn unreachable() -> Self {
        Self {
            status: None,
            slices: vec![],
            ending: PresetEnding::Close,
        }
    }

    /// Makes the body fail after its slices were delivered.
    #[inline]
    pub fn interrupted(mut self) -> Self {
        self.ending = PresetEnding::Interrupted;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response =
            PresetResponse::with_slices(["الإ", "جابة"]).interrupted();

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
        assert_eq!(deserialized.slices[1], "جابة".as_bytes());
    }

    #[test]
    fn test_status_body() {
        let response = PresetResponse::with_status(500, "internal error");
        assert_eq!(response.status, Some(500));
        assert_eq!(response.slices, vec![b"internal error".to_vec()]);
        assert_eq!(response.ending, PresetEnding::Close);
    }
}
