/// User-facing texts shown by a session.
///
/// A rejected question is never localized, its error always reads
/// `Status {code}: {body}` with the body from the service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionStrings {
    /// Shown when the draft has too few words.
    pub too_short: String,
    /// Shown when the service could not be reached or the answer broke.
    pub transport_failure: String,
}

impl SessionStrings {
    /// Arabic texts.
    pub fn arabic() -> Self {
        Self {
            too_short: "الرجاء إدخال سؤال مكوّن من 3 كلمات على الأقل.".to_owned(),
            transport_failure: "تعذّر الاتصال بالخادم. الرجاء المحاولة مرة أخرى."
                .to_owned(),
        }
    }

    /// English texts.
    pub fn english() -> Self {
        Self {
            too_short: "Please enter a question of at least 3 words.".to_owned(),
            transport_failure:
                "Could not reach the legal assistant. Please try again."
                    .to_owned(),
        }
    }
}

impl Default for SessionStrings {
    #[inline]
    fn default() -> Self {
        Self::arabic()
    }
}
