/// Candidates handed to the helper by an `activate` or `set_page_candidates`.
///
/// Strings are sent verbatim, one per line. A candidate containing `'\n'`
/// splits into two lines on the wire and desynchronizes framing; callers
/// must not pass such strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBatch {
    candidates: Vec<String>,
    display_limit: i32,
}

impl CandidateBatch {
    pub fn new<I, S>(candidates: I, display_limit: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            display_limit,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn display_limit(&self) -> i32 {
        self.display_limit
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
