#[derive(Clone, Debug)]
pub struct Settings {
    /// Session ends after this many questions. `None` plays until every
    /// question has been asked.
    pub max_questions: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_questions: Some(10),
        }
    }
}
