use std::collections::BTreeMap;

/// Selected option text per question ordinal.
///
/// Stores the option's text rather than its slot; grading compares text.
/// Unanswered questions simply have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    selections: BTreeMap<usize, String>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, replacing any previous one for the same question.
    ///
    /// Returns the replaced selection, if any.
    pub fn record(&mut self, ordinal: usize, text: impl Into<String>) -> Option<String> {
        self.selections.insert(ordinal, text.into())
    }

    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&str> {
        self.selections.get(&ordinal).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.selections.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(usize, String)> for AnswerRecord {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self {
            selections: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_overwrites_previous_selection() {
        let mut answers = AnswerRecord::new();
        assert_eq!(answers.record(0, "Rome"), None);
        assert_eq!(answers.record(0, "Paris"), Some("Rome".to_string()));
        assert_eq!(answers.get(0), Some("Paris"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn missing_entries_are_absent() {
        let answers: AnswerRecord = [(2, "x".to_string())].into_iter().collect();
        assert_eq!(answers.get(0), None);
        assert_eq!(answers.iter().collect::<Vec<_>>(), vec![(2, "x")]);
    }
}
