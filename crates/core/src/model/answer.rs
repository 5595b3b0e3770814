use std::collections::HashMap;

/// Current selections of a quiz taker, keyed by item name.
///
/// An empty description means the item is unanswered; absent items read the
/// same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    selections: HashMap<String, String>,
}

impl Answers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `description` as the choice for `name`, replacing any earlier choice.
    pub fn select(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.selections.insert(name.into(), description.into());
    }

    /// Builder-style variant of [`Answers::select`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.select(name, description);
        self
    }

    /// The chosen description for `name`, or `""` when unanswered.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.selections.get(name).map_or("", String::as_str)
    }

    /// All recorded selections, including blank ones, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }

    /// Number of items with a non-empty selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|d| !d.is_empty()).count()
    }
}

impl<N, D> FromIterator<(N, D)> for Answers
where
    N: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut answers = Self::new();
        for (name, description) in iter {
            answers.select(name, description);
        }
        answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_selections_read_as_unanswered() {
        let answers = Answers::new().with("Modin", "").with("Streamlit", "apps");
        assert_eq!(answers.get("Modin"), "");
        assert_eq!(answers.get("TruLens"), "");
        assert_eq!(answers.get("Streamlit"), "apps");
        assert_eq!(answers.answered_count(), 1);
    }

    #[test]
    fn later_selection_replaces_earlier() {
        let mut answers: Answers = [("Modin", "a")].into_iter().collect();
        answers.select("Modin", "b");
        assert_eq!(answers.get("Modin"), "b");
    }
}
