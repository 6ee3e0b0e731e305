//! Ordered, duplicate-free keyword collection edited from the keyword input.

use log::debug;
use serde::{Deserialize, Serialize};

/// Result of offering a candidate keyword to a [`KeywordSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The trimmed candidate was appended.
    Added,
    /// The trimmed candidate is already present.
    Duplicate,
    /// The candidate was blank after trimming.
    Empty,
}

/// Keywords in insertion order, deduplicated by exact (trimmed) match.
///
/// Serializes as a plain JSON array of strings. Deserialization drops repeated
/// entries so the set invariant holds for documents loaded from disk as well.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    items: Vec<String>,
}

impl KeywordSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims `candidate` and appends it unless it is blank or already present.
    pub fn add(&mut self, candidate: &str) -> AddOutcome {
        let keyword = candidate.trim();
        if keyword.is_empty() {
            return AddOutcome::Empty;
        }
        if self.contains(keyword) {
            debug!("Ignoring duplicate keyword '{}'", keyword);
            return AddOutcome::Duplicate;
        }

        self.items.push(keyword.to_owned());
        debug!("Added keyword '{}' ({} total)", keyword, self.items.len());
        AddOutcome::Added
    }

    /// Removes the entry equal to `value`, keeping the remaining order intact.
    pub fn remove(&mut self, value: &str) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(index) => {
                self.items.remove(index);
                debug!("Removed keyword '{}'", value);
                true
            }
            None => false,
        }
    }

    /// Returns whether `value` is present.
    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }

    /// Returns the keywords in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Returns `true` when no keyword has been added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Comma-joined representation used by the PDF report.
    pub fn joined(&self) -> String {
        self.items.join(", ")
    }

    /// Bulleted list rendering; the whole list is produced on every call.
    pub fn render_list(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("• {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(values: Vec<String>) -> Self {
        let mut set = Self::new();
        for value in values {
            set.add(&value);
        }
        set
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_values_are_all_kept() {
        let mut set = KeywordSet::new();
        for word in ["alpha", " beta ", "gamma"] {
            assert_eq!(set.add(word), AddOutcome::Added);
        }
        assert_eq!(set.as_slice(), ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn trimmed_duplicates_are_rejected() {
        let mut set = KeywordSet::new();
        set.add("rust");
        assert_eq!(set.add("  rust\t"), AddOutcome::Duplicate);
        assert_eq!(set.as_slice(), ["rust"]);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut set = KeywordSet::new();
        assert_eq!(set.add("   "), AddOutcome::Empty);
        assert!(set.is_empty());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut set = KeywordSet::from(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]);
        assert!(set.remove("b"));
        assert!(!set.remove("b"));
        assert_eq!(set.as_slice(), ["a", "c"]);
    }

    #[test]
    fn rendering_helpers() {
        let set = KeywordSet::from(vec!["x".to_owned(), "y".to_owned()]);
        assert_eq!(set.joined(), "x, y");
        assert_eq!(set.render_list(), "• x\n• y");
    }

    #[test]
    fn deserialization_drops_repeats() {
        let set: KeywordSet = serde_json::from_str(r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(set.as_slice(), ["a", "b"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
