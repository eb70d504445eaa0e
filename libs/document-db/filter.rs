use crate::{Document, Value};

/// Conjunction of field equality conditions, an empty filter matches every
/// document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().is_empty());
        assert!(Filter::new().matches(&doc! {}));
        assert!(Filter::new().matches(&doc! { "email" => "a@example.com" }));
    }

    #[test]
    fn test_equality_is_exact() {
        let filter = Filter::new().eq("email", "Alice@example.com");

        assert!(filter.matches(&doc! { "email" => "Alice@example.com", "firstName" => "A" }));
        assert!(!filter.matches(&doc! { "email" => "alice@example.com" }));
        assert!(!filter.matches(&doc! { "firstName" => "A" }));
    }

    #[test]
    fn test_all_conditions_must_match() {
        let filter = Filter::new().eq("description", "Do X").eq("done", true);

        assert!(filter.matches(&doc! { "description" => "Do X", "done" => true }));
        assert!(!filter.matches(&doc! { "description" => "Do X", "done" => false }));
    }
}
