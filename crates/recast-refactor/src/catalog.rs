use std::collections::BTreeMap;

use crate::rule::{RefactoringRule, RuleId};

/// Presentation titles for refactorings.
///
/// A rule's own default title is used unless the host (or its configuration)
/// overrides it, which is how titles get localized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleCatalog {
    overrides: BTreeMap<RuleId, String>,
}

impl TitleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, rule: RuleId, title: impl Into<String>) {
        self.overrides.insert(rule, title.into());
    }

    pub fn title_for(&self, rule: &dyn RefactoringRule) -> String {
        let id = rule.id();
        match self.overrides.get(id.as_str()) {
            Some(title) => title.clone(),
            None => rule.default_title().to_string(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TitleCatalog {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            overrides: iter
                .into_iter()
                .map(|(id, title)| (RuleId::new(id), title.into()))
                .collect(),
        }
    }
}
