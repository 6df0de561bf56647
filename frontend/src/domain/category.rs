//! Link categories.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Backend identifier of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Wrap a raw backend identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-defined category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend identifier.
    pub id: CategoryId,
    /// Display name, unique per user.
    pub name: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Validation failures for category forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    /// Name was missing or blank.
    #[error("Category name is required")]
    EmptyName,
}

/// Body of `POST /categories` and `PATCH /categories/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    name: String,
}

impl CategoryDraft {
    /// Validate a raw category name; surrounding whitespace is trimmed.
    pub fn try_new(name: Option<&str>) -> Result<Self, CategoryValidationError> {
        name.map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Self {
                name: name.to_owned(),
            })
            .ok_or(CategoryValidationError::EmptyName)
    }

    /// Trimmed name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn rejects_blank_names(#[case] name: Option<&str>) {
        assert_eq!(
            CategoryDraft::try_new(name),
            Err(CategoryValidationError::EmptyName)
        );
    }

    #[test]
    fn trims_names() {
        let draft = CategoryDraft::try_new(Some("  Reading  ")).expect("valid name");
        assert_eq!(draft.name(), "Reading");
    }
}
