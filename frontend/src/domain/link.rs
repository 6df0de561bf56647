//! Saved links as reported by the backend, plus the payloads that mutate them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CategoryId;

/// Backend identifier of a saved link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(i64);

impl LinkId {
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

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content classification assigned during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Generic web page.
    Webpage,
    /// YouTube video.
    Youtube,
    /// Spotify track, album or episode.
    Spotify,
    /// Tweet or thread.
    Twitter,
    /// GitHub repository or page.
    Github,
    /// PDF document.
    Pdf,
    /// Not yet classified.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Progress of backend enrichment for a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Waiting for enrichment.
    #[default]
    Pending,
    /// Enrichment is running.
    Processing,
    /// Enrichment finished.
    Complete,
    /// Enrichment failed; see `processing_error`.
    Error,
}

/// A saved link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Backend identifier.
    pub id: LinkId,
    /// Canonical URL after redirects.
    pub url: String,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub short_summary: Option<String>,
    /// Free-form note entered when saving.
    #[serde(default)]
    pub note: Option<String>,
    /// Read state.
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub author: Option<String>,
    /// Media duration in seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub raw_metadata: Option<Value>,
    #[serde(default)]
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub processing_error: Option<String>,
    /// Assigned category, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
}

/// Read-state filter applied to the stash listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatusTab {
    /// Only links already read.
    Read,
    /// Only links still unread.
    Unread,
}

impl LinkStatusTab {
    /// Whether `link` belongs on this tab.
    #[must_use]
    pub fn matches(self, link: &Link) -> bool {
        match self {
            Self::Read => link.read,
            Self::Unread => !link.read,
        }
    }
}

impl FromStr for LinkStatusTab {
    type Err = LinkValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "unread" => Ok(Self::Unread),
            _ => Err(LinkValidationError::UnknownTab {
                value: s.to_owned(),
            }),
        }
    }
}

/// Local validation failures for link forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkValidationError {
    /// URL was missing or blank.
    #[error("URL is required")]
    MissingUrl,
    /// Link id was missing or not numeric.
    #[error("Link ID is required")]
    MissingId,
    /// Listing tab was neither `read` nor `unread`.
    #[error("unknown tab '{value}'; expected read|unread")]
    UnknownTab { value: String },
}

/// Body of `POST /links/save`.
///
/// # Examples
/// ```
/// use frontend::domain::{LinkValidationError, NewLink};
///
/// assert_eq!(NewLink::try_new(Some("  "), None), Err(LinkValidationError::MissingUrl));
/// let link = NewLink::try_new(Some("https://example.com"), Some("")).unwrap();
/// assert!(link.note().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLink {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl NewLink {
    /// Validate raw form values. Blank notes are dropped.
    pub fn try_new(url: Option<&str>, note: Option<&str>) -> Result<Self, LinkValidationError> {
        let url = url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(LinkValidationError::MissingUrl)?;
        let note = note
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_owned);
        Ok(Self {
            url: url.to_owned(),
            note,
        })
    }

    /// URL to save.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Optional note.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Partial update sent to `PATCH /links/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkUpdate {
    /// `Some(None)` clears the category; `None` leaves it untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LinkUpdate {
    /// Update that assigns `category` (or clears it with `None`).
    #[must_use]
    pub fn assign_category(category: Option<CategoryId>) -> Self {
        Self {
            category_id: Some(category),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn link(read: bool) -> Link {
        serde_json::from_value(json!({ "id": 1, "url": "https://example.com", "read": read }))
            .expect("decode minimal link")
    }

    #[test]
    fn decodes_enriched_link() {
        let link: Link = serde_json::from_value(json!({
            "id": 3,
            "url": "https://youtu.be/x",
            "title": "A talk",
            "read": false,
            "content_type": "youtube",
            "processing_status": "complete",
            "category_id": 9,
            "created_at": "2025-03-01T12:28:00.123456",
            "user_id": 1
        }))
        .expect("decode link");
        assert_eq!(link.content_type, Some(ContentType::Youtube));
        assert_eq!(link.processing_status, ProcessingStatus::Complete);
        assert_eq!(link.category_id, Some(CategoryId::new(9)));
        assert!(link.created_at.is_some());
    }

    #[test]
    fn unrecognised_content_type_decodes_as_unknown() {
        let content_type: ContentType =
            serde_json::from_value(json!("vimeo")).expect("decode content type");
        assert_eq!(content_type, ContentType::Unknown);
    }

    #[rstest]
    #[case(LinkStatusTab::Read, true, true)]
    #[case(LinkStatusTab::Read, false, false)]
    #[case(LinkStatusTab::Unread, false, true)]
    fn tabs_filter_by_read_state(#[case] tab: LinkStatusTab, #[case] read: bool, #[case] keep: bool) {
        assert_eq!(tab.matches(&link(read)), keep);
    }

    #[test]
    fn rejects_unknown_tab() {
        let err = "archived".parse::<LinkStatusTab>().expect_err("unknown tab");
        assert!(matches!(err, LinkValidationError::UnknownTab { .. }));
    }

    #[test]
    fn new_link_omits_missing_note() {
        let link = NewLink::try_new(Some(" https://example.com "), None).expect("valid");
        let value = serde_json::to_value(&link).expect("serialise");
        assert_eq!(value, json!({ "url": "https://example.com" }));
    }

    #[test]
    fn clearing_a_category_sends_null() {
        let value = serde_json::to_value(LinkUpdate::assign_category(None)).expect("serialise");
        assert_eq!(value, json!({ "category_id": null }));
    }
}
