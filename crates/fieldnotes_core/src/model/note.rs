//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical `Note` record persisted as one JSON array.
//! - Provide draft normalization and shallow patch merge helpers.
//!
//! # Invariants
//! - `id` is a string, even when the source record carried a number.
//! - `merge` never touches `id` or `date`.
//! - Title emptiness is enforced by callers through `NoteDraft::normalized`,
//!   not by persistence.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one note inside the local store.
pub type NoteId = String;

/// GPS fix attached to a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Reverse-geocoded, human-readable address.
    #[serde(default)]
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }

    /// Attaches an address composed from reverse-geocoding parts.
    ///
    /// Produces `"<street> <city>"` with surrounding whitespace removed, or no
    /// address at all when both parts are missing or blank.
    pub fn with_address_parts(mut self, street: Option<&str>, city: Option<&str>) -> Self {
        let composed = format!("{} {}", street.unwrap_or(""), city.unwrap_or(""));
        let trimmed = composed.trim();
        self.address = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Returns `"lat, lon"` rounded to four decimals.
    pub fn coordinates_label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "deserialize_note_id")]
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Opaque local file URI of an attached photo.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    /// Creation timestamp, ISO-8601 with millisecond precision.
    pub date: String,
}

impl Note {
    /// Builds a note from a draft with caller-assigned identity and timestamp.
    pub fn from_draft(id: impl Into<NoteId>, date: DateTime<Utc>, draft: NoteDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            image: draft.image,
            location: draft.location,
            date: format_timestamp(date),
        }
    }

    /// Applies `patch` over this note. Absent patch fields are preserved.
    pub fn merge(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }

    /// Parses `date` as an RFC 3339 timestamp.
    ///
    /// Returns `None` when the stored value is not a valid timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

/// User input for a new note. Identity and timestamp are assigned on create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub location: Option<Location>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
            location: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Trims text fields and rejects a blank title.
    pub fn normalized(self) -> Result<Self, NoteValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            image: self.image,
            location: self.location,
        })
    }
}

/// Shallow update applied by `Note::merge`.
///
/// `None` keeps the existing value. For the optional attachments,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub location: Option<Option<Location>>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.location.is_none()
    }
}

/// Full-field replacement, as submitted by the edit form.
impl From<NoteDraft> for NotePatch {
    fn from(draft: NoteDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            image: Some(draft.image),
            location: Some(draft.location),
        }
    }
}

/// Validation errors for user-supplied note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// Formats a timestamp the way stored notes carry it, e.g.
/// `2024-05-01T08:30:00.000Z`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn deserialize_note_id<'de, D>(deserializer: D) -> Result<NoteId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Number(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, Location, Note, NoteDraft, NotePatch, NoteValidationError};
    use chrono::{TimeZone, Utc};

    fn sample_note() -> Note {
        Note {
            id: "1".to_string(),
            title: "old".to_string(),
            description: "d".to_string(),
            image: Some("file:///photo.jpg".to_string()),
            location: None,
            date: "T".to_string(),
        }
    }

    #[test]
    fn merge_replaces_only_present_fields() {
        let mut note = sample_note();
        note.merge(NotePatch::title("new"));

        assert_eq!(note.id, "1");
        assert_eq!(note.title, "new");
        assert_eq!(note.description, "d");
        assert_eq!(note.image.as_deref(), Some("file:///photo.jpg"));
        assert_eq!(note.date, "T");
    }

    #[test]
    fn merge_can_clear_optional_attachments() {
        let mut note = sample_note();
        note.merge(NotePatch {
            image: Some(None),
            ..NotePatch::default()
        });
        assert!(note.image.is_none());
    }

    #[test]
    fn normalized_trims_and_rejects_blank_title() {
        let draft = NoteDraft::new("  Bird sighting ", "  heron \n")
            .normalized()
            .unwrap();
        assert_eq!(draft.title, "Bird sighting");
        assert_eq!(draft.description, "heron");

        let err = NoteDraft::new("   ", "body").normalized().unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyTitle);
    }

    #[test]
    fn address_parts_compose_and_collapse_to_none() {
        let location =
            Location::new(52.2297, 21.0122).with_address_parts(Some("Nowy Swiat"), None);
        assert_eq!(location.address.as_deref(), Some("Nowy Swiat"));

        let location = Location::new(0.0, 0.0).with_address_parts(Some(" "), Some(""));
        assert!(location.address.is_none());
    }

    #[test]
    fn coordinates_label_uses_four_decimals() {
        let location = Location::new(52.229_676, 21.012_229);
        assert_eq!(location.coordinates_label(), "52.2297, 21.0122");
    }

    #[test]
    fn timestamp_format_matches_stored_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-01T08:30:00.000Z");
    }

    #[test]
    fn numeric_id_deserializes_as_string() {
        let note: Note = serde_json::from_str(
            r#"{"id":7,"title":"seed","description":"","image":null,"location":null,"date":"2024-05-01T08:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(note.id, "7");
        assert!(note.created_at().is_some());
    }
}
