//! Ad records and the form snapshot the shell submits.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::DEFAULT_RATING;

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnixMillis(u64);

impl UnixMillis {
    #[must_use]
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        Self(ms)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Record identifier, unique within one user's list.
///
/// Ids are epoch milliseconds at creation, bumped past the largest existing
/// id so repeated submissions inside one clock tick still get distinct ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AdId(u64);

impl AdId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Next id for a user's list: `now`, or one past the largest id already
    /// present, whichever is greater.
    #[must_use]
    pub fn next(now: UnixMillis, existing: &[AdRecord]) -> Self {
        let floor = existing
            .iter()
            .map(|record| record.id.0)
            .max()
            .map_or(0, |largest| largest.saturating_add(1));
        Self(now.as_u64().max(floor))
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One classified-ad entry as persisted in the ad book.
///
/// Field names match the stored JSON; the form's `title` lands in `name`.
/// `image`, `seller` and `rating` default on decode so older entries load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: AdId,
    pub name: String,
    pub year: String,
    pub color: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub seller: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

fn default_rating() -> u8 {
    DEFAULT_RATING
}

/// Snapshot of the editor form at the moment the user hits save.
///
/// The shell reports only whether a file is picked; the bytes come later
/// through the `FileSelect` capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdForm {
    pub title: String,
    pub year: String,
    pub color: String,
    pub description: String,
    pub image_selected: bool,
}

impl AdForm {
    /// Trims every text field and checks the save preconditions.
    ///
    /// An image is required only when `require_image` is set (create); an
    /// update without a new file keeps the record's existing image.
    pub fn validated(&self, require_image: bool) -> Result<Self, ValidationError> {
        let trimmed = Self {
            title: self.title.trim().to_string(),
            year: self.year.trim().to_string(),
            color: self.color.trim().to_string(),
            description: self.description.trim().to_string(),
            image_selected: self.image_selected,
        };

        let fields = [
            ("title", &trimmed.title),
            ("year", &trimmed.year),
            ("color", &trimmed.color),
            ("description", &trimmed.description),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(ValidationError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        if require_image && !trimmed.image_selected {
            return Err(ValidationError::MissingField {
                field: "image".to_string(),
            });
        }

        Ok(trimmed)
    }

    /// Prefill for the edit popup.
    #[must_use]
    pub fn from_record(record: &AdRecord) -> Self {
        Self {
            title: record.name.clone(),
            year: record.year.clone(),
            color: record.color.clone(),
            description: record.description.clone(),
            image_selected: false,
        }
    }
}
