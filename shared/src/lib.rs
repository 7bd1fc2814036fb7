// lib.rs - ad board client core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod ads;
pub mod app;
pub mod capabilities;
pub mod error;
pub mod event;
pub mod image;
pub mod store;

pub use ads::{AdForm, AdId, AdRecord, UnixMillis};
pub use app::{AdCard, App, Model, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use error::{AuthError, ImageError, ValidationError};
pub use event::Event;
pub use store::{AdBook, StoreError};

/// Shell storage key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "token";
/// Shell storage key holding the serialized ad book.
pub const ADS_KEY: &str = "my_ads";

/// Identity endpoint; answers `{ "username": ... }` for a bearer token.
pub const IDENTITY_URL: &str = "http://localhost:3000/api/user";

pub const DEFAULT_RATING: u8 = 5;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image reference rendered for records without one of their own.
pub const DEFAULT_AD_IMAGE: &str = "/images/default_car.jpg";
pub const UNKNOWN_SELLER: &str = "Unknown";
pub const NO_ADS_PLACEHOLDER: &str = "You have no ads yet.";

pub const ALERT_MISSING_FIELDS: &str = "Please fill in all fields and upload an image.";
pub const ALERT_NO_IDENTITY: &str = "Error retrieving user information.";
/// Shown when opening an edit for a record that is gone.
pub const ALERT_EDIT_NOT_FOUND: &str = "Ad not found!";
/// Shown when a pending save finds its record gone.
pub const ALERT_SAVE_NOT_FOUND: &str = "Error: Ad not found.";
pub const ALERT_IMAGE_UNREADABLE: &str = "Could not read the selected image.";
pub const ALERT_IMAGE_TOO_LARGE: &str = "The selected image is too large.";
pub const ALERT_STORE_FAILED: &str = "Could not update your ads.";
pub const CONFIRM_DELETE_PROMPT: &str = "Are you sure you want to delete this ad?";
