//! Failure taxonomy for the ad flows.
//!
//! Every failure is caught at the operation boundary and surfaced as a
//! blocking alert; nothing propagates past `update`. The alert strings live
//! in the crate root so shells and tests share one copy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ads::AdId;
use crate::{
    ALERT_IMAGE_TOO_LARGE, ALERT_IMAGE_UNREADABLE, ALERT_MISSING_FIELDS, ALERT_NO_IDENTITY,
    ALERT_SAVE_NOT_FOUND,
};

/// Identity resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthError {
    #[error("no bearer token in shell storage")]
    MissingToken,

    #[error("identity request failed (status {status:?})")]
    RequestFailed { status: Option<u16> },
}

/// Save-path failures, each with a fixed user-facing alert.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("could not resolve the current user")]
    NoIdentity,

    #[error("edit target {id} no longer exists")]
    NotFound { id: AdId },
}

impl ValidationError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => ALERT_MISSING_FIELDS,
            Self::NoIdentity => ALERT_NO_IDENTITY,
            Self::NotFound { .. } => ALERT_SAVE_NOT_FOUND,
        }
    }
}

/// Image payload failures while building the data URI.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ImageError {
    #[error("selected file is empty")]
    Empty,

    #[error("selected file is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
}

impl ImageError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Empty => ALERT_IMAGE_UNREADABLE,
            Self::TooLarge { .. } => ALERT_IMAGE_TOO_LARGE,
        }
    }
}
