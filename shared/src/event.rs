//! Events driving the ad board core.

use serde::{Deserialize, Serialize};

use crate::ads::{AdForm, AdId};
use crate::capabilities::FileSelectResult;

/// JSON body of the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub username: String,
}

/// Shell-facing events cross the bridge serialized; the `#[serde(skip)]`
/// variants are capability callbacks that exist only inside the core.
#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    /// Page load: clear transient UI state and refresh the listing.
    Started,
    /// Open the popup blank, for a new ad.
    NewAdRequested,
    /// Open the popup prefilled with the record to edit.
    EditRequested { id: AdId },
    /// Ask to delete; mutates only after a confirmed dialog.
    DeleteRequested { id: AdId },
    /// Submit the form against the current edit session.
    SaveRequested(Box<AdForm>),
    /// Close the popup without saving; abandons any pending save.
    PopupClosed,
    AlertDismissed,

    #[serde(skip)]
    TokenFetched(Result<Option<Vec<u8>>, crux_kv::error::KeyValueError>),
    #[serde(skip)]
    IdentityFetched(Box<crux_http::Result<crux_http::Response<IdentityResponse>>>),
    #[serde(skip)]
    FileRead(FileSelectResult),
    #[serde(skip)]
    ConfirmAnswered(bool),
    #[serde(skip)]
    BookFetched(Result<Option<Vec<u8>>, crux_kv::error::KeyValueError>),
    #[serde(skip)]
    BookWritten(Result<Option<Vec<u8>>, crux_kv::error::KeyValueError>),
}
