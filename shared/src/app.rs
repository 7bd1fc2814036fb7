//! The ad board core: model, update loop, and view projection.
//!
//! Every user operation that touches storage runs as a [`Flow`]: a typed
//! continuation held in the model while capability round-trips (token read,
//! identity call, file read, blob read/write) resolve one at a time. A
//! callback event that does not match the pending stage is stale and is
//! dropped, so an abandoned operation can never apply late.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crux_kv::error::KeyValueError;

use crate::ads::{AdForm, AdId, AdRecord, UnixMillis};
use crate::capabilities::Capabilities;
use crate::error::{AuthError, ValidationError};
use crate::event::{Event, IdentityResponse};
use crate::image;
use crate::store::AdBook;
use crate::{
    ADS_KEY, ALERT_EDIT_NOT_FOUND, ALERT_IMAGE_UNREADABLE, ALERT_STORE_FAILED,
    CONFIRM_DELETE_PROMPT, DEFAULT_AD_IMAGE, DEFAULT_RATING, IDENTITY_URL, NO_ADS_PLACEHOLDER,
    TOKEN_KEY, UNKNOWN_SELLER,
};

/// Form data a save flow carries from validation to the blob write.
#[derive(Debug)]
struct SaveDraft {
    form: AdForm,
    editing: Option<AdId>,
}

/// The pending stage of the one in-flight operation.
///
/// Stages advance strictly forward; starting a new operation replaces
/// whatever was pending. `PopupClosed` clears the flow outright, which is
/// what invalidates completions for an abandoned save.
#[derive(Debug)]
enum Flow {
    RefreshToken,
    RefreshIdentity,
    RefreshBook {
        username: String,
    },

    EditToken {
        id: AdId,
    },
    EditIdentity {
        id: AdId,
    },
    EditBook {
        id: AdId,
        username: String,
    },

    SaveToken {
        draft: Box<SaveDraft>,
    },
    SaveIdentity {
        draft: Box<SaveDraft>,
    },
    SaveFile {
        draft: Box<SaveDraft>,
        username: String,
    },
    SaveBook {
        draft: Box<SaveDraft>,
        username: String,
        image: Option<String>,
    },
    SaveWrite,

    DeleteConfirm {
        id: AdId,
    },
    DeleteToken {
        id: AdId,
    },
    DeleteIdentity {
        id: AdId,
    },
    DeleteBook {
        id: AdId,
        username: String,
    },
    DeleteWrite,
}

#[derive(Default)]
pub struct Model {
    /// Last listing loaded for the current user, in stored order.
    pub ads: Vec<AdRecord>,
    pub popup_open: bool,
    /// The edit session: the record id a pending save overwrites.
    pub editing: Option<AdId>,
    pub draft: AdForm,
    /// Blocking message for the shell; sticks until `AlertDismissed`.
    pub alert: Option<String>,
    flow: Option<Flow>,
}

/// One listing card with the display fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCard {
    pub id: AdId,
    pub name: String,
    pub year: String,
    pub color: String,
    pub description: String,
    pub image_src: String,
    pub seller: String,
    pub rating: u8,
}

impl AdCard {
    fn from_record(record: &AdRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            year: record.year.clone(),
            color: record.color.clone(),
            description: record.description.clone(),
            image_src: record
                .image
                .clone()
                .unwrap_or_else(|| DEFAULT_AD_IMAGE.to_string()),
            seller: if record.seller.trim().is_empty() {
                UNKNOWN_SELLER.to_string()
            } else {
                record.seller.clone()
            },
            rating: record.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub cards: Vec<AdCard>,
    pub empty_message: Option<String>,
    pub popup_open: bool,
    pub editing: Option<AdId>,
    pub draft: AdForm,
    pub alert: Option<String>,
}

#[derive(Default)]
pub struct App;

impl App {
    fn start_refresh(model: &mut Model, caps: &Capabilities) {
        model.flow = Some(Flow::RefreshToken);
        Self::fetch_token(caps);
    }

    fn fetch_token(caps: &Capabilities) {
        caps.kv.get(TOKEN_KEY.to_string(), Event::TokenFetched);
    }

    fn fetch_identity(token: &str, caps: &Capabilities) {
        caps.http
            .get(IDENTITY_URL)
            .header("Authorization", format!("Bearer {token}"))
            .expect_json()
            .send(|result| Event::IdentityFetched(Box::new(result)));
    }

    fn fetch_book(caps: &Capabilities) {
        caps.kv.get(ADS_KEY.to_string(), Event::BookFetched);
    }

    fn fail_operation(error: &ValidationError, model: &mut Model, caps: &Capabilities) {
        debug!(%error, "operation aborted");
        model.alert = Some(error.user_message().to_string());
        caps.render.render();
    }

    /// A failed login check renders an empty listing, no error surface.
    fn show_anonymous_listing(error: &AuthError, model: &mut Model, caps: &Capabilities) {
        debug!(%error, "identity unavailable, rendering empty listing");
        model.ads.clear();
        caps.render.render();
    }

    fn fail_edit_open(error: &impl std::fmt::Display, model: &mut Model, caps: &Capabilities) {
        debug!(%error, "edit target unavailable");
        model.alert = Some(ALERT_EDIT_NOT_FOUND.to_string());
        caps.render.render();
    }

    fn handle_save_requested(form: AdForm, model: &mut Model, caps: &Capabilities) {
        model.draft = form.clone();
        model.alert = None;

        let editing = model.editing;
        match form.validated(editing.is_none()) {
            Ok(form) => {
                model.flow = Some(Flow::SaveToken {
                    draft: Box::new(SaveDraft { form, editing }),
                });
                Self::fetch_token(caps);
            }
            Err(error) => {
                model.flow = None;
                Self::fail_operation(&error, model, caps);
            }
        }
    }

    fn handle_token(
        result: Result<Option<Vec<u8>>, KeyValueError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(flow) = model.flow.take() else {
            debug!("token arrived with no operation pending, dropping");
            return;
        };

        let token = match result {
            Ok(Some(bytes)) => String::from_utf8(bytes)
                .ok()
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
                .ok_or(AuthError::MissingToken),
            Ok(None) => Err(AuthError::MissingToken),
            Err(error) => {
                warn!(%error, "token read failed");
                Err(AuthError::MissingToken)
            }
        };

        match (flow, token) {
            (Flow::RefreshToken, Ok(token)) => {
                model.flow = Some(Flow::RefreshIdentity);
                Self::fetch_identity(&token, caps);
            }
            (Flow::RefreshToken, Err(error)) => {
                Self::show_anonymous_listing(&error, model, caps);
            }
            (Flow::EditToken { id }, Ok(token)) => {
                model.flow = Some(Flow::EditIdentity { id });
                Self::fetch_identity(&token, caps);
            }
            (Flow::EditToken { .. }, Err(error)) => Self::fail_edit_open(&error, model, caps),
            (Flow::SaveToken { draft }, Ok(token)) => {
                model.flow = Some(Flow::SaveIdentity { draft });
                Self::fetch_identity(&token, caps);
            }
            (Flow::SaveToken { .. }, Err(error)) => {
                debug!(%error, "identity unavailable for save");
                Self::fail_operation(&ValidationError::NoIdentity, model, caps);
            }
            (Flow::DeleteToken { id }, Ok(token)) => {
                model.flow = Some(Flow::DeleteIdentity { id });
                Self::fetch_identity(&token, caps);
            }
            (Flow::DeleteToken { .. }, Err(error)) => {
                debug!(%error, "identity unavailable for delete");
                Self::fail_operation(&ValidationError::NoIdentity, model, caps);
            }
            (flow, _) => {
                debug!(?flow, "stale token result, dropping");
                model.flow = Some(flow);
            }
        }
    }

    fn handle_identity(
        result: crux_http::Result<crux_http::Response<IdentityResponse>>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(flow) = model.flow.take() else {
            debug!("identity arrived with no operation pending, dropping");
            return;
        };

        let username = Self::username_from(result);

        match (flow, username) {
            (Flow::RefreshIdentity, Ok(username)) => {
                model.flow = Some(Flow::RefreshBook { username });
                Self::fetch_book(caps);
            }
            (Flow::RefreshIdentity, Err(error)) => {
                Self::show_anonymous_listing(&error, model, caps);
            }
            (Flow::EditIdentity { id }, Ok(username)) => {
                model.flow = Some(Flow::EditBook { id, username });
                Self::fetch_book(caps);
            }
            (Flow::EditIdentity { .. }, Err(error)) => Self::fail_edit_open(&error, model, caps),
            (Flow::SaveIdentity { draft }, Ok(username)) => {
                if draft.form.image_selected {
                    model.flow = Some(Flow::SaveFile { draft, username });
                    caps.file_select.read_selected(Event::FileRead);
                } else {
                    model.flow = Some(Flow::SaveBook {
                        draft,
                        username,
                        image: None,
                    });
                    Self::fetch_book(caps);
                }
            }
            (Flow::SaveIdentity { .. }, Err(error)) => {
                debug!(%error, "identity unavailable for save");
                Self::fail_operation(&ValidationError::NoIdentity, model, caps);
            }
            (Flow::DeleteIdentity { id }, Ok(username)) => {
                model.flow = Some(Flow::DeleteBook { id, username });
                Self::fetch_book(caps);
            }
            (Flow::DeleteIdentity { .. }, Err(error)) => {
                debug!(%error, "identity unavailable for delete");
                Self::fail_operation(&ValidationError::NoIdentity, model, caps);
            }
            (flow, _) => {
                debug!(?flow, "stale identity result, dropping");
                model.flow = Some(flow);
            }
        }
    }

    fn username_from(
        result: crux_http::Result<crux_http::Response<IdentityResponse>>,
    ) -> Result<String, AuthError> {
        match result {
            Ok(mut response) => {
                let status = response.status();
                if !status.is_success() {
                    return Err(AuthError::RequestFailed {
                        status: Some(status.into()),
                    });
                }
                response
                    .take_body()
                    .map(|body| body.username)
                    .ok_or_else(|| AuthError::RequestFailed {
                        status: Some(status.into()),
                    })
            }
            Err(error) => {
                debug!(%error, "identity request failed");
                Err(AuthError::RequestFailed { status: None })
            }
        }
    }

    fn handle_file_read(
        result: crate::capabilities::FileSelectResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(flow) = model.flow.take() else {
            debug!("file read arrived with no operation pending, dropping");
            return;
        };

        match flow {
            Flow::SaveFile { draft, username } => match result {
                Ok(file) => match image::to_data_uri(&file.bytes) {
                    Ok(uri) => {
                        model.flow = Some(Flow::SaveBook {
                            draft,
                            username,
                            image: Some(uri),
                        });
                        Self::fetch_book(caps);
                    }
                    Err(error) => {
                        warn!(%error, "image rejected");
                        model.alert = Some(error.user_message().to_string());
                        caps.render.render();
                    }
                },
                Err(error) => {
                    warn!(%error, "file read failed");
                    model.alert = Some(ALERT_IMAGE_UNREADABLE.to_string());
                    caps.render.render();
                }
            },
            flow => {
                debug!(?flow, "stale file read, dropping");
                model.flow = Some(flow);
            }
        }
    }

    fn handle_confirm(confirmed: bool, model: &mut Model, caps: &Capabilities) {
        let Some(flow) = model.flow.take() else {
            debug!("dialog answer arrived with no operation pending, dropping");
            return;
        };

        match flow {
            Flow::DeleteConfirm { id } if confirmed => {
                model.flow = Some(Flow::DeleteToken { id });
                Self::fetch_token(caps);
            }
            Flow::DeleteConfirm { id } => {
                // Declined: nothing changed, nothing to re-render.
                debug!(%id, "delete declined");
            }
            flow => {
                debug!(?flow, "stale dialog answer, dropping");
                model.flow = Some(flow);
            }
        }
    }

    fn handle_book(
        result: Result<Option<Vec<u8>>, KeyValueError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(flow) = model.flow.take() else {
            debug!("ad book arrived with no operation pending, dropping");
            return;
        };

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "ad book read failed, treating as empty");
                None
            }
        };
        let book = AdBook::decode(bytes.as_deref());

        match flow {
            Flow::RefreshBook { username } => {
                model.ads = book.list_for(&username).to_vec();
                caps.render.render();
            }
            Flow::EditBook { id, username } => {
                match book.list_for(&username).iter().find(|record| record.id == id) {
                    Some(record) => {
                        model.draft = AdForm::from_record(record);
                        model.editing = Some(id);
                        model.popup_open = true;
                    }
                    None => {
                        debug!(%id, "edit target missing");
                        model.alert = Some(ALERT_EDIT_NOT_FOUND.to_string());
                    }
                }
                caps.render.render();
            }
            Flow::SaveBook {
                draft,
                username,
                image,
            } => Self::apply_save(*draft, username, image, book, model, caps),
            Flow::DeleteBook { id, username } => {
                let mut book = book;
                book.remove(&username, id);
                Self::write_book(&book, Flow::DeleteWrite, model, caps);
            }
            flow => {
                debug!(?flow, "stale book read, dropping");
                model.flow = Some(flow);
            }
        }
    }

    /// The synchronous read-modify-write section of a save, entered with the
    /// freshly decoded book.
    fn apply_save(
        draft: SaveDraft,
        username: String,
        image: Option<String>,
        mut book: AdBook,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let record = match draft.editing {
            Some(id) => {
                let current = book
                    .list_for(&username)
                    .iter()
                    .find(|record| record.id == id)
                    .cloned();
                let Some(current) = current else {
                    Self::fail_operation(&ValidationError::NotFound { id }, model, caps);
                    return;
                };
                AdRecord {
                    id,
                    name: draft.form.title,
                    year: draft.form.year,
                    color: draft.form.color,
                    description: draft.form.description,
                    // No new file picked means the stored image stays.
                    image: image.or(current.image),
                    seller: current.seller,
                    rating: current.rating,
                }
            }
            None => AdRecord {
                id: AdId::next(UnixMillis::now(), book.list_for(&username)),
                name: draft.form.title,
                year: draft.form.year,
                color: draft.form.color,
                description: draft.form.description,
                image,
                seller: username.clone(),
                rating: DEFAULT_RATING,
            },
        };

        book.upsert(&username, record);
        Self::write_book(&book, Flow::SaveWrite, model, caps);
    }

    fn write_book(book: &AdBook, next: Flow, model: &mut Model, caps: &Capabilities) {
        match book.encode() {
            Ok(bytes) => {
                model.flow = Some(next);
                caps.kv.set(ADS_KEY.to_string(), bytes, Event::BookWritten);
            }
            Err(error) => {
                warn!(%error, "ad book encode failed");
                model.alert = Some(ALERT_STORE_FAILED.to_string());
                caps.render.render();
            }
        }
    }

    fn handle_written(
        result: Result<Option<Vec<u8>>, KeyValueError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let Some(flow) = model.flow.take() else {
            debug!("write ack arrived with no operation pending, dropping");
            return;
        };

        match (flow, result) {
            (Flow::SaveWrite, Ok(_)) => {
                model.popup_open = false;
                model.editing = None;
                model.draft = AdForm::default();
                caps.render.render();
                Self::start_refresh(model, caps);
            }
            (Flow::DeleteWrite, Ok(_)) => Self::start_refresh(model, caps),
            (Flow::SaveWrite | Flow::DeleteWrite, Err(error)) => {
                warn!(%error, "ad book write failed");
                model.alert = Some(ALERT_STORE_FAILED.to_string());
                caps.render.render();
            }
            (flow, _) => {
                debug!(?flow, "stale write ack, dropping");
                model.flow = Some(flow);
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Self::Event, model: &mut Self::Model, caps: &Self::Capabilities) {
        match event {
            Event::Started => {
                model.popup_open = false;
                model.editing = None;
                model.draft = AdForm::default();
                model.alert = None;
                Self::start_refresh(model, caps);
            }
            Event::NewAdRequested => {
                model.draft = AdForm::default();
                model.editing = None;
                model.popup_open = true;
                model.alert = None;
                caps.render.render();
            }
            Event::EditRequested { id } => {
                model.alert = None;
                model.flow = Some(Flow::EditToken { id });
                Self::fetch_token(caps);
            }
            Event::DeleteRequested { id } => {
                model.alert = None;
                model.flow = Some(Flow::DeleteConfirm { id });
                caps.dialog
                    .confirm(CONFIRM_DELETE_PROMPT, Event::ConfirmAnswered);
            }
            Event::SaveRequested(form) => Self::handle_save_requested(*form, model, caps),
            Event::PopupClosed => {
                model.popup_open = false;
                model.editing = None;
                model.draft = AdForm::default();
                // Abandons any in-flight save; its completions become stale.
                model.flow = None;
                caps.render.render();
            }
            Event::AlertDismissed => {
                model.alert = None;
                caps.render.render();
            }
            Event::TokenFetched(result) => Self::handle_token(result, model, caps),
            Event::IdentityFetched(result) => Self::handle_identity(*result, model, caps),
            Event::FileRead(result) => Self::handle_file_read(result, model, caps),
            Event::ConfirmAnswered(confirmed) => Self::handle_confirm(confirmed, model, caps),
            Event::BookFetched(result) => Self::handle_book(result, model, caps),
            Event::BookWritten(result) => Self::handle_written(result, model, caps),
        }
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        let cards: Vec<AdCard> = model.ads.iter().map(AdCard::from_record).collect();
        ViewModel {
            empty_message: cards
                .is_empty()
                .then(|| NO_ADS_PLACEHOLDER.to_string()),
            cards,
            popup_open: model.popup_open,
            editing: model.editing,
            draft: model.draft.clone(),
            alert: model.alert.clone(),
        }
    }
}
