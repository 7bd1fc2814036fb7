mod dialog;
mod file_select;

pub use self::dialog::{Dialog, DialogOperation};
pub use self::file_select::{
    FileSelect, FileSelectError, FileSelectOperation, FileSelectResult, SelectedFile,
};

// Crux's built-in Render capability covers view updates as-is; http and kv
// come straight from the crux companion crates.
pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppKv = KeyValue<Event>;
pub type AppRender = Render<Event>;
pub type AppFileSelect = FileSelect<Event>;
pub type AppDialog = Dialog<Event>;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub file_select: FileSelect<Event>,
    pub dialog: Dialog<Event>,
}
