//! Capability for reading the form's selected image file.
//!
//! The shell owns the file input; the core only ever sees the picked
//! file's bytes, and only when a save flow asks for them.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileSelectOperation {
    /// Read the bytes of the image file currently picked in the form.
    ReadSelected,
}

/// The picked file, as delivered by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FileSelectError {
    #[error("no file is selected")]
    NoFileSelected,

    #[error("file read failed: {message}")]
    ReadFailed { message: String },
}

pub type FileSelectResult = Result<SelectedFile, FileSelectError>;

impl Operation for FileSelectOperation {
    type Output = FileSelectResult;
}

pub struct FileSelect<Ev> {
    context: CapabilityContext<FileSelectOperation, Ev>,
}

impl<Ev> Capability<Ev> for FileSelect<Ev> {
    type Operation = FileSelectOperation;
    type MappedSelf<MappedEv> = FileSelect<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        FileSelect::new(self.context.map_event(f))
    }
}

impl<Ev> FileSelect<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<FileSelectOperation, Ev>) -> Self {
        Self { context }
    }

    /// Asks the shell for the currently selected file's bytes.
    pub fn read_selected<F>(&self, make_event: F)
    where
        F: FnOnce(FileSelectResult) -> Ev + Send + 'static,
    {
        self.context.spawn({
            let context = self.context.clone();
            async move {
                let result = context
                    .request_from_shell(FileSelectOperation::ReadSelected)
                    .await;
                context.update_app(make_event(result));
            }
        });
    }
}
