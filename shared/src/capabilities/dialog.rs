//! Blocking confirmation dialog, answered by the shell.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogOperation {
    /// Show a yes/no prompt; the output is the user's answer.
    Confirm { message: String },
}

impl Operation for DialogOperation {
    type Output = bool;
}

pub struct Dialog<Ev> {
    context: CapabilityContext<DialogOperation, Ev>,
}

impl<Ev> Capability<Ev> for Dialog<Ev> {
    type Operation = DialogOperation;
    type MappedSelf<MappedEv> = Dialog<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Dialog::new(self.context.map_event(f))
    }
}

impl<Ev> Dialog<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<DialogOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn confirm<F>(&self, message: impl Into<String>, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let message = message.into();
        self.context.spawn({
            let context = self.context.clone();
            async move {
                let confirmed = context
                    .request_from_shell(DialogOperation::Confirm { message })
                    .await;
                context.update_app(make_event(confirmed));
            }
        });
    }
}
