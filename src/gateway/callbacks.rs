//! Serial callback context.
//!
//! Every caller-supplied completion callback of a gateway runs on one Tokio
//! task, one at a time, in the order completions are posted. Callers can
//! therefore update shared state from callbacks without their own locking.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::{RequestCallback, RequestResult};
use crate::request::GatewayId;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub(crate) struct CallbackContext {
    sender: mpsc::UnboundedSender<Job>,
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

impl CallbackContext {
    /// Starts the callback task on `runtime`.
    ///
    /// The task ends once every sender is gone: the gateway and all wrapped
    /// callbacks still waiting to be invoked.
    pub(crate) fn spawn(runtime: &Handle, gateway: GatewayId) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        runtime.spawn(async move {
            while let Some(job) = receiver.recv().await {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                    log::warn!(
                        "{}: completion callback panicked: {}",
                        gateway,
                        panic_message(payload.as_ref())
                    );
                }
            }
            log::debug!("{}: callback context closed", gateway);
        });
        CallbackContext { sender }
    }

    /// Wraps `callback` so that invoking it posts the call to this context.
    pub(crate) fn wrap(&self, callback: RequestCallback) -> RequestCallback {
        let sender = self.sender.clone();
        Box::new(move |result: RequestResult| {
            let job: Job = Box::new(move || callback(result));
            if sender.send(job).is_err() {
                log::warn!("Callback context has shut down; dropping completion callback");
            }
        })
    }
}
