//! Invoker - caller 側の入口
//!
//! `invoke` は request を host に送り、応答を一度だけ待ちます。
//! host 側でどう失敗しても、caller に届くのは `Err(FailureDescriptor)` です。

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::domain::{
    CommandName, CommandOutcome, CommandRequest, FailureDescriptor, InvocationId, InvocationState,
};
use crate::ports::{Clock, IdGenerator};
use crate::typed::{Command, PayloadCodec};

/// A request on its way to the host, with the channel its answer goes back on.
pub(crate) struct Envelope {
    pub(crate) request: CommandRequest,
    pub(crate) reply: oneshot::Sender<Vec<u8>>,
}

/// Caller-side handle to a running host. Cheap to clone.
#[derive(Clone)]
pub struct Invoker {
    tx: mpsc::Sender<Envelope>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Invoker {
    pub(crate) fn new(
        tx: mpsc::Sender<Envelope>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { tx, ids, clock }
    }

    /// Builds a request with a fresh id and the current time.
    pub fn request(&self, name: impl Into<CommandName>, arguments: Option<Value>) -> CommandRequest {
        CommandRequest::new(
            self.ids.generate_invocation_id(),
            name,
            arguments,
            self.clock.now(),
        )
    }

    /// Sends `request` to the host.
    ///
    /// Waits only for channel capacity, not for the outcome; await
    /// [`InvocationHandle::resolve`] for that.
    pub async fn dispatch(&self, request: CommandRequest) -> InvocationHandle {
        let id = request.id();
        let name = request.name().clone();
        let (reply, receiver) = oneshot::channel();

        debug!(invocation_id = %id, command = %name, "dispatching command");
        let receiver = match self.tx.send(Envelope { request, reply }).await {
            Ok(()) => Some(receiver),
            Err(_) => {
                debug!(invocation_id = %id, "command host is not accepting requests");
                None
            }
        };

        InvocationHandle { id, name, receiver }
    }

    pub async fn invoke(
        &self,
        name: impl Into<CommandName>,
        arguments: Option<Value>,
    ) -> Result<Value, FailureDescriptor> {
        let request = self.request(name, arguments);
        self.dispatch(request).await.resolve().await
    }

    /// Typed `invoke`: encodes `C::Args` and decodes `C::Output`.
    pub async fn invoke_command<C: Command>(
        &self,
        args: &C::Args,
    ) -> Result<C::Output, FailureDescriptor> {
        let arguments = PayloadCodec::encode_args::<C>(args)?;
        let value = self.invoke(C::NAME, arguments).await?;
        Ok(PayloadCodec::decode_output::<C>(value)?)
    }
}

/// One in-flight request.
///
/// Resolving consumes the handle, so an outcome is delivered at most once.
#[must_use = "an invocation handle does nothing unless resolved"]
#[derive(Debug)]
pub struct InvocationHandle {
    id: InvocationId,
    name: CommandName,
    receiver: Option<oneshot::Receiver<Vec<u8>>>,
}

impl InvocationHandle {
    pub fn id(&self) -> InvocationId {
        self.id
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    /// Always `Pending`: a handle only exists until it is resolved, and the
    /// terminal state is read from the outcome (`CommandOutcome::state`).
    pub fn state(&self) -> InvocationState {
        InvocationState::Pending
    }

    /// Waits for the host and returns the outcome as delivered.
    pub async fn outcome(self) -> CommandOutcome {
        let Some(receiver) = self.receiver else {
            return CommandOutcome::failure(FailureDescriptor::host_unavailable(
                "command host is not accepting requests",
            ));
        };

        let outcome = match receiver.await {
            Ok(bytes) => match PayloadCodec::decode_outcome(&bytes) {
                Ok(outcome) => outcome,
                Err(err) => CommandOutcome::failure(err.into()),
            },
            Err(_) => CommandOutcome::failure(FailureDescriptor::host_unavailable(
                "command host dropped the request without answering",
            )),
        };

        debug!(
            invocation_id = %self.id,
            command = %self.name,
            state = ?outcome.state(),
            "invocation resolved"
        );
        outcome
    }

    pub async fn resolve(self) -> Result<Value, FailureDescriptor> {
        self.outcome().await.into_result()
    }
}
