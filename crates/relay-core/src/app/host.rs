//! Host - command を実行し、結果を正規化して返す側
//!
//! # フロー
//! 1. `Invoker` から `Envelope` を受信
//! 2. DispatchStrategy で handler キーを解決し、registry から handler を取得
//! 3. handler を独立した tokio タスクで実行（panic もここで捕まえる）
//! 4. 結果を `CommandOutcome` に正規化し、bytes にして応答チャネルへ

use std::any::Any;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::invoker::{Envelope, Invoker};
use crate::domain::{CommandOutcome, CommandRequest, FailureDescriptor, FailureKind, RenderOptions};
use crate::ports::{Clock, DispatchStrategy, UlidGenerator};
use crate::typed::{CommandRegistry, PayloadCodec};

/// Executes requests against an immutable registry.
///
/// Cloning shares the registry; each request is handled independently.
#[derive(Clone)]
pub struct Host {
    registry: Arc<CommandRegistry>,
    dispatch: Arc<dyn DispatchStrategy>,
    clock: Arc<dyn Clock>,
    render: RenderOptions,
    channel_capacity: usize,
}

impl Host {
    pub(crate) fn new(
        registry: CommandRegistry,
        dispatch: Arc<dyn DispatchStrategy>,
        clock: Arc<dyn Clock>,
        render: RenderOptions,
        channel_capacity: usize,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            dispatch,
            clock,
            render,
            channel_capacity,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Runs one request to completion. Never panics, never hangs on a
    /// panicking handler.
    pub async fn execute(&self, request: &CommandRequest) -> CommandOutcome {
        let span = info_span!(
            "invocation",
            invocation_id = %request.id(),
            command = %request.name(),
        );
        self.execute_inner(request).instrument(span).await
    }

    async fn execute_inner(&self, request: &CommandRequest) -> CommandOutcome {
        let key = match self.dispatch.select_handler(request.name()) {
            Ok(key) => key,
            Err(failure) => {
                warn!(kind = %failure.kind, "dispatch rejected command");
                return CommandOutcome::failure(failure);
            }
        };

        let Some(handler) = self.registry.get(&key) else {
            warn!("unrecognized command");
            return CommandOutcome::failure(FailureDescriptor::unrecognized_command(request.name()));
        };

        let payload = request.arguments().cloned();
        let joined = tokio::spawn(async move { handler.handle_dyn(payload).await }.in_current_span()).await;

        let outcome = match joined {
            Ok(Ok(value)) => CommandOutcome::success(value),
            Ok(Err(err)) => CommandOutcome::failure(err.describe(self.render)),
            Err(join_err) => CommandOutcome::failure(describe_join_error(join_err)),
        };

        match &outcome {
            CommandOutcome::Success { .. } => debug!("command succeeded"),
            CommandOutcome::Failure { error } => {
                warn!(kind = %error.kind, message = %error.message, "command failed")
            }
        }
        outcome
    }

    /// Starts the host loop on the current tokio runtime.
    ///
    /// The loop stops when [`HostHandle::request_shutdown`] is called, when
    /// the handle is dropped, or when every [`Invoker`] clone is gone.
    pub fn spawn(self) -> (Invoker, HostHandle) {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let ids = Arc::new(UlidGenerator::new(Arc::clone(&self.clock)));
        let invoker = Invoker::new(tx, ids, Arc::clone(&self.clock));

        let join = tokio::spawn(host_loop(self, rx, shutdown_rx));
        (invoker, HostHandle { shutdown_tx, join })
    }

    async fn answer(&self, envelope: Envelope) {
        let Envelope { request, reply } = envelope;
        let outcome = self.execute(&request).await;

        let bytes = PayloadCodec::encode_outcome(&outcome).or_else(|err| {
            warn!(invocation_id = %request.id(), error = %err, "outcome could not be encoded");
            PayloadCodec::encode_outcome(&CommandOutcome::failure(err.into()))
        });

        match bytes {
            Ok(bytes) => {
                if reply.send(bytes).is_err() {
                    debug!(invocation_id = %request.id(), "caller went away before the outcome arrived");
                }
            }
            // Dropping `reply` resolves the caller as HostUnavailable.
            Err(err) => {
                error!(invocation_id = %request.id(), error = %err, "failure outcome could not be encoded");
            }
        }
    }
}

/// Handle to a spawned host loop.
#[must_use = "dropping the handle stops the command host"]
pub struct HostHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl HostHandle {
    /// Stops accepting requests. In-flight requests still get their answer.
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(err) = self.join.await {
            warn!(error = %err, "command host loop ended abnormally");
        }
    }
}

async fn host_loop(
    host: Host,
    mut rx: mpsc::Receiver<Envelope>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(commands = host.registry.len(), "command host started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let envelope = tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped: the handle is gone, stop serving
                if changed.is_err() {
                    break;
                }
                continue;
            }
            envelope = rx.recv() => envelope,
        };

        let Some(envelope) = envelope else {
            // every Invoker is gone
            break;
        };

        let host = host.clone();
        tokio::spawn(async move { host.answer(envelope).await });
    }
    info!("command host stopped");
}

fn describe_join_error(err: JoinError) -> FailureDescriptor {
    if err.is_panic() {
        let message = panic_message(err.into_panic());
        warn!(panic = %message, "command handler panicked");
        FailureDescriptor::new(FailureKind::Thrown, format!("command panicked: {message}"))
    } else {
        FailureDescriptor::new(FailureKind::Thrown, "command task was cancelled")
    }
}

fn panic_message(payload: Box<dyn Any + Send + 'static>) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}
