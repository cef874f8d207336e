//! Line-delimited JSON-RPC session over stdin/stdout.
//!
//! One JSON request per input line, one compact JSON response per output
//! line, flushed immediately. Requests are served strictly in arrival
//! order. Stdout carries nothing else; diagnostics go to the log.

use super::core::McpCore;
use crate::supervisor::{BackendSupervisor, Launcher};
use crate::types::{DispatchError, JsonRpcResponse, Request};
use jdbc_bridge_api::BackendApi;
use std::future::Future;
use std::io;
use std::pin::pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Phase of a stdio session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingReady,
    Serving,
    Draining,
    Terminated,
}

/// Why the serving loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainReason {
    EndOfInput,
    Interrupted,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Requests were served until input ended or a shutdown signal arrived.
    Drained(DrainReason),
    /// The backend never became ready; no request was served.
    BackendUnavailable,
}

impl SessionOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> u8 {
        match self {
            SessionOutcome::Drained(_) => 0,
            SessionOutcome::BackendUnavailable => 1,
        }
    }
}

/// Classification of one raw input line.
#[derive(Debug)]
pub enum ParsedLine {
    Blank,
    Malformed(String),
    Request(Request),
}

/// Decode one input line. Anything unparseable is reported, never fatal.
pub fn parse_line(raw: &[u8]) -> ParsedLine {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text.trim(),
        Err(error) => return ParsedLine::Malformed(error.to_string()),
    };
    if text.is_empty() {
        return ParsedLine::Blank;
    }
    match serde_json::from_str::<Request>(text) {
        Ok(request) => ParsedLine::Request(request),
        Err(error) => ParsedLine::Malformed(error.to_string()),
    }
}

/// Drives the AwaitingReady → Serving → Draining → Terminated sequence.
#[derive(Debug)]
pub struct StdioSession<B: ?Sized, L: Launcher> {
    supervisor: BackendSupervisor<B, L>,
    core: McpCore<B>,
    state: SessionState,
}

impl<B, L> StdioSession<B, L>
where
    B: BackendApi + ?Sized,
    L: Launcher,
{
    pub fn new(supervisor: BackendSupervisor<B, L>, core: McpCore<B>) -> Self {
        Self {
            supervisor,
            core,
            state: SessionState::AwaitingReady,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to completion.
    ///
    /// `shutdown` is raced against the readiness wait and against every
    /// line read. Whatever the outcome, a backend this session launched is
    /// released before returning.
    pub async fn run<R, W, S>(&mut self, reader: R, writer: &mut W, shutdown: S) -> io::Result<SessionOutcome>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let mut shutdown = pin!(shutdown);

        self.transition(SessionState::AwaitingReady);
        let readiness = tokio::select! {
            biased;
            _ = &mut shutdown => None,
            readiness = self.supervisor.ensure_backend_ready() => Some(readiness),
        };
        match readiness {
            None => {
                info!("shutdown requested while waiting for the backend");
                self.drain().await;
                return Ok(SessionOutcome::Drained(DrainReason::Interrupted));
            }
            Some(Err(error)) => {
                warn!(%error, "backend unavailable; not serving requests");
                let notice = JsonRpcResponse::failure(
                    None,
                    &DispatchError::Internal(format!("Backend service could not be started: {error}")),
                );
                let written = write_response(writer, &notice).await;
                self.supervisor.release_backend().await;
                self.transition(SessionState::Terminated);
                written?;
                return Ok(SessionOutcome::BackendUnavailable);
            }
            Some(Ok(readiness)) => debug!(?readiness, "backend ready"),
        }

        self.transition(SessionState::Serving);
        let served = self.serve(reader, writer, &mut shutdown).await;
        self.drain().await;

        let reason = served?;
        info!(?reason, "session drained");
        Ok(SessionOutcome::Drained(reason))
    }

    async fn serve<R, W, S>(&mut self, mut reader: R, writer: &mut W, mut shutdown: S) -> io::Result<DrainReason>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()> + Unpin,
    {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            let read = tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(DrainReason::Interrupted),
                read = reader.read_until(b'\n', &mut buffer) => read?,
            };
            if read == 0 {
                return Ok(DrainReason::EndOfInput);
            }

            match parse_line(&buffer) {
                ParsedLine::Blank => {}
                ParsedLine::Malformed(reason) => debug!(%reason, "skipping malformed input line"),
                ParsedLine::Request(request) => {
                    if let Some(response) = self.core.handle_request(request).await {
                        write_response(writer, &response).await?;
                    }
                }
            }
        }
    }

    async fn drain(&mut self) {
        self.transition(SessionState::Draining);
        self.supervisor.release_backend().await;
        self.transition(SessionState::Terminated);
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = response.to_line().map_err(io::Error::other)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

/// Resolves on Ctrl-C, or SIGINT/SIGTERM on unix.
///
/// On unix the listeners are registered when this is called, not when the
/// future is first polled, so it must be called from within the runtime.
pub fn shutdown_signal() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let listeners = {
        use tokio::signal::unix::{SignalKind, signal};
        (signal(SignalKind::interrupt()), signal(SignalKind::terminate()))
    };

    async move {
        #[cfg(unix)]
        {
            let (interrupt, terminate) = listeners;
            tokio::select! {
                _ = next_signal(interrupt, "SIGINT") => debug!("received SIGINT"),
                _ = next_signal(terminate, "SIGTERM") => debug!("received SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            debug!("received ctrl-c");
        }
    }
}

#[cfg(unix)]
async fn next_signal(listener: io::Result<tokio::signal::unix::Signal>, name: &'static str) {
    match listener {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            warn!(%error, signal = name, "failed to install signal listener");
            std::future::pending::<()>().await;
        }
    }
}
