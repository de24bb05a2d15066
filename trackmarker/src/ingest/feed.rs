//! Line sources for the ingest pipeline.
//!
//! A feed reads `"<topic> <payload>"` lines and forwards them on an mpsc
//! channel. Two sources exist: standard input, which ends at EOF, and a TCP
//! connection that is re-established with exponential backoff.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::backoff::{ReconnectPolicy, ReconnectState};
use super::error::IngestError;

/// Why a reader stopped forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForwardEnd {
    Eof,
    Cancelled,
    ReceiverClosed,
}

/// Forward lines from `reader` until EOF, cancellation or a closed receiver.
async fn forward_lines<R>(
    reader: R,
    tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
) -> Result<ForwardEnd, std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;

            _ = cancel.cancelled() => return Ok(ForwardEnd::Cancelled),

            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            return Ok(ForwardEnd::Eof);
        };
        if tx.send(line).await.is_err() {
            return Ok(ForwardEnd::ReceiverClosed);
        }
    }
}

/// A TCP line feed with reconnect.
#[derive(Debug, Clone)]
pub struct TcpFeed {
    address: String,
    policy: ReconnectPolicy,
}

impl TcpFeed {
    pub fn new(address: impl Into<String>) -> Self {
        Self::with_policy(address, ReconnectPolicy::default())
    }

    pub fn with_policy(address: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            address: address.into(),
            policy,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Read until cancelled or the receiver goes away.
    ///
    /// # Errors
    ///
    /// `IngestError::ReconnectExhausted` once the policy's attempts are used
    /// up without a connection.
    pub async fn run(
        self,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<(), IngestError> {
        let mut state = ReconnectState::Disconnected;

        loop {
            if let Some(delay) = state.delay() {
                tracing::info!(address = %self.address, delay_secs = delay.as_secs_f64(), "Reconnecting after delay");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(()),
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let connected = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                result = TcpStream::connect(&self.address) => result,
            };

            let stream = match connected {
                Ok(stream) => stream,
                Err(source) => {
                    let error = IngestError::Connect {
                        address: self.address.clone(),
                        source,
                    };
                    tracing::warn!(error = %error, "Feed connection attempt failed");

                    let attempts = match state {
                        ReconnectState::Backoff { attempt, .. } => attempt,
                        _ => 0,
                    };
                    state = state.on_attempt_failed(&self.policy);
                    if state.is_gave_up() {
                        tracing::error!(address = %self.address, attempts, "Giving up on fix feed");
                        return Err(IngestError::ReconnectExhausted {
                            address: self.address,
                            attempts,
                        });
                    }
                    continue;
                }
            };

            state = state.on_connected();
            tracing::info!(address = %self.address, "Fix feed connected");

            match forward_lines(BufReader::new(stream), &tx, &cancel).await {
                Ok(ForwardEnd::Cancelled) | Ok(ForwardEnd::ReceiverClosed) => return Ok(()),
                Ok(ForwardEnd::Eof) => {
                    tracing::warn!(address = %self.address, "Fix feed closed by peer");
                }
                Err(e) => {
                    tracing::warn!(address = %self.address, error = %IngestError::Read(e), "Fix feed read failed");
                }
            }

            state = state.on_disconnected(&self.policy);
        }
    }
}

/// Where fixes come from.
#[derive(Debug, Clone)]
pub enum FixFeed {
    Stdin,
    Tcp(TcpFeed),
}

impl FixFeed {
    /// Spawn the feed task, forwarding lines to `tx`.
    pub fn spawn(
        self,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<(), IngestError>> {
        match self {
            Self::Stdin => tokio::spawn(async move {
                tracing::info!("Reading fixes from stdin");
                let end = forward_lines(BufReader::new(tokio::io::stdin()), &tx, &cancel).await?;
                tracing::info!(?end, "Stdin feed finished");
                Ok(())
            }),
            Self::Tcp(feed) => tokio::spawn(feed.run(tx, cancel)),
        }
    }
}
