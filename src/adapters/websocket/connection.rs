//! One live socket: an inbound pump and an outbound pump.
//!
//! The inbound pump decodes client posts and hands them to the hub. The
//! outbound pump drains the connection's queue onto the socket and keeps
//! the peer alive with pings. The hub owns the queue's sender, so it is
//! the hub that decides when the outbound pump stops.

use std::fmt::Display;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::chat::{ChatAuthor, ChatError};
use crate::domain::foundation::ConnectionId;

use super::hub::{ConnectionHandle, HubHandle};
use super::messages::{Frame, SendMessageRequest};

/// Separator placed between frames written together in one burst.
const FRAME_DELIMITER: char = '\n';

/// Timing and buffering of a connection's pumps.
#[derive(Debug, Clone, Copy)]
pub struct PumpSettings {
    /// Idle time allowed without a pong before the peer is dropped.
    pub pong_wait: Duration,
    /// How often a ping is sent. Shorter than `pong_wait`.
    pub ping_period: Duration,
    /// Upper bound on a single socket write.
    pub write_wait: Duration,
    /// Frames a connection may have queued before the hub drops it.
    pub outbound_capacity: usize,
}

impl PumpSettings {
    pub fn new(pong_wait: Duration, write_wait: Duration, outbound_capacity: usize) -> Self {
        Self {
            pong_wait,
            ping_period: pong_wait * 9 / 10,
            write_wait,
            outbound_capacity: outbound_capacity.max(1),
        }
    }
}

impl Default for PumpSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Duration::from_secs(10), 256)
    }
}

#[derive(Debug, Error)]
enum WriteError {
    #[error("write timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// An authenticated participant about to be attached to the hub.
pub struct Connection {
    id: ConnectionId,
    author: ChatAuthor,
    hub: HubHandle,
    settings: PumpSettings,
}

impl Connection {
    pub fn new(author: ChatAuthor, hub: HubHandle, settings: PumpSettings) -> Self {
        Self {
            id: ConnectionId::new(),
            author,
            hub,
            settings,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Register with the hub and run both pumps until the connection ends.
    ///
    /// Returns once both pumps have stopped and the hub has been told to
    /// forget this connection.
    pub async fn serve<W, R, E>(self, sink: W, stream: R)
    where
        W: Sink<Message> + Unpin + Send + 'static,
        W::Error: Display + Send,
        R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
        E: Display + Send + 'static,
    {
        let (outbound_tx, outbound_rx) = mpsc::channel(self.settings.outbound_capacity);
        let handle = ConnectionHandle::new(self.id, self.author.clone(), outbound_tx);

        if let Err(e) = self.hub.register(handle).await {
            tracing::error!(connection_id = %self.id, "Failed to register connection: {}", e);
            return;
        }

        let (stop_tx, stop_rx) = oneshot::channel();

        let mut write_task = tokio::spawn(write_pump(self.id, sink, outbound_rx, self.settings));
        let mut read_task = tokio::spawn(read_pump(
            self.id,
            self.author,
            self.hub,
            stream,
            self.settings.pong_wait,
            stop_rx,
        ));

        // Whichever side ends first, wait for the other so the connection is
        // fully torn down before returning. The inbound pump unregisters on
        // exit, which closes the queue and ends the outbound pump.
        tokio::select! {
            _ = &mut read_task => {
                let _ = (&mut write_task).await;
            }
            _ = &mut write_task => {
                let _ = stop_tx.send(());
                let _ = (&mut read_task).await;
            }
        }
    }
}

/// Read client frames until the peer leaves, goes quiet, or errors.
async fn read_pump<R, E>(
    id: ConnectionId,
    author: ChatAuthor,
    hub: HubHandle,
    mut stream: R,
    pong_wait: Duration,
    mut stop: oneshot::Receiver<()>,
) where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut deadline = Instant::now() + pong_wait;

    loop {
        let next = tokio::select! {
            _ = &mut stop => break,
            next = time::timeout_at(deadline, stream.next()) => next,
        };

        let message = match next {
            Err(_) => {
                tracing::debug!(connection_id = %id, "No pong within deadline, closing");
                break;
            }
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                tracing::debug!(connection_id = %id, "Receive error: {}", e);
                break;
            }
            Ok(Some(Ok(message))) => message,
        };

        match message {
            Message::Text(text) => {
                if !post(&hub, &author, id, text.as_bytes()).await {
                    break;
                }
            }
            Message::Binary(bytes) => {
                if !post(&hub, &author, id, &bytes).await {
                    break;
                }
            }
            Message::Pong(_) => {
                deadline = Instant::now() + pong_wait;
            }
            // Answered by the transport.
            Message::Ping(_) => {}
            Message::Close(_) => {
                tracing::debug!(connection_id = %id, "Client sent close frame");
                break;
            }
        }
    }

    if let Err(e) = hub.unregister(id).await {
        tracing::debug!(connection_id = %id, "Unregister skipped: {}", e);
    }
}

/// Decode and post one client frame. Returns `false` when the hub is gone
/// and reading should stop.
async fn post(hub: &HubHandle, author: &ChatAuthor, id: ConnectionId, raw: &[u8]) -> bool {
    let body = match SendMessageRequest::decode(raw) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(connection_id = %id, user_id = %author.user_id, "Skipping frame: {}", e);
            return true;
        }
    };

    match hub.post_message(author, &body).await {
        Ok(_) => true,
        Err(ChatError::HubUnavailable) => false,
        Err(e) => {
            tracing::warn!(connection_id = %id, user_id = %author.user_id, "{}", e);
            true
        }
    }
}

/// Drain the outbound queue onto the socket and send pings on a timer.
async fn write_pump<W>(
    id: ConnectionId,
    mut sink: W,
    mut outbound: mpsc::Receiver<Frame>,
    settings: PumpSettings,
) where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    let mut ping = time::interval_at(Instant::now() + settings.ping_period, settings.ping_period);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let result = tokio::select! {
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    let text = coalesce(frame, &mut outbound, settings.outbound_capacity);
                    write(&mut sink, Message::Text(text), settings.write_wait).await
                }
                None => {
                    let _ = write(&mut sink, Message::Close(None), settings.write_wait).await;
                    break;
                }
            },
            _ = ping.tick() => write(&mut sink, Message::Ping(Vec::new()), settings.write_wait).await,
        };

        if let Err(e) = result {
            tracing::debug!(connection_id = %id, "Write failed, closing: {}", e);
            break;
        }
    }

    if let Ok(Err(e)) = time::timeout(settings.write_wait, sink.close()).await {
        tracing::trace!(connection_id = %id, "Close failed: {}", e);
    }
}

/// Join `first` with whatever else is already queued, up to `limit` frames.
fn coalesce(first: Frame, outbound: &mut mpsc::Receiver<Frame>, limit: usize) -> String {
    let mut text = String::from(&*first);
    for _ in 1..limit {
        match outbound.try_recv() {
            Ok(next) => {
                text.push(FRAME_DELIMITER);
                text.push_str(&next);
            }
            Err(_) => break,
        }
    }
    text
}

async fn write<W>(sink: &mut W, message: Message, wait: Duration) -> Result<(), WriteError>
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    match time::timeout(wait, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WriteError::Transport(e.to_string())),
        Err(_) => Err(WriteError::Timeout),
    }
}
