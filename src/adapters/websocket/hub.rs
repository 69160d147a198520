//! Chat hub: the single authority over live connections and fan-out.
//!
//! All membership changes go through one task reading three channels
//! (register, unregister, broadcast), so the member map is never shared
//! between tasks. Posting is the only path that touches storage and it is
//! serialized by a separate lock so that persistence order equals
//! broadcast order.
//!
//! ```text
//!   inbound pumps ──post_message──► [persist lock] ──► repository.append
//!                                          │
//!                                          ▼
//!   bootstrap ──register──►  ┌──────────────────────┐
//!   pumps ────unregister──►  │   Hub::run (1 task)  │──try_send──► outbound queues
//!   post ─────broadcast───►  └──────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;

use crate::application::{GetChatHistoryHandler, GetChatHistoryQuery};
use crate::domain::chat::{ChatAuthor, ChatError, ChatMessage, MessageBody};
use crate::domain::foundation::{ConnectionId, UserId};
use crate::ports::ChatMessageRepository;

use super::messages::{Frame, WireMessage};

/// Tuning knobs for the hub.
#[derive(Debug, Clone, Copy)]
pub struct HubSettings {
    /// How many messages a newly joined connection is replayed.
    pub join_history_limit: u32,
    /// Buffer size of each of the three hub input channels.
    pub channel_capacity: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            join_history_limit: 50,
            channel_capacity: 256,
        }
    }
}

/// The hub's view of a connection: who it is and where its frames go.
///
/// The hub is the only holder of `outbound`; dropping the handle closes the
/// connection's queue, which tells its outbound pump to finish.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub username: String,
    outbound: mpsc::Sender<Frame>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, author: ChatAuthor, outbound: mpsc::Sender<Frame>) -> Self {
        Self {
            id,
            user_id: author.user_id,
            username: author.username,
            outbound,
        }
    }
}

/// Current members, keyed by connection.
#[derive(Debug, Default)]
struct Members {
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl Members {
    fn insert(&mut self, handle: ConnectionHandle) {
        self.connections.insert(handle.id, handle);
    }

    /// Remove a member. Its queue is closed when the returned handle drops.
    fn remove(&mut self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.remove(id)
    }

    #[cfg(test)]
    fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    fn len(&self) -> usize {
        self.connections.len()
    }

    /// Enqueue `frame` on every member without waiting. Members whose queue
    /// is full or gone are evicted and returned.
    fn fan_out(&mut self, frame: &Frame) -> Vec<ConnectionHandle> {
        let stalled: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|member| member.outbound.try_send(frame.clone()).is_err())
            .map(|member| member.id)
            .collect();

        stalled.iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Enqueue `frame` on one member only. Returns the evicted handle if its
    /// queue could not take the frame.
    fn deliver(&mut self, id: &ConnectionId, frame: Frame) -> Result<(), Option<ConnectionHandle>> {
        let Some(member) = self.connections.get(id) else {
            return Err(None);
        };

        match member.outbound.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => Err(self.remove(id)),
        }
    }
}

/// Event loop state. Owned by the task running [`Hub::run`].
pub struct Hub {
    members: Members,
    register_rx: mpsc::Receiver<ConnectionHandle>,
    unregister_rx: mpsc::Receiver<ConnectionId>,
    broadcast_rx: mpsc::Receiver<Frame>,
    history: GetChatHistoryHandler,
    join_history_limit: u32,
}

/// Cloneable handle used by session bootstrap, pumps and posters.
#[derive(Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<ConnectionHandle>,
    unregister_tx: mpsc::Sender<ConnectionId>,
    broadcast_tx: mpsc::Sender<Frame>,
    repository: Arc<dyn ChatMessageRepository>,
    persist_lock: Arc<Mutex<()>>,
}

impl Hub {
    /// Build a hub and the handle that feeds it. Nothing runs until
    /// [`Hub::run`] is polled.
    pub fn new(repository: Arc<dyn ChatMessageRepository>, settings: HubSettings) -> (Self, HubHandle) {
        let capacity = settings.channel_capacity.max(1);
        let (register_tx, register_rx) = mpsc::channel(capacity);
        let (unregister_tx, unregister_rx) = mpsc::channel(capacity);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(capacity);

        let hub = Self {
            members: Members::default(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            history: GetChatHistoryHandler::new(repository.clone()),
            join_history_limit: settings.join_history_limit,
        };

        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            repository,
            persist_lock: Arc::new(Mutex::new(())),
        };

        (hub, handle)
    }

    /// Build a hub and run its loop on a background task.
    pub fn spawn(repository: Arc<dyn ChatMessageRepository>, settings: HubSettings) -> HubHandle {
        let (hub, handle) = Self::new(repository, settings);
        tokio::spawn(hub.run());
        handle
    }

    /// Process hub events until every [`HubHandle`] has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Chat hub started");

        loop {
            tokio::select! {
                Some(handle) = self.register_rx.recv() => self.handle_register(handle).await,
                Some(id) = self.unregister_rx.recv() => self.handle_unregister(&id),
                Some(frame) = self.broadcast_rx.recv() => self.handle_broadcast(&frame),
                else => break,
            }
        }

        tracing::info!("Chat hub stopped");
    }

    async fn handle_register(&mut self, handle: ConnectionHandle) {
        let id = handle.id;
        let user_id = handle.user_id;
        let join = WireMessage::join(user_id, &handle.username);

        self.members.insert(handle);
        tracing::info!(
            connection_id = %id,
            user_id = %user_id,
            members = self.members.len(),
            "Client connected"
        );

        self.broadcast(&join);
        self.send_history(&id).await;
    }

    fn handle_unregister(&mut self, id: &ConnectionId) {
        let Some(handle) = self.members.remove(id) else {
            return;
        };

        tracing::info!(
            connection_id = %id,
            user_id = %handle.user_id,
            members = self.members.len(),
            "Client disconnected"
        );

        let leave = WireMessage::leave(handle.user_id, &handle.username);
        drop(handle);
        self.broadcast(&leave);
    }

    fn handle_broadcast(&mut self, frame: &Frame) {
        for evicted in self.members.fan_out(frame) {
            tracing::warn!(
                connection_id = %evicted.id,
                user_id = %evicted.user_id,
                "Outbound queue full, dropping slow client"
            );
        }
    }

    fn broadcast(&mut self, message: &WireMessage) {
        match message.encode() {
            Ok(frame) => self.handle_broadcast(&frame),
            Err(e) => tracing::error!("Failed to encode broadcast message: {}", e),
        }
    }

    /// Replay recent history to one connection, never to the room.
    async fn send_history(&mut self, id: &ConnectionId) {
        let query = GetChatHistoryQuery::new(self.join_history_limit);
        let messages = match self.history.handle(query).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(connection_id = %id, "Failed to fetch chat history: {}", e);
                return;
            }
        };

        let frame = match WireMessage::history(messages).encode() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode chat history: {}", e);
                return;
            }
        };

        if let Err(Some(evicted)) = self.members.deliver(id, frame) {
            tracing::warn!(
                connection_id = %evicted.id,
                user_id = %evicted.user_id,
                "Outbound queue full on join, dropping client"
            );
        }
    }
}

impl HubHandle {
    /// Admit a connection. The hub announces it and replays history to it.
    pub async fn register(&self, handle: ConnectionHandle) -> Result<(), ChatError> {
        self.register_tx
            .send(handle)
            .await
            .map_err(|_| ChatError::HubUnavailable)
    }

    /// Remove a connection. Safe to call more than once for the same id.
    pub async fn unregister(&self, id: ConnectionId) -> Result<(), ChatError> {
        self.unregister_tx
            .send(id)
            .await
            .map_err(|_| ChatError::HubUnavailable)
    }

    /// Fan an already encoded frame out to every member.
    pub async fn broadcast(&self, frame: Frame) -> Result<(), ChatError> {
        self.broadcast_tx
            .send(frame)
            .await
            .map_err(|_| ChatError::HubUnavailable)
    }

    /// Persist a message, then broadcast it as a `chat` frame.
    ///
    /// Concurrent callers are serialized: the frame is queued for the hub
    /// before the next caller may append, so the room sees messages in the
    /// order they were stored. A storage failure broadcasts nothing.
    pub async fn post_message(
        &self,
        author: &ChatAuthor,
        body: &MessageBody,
    ) -> Result<ChatMessage, ChatError> {
        let _guard = self.persist_lock.lock().await;

        let message = self.repository.append(author, body).await?;
        tracing::debug!(
            message_id = %message.id,
            user_id = %message.user_id,
            "Message saved"
        );

        let frame = WireMessage::chat(message.clone()).encode()?;
        self.broadcast(frame).await?;

        Ok(message)
    }
}
