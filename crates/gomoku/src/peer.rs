//! Peer actor: an isolated Tokio task that owns one side of a match.
//!
//! The actor owns the [`SyncSession`] and the channel. Everything else
//! talks to it by message passing:
//!
//! ```text
//!   PeerHandle ──(PeerCommand)──┐
//!                               ▼
//!   reader task ──(Inbound)──→ actor ──(frames)──→ Connection
//!                               │
//!                               └──(SessionEvent)──→ PeerEvents
//! ```
//!
//! The actor handles one command or inbound frame at a time, including
//! the resulting send, so session transitions never interleave.

use std::sync::Arc;

use gomoku_board::{Color, Point};
use gomoku_match::{Committed, MatchView, Undone};
use gomoku_protocol::{Codec, JsonCodec, PeerMessage};
use gomoku_session::{
    SessionConfig, SessionEvent, SessionPhase, SyncSession,
};
use gomoku_transport::{Connection, TransportError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::{GomokuError, PeerConfig};

/// Reply channel for a command.
type Reply<T> = oneshot::Sender<Result<T, GomokuError>>;

/// Commands sent to a peer actor through its channel.
enum PeerCommand {
    Propose { point: Point, reply: Reply<()> },
    Cancel { reply: Reply<()> },
    Confirm { reply: Reply<Committed> },
    RequestUndo { reply: Reply<()> },
    AnswerUndo { accept: bool, reply: Reply<Option<Undone>> },
    Restart { reply: Reply<()> },
    Chat { text: String, style: String, reply: Reply<()> },
    Snapshot { reply: oneshot::Sender<PeerSnapshot> },
    Leave { reply: oneshot::Sender<()> },
}

/// What the reader task saw on the channel.
enum Inbound {
    Frame(Vec<u8>),
    Closed,
    Failed(TransportError),
}

/// Everything a UI needs to draw one frame.
#[derive(Debug, Clone)]
pub struct PeerSnapshot {
    pub phase: SessionPhase,
    /// The color played locally.
    pub color: Color,
    pub peer_nickname: Option<String>,
    /// The point the opponent is hovering, if they share candidates.
    pub peer_candidate: Option<Point>,
    pub view: MatchView,
}

impl PeerSnapshot {
    /// Returns `true` when the local player may move right now.
    pub fn is_local_turn(&self) -> bool {
        self.phase.is_active() && self.view.state.current() == Some(self.color)
    }
}

// ---------------------------------------------------------------------------
// PeerHandle
// ---------------------------------------------------------------------------

/// Handle to a running peer actor. Used to send local intents to it.
///
/// Cheap to clone; it's just an `mpsc::Sender` wrapper. Each method waits
/// for the actor to apply the intent (and send any resulting message)
/// before returning.
#[derive(Clone)]
pub struct PeerHandle {
    sender: mpsc::Sender<PeerCommand>,
}

impl PeerHandle {
    async fn call<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> PeerCommand,
    ) -> Result<T, GomokuError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| GomokuError::ActorGone)?;
        reply_rx.await.map_err(|_| GomokuError::ActorGone)?
    }

    /// Marks `point` as the move being considered.
    pub async fn propose(&self, point: Point) -> Result<(), GomokuError> {
        self.call(|reply| PeerCommand::Propose { point, reply }).await
    }

    /// Drops the considered move.
    pub async fn cancel(&self) -> Result<(), GomokuError> {
        self.call(|reply| PeerCommand::Cancel { reply }).await
    }

    /// Commits the considered move and sends it to the opponent.
    pub async fn confirm(&self) -> Result<Committed, GomokuError> {
        self.call(|reply| PeerCommand::Confirm { reply }).await
    }

    /// Proposes and confirms in one step.
    pub async fn play(&self, point: Point) -> Result<Committed, GomokuError> {
        self.propose(point).await?;
        self.confirm().await
    }

    /// Asks the opponent to take back the last ply.
    pub async fn request_undo(&self) -> Result<(), GomokuError> {
        self.call(|reply| PeerCommand::RequestUndo { reply }).await
    }

    /// Answers the opponent's undo request. Returns the retracted stone
    /// when accepting.
    pub async fn answer_undo(
        &self,
        accept: bool,
    ) -> Result<Option<Undone>, GomokuError> {
        self.call(|reply| PeerCommand::AnswerUndo { accept, reply })
            .await
    }

    /// Restarts the match on both sides.
    pub async fn restart(&self) -> Result<(), GomokuError> {
        self.call(|reply| PeerCommand::Restart { reply }).await
    }

    /// Sends a chat line. `style` is passed to the opponent untouched.
    pub async fn chat(
        &self,
        text: impl Into<String>,
        style: impl Into<String>,
    ) -> Result<(), GomokuError> {
        let (text, style) = (text.into(), style.into());
        self.call(|reply| PeerCommand::Chat { text, style, reply })
            .await
    }

    /// Reads the current state for rendering.
    pub async fn snapshot(&self) -> Result<PeerSnapshot, GomokuError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(PeerCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| GomokuError::ActorGone)?;
        reply_rx.await.map_err(|_| GomokuError::ActorGone)
    }

    /// Leaves the match and closes the channel.
    pub async fn leave(&self) -> Result<(), GomokuError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(PeerCommand::Leave { reply: reply_tx })
            .await
            .map_err(|_| GomokuError::ActorGone)?;
        reply_rx.await.map_err(|_| GomokuError::ActorGone)
    }
}

// ---------------------------------------------------------------------------
// PeerEvents
// ---------------------------------------------------------------------------

/// The stream of [`SessionEvent`]s coming out of a peer actor.
pub struct PeerEvents {
    receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

impl PeerEvents {
    /// Waits for the next event. Returns `None` once the actor has
    /// stopped and every event has been read.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        self.receiver.recv().await
    }

    /// Returns an event if one is ready, without waiting.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        self.receiver.try_recv().ok()
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The internal actor state. Runs inside a Tokio task.
struct PeerActor<C: Connection> {
    session: SyncSession,
    config: PeerConfig,
    codec: JsonCodec,
    conn: Arc<C>,
    reader: Option<JoinHandle<()>>,
    commands: mpsc::Receiver<PeerCommand>,
    inbound: mpsc::Receiver<Inbound>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<C: Connection> PeerActor<C> {
    /// Runs the actor loop.
    ///
    /// Once the session ends the link is torn down, but the actor keeps
    /// answering commands (with `Inactive`) and snapshots until every
    /// handle is dropped.
    async fn run(mut self) {
        let conn_id = self.conn.id();
        tracing::info!(%conn_id, color = %self.session.color(), "peer actor started");

        let opening = self.session.opening();
        if let Err(e) = self.send(&opening).await {
            tracing::warn!(%conn_id, error = %e, "could not send handshake");
            let ended = self.session.channel_closed();
            self.finish(ended).await;
        }

        let deadline = tokio::time::sleep(self.config.handshake_timeout);
        tokio::pin!(deadline);

        loop {
            let waiting =
                *self.session.phase() == SessionPhase::AwaitingHandshake;
            let linked = self.reader.is_some();

            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        // Every handle is gone: nobody can play on.
                        let ended = self.end_locally();
                        self.finish(ended).await;
                        break;
                    }
                },
                inbound = self.inbound.recv(), if linked => {
                    self.handle_inbound(inbound).await;
                }
                () = &mut deadline, if waiting => {
                    tracing::info!(%conn_id, "handshake timed out");
                    let ended = self.session.handshake_timed_out();
                    self.finish(ended).await;
                }
            }
        }

        tracing::info!(%conn_id, "peer actor stopped");
    }

    async fn handle_command(&mut self, cmd: PeerCommand) {
        match cmd {
            PeerCommand::Propose { point, reply } => {
                let result = match self.session.propose_move(point) {
                    Ok(Some(hint)) => self.transmit(&hint).await,
                    Ok(None) => Ok(()),
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            PeerCommand::Cancel { reply } => {
                let _ = reply.send(self.session.cancel_move().map_err(Into::into));
            }
            PeerCommand::Confirm { reply } => {
                let result = match self.session.confirm_move() {
                    Ok((committed, msg)) => {
                        self.transmit(&msg).await.map(|()| committed)
                    }
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            PeerCommand::RequestUndo { reply } => {
                let result = match self.session.request_undo() {
                    Ok(msg) => self.transmit(&msg).await,
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            PeerCommand::AnswerUndo { accept, reply } => {
                let result = match self.session.answer_undo(accept) {
                    Ok((undone, msg)) => {
                        self.transmit(&msg).await.map(|()| undone)
                    }
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            PeerCommand::Restart { reply } => {
                let result = match self.session.restart() {
                    Ok(msg) => self.transmit(&msg).await,
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            PeerCommand::Chat { text, style, reply } => {
                let result = match self.session.chat(text, style) {
                    Ok(msg) => self.transmit(&msg).await,
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            PeerCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            PeerCommand::Leave { reply } => {
                let ended = self.end_locally();
                self.finish(ended).await;
                let _ = reply.send(());
            }
        }
    }

    async fn handle_inbound(&mut self, inbound: Option<Inbound>) {
        let conn_id = self.conn.id();
        match inbound {
            Some(Inbound::Frame(frame)) => {
                match self.session.handle_frame(&self.codec, &frame) {
                    Ok(events) => {
                        for event in events {
                            self.emit(event);
                        }
                    }
                    Err(e) if e.is_fatal() => {
                        tracing::warn!(%conn_id, error = %e, "session ended by peer input");
                        let ended = self.ended_event();
                        self.finish(ended).await;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "frame ignored");
                    }
                }
            }
            Some(Inbound::Failed(e)) => {
                tracing::warn!(%conn_id, error = %e, "channel failed");
                let ended = self.session.channel_closed();
                self.finish(ended).await;
            }
            Some(Inbound::Closed) | None => {
                tracing::info!(%conn_id, "channel closed by peer");
                let ended = self.session.channel_closed();
                self.finish(ended).await;
            }
        }
    }

    /// Sends a message produced by a successful intent. A failed send
    /// ends the session, since the peer can no longer be kept in sync.
    async fn transmit(&mut self, msg: &PeerMessage) -> Result<(), GomokuError> {
        if let Err(e) = self.send(msg).await {
            tracing::warn!(conn_id = %self.conn.id(), error = %e, "send failed");
            let ended = self.session.channel_closed();
            self.finish(ended).await;
            return Err(e);
        }
        Ok(())
    }

    async fn send(&self, msg: &PeerMessage) -> Result<(), GomokuError> {
        let frame = self.codec.encode(msg)?;
        self.conn.send(&frame).await?;
        tracing::debug!(conn_id = %self.conn.id(), kind = msg.kind(), "sent");
        Ok(())
    }

    fn end_locally(&mut self) -> Option<SessionEvent> {
        let was_ended = self.session.phase().is_ended();
        self.session.leave();
        if was_ended { None } else { self.ended_event() }
    }

    fn ended_event(&self) -> Option<SessionEvent> {
        match self.session.phase() {
            SessionPhase::Ended(reason) => {
                Some(SessionEvent::Ended(reason.clone()))
            }
            _ => None,
        }
    }

    /// Reports the end (if this call ended the session) and tears the
    /// link down. Safe to call more than once.
    async fn finish(&mut self, ended: Option<SessionEvent>) {
        if let Some(event) = ended {
            self.emit(event);
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
            if let Err(e) = self.conn.close().await {
                tracing::debug!(conn_id = %self.conn.id(), error = %e, "close failed");
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        // The application may have dropped its event stream.
        let _ = self.events.send(event);
    }

    fn snapshot(&self) -> PeerSnapshot {
        PeerSnapshot {
            phase: self.session.phase().clone(),
            color: self.session.color(),
            peer_nickname: self.session.peer_nickname().map(str::to_owned),
            peer_candidate: self.session.peer_candidate(),
            view: self.session.view(),
        }
    }
}

/// Forwards frames from the channel to the actor until it closes.
async fn read_frames<C: Connection>(conn: Arc<C>, tx: mpsc::Sender<Inbound>) {
    loop {
        let item = match conn.recv().await {
            Ok(Some(frame)) => Inbound::Frame(frame),
            Ok(None) => Inbound::Closed,
            Err(e) => Inbound::Failed(e),
        };
        let last = !matches!(item, Inbound::Frame(_));
        if tx.send(item).await.is_err() || last {
            break;
        }
    }
}

/// Spawns a peer actor for an open channel and returns its handle and
/// event stream.
pub(crate) fn spawn_peer<C: Connection>(
    conn: C,
    color: Color,
    session_config: SessionConfig,
    config: PeerConfig,
) -> (PeerHandle, PeerEvents) {
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    let (in_tx, in_rx) = mpsc::channel(config.inbound_buffer);
    let (ev_tx, ev_rx) = mpsc::unbounded_channel();

    let conn = Arc::new(conn);
    let reader = tokio::spawn(read_frames(Arc::clone(&conn), in_tx));

    let actor = PeerActor {
        session: SyncSession::new(color, session_config),
        config,
        codec: JsonCodec,
        conn,
        reader: Some(reader),
        commands: cmd_rx,
        inbound: in_rx,
        events: ev_tx,
    };

    tokio::spawn(actor.run());

    (
        PeerHandle { sender: cmd_tx },
        PeerEvents { receiver: ev_rx },
    )
}
