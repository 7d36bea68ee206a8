//! The turn-sync session: one side of a two-peer match.
//!
//! A [`SyncSession`] owns the local [`Match`] and translates between it and
//! [`PeerMessage`]s. It does no I/O. Local intents return the messages to
//! send; inbound messages go through [`SyncSession::handle`] and come back
//! as [`SessionEvent`]s. The caller owns the channel and must send what it
//! is given, in order, before handling the next item.
//!
//! ```text
//!   AwaitingHandshake ──(HANDSHAKE)──→ Active ──(close / leave / desync)──→ Ended
//!          │                                                                 ▲
//!          └──────────────(timeout / close / bad first message)──────────────┘
//! ```

use gomoku_board::{Color, Point};
use gomoku_match::{
    Committed, IncomingUndo, Match, MatchView, Rejection, Seat, Undone,
};
use gomoku_protocol::{Codec, PeerMessage};

use crate::{EndReason, SessionError, SessionEvent};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Per-player settings for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name announced to the peer in the handshake.
    ///
    /// Default: `"Player"`.
    pub nickname: String,

    /// Whether to send advisory `MOVE` messages while the local player is
    /// still choosing. Purely cosmetic for the peer.
    ///
    /// Default: `true`.
    pub share_candidates: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nickname: "Player".into(),
            share_candidates: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Channel open, peer's HANDSHAKE not yet seen.
    AwaitingHandshake,
    /// Both sides introduced; play is allowed.
    Active,
    /// Terminal. No further transitions.
    Ended(EndReason),
}

impl SessionPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

// ---------------------------------------------------------------------------
// SyncSession
// ---------------------------------------------------------------------------

/// One peer's half of a networked match.
#[derive(Debug)]
pub struct SyncSession {
    config: SessionConfig,
    color: Color,
    game: Match,
    phase: SessionPhase,
    peer_nickname: Option<String>,
    peer_candidate: Option<Point>,
}

impl SyncSession {
    /// Creates a session playing `color`. The host plays black.
    pub fn new(color: Color, config: SessionConfig) -> Self {
        Self {
            config,
            color,
            game: Match::new(Seat::Player(color)),
            phase: SessionPhase::AwaitingHandshake,
            peer_nickname: None,
            peer_candidate: None,
        }
    }

    /// The HANDSHAKE to send as soon as the channel opens.
    pub fn opening(&self) -> PeerMessage {
        PeerMessage::Handshake {
            nickname: self.config.nickname.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Local intents
    // -----------------------------------------------------------------------

    /// Marks a candidate point. Returns an advisory `MOVE` if candidates
    /// are shared with the peer.
    pub fn propose_move(
        &mut self,
        point: Point,
    ) -> Result<Option<PeerMessage>, SessionError> {
        self.ensure_active()?;
        self.game.propose_local_move(point)?;
        Ok(self
            .config
            .share_candidates
            .then_some(PeerMessage::Move(point)))
    }

    /// Drops the candidate point. Nothing is sent.
    pub fn cancel_move(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.game.cancel_pending();
        Ok(())
    }

    /// Commits the candidate. The returned `CONFIRM_MOVE` must be sent.
    pub fn confirm_move(
        &mut self,
    ) -> Result<(Committed, PeerMessage), SessionError> {
        self.ensure_active()?;
        let committed = self.game.commit_local_move()?;
        let msg = PeerMessage::ConfirmMove(committed.point);
        Ok((committed, msg))
    }

    /// Asks the peer to take back the most recent ply.
    ///
    /// Moves cannot be committed until the answer arrives. If the peer
    /// asks at the same moment, black's request wins: a white side sees
    /// its own request withdrawn and gets [`SessionEvent::UndoRequested`].
    pub fn request_undo(&mut self) -> Result<PeerMessage, SessionError> {
        self.ensure_active()?;
        self.game.request_undo()?;
        tracing::debug!(color = %self.color, "undo requested");
        Ok(PeerMessage::UndoRequest)
    }

    /// Answers the peer's undo request.
    ///
    /// Accepting retracts the ply here first, then the returned
    /// `UNDO_ACCEPT` tells the peer to do the same.
    pub fn answer_undo(
        &mut self,
        accept: bool,
    ) -> Result<(Option<Undone>, PeerMessage), SessionError> {
        self.ensure_active()?;
        if accept {
            let undone = self.game.accept_undo()?;
            self.peer_candidate = None;
            Ok((Some(undone), PeerMessage::UndoAccept))
        } else {
            self.game.reject_undo()?;
            Ok((None, PeerMessage::UndoReject))
        }
    }

    /// Resets the match for both sides.
    ///
    /// Only allowed once the match is won or while the local side owns the
    /// turn, and never while an undo negotiation is open. Since the peer
    /// can't commit during our turn, a `RESTART` can never cross one of its
    /// `CONFIRM_MOVE`s on the wire.
    pub fn restart(&mut self) -> Result<PeerMessage, SessionError> {
        self.ensure_active()?;
        if self.game.negotiation().is_open() {
            return Err(Rejection::UndoOutstanding.into());
        }
        if let Some(current) = self.game.current() {
            if current != self.color {
                return Err(Rejection::NotYourTurn(current).into());
            }
        }
        self.game.restart();
        self.peer_candidate = None;
        Ok(PeerMessage::Restart)
    }

    /// A chat line for the peer. `style` travels as the opaque `color` tag.
    pub fn chat(
        &mut self,
        text: impl Into<String>,
        style: impl Into<String>,
    ) -> Result<PeerMessage, SessionError> {
        self.ensure_active()?;
        Ok(PeerMessage::Chat {
            text: text.into(),
            style: style.into(),
        })
    }

    /// Ends the session from this side. The caller closes the channel.
    pub fn leave(&mut self) {
        self.end(EndReason::LocalLeave);
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Decodes a frame and applies it.
    ///
    /// A frame that doesn't decode (or fails validation) is a fatal
    /// protocol violation.
    pub fn handle_frame<C: Codec>(
        &mut self,
        codec: &C,
        frame: &[u8],
    ) -> Result<Vec<SessionEvent>, SessionError> {
        if self.phase.is_ended() {
            return Err(SessionError::Inactive);
        }
        let decoded = codec
            .decode::<PeerMessage>(frame)
            .and_then(|msg| msg.validate().map(|()| msg));
        match decoded {
            Ok(msg) => self.handle(msg),
            Err(e) => Err(self.violation(e.to_string())),
        }
    }

    /// Applies one inbound message.
    ///
    /// On a fatal error the session has already ended with the matching
    /// [`EndReason`] when this returns.
    pub fn handle(
        &mut self,
        msg: PeerMessage,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        tracing::debug!(kind = msg.kind(), color = %self.color, "inbound message");
        match self.phase {
            SessionPhase::Ended(_) => Err(SessionError::Inactive),
            SessionPhase::AwaitingHandshake => self.handle_first(msg),
            SessionPhase::Active => self.handle_active(msg),
        }
    }

    fn handle_first(
        &mut self,
        msg: PeerMessage,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        match msg {
            PeerMessage::Handshake { nickname } => {
                tracing::info!(peer = %nickname, color = %self.color, "peer joined");
                self.peer_nickname = Some(nickname.clone());
                self.phase = SessionPhase::Active;
                Ok(vec![SessionEvent::PeerJoined { nickname }])
            }
            other => {
                Err(self.violation(format!("{} before handshake", other.kind())))
            }
        }
    }

    fn handle_active(
        &mut self,
        msg: PeerMessage,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let peer = self.color.opponent();
        let event = match msg {
            PeerMessage::Handshake { nickname } => {
                tracing::warn!(peer = %nickname, "duplicate handshake ignored");
                return Ok(Vec::new());
            }
            PeerMessage::Move(point) => {
                // Advisory. Only worth showing if the peer could actually
                // play there right now.
                if self.game.current() != Some(peer)
                    || !self.game.board().is_empty_at(point)
                {
                    tracing::debug!(%point, "stale candidate ignored");
                    return Ok(Vec::new());
                }
                self.peer_candidate = Some(point);
                SessionEvent::PeerConsidering(point)
            }
            PeerMessage::ConfirmMove(point) => {
                let committed = self
                    .game
                    .apply_remote_move(point, peer)
                    .map_err(|d| self.desync(d))?;
                self.peer_candidate = None;
                SessionEvent::OpponentMoved(committed)
            }
            PeerMessage::UndoRequest => {
                let incoming = self
                    .game
                    .record_undo_request()
                    .map_err(|d| self.desync(d))?;
                if incoming == IncomingUndo::Ignored {
                    return Ok(Vec::new());
                }
                SessionEvent::UndoRequested
            }
            PeerMessage::UndoAccept => {
                let undone = self
                    .game
                    .apply_undo_accepted()
                    .map_err(|d| self.desync(d))?;
                self.peer_candidate = None;
                SessionEvent::UndoAccepted(undone)
            }
            PeerMessage::UndoReject => {
                self.game
                    .apply_undo_rejected()
                    .map_err(|d| self.desync(d))?;
                SessionEvent::UndoRejected
            }
            PeerMessage::Chat { text, style } => {
                SessionEvent::Chat { text, style }
            }
            PeerMessage::Restart => {
                self.game.restart();
                self.peer_candidate = None;
                SessionEvent::Restarted
            }
        };
        Ok(vec![event])
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// The channel closed. Ends the session unless it already ended;
    /// any open undo negotiation is dropped and the board stays as it is.
    pub fn channel_closed(&mut self) -> Option<SessionEvent> {
        self.end(EndReason::PeerLeft)
    }

    /// The handshake deadline passed. Only has an effect while the
    /// session is still waiting for the peer's HANDSHAKE.
    pub fn handshake_timed_out(&mut self) -> Option<SessionEvent> {
        if self.phase != SessionPhase::AwaitingHandshake {
            return None;
        }
        self.end(EndReason::HandshakeTimeout)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// The color played locally.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn peer_nickname(&self) -> Option<&str> {
        self.peer_nickname.as_deref()
    }

    /// The point the peer last hovered, while it is still their turn.
    pub fn peer_candidate(&self) -> Option<Point> {
        self.peer_candidate
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The local copy of the match.
    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn view(&self) -> MatchView {
        self.game.view()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.phase.is_active() {
            Ok(())
        } else {
            Err(SessionError::Inactive)
        }
    }

    /// Moves to `Ended(reason)` once. Returns the `Ended` event the first
    /// time, `None` if the session had already ended.
    fn end(&mut self, reason: EndReason) -> Option<SessionEvent> {
        if self.phase.is_ended() {
            return None;
        }
        tracing::info!(color = %self.color, %reason, "session ended");
        self.game.abandon();
        self.peer_candidate = None;
        self.phase = SessionPhase::Ended(reason.clone());
        Some(SessionEvent::Ended(reason))
    }

    fn desync(&mut self, desync: gomoku_match::Desync) -> SessionError {
        tracing::warn!(color = %self.color, error = %desync, "peer desynced");
        self.end(EndReason::Desync(desync.clone()));
        SessionError::Desync(desync)
    }

    fn violation(&mut self, why: String) -> SessionError {
        tracing::warn!(color = %self.color, %why, "protocol violation");
        self.end(EndReason::ProtocolViolation(why.clone()));
        SessionError::ProtocolViolation(why)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_match::{Desync, MatchState};
    use gomoku_protocol::JsonCodec;

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    fn active(color: Color) -> SyncSession {
        let mut session = SyncSession::new(color, SessionConfig::default());
        session
            .handle(PeerMessage::Handshake {
                nickname: "peer".into(),
            })
            .unwrap();
        session
    }

    #[test]
    fn test_opening_is_handshake_with_nickname() {
        let config = SessionConfig {
            nickname: "alice".into(),
            ..SessionConfig::default()
        };
        let session = SyncSession::new(Color::Black, config);
        assert_eq!(
            session.opening(),
            PeerMessage::Handshake {
                nickname: "alice".into()
            }
        );
    }

    #[test]
    fn test_intents_before_handshake_are_inactive() {
        let mut session =
            SyncSession::new(Color::Black, SessionConfig::default());
        assert_eq!(session.propose_move(p(7, 7)), Err(SessionError::Inactive));
        assert_eq!(session.request_undo(), Err(SessionError::Inactive));
        assert_eq!(
            session.chat("hi", "").unwrap_err(),
            SessionError::Inactive
        );
    }

    #[test]
    fn test_handshake_activates_and_reports_peer() {
        let mut session =
            SyncSession::new(Color::White, SessionConfig::default());
        let events = session
            .handle(PeerMessage::Handshake {
                nickname: "bob".into(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![SessionEvent::PeerJoined {
                nickname: "bob".into()
            }]
        );
        assert!(session.is_active());
        assert_eq!(session.peer_nickname(), Some("bob"));
    }

    #[test]
    fn test_message_before_handshake_is_fatal() {
        let mut session =
            SyncSession::new(Color::White, SessionConfig::default());
        let err = session
            .handle(PeerMessage::ConfirmMove(p(7, 7)))
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            session.phase(),
            SessionPhase::Ended(EndReason::ProtocolViolation(_))
        ));
        assert_eq!(session.game().plies(), 0);
    }

    #[test]
    fn test_duplicate_handshake_is_ignored() {
        let mut session = active(Color::Black);
        let events = session
            .handle(PeerMessage::Handshake {
                nickname: "again".into(),
            })
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(session.peer_nickname(), Some("peer"));
    }

    #[test]
    fn test_propose_shares_candidate_only_when_configured() {
        let mut session = active(Color::Black);
        assert_eq!(
            session.propose_move(p(7, 7)),
            Ok(Some(PeerMessage::Move(p(7, 7))))
        );

        let mut quiet = SyncSession::new(
            Color::Black,
            SessionConfig {
                share_candidates: false,
                ..SessionConfig::default()
            },
        );
        quiet
            .handle(PeerMessage::Handshake {
                nickname: "peer".into(),
            })
            .unwrap();
        assert_eq!(quiet.propose_move(p(7, 7)), Ok(None));
        assert_eq!(quiet.game().pending(), Some(p(7, 7)));
    }

    #[test]
    fn test_confirm_emits_confirm_move() {
        let mut session = active(Color::Black);
        session.propose_move(p(7, 7)).unwrap();
        let (committed, msg) = session.confirm_move().unwrap();
        assert_eq!(committed.point, p(7, 7));
        assert_eq!(msg, PeerMessage::ConfirmMove(p(7, 7)));
        assert_eq!(session.game().current(), Some(Color::White));
    }

    #[test]
    fn test_confirm_out_of_turn_is_rejected_without_message() {
        let mut session = active(Color::White);
        assert_eq!(
            session.propose_move(p(7, 7)),
            Err(SessionError::Rejected(Rejection::NotYourTurn(Color::Black)))
        );
        assert_eq!(
            session.confirm_move().unwrap_err(),
            SessionError::Rejected(Rejection::NoPendingMove)
        );
    }

    #[test]
    fn test_inbound_confirm_applies_for_peer_color() {
        let mut session = active(Color::White);
        let events = session.handle(PeerMessage::ConfirmMove(p(7, 7))).unwrap();
        match events.as_slice() {
            [SessionEvent::OpponentMoved(c)] => {
                assert_eq!(c.color, Color::Black);
                assert_eq!(c.point, p(7, 7));
            }
            other => panic!("unexpected events: {other:?}"),
        }
        assert!(session.game().is_local_turn());
    }

    #[test]
    fn test_inbound_confirm_out_of_turn_ends_session() {
        let mut session = active(Color::Black);
        let err = session.handle(PeerMessage::ConfirmMove(p(7, 7))).unwrap_err();
        assert!(matches!(err, SessionError::Desync(Desync::WrongMover { .. })));
        assert!(matches!(
            session.phase(),
            SessionPhase::Ended(EndReason::Desync(_))
        ));
        assert_eq!(session.handle(PeerMessage::Restart), Err(SessionError::Inactive));
    }

    #[test]
    fn test_advisory_move_is_surfaced_only_on_peer_turn() {
        let mut session = active(Color::White);
        assert_eq!(
            session.handle(PeerMessage::Move(p(3, 3))).unwrap(),
            vec![SessionEvent::PeerConsidering(p(3, 3))]
        );
        assert_eq!(session.peer_candidate(), Some(p(3, 3)));

        session.handle(PeerMessage::ConfirmMove(p(3, 3))).unwrap();
        assert_eq!(session.peer_candidate(), None);
        // White to move now: a hint from black is stale.
        assert!(session.handle(PeerMessage::Move(p(4, 4))).unwrap().is_empty());
        assert_eq!(session.game().plies(), 1);
    }

    #[test]
    fn test_restart_requires_turn_or_win() {
        let mut white = active(Color::White);
        assert_eq!(
            white.restart(),
            Err(SessionError::Rejected(Rejection::NotYourTurn(Color::Black)))
        );

        let mut black = active(Color::Black);
        assert_eq!(black.restart(), Ok(PeerMessage::Restart));
    }

    #[test]
    fn test_restart_blocked_while_undo_open() {
        let mut black = active(Color::Black);
        black.propose_move(p(0, 0)).unwrap();
        black.confirm_move().unwrap();
        black.handle(PeerMessage::ConfirmMove(p(1, 1))).unwrap();
        black.request_undo().unwrap();
        assert_eq!(
            black.restart(),
            Err(SessionError::Rejected(Rejection::UndoOutstanding))
        );
    }

    #[test]
    fn test_restart_allowed_after_win_for_either_side() {
        let mut white = active(Color::White);
        for x in 0..4 {
            white.handle(PeerMessage::ConfirmMove(p(x, 0))).unwrap();
            white.propose_move(p(x, 1)).unwrap();
            white.confirm_move().unwrap();
        }
        white.handle(PeerMessage::ConfirmMove(p(4, 0))).unwrap();
        assert!(white.game().state().is_won());
        assert_eq!(white.restart(), Ok(PeerMessage::Restart));
        assert_eq!(white.game().state(), &MatchState::initial());
        assert_eq!(white.game().tally().wins(Color::Black), 1);
    }

    #[test]
    fn test_inbound_restart_always_applies() {
        let mut white = active(Color::White);
        white.handle(PeerMessage::ConfirmMove(p(7, 7))).unwrap();
        assert_eq!(
            white.handle(PeerMessage::Restart).unwrap(),
            vec![SessionEvent::Restarted]
        );
        assert_eq!(white.game().plies(), 0);
    }

    #[test]
    fn test_answer_undo_accept_retracts_and_replies() {
        let mut black = active(Color::Black);
        black.propose_move(p(7, 7)).unwrap();
        black.confirm_move().unwrap();
        black.handle(PeerMessage::ConfirmMove(p(8, 8))).unwrap();

        assert_eq!(
            black.handle(PeerMessage::UndoRequest).unwrap(),
            vec![SessionEvent::UndoRequested]
        );
        let (undone, msg) = black.answer_undo(true).unwrap();
        assert_eq!(msg, PeerMessage::UndoAccept);
        assert_eq!(undone.map(|u| u.point), Some(p(8, 8)));
        assert_eq!(black.game().current(), Some(Color::White));
    }

    #[test]
    fn test_crossing_undo_request_is_ignored_by_black() {
        let mut black = active(Color::Black);
        black.propose_move(p(7, 7)).unwrap();
        black.confirm_move().unwrap();
        black.request_undo().unwrap();

        assert_eq!(black.handle(PeerMessage::UndoRequest).unwrap(), vec![]);
        assert!(black.game().negotiation().awaiting_response);
        assert!(!black.game().negotiation().pending_decision);
        assert!(black.is_active());
    }

    #[test]
    fn test_crossing_undo_request_withdraws_white_request() {
        let mut white = active(Color::White);
        white.handle(PeerMessage::ConfirmMove(p(7, 7))).unwrap();
        white.request_undo().unwrap();

        assert_eq!(
            white.handle(PeerMessage::UndoRequest).unwrap(),
            vec![SessionEvent::UndoRequested]
        );
        assert!(!white.game().negotiation().awaiting_response);
        assert!(white.game().negotiation().pending_decision);
        assert_eq!(
            white.request_undo(),
            Err(SessionError::Rejected(Rejection::UndoOutstanding))
        );
    }

    #[test]
    fn test_answer_undo_without_request_is_rejected() {
        let mut black = active(Color::Black);
        assert_eq!(
            black.answer_undo(false).unwrap_err(),
            SessionError::Rejected(Rejection::NoUndoRequest)
        );
    }

    #[test]
    fn test_unsolicited_undo_accept_is_desync() {
        let mut black = active(Color::Black);
        let err = black.handle(PeerMessage::UndoAccept).unwrap_err();
        assert_eq!(err, SessionError::Desync(Desync::NoOutstandingUndo));
        assert!(black.phase().is_ended());
    }

    #[test]
    fn test_chat_passes_through_both_ways() {
        let mut black = active(Color::Black);
        assert_eq!(
            black.chat("good luck", "#00ff00").unwrap(),
            PeerMessage::Chat {
                text: "good luck".into(),
                style: "#00ff00".into()
            }
        );
        let events = black
            .handle(PeerMessage::Chat {
                text: "you too".into(),
                style: "blue".into(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![SessionEvent::Chat {
                text: "you too".into(),
                style: "blue".into()
            }]
        );
    }

    #[test]
    fn test_undecodable_frame_is_fatal() {
        let mut session = active(Color::Black);
        let err = session.handle_frame(&JsonCodec, b"{garbage").unwrap_err();
        assert!(matches!(err, SessionError::ProtocolViolation(_)));
        assert!(session.phase().is_ended());
    }

    #[test]
    fn test_invalid_handshake_frame_is_fatal() {
        let mut session =
            SyncSession::new(Color::White, SessionConfig::default());
        let frame = br#"{"type":"HANDSHAKE","payload":{"nickname":""}}"#;
        assert!(session.handle_frame(&JsonCodec, frame).unwrap_err().is_fatal());
    }

    #[test]
    fn test_channel_close_ends_once_and_drops_negotiation() {
        let mut black = active(Color::Black);
        black.propose_move(p(7, 7)).unwrap();
        black.confirm_move().unwrap();
        black.request_undo().unwrap();
        let board = black.game().board().clone();

        assert_eq!(
            black.channel_closed(),
            Some(SessionEvent::Ended(EndReason::PeerLeft))
        );
        assert_eq!(black.channel_closed(), None);
        assert!(!black.game().negotiation().is_open());
        assert_eq!(black.game().board(), &board);
    }

    #[test]
    fn test_handshake_timeout_only_while_waiting() {
        let mut waiting =
            SyncSession::new(Color::Black, SessionConfig::default());
        assert_eq!(
            waiting.handshake_timed_out(),
            Some(SessionEvent::Ended(EndReason::HandshakeTimeout))
        );

        let mut joined = active(Color::Black);
        assert_eq!(joined.handshake_timed_out(), None);
        assert!(joined.is_active());
    }

    #[test]
    fn test_leave_ends_session() {
        let mut session = active(Color::White);
        session.leave();
        assert_eq!(
            session.phase(),
            &SessionPhase::Ended(EndReason::LocalLeave)
        );
        assert_eq!(session.cancel_move(), Err(SessionError::Inactive));
    }
}
