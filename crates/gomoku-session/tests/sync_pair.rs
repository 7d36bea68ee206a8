//! Two sessions wired back to back through the JSON codec.
//!
//! Each test plays the role of the channel: whatever one side emits is
//! encoded, then decoded and handled by the other side, in order.

use gomoku_board::{Color, Point};
use gomoku_match::{Rejection, Undone};
use gomoku_protocol::{Codec, JsonCodec, PeerMessage};
use gomoku_session::{
    EndReason, SessionConfig, SessionError, SessionEvent, SessionPhase,
    SyncSession,
};

fn p(x: usize, y: usize) -> Point {
    Point::new(x, y)
}

/// Encodes `msg` and hands the frame to `to`.
fn deliver(to: &mut SyncSession, msg: &PeerMessage) -> Vec<SessionEvent> {
    let frame = JsonCodec.encode(msg).expect("encode");
    to.handle_frame(&JsonCodec, &frame).expect("handle")
}

/// A host (black) and a joiner (white) after both handshakes.
fn linked() -> (SyncSession, SyncSession) {
    let mut host = SyncSession::new(
        Color::Black,
        SessionConfig {
            nickname: "host".into(),
            ..SessionConfig::default()
        },
    );
    let mut joiner = SyncSession::new(
        Color::White,
        SessionConfig {
            nickname: "joiner".into(),
            ..SessionConfig::default()
        },
    );
    let hello_host = host.opening();
    let hello_joiner = joiner.opening();
    assert_eq!(
        deliver(&mut joiner, &hello_host),
        vec![SessionEvent::PeerJoined {
            nickname: "host".into()
        }]
    );
    deliver(&mut host, &hello_joiner);
    assert!(host.is_active() && joiner.is_active());
    (host, joiner)
}

/// `mover` proposes and confirms `point`; both messages reach `other`.
fn play(mover: &mut SyncSession, other: &mut SyncSession, point: Point) {
    if let Some(hint) = mover.propose_move(point).expect("propose") {
        deliver(other, &hint);
    }
    let (_, confirm) = mover.confirm_move().expect("confirm");
    let events = deliver(other, &confirm);
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::OpponentMoved(c)] if c.point == point
    ));
}

fn assert_in_sync(a: &SyncSession, b: &SyncSession) {
    assert_eq!(a.game().board(), b.game().board());
    assert_eq!(a.game().state(), b.game().state());
    assert_eq!(a.game().history(), b.game().history());
}

#[test]
fn test_full_game_stays_in_sync_until_win() {
    let (mut host, mut joiner) = linked();
    let script = [
        (p(7, 7), p(7, 8)),
        (p(6, 7), p(6, 8)),
        (p(8, 7), p(8, 8)),
        (p(5, 7), p(5, 8)),
    ];
    for (b, w) in script {
        play(&mut host, &mut joiner, b);
        play(&mut joiner, &mut host, w);
        assert_in_sync(&host, &joiner);
        assert!(!host.game().state().is_won());
    }

    host.propose_move(p(9, 7)).unwrap();
    let (committed, confirm) = host.confirm_move().unwrap();
    let win = committed.win.expect("black wins");
    assert_eq!(win.line, vec![p(9, 7), p(8, 7), p(7, 7), p(6, 7), p(5, 7)]);

    match deliver(&mut joiner, &confirm).as_slice() {
        [SessionEvent::OpponentMoved(c)] => assert_eq!(c.win.as_ref(), Some(&win)),
        other => panic!("unexpected: {other:?}"),
    }
    assert_in_sync(&host, &joiner);
}

#[test]
fn test_undo_negotiation_accepted() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));
    play(&mut joiner, &mut host, p(0, 0));

    let request = joiner.request_undo().unwrap();
    assert_eq!(
        deliver(&mut host, &request),
        vec![SessionEvent::UndoRequested]
    );

    let (undone, accept) = host.answer_undo(true).unwrap();
    assert_eq!(undone.map(|u| u.point), Some(p(0, 0)));

    match deliver(&mut joiner, &accept).as_slice() {
        [SessionEvent::UndoAccepted(u)] => {
            assert_eq!(u.point, p(0, 0));
            assert_eq!(u.color, Color::White);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_in_sync(&host, &joiner);
    assert!(joiner.game().is_local_turn());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_undo_negotiation_rejected() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));

    let request = host.request_undo().unwrap();
    deliver(&mut joiner, &request);
    let (undone, reject) = joiner.answer_undo(false).unwrap();
    assert!(undone.is_none());
    assert_eq!(
        deliver(&mut host, &reject),
        vec![SessionEvent::UndoRejected]
    );
    assert_eq!(host.game().plies(), 1);
    assert_in_sync(&host, &joiner);
}

#[test]
fn test_undo_with_no_moves_sends_nothing() {
    let (mut host, _joiner) = linked();
    assert!(matches!(
        host.request_undo(),
        Err(SessionError::Rejected(_))
    ));
    assert!(host.is_active());
}

#[test]
fn test_close_while_awaiting_undo_ends_without_board_change() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));
    let _request_lost_in_flight = host.request_undo().unwrap();
    let board = host.game().board().clone();

    assert_eq!(
        host.channel_closed(),
        Some(SessionEvent::Ended(EndReason::PeerLeft))
    );
    assert_eq!(host.phase(), &SessionPhase::Ended(EndReason::PeerLeft));
    assert!(!host.game().negotiation().is_open());
    assert_eq!(host.game().board(), &board);
    assert_eq!(host.game().plies(), 1);
}

#[test]
fn test_restart_mid_game_from_turn_owner() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));
    play(&mut joiner, &mut host, p(8, 8));

    // Black owns the turn, so only black may restart.
    assert!(joiner.restart().is_err());
    let restart = host.restart().unwrap();
    assert_eq!(
        deliver(&mut joiner, &restart),
        vec![SessionEvent::Restarted]
    );
    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 0);
}

#[test]
fn test_restart_after_win_from_loser() {
    let (mut host, mut joiner) = linked();
    for x in 0..4 {
        play(&mut host, &mut joiner, p(x, 0));
        play(&mut joiner, &mut host, p(x, 2));
    }
    play(&mut host, &mut joiner, p(4, 0));
    assert!(joiner.game().state().is_won());

    let restart = joiner.restart().unwrap();
    deliver(&mut host, &restart);
    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().tally().wins(Color::Black), 1);
    assert_eq!(joiner.game().tally().wins(Color::Black), 1);
}

#[test]
fn test_crossing_undo_requests_keep_only_black_request() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(1, 1));
    play(&mut joiner, &mut host, p(2, 2));

    // Both ask at once; both requests are on the wire before either lands.
    let from_host = host.request_undo().unwrap();
    let from_joiner = joiner.request_undo().unwrap();
    assert_eq!(deliver(&mut host, &from_joiner), vec![]);
    assert_eq!(
        deliver(&mut joiner, &from_host),
        vec![SessionEvent::UndoRequested]
    );
    assert!(host.game().negotiation().awaiting_response);
    assert!(!host.game().negotiation().pending_decision);
    assert!(joiner.game().negotiation().pending_decision);
    assert!(!joiner.game().negotiation().awaiting_response);

    let (undone, accept) = joiner.answer_undo(true).unwrap();
    assert_eq!(undone.map(|u| u.point), Some(p(2, 2)));
    deliver(&mut host, &accept);

    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 1);
    assert!(!host.game().negotiation().is_open());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_simultaneous_accepts_cannot_happen_after_crossing_requests() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));

    let from_host = host.request_undo().unwrap();
    let from_joiner = joiner.request_undo().unwrap();
    deliver(&mut joiner, &from_host);
    deliver(&mut host, &from_joiner);

    // Both players press "accept" before anything else arrives.
    assert_eq!(
        host.answer_undo(true).unwrap_err(),
        SessionError::Rejected(Rejection::NoUndoRequest)
    );
    let (_, accept) = joiner.answer_undo(true).unwrap();
    assert_eq!(
        deliver(&mut host, &accept),
        vec![SessionEvent::UndoAccepted(Undone {
            point: p(7, 7),
            color: Color::Black
        })]
    );

    assert!(host.is_active() && joiner.is_active());
    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 0);
    assert!(!host.game().negotiation().is_open());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_undo_request_crossing_a_move_retracts_that_move() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));

    // White commits while black's request is in flight.
    let request = host.request_undo().unwrap();
    joiner.propose_move(p(8, 8)).unwrap();
    let (_, confirm) = joiner.confirm_move().unwrap();
    deliver(&mut host, &confirm);
    deliver(&mut joiner, &request);

    // The most recent ply is white's on both copies, so that is what goes.
    let (undone, accept) = joiner.answer_undo(true).unwrap();
    assert_eq!(undone.map(|u| u.point), Some(p(8, 8)));
    deliver(&mut host, &accept);

    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 1);
    assert!(!host.game().negotiation().is_open());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_undo_request_landing_before_a_move_blocks_it() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));

    let request = host.request_undo().unwrap();
    deliver(&mut joiner, &request);
    joiner.propose_move(p(8, 8)).unwrap();
    assert_eq!(
        joiner.confirm_move().unwrap_err(),
        SessionError::Rejected(Rejection::UndoOutstanding)
    );

    let (_, reject) = joiner.answer_undo(false).unwrap();
    deliver(&mut host, &reject);
    play(&mut joiner, &mut host, p(8, 8));

    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 2);
    assert!(!host.game().negotiation().is_open());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_restart_crossing_undo_request_leaves_request_to_reject() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));

    // White owns the turn and restarts while black's request is in flight.
    let request = host.request_undo().unwrap();
    let restart = joiner.restart().unwrap();
    assert_eq!(deliver(&mut host, &restart), vec![SessionEvent::Restarted]);
    assert_eq!(
        deliver(&mut joiner, &request),
        vec![SessionEvent::UndoRequested]
    );
    assert_in_sync(&host, &joiner);

    // Nobody moves until the request is settled.
    host.propose_move(p(0, 0)).unwrap();
    assert_eq!(
        host.confirm_move().unwrap_err(),
        SessionError::Rejected(Rejection::UndoOutstanding)
    );

    // The board is empty, so the request can only be turned down.
    assert_eq!(
        joiner.answer_undo(true).unwrap_err(),
        SessionError::Rejected(Rejection::NothingToUndo)
    );
    let (_, reject) = joiner.answer_undo(false).unwrap();
    assert_eq!(deliver(&mut host, &reject), vec![SessionEvent::UndoRejected]);

    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 0);
    assert!(!host.game().negotiation().is_open());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_undo_request_landing_before_restart_blocks_it() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));

    let request = host.request_undo().unwrap();
    deliver(&mut joiner, &request);
    assert_eq!(
        joiner.restart().unwrap_err(),
        SessionError::Rejected(Rejection::UndoOutstanding)
    );

    let (_, reject) = joiner.answer_undo(false).unwrap();
    deliver(&mut host, &reject);
    let restart = joiner.restart().unwrap();
    deliver(&mut host, &restart);

    assert_in_sync(&host, &joiner);
    assert_eq!(host.game().plies(), 0);
    assert!(!host.game().negotiation().is_open());
    assert!(!joiner.game().negotiation().is_open());
}

#[test]
fn test_first_frame_must_be_handshake() {
    let mut joiner = SyncSession::new(Color::White, SessionConfig::default());
    let frame = JsonCodec.encode(&PeerMessage::Restart).unwrap();
    let err = joiner.handle_frame(&JsonCodec, &frame).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(
        joiner.phase(),
        SessionPhase::Ended(EndReason::ProtocolViolation(_))
    ));
}

#[test]
fn test_desync_ends_receiving_side() {
    let (mut host, mut joiner) = linked();
    play(&mut host, &mut joiner, p(7, 7));
    // A forged second black move.
    let frame = JsonCodec.encode(&PeerMessage::ConfirmMove(p(9, 9))).unwrap();
    let err = joiner.handle_frame(&JsonCodec, &frame).unwrap_err();
    assert!(matches!(err, SessionError::Desync(_)));
    assert!(matches!(
        joiner.phase(),
        SessionPhase::Ended(EndReason::Desync(_))
    ));
}

#[test]
fn test_chat_does_not_touch_match() {
    let (mut host, mut joiner) = linked();
    let line = joiner.chat("hi", "#123456").unwrap();
    assert_eq!(
        deliver(&mut host, &line),
        vec![SessionEvent::Chat {
            text: "hi".into(),
            style: "#123456".into()
        }]
    );
    assert_eq!(host.game().plies(), 0);
    assert!(host.game().is_local_turn());
}
