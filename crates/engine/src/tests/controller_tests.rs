use super::*;
use shared::{
    domain::{Owner, Position},
    error::ErrorCode,
};

fn error_code(directive: &Directive) -> ErrorCode {
    match directive {
        Directive::Reply(ServerEvent::Error(error)) => error.code,
        other => panic!("expected an error reply, got {other:?}"),
    }
}

#[test]
fn accepted_move_is_broadcast() {
    let mut controller = GameController::new();
    let directive = controller.handle_move("A-P1:F");
    assert_eq!(
        directive,
        Directive::Broadcast(ServerEvent::update(controller.state()))
    );
    assert_eq!(controller.state().current_player, Owner::B);
    assert_eq!(controller.state().move_history, ["A-P1 moved F"]);
}

#[test]
fn wrong_turn_replies_to_the_requester_only() {
    let mut controller = GameController::new();
    let before = controller.state().clone();
    let directive = controller.handle_move("B-P1:F");
    assert_eq!(error_code(&directive), ErrorCode::NotYourTurn);
    assert_eq!(controller.state(), &before);
}

#[test]
fn invalid_moves_reply_with_a_generic_error_and_keep_state() {
    let mut controller = GameController::new();
    controller.handle_move("A-P1:F");
    let before = controller.state().clone();
    for raw in ["B-P1:R", "B-P1:B", "B-P9:F", "B-P1:FR", "nonsense"] {
        let directive = controller.handle_move(raw);
        assert_eq!(error_code(&directive), ErrorCode::InvalidMove, "{raw}");
        assert_eq!(controller.state(), &before, "{raw}");
    }
}

#[test]
fn turn_alternates_only_on_accepted_moves() {
    let mut controller = GameController::new();
    let script = [
        ("A-P1:F", Owner::B),
        ("A-P2:F", Owner::B),
        ("B-P1:L", Owner::B),
        ("B-P1:F", Owner::A),
        ("A-H1:F", Owner::B),
    ];
    for (raw, expected) in script {
        controller.handle_move(raw);
        assert_eq!(controller.state().current_player, expected, "after {raw}");
    }
    assert_eq!(controller.state().move_history.len(), 3);
}

#[test]
fn reset_restores_the_initial_layout() {
    let mut controller = GameController::new();
    controller.handle_move("A-P1:F");
    controller.handle_move("B-P1:F");
    let directive = controller.handle_reset();
    assert_eq!(controller.state(), &initial_layout());
    assert_eq!(
        directive,
        Directive::Broadcast(ServerEvent::update(&initial_layout()))
    );
}

#[test]
fn reset_clears_a_finished_game() {
    let mut state = initial_layout();
    for col in 0..5 {
        state.grid.clear(Position::new(4, col));
    }
    state.winner = Some(Owner::A);
    let mut controller = GameController::with_state(state);
    controller.handle_request(ClientRequest::NewGame);
    assert_eq!(controller.state().winner, None);
    assert!(controller.state().move_history.is_empty());
}

#[test]
fn requests_dispatch_to_moves_and_resets() {
    let mut controller = GameController::new();
    let directive = controller.handle_request(ClientRequest::Move {
        command: "A-P3:F".into(),
    });
    assert!(matches!(directive, Directive::Broadcast(ServerEvent::Update { .. })));
    controller.handle_request(ClientRequest::NewGame);
    assert_eq!(controller.state(), &initial_layout());
}

#[test]
fn snapshot_reflects_current_state() {
    let mut controller = GameController::new();
    controller.handle_move("A-P1:F");
    assert_eq!(&controller.snapshot_for_new_connection(), controller.state());
}

#[test]
fn history_limit_keeps_the_newest_entries_in_order() {
    let mut controller = GameController::new().with_history_limit(2);
    for raw in ["A-P1:F", "B-P1:F", "A-P1:R", "B-P1:R"] {
        controller.handle_move(raw);
    }
    assert_eq!(
        controller.state().move_history,
        ["A-P1 moved R", "B-P1 moved R"]
    );
}
