use super::*;

#[test]
fn websocket_urls_pass_through() {
    let url = parse_server_url("ws://127.0.0.1:8081/ws").expect("url");
    assert_eq!(url.as_str(), "ws://127.0.0.1:8081/ws");
}

#[test]
fn http_urls_become_websocket_urls() {
    let url = parse_server_url("http://localhost:8081").expect("url");
    assert_eq!(url.as_str(), "ws://localhost:8081/ws");

    let url = parse_server_url("https://example.com/game").expect("url");
    assert_eq!(url.as_str(), "wss://example.com/game");
}

#[test]
fn other_schemes_are_refused() {
    assert!(parse_server_url("ftp://example.com").is_err());
    assert!(parse_server_url("not a url").is_err());
}

#[test]
fn cli_parses_move_subcommand() {
    let cli = Cli::try_parse_from(["boardctl", "move", "A-P1:F"]).expect("cli");
    assert_eq!(cli.server_url, "ws://127.0.0.1:8081/ws");
    assert!(matches!(cli.command, Command::Move { command } if command == "A-P1:F"));
}

#[tokio::test]
async fn next_event_skips_control_frames() {
    let frames = futures::stream::iter(vec![
        Ok::<_, std::io::Error>(Message::Ping(Vec::new())),
        Ok(Message::Text(r#"{"type":"error","code":"invalid_move","message":"Invalid move"}"#.into())),
    ]);
    let mut frames = Box::pin(frames);
    let event = next_event(&mut frames).await.expect("event");
    assert!(matches!(event, ServerEvent::Error(_)));

    let mut empty = futures::stream::iter(Vec::<Result<Message, std::io::Error>>::new());
    assert!(next_event(&mut empty).await.is_err());
}

fn update_after(history: &[&str]) -> ServerEvent {
    let mut game = shared::domain::initial_layout();
    game.move_history = history.iter().map(|entry| entry.to_string()).collect();
    ServerEvent::update(&game)
}

#[test]
fn move_answer_is_the_update_ending_with_that_move() {
    assert!(answers_move(&update_after(&["A-P1 moved F"]), "A-P1:F"));
    assert!(answers_move(&update_after(&["A-P1 moved F", "B-H2 moved FL"]), "B-H2:FL"));
    assert!(answers_move(
        &ServerEvent::Error(shared::error::ApiError::invalid_move()),
        "A-P1:F"
    ));

    // Someone else's move, a reset, or the init frame are not the answer.
    assert!(!answers_move(&update_after(&["A-P2 moved F"]), "A-P1:F"));
    assert!(!answers_move(&update_after(&["A-P1 moved F", "B-P1 moved F"]), "A-P1:F"));
    assert!(!answers_move(&update_after(&[]), "A-P1:F"));
    assert!(!answers_move(&ServerEvent::init(&shared::domain::initial_layout()), "A-P1:F"));
}

#[test]
fn reset_answer_is_an_update_with_no_history() {
    assert!(answers_reset(&update_after(&[])));
    assert!(!answers_reset(&update_after(&["A-P1 moved F"])));
}

#[tokio::test]
async fn next_reply_skips_other_sessions_updates() {
    let other = serde_json::to_string(&update_after(&["B-P1 moved F"])).expect("json");
    let ours = serde_json::to_string(&update_after(&["B-P1 moved F", "A-P1 moved F"])).expect("json");
    let mut frames = futures::stream::iter(vec![
        Ok::<_, std::io::Error>(Message::Text(other)),
        Ok(Message::Text(ours)),
    ]);
    let event = next_reply(&mut frames, |event| answers_move(event, "A-P1:F"))
        .await
        .expect("event");
    let ServerEvent::Update { move_history, .. } = event else {
        panic!("expected an update, got {event:?}");
    };
    assert_eq!(move_history, ["B-P1 moved F", "A-P1 moved F"]);
}
