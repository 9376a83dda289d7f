//! Integration tests for the game session lifecycle.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use strictly_codenames::{
    Board, BoardLayout, ChannelDisplay, Clue, Collaborators, DisplayEvent, EngineTiming,
    GameEnding, GameOutcome, GameSession, ScriptedClueGiver, ScriptedGuesser, SessionErrorKind,
    SessionFailure, WordPool, WordRole,
};
use tokio::sync::mpsc::UnboundedReceiver;

fn small_board() -> Board {
    Board::with_roles([
        ("MOON", WordRole::Target),
        ("SUN", WordRole::Target),
        ("ROCK", WordRole::Neutral),
        ("BOMB", WordRole::Assassin),
    ])
    .unwrap()
}

fn collaborators(
    clue_giver: ScriptedClueGiver,
    guesser: ScriptedGuesser,
) -> (Collaborators, UnboundedReceiver<DisplayEvent>) {
    let (display, events) = ChannelDisplay::channel();
    (
        Collaborators::new(Arc::new(clue_giver), Arc::new(guesser), Arc::new(display)),
        events,
    )
}

fn drain(events: &mut UnboundedReceiver<DisplayEvent>) -> Vec<DisplayEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn endings(events: &[DisplayEvent]) -> Vec<GameEnding> {
    events
        .iter()
        .filter_map(|event| match event {
            DisplayEvent::GameEnded(ending) => Some(ending.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_session_plays_to_win_and_reports_once() {
    let (collaborators, mut events) = collaborators(
        ScriptedClueGiver::new("clues", [Clue::new("SKY", 2)]),
        ScriptedGuesser::new("guesses", [["moon", "sun"]]),
    );
    let session = GameSession::new(
        small_board(),
        collaborators,
        EngineTiming::immediate(Duration::from_secs(5)),
    );

    let report = session.run().await.unwrap();

    assert_eq!(*report.outcome(), GameOutcome::Won);
    assert_eq!(report.turns_played(), 1);

    let events = drain(&mut events);
    assert_eq!(endings(&events), [GameEnding::Won]);
    assert_eq!(events.last(), Some(&DisplayEvent::GameEnded(GameEnding::Won)));
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let (collaborators, _events) = collaborators(
        ScriptedClueGiver::new("clues", [Clue::new("SKY", 2)]),
        ScriptedGuesser::new("guesses", [["MOON", "SUN"]]),
    );
    let mut session = GameSession::new(
        small_board(),
        collaborators,
        EngineTiming::immediate(Duration::from_secs(5)),
    );

    assert!(!session.is_started());
    session.start().unwrap();
    assert!(session.is_started());
    assert!(session.board().is_none());

    let err = session.start().unwrap_err();
    assert_eq!(*err.kind(), SessionErrorKind::AlreadyStarted);

    let report = session.wait().await.unwrap();
    assert_eq!(*report.outcome(), GameOutcome::Won);
}

#[tokio::test]
async fn test_wait_without_start_is_error() {
    let (collaborators, _events) = collaborators(
        ScriptedClueGiver::new("clues", Vec::<Clue>::new()),
        ScriptedGuesser::new("guesses", Vec::<Vec<String>>::new()),
    );
    let mut session = GameSession::new(
        small_board(),
        collaborators,
        EngineTiming::immediate(Duration::from_secs(5)),
    );

    let err = session.wait().await.unwrap_err();
    assert_eq!(*err.kind(), SessionErrorKind::NotRunning);
}

#[tokio::test]
async fn test_stop_discards_in_flight_guesses() {
    let (collaborators, mut events) = collaborators(
        ScriptedClueGiver::new("clues", [Clue::new("SKY", 2)]),
        ScriptedGuesser::new("slow", [["MOON", "SUN"]]).with_delay(Duration::from_millis(300)),
    );
    let mut session = GameSession::new(
        small_board(),
        collaborators,
        EngineTiming::immediate(Duration::from_secs(5)),
    );

    session.start().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.stop();

    let report = session.wait().await.unwrap();

    assert_eq!(*report.outcome(), GameOutcome::AbortedOnError);
    assert_eq!(*report.failure(), Some(SessionFailure::Cancelled));
    assert_eq!(report.unguessed_words().len(), 4);
    assert_eq!(report.remaining_targets().len(), 2);

    let events = drain(&mut events);
    assert!(!events.iter().any(|e| matches!(e, DisplayEvent::WordResolved(_))));
    assert_eq!(endings(&events), [GameEnding::Aborted(SessionFailure::Cancelled)]);
}

#[tokio::test]
async fn test_timeout_reaches_display_as_abort() {
    let (collaborators, mut events) = collaborators(
        ScriptedClueGiver::new("slow", [Clue::new("SKY", 2)]).with_delay(Duration::from_millis(300)),
        ScriptedGuesser::new("guesses", [["MOON", "SUN"]]),
    );
    let session = GameSession::new(
        small_board(),
        collaborators,
        EngineTiming::immediate(Duration::from_millis(50)),
    );

    let report = session.run().await.unwrap();

    assert_eq!(*report.outcome(), GameOutcome::AbortedOnError);
    let endings = endings(&drain(&mut events));
    assert_eq!(endings.len(), 1);
    assert!(matches!(
        &endings[0],
        GameEnding::Aborted(SessionFailure::Clue(_))
    ));
}

#[tokio::test]
async fn test_setup_builds_board_from_pool() {
    let pool = WordPool::from_words((0..30).map(|i| format!("word{i}")));
    let (collaborators, _events) = collaborators(
        ScriptedClueGiver::new("clues", Vec::<Clue>::new()),
        ScriptedGuesser::new("guesses", Vec::<Vec<String>>::new()),
    );
    let mut rng = StdRng::seed_from_u64(11);

    let session = GameSession::setup(
        &pool,
        BoardLayout::default(),
        &mut rng,
        collaborators,
        EngineTiming::default(),
    )
    .unwrap();

    let board = session.board().unwrap();
    assert_eq!(board.all_words().len(), 16);
    assert_eq!(board.remaining_targets().len(), 8);
}

#[tokio::test]
async fn test_setup_fails_on_small_pool() {
    let pool = WordPool::from_words(["ONE", "TWO", "THREE"]);
    let (collaborators, _events) = collaborators(
        ScriptedClueGiver::new("clues", Vec::<Clue>::new()),
        ScriptedGuesser::new("guesses", Vec::<Vec<String>>::new()),
    );
    let mut rng = StdRng::seed_from_u64(1);

    let result = GameSession::setup(
        &pool,
        BoardLayout::default(),
        &mut rng,
        collaborators,
        EngineTiming::default(),
    );
    assert!(result.is_err());
}
