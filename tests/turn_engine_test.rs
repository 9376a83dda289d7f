//! Integration tests for the turn engine with scripted collaborators.

use std::sync::Arc;
use std::time::Duration;
use strictly_codenames::{
    Board, ChannelDisplay, Clue, ClueSource, DisplayEvent, EngineTiming, GameOutcome, GuessSource,
    ScriptedClueGiver, ScriptedGuesser, SessionFailure, TurnEngine, TurnPhase, WordRole,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

/// Five targets, two neutral words, one assassin.
fn board() -> Board {
    Board::with_roles([
        ("APPLE", WordRole::Target),
        ("EGG", WordRole::Neutral),
        ("BANANA", WordRole::Target),
        ("GRAPE", WordRole::Assassin),
        ("CHERRY", WordRole::Target),
        ("FIG", WordRole::Neutral),
        ("DATE", WordRole::Target),
        ("LEMON", WordRole::Target),
    ])
    .unwrap()
}

struct Harness {
    engine: TurnEngine,
    events: UnboundedReceiver<DisplayEvent>,
    clue_giver: Arc<ScriptedClueGiver>,
    guesser: Arc<ScriptedGuesser>,
}

fn harness(board: Board, clue_giver: ScriptedClueGiver, guesser: ScriptedGuesser) -> Harness {
    harness_with(board, clue_giver, guesser, EngineTiming::immediate(Duration::from_secs(5)))
}

fn harness_with(
    board: Board,
    clue_giver: ScriptedClueGiver,
    guesser: ScriptedGuesser,
    timing: EngineTiming,
) -> Harness {
    let clue_giver = Arc::new(clue_giver);
    let guesser = Arc::new(guesser);
    let (display, events) = ChannelDisplay::channel();
    let engine = TurnEngine::new(
        board,
        Arc::clone(&clue_giver) as Arc<dyn ClueSource>,
        Arc::clone(&guesser) as Arc<dyn GuessSource>,
        Arc::new(display),
        timing,
        CancellationToken::new(),
    );
    Harness {
        engine,
        events,
        clue_giver,
        guesser,
    }
}

fn drain(events: &mut UnboundedReceiver<DisplayEvent>) -> Vec<DisplayEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn resolved_words(events: &[DisplayEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            DisplayEvent::WordResolved(reveal) => Some(reveal.word().clone()),
            _ => None,
        })
        .collect()
}

/// Runs one full turn: clue, guesses, resolution.
async fn play_turn(engine: &mut TurnEngine) {
    for _ in 0..3 {
        engine.step().await;
        if matches!(engine.phase(), TurnPhase::Terminated(_)) {
            return;
        }
    }
}

#[tokio::test]
async fn test_wrong_guess_ends_turn() {
    let mut h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 3)]),
        ScriptedGuesser::new("guesses", [["APPLE", "BANANA", "EGG", "CHERRY"]]),
    );

    play_turn(&mut h.engine).await;

    assert_eq!(*h.engine.phase(), TurnPhase::AwaitingClue);
    let events = drain(&mut h.events);
    assert_eq!(resolved_words(&events), ["APPLE", "BANANA", "EGG"]);
    assert!(h.engine.board().is_unguessed("CHERRY"));
    assert_eq!(h.engine.board().remaining_targets().len(), 3);
}

#[tokio::test]
async fn test_turn_events_in_order() {
    let mut h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 1)]),
        ScriptedGuesser::new("guesses", [["FIG"]]),
    );

    play_turn(&mut h.engine).await;

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], DisplayEvent::TurnStarted { turn_index: 1 });
    assert_eq!(
        events[1],
        DisplayEvent::ClueRevealed {
            clue: "FRUIT".to_string(),
            count: 1
        }
    );
    assert_eq!(events[2], DisplayEvent::GuessStarted);
    match &events[3] {
        DisplayEvent::WordResolved(reveal) => {
            assert_eq!(reveal.word(), "FIG");
            assert_eq!(*reveal.role(), WordRole::Neutral);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_bonus_cap_stops_after_count_plus_one() {
    let mut h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 2)]),
        ScriptedGuesser::new("guesses", [["APPLE", "BANANA", "CHERRY", "DATE"]]),
    );

    play_turn(&mut h.engine).await;

    assert_eq!(*h.engine.phase(), TurnPhase::AwaitingClue);
    assert_eq!(resolved_words(&drain(&mut h.events)), ["APPLE", "BANANA", "CHERRY"]);
    assert!(h.engine.board().is_unguessed("DATE"));
}

#[tokio::test]
async fn test_assassin_truncates_batch() {
    let h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("PURPLE", 3)]),
        ScriptedGuesser::new("guesses", [["APPLE", "GRAPE", "BANANA"]]),
    );
    let mut events = h.events;

    let report = h.engine.run().await;

    assert_eq!(*report.outcome(), GameOutcome::LostAssassin);
    assert!(report.failure().is_none());
    assert_eq!(resolved_words(&drain(&mut events)), ["APPLE", "GRAPE"]);
    assert!(report.unguessed_words().contains("BANANA"));
}

#[tokio::test]
async fn test_win_detected_on_last_target() {
    let board = Board::with_roles([
        ("APPLE", WordRole::Target),
        ("BANANA", WordRole::Target),
        ("EGG", WordRole::Neutral),
        ("GRAPE", WordRole::Assassin),
    ])
    .unwrap();
    let h = harness(
        board,
        ScriptedClueGiver::new("clues", [Clue::new("YELLOW", 1), Clue::new("RED", 1)]),
        ScriptedGuesser::new("guesses", [vec!["BANANA", "EGG"], vec!["APPLE", "GRAPE"]]),
    );
    let mut events = h.events;

    let report = h.engine.run().await;

    assert_eq!(*report.outcome(), GameOutcome::Won);
    assert_eq!(report.turns_played(), 2);
    assert!(report.remaining_targets().is_empty());
    // The assassin after the winning guess is never resolved.
    assert!(report.unguessed_words().contains("GRAPE"));
    assert_eq!(resolved_words(&drain(&mut events)), ["BANANA", "EGG", "APPLE"]);
}

#[tokio::test]
async fn test_repeated_guess_is_ignored() {
    let mut h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("RED", 1), Clue::new("YELLOW", 1)]),
        ScriptedGuesser::new("guesses", [vec!["APPLE", "EGG"], vec!["apple", "BANANA"]]),
    );

    play_turn(&mut h.engine).await;
    play_turn(&mut h.engine).await;

    let events = drain(&mut h.events);
    assert_eq!(resolved_words(&events), ["APPLE", "EGG", "BANANA"]);
    assert_eq!(h.engine.board().unguessed_words().len(), 5);
}

#[tokio::test]
async fn test_off_board_guess_does_not_use_a_slot() {
    let board = Board::with_roles([
        ("APPLE", WordRole::Target),
        ("BANANA", WordRole::Target),
        ("CHERRY", WordRole::Target),
        ("EGG", WordRole::Neutral),
    ])
    .unwrap();
    let mut h = harness(
        board,
        ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 1)]),
        ScriptedGuesser::new("guesses", [["ZEBRA", "APPLE", "BANANA"]]),
    );

    play_turn(&mut h.engine).await;

    assert_eq!(*h.engine.phase(), TurnPhase::AwaitingClue);
    assert_eq!(resolved_words(&drain(&mut h.events)), ["APPLE", "BANANA"]);
    assert_eq!(h.engine.board().remaining_targets().len(), 1);
}

#[tokio::test]
async fn test_requests_reflect_board_progress() {
    let mut h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("RED", 1), Clue::new("YELLOW", 1)]),
        ScriptedGuesser::new("guesses", [vec!["APPLE", "EGG"], vec!["BANANA"]]),
    );

    play_turn(&mut h.engine).await;
    play_turn(&mut h.engine).await;

    let clue_requests = h.clue_giver.requests().await;
    assert_eq!(clue_requests.len(), 2);
    assert_eq!(clue_requests[0].target_words().len(), 5);
    assert!(clue_requests[0].clue_history().is_empty());
    assert!(!clue_requests[1].target_words().contains("APPLE"));
    assert_eq!(clue_requests[1].clue_history().len(), 1);
    assert_eq!(clue_requests[1].clue_history()[0].clue_word(), "RED");
    // Neutral words stay visible to the clue giver even once picked.
    assert!(clue_requests[1].neutral_words().contains("EGG"));

    let guess_requests = h.guesser.requests().await;
    assert_eq!(guess_requests[0].candidate_words().len(), 8);
    assert!(!guess_requests[1].candidate_words().contains("APPLE"));
    assert!(!guess_requests[1].candidate_words().contains("EGG"));
    assert_eq!(*guess_requests[1].target_count(), 1);
}

#[tokio::test]
async fn test_clue_timeout_aborts_without_mutation() {
    let h = harness_with(
        board(),
        ScriptedClueGiver::new("slow", [Clue::new("FRUIT", 2)]).with_delay(Duration::from_millis(300)),
        ScriptedGuesser::new("guesses", [["APPLE"]]),
        EngineTiming::immediate(Duration::from_millis(50)),
    );

    let report = h.engine.run().await;

    assert_eq!(*report.outcome(), GameOutcome::AbortedOnError);
    assert!(matches!(report.failure(), Some(SessionFailure::Clue(_))));
    assert!(report.clue_history().is_empty());
    assert_eq!(report.unguessed_words().len(), 8);
    assert!(h.guesser.requests().await.is_empty());
}

#[tokio::test]
async fn test_guess_timeout_aborts_without_mutation() {
    let h = harness_with(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 2)]),
        ScriptedGuesser::new("slow", [["APPLE"]]).with_delay(Duration::from_millis(300)),
        EngineTiming::immediate(Duration::from_millis(50)),
    );
    let mut events = h.events;

    let report = h.engine.run().await;

    assert_eq!(*report.outcome(), GameOutcome::AbortedOnError);
    assert!(matches!(report.failure(), Some(SessionFailure::Guess(_))));
    assert_eq!(report.turns_played(), 1);
    assert_eq!(report.unguessed_words().len(), 8);
    assert!(resolved_words(&drain(&mut events)).is_empty());
}

#[tokio::test]
async fn test_collaborator_error_aborts() {
    let h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 2)]),
        ScriptedGuesser::from_answers("broken", [Err("model offline".to_string())]),
    );

    let report = h.engine.run().await;

    assert_eq!(*report.outcome(), GameOutcome::AbortedOnError);
    match report.failure() {
        Some(SessionFailure::Guess(e)) => assert!(e.message.contains("model offline")),
        other => panic!("unexpected failure {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_before_start_makes_no_calls() {
    let clue_giver = Arc::new(ScriptedClueGiver::new("clues", [Clue::new("FRUIT", 2)]));
    let (display, _events) = ChannelDisplay::channel();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let engine = TurnEngine::new(
        board(),
        Arc::clone(&clue_giver) as Arc<dyn ClueSource>,
        Arc::new(ScriptedGuesser::new("guesses", Vec::<Vec<String>>::new())),
        Arc::new(display),
        EngineTiming::immediate(Duration::from_secs(5)),
        cancel,
    );

    let report = engine.run().await;

    assert_eq!(*report.outcome(), GameOutcome::AbortedOnError);
    assert_eq!(*report.failure(), Some(SessionFailure::Cancelled));
    assert!(clue_giver.requests().await.is_empty());
}

#[tokio::test]
async fn test_zero_count_clue_allows_one_guess() {
    let mut h = harness(
        board(),
        ScriptedClueGiver::new("clues", [Clue::new("NOTHING", 0)]),
        ScriptedGuesser::new("guesses", [["APPLE", "BANANA"]]),
    );

    play_turn(&mut h.engine).await;

    assert_eq!(resolved_words(&drain(&mut h.events)), ["APPLE"]);
    assert!(h.engine.board().is_unguessed("BANANA"));
}
