use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typeblast::display::RecordingDisplay;
use typeblast::language::{Difficulty, WordBank};
use typeblast::runtime::{
    ClockScheduler, FixedTicker, GameEvent, ManualClock, Runner, TestEventSource,
};
use typeblast::session::{Phase, Session, SessionParams};
use typeblast::word_generator::{GenerationPolicy, QuoteGenerator};

type HeadlessSession = Session<RecordingDisplay, ClockScheduler<ManualClock>>;

fn headless_session(seed: u64) -> (HeadlessSession, ManualClock) {
    let clock = ManualClock::new();
    let session = Session::new(
        QuoteGenerator::new(WordBank::builtin(), GenerationPolicy::Connected),
        ClockScheduler::new(clock.clone()),
        RecordingDisplay::new(),
    )
    .with_seed(seed);
    (session, clock)
}

// Drives a whole run through Runner/TestEventSource without a TTY.
// Every runner Tick advances the virtual clock by one second.
#[test]
fn headless_typing_flow_completes() {
    let (mut session, clock) = headless_session(11);
    session.start(SessionParams::new(3, Difficulty::Easy).unwrap());
    let first_word = session
        .state()
        .quote
        .split_whitespace()
        .next()
        .unwrap()
        .to_string();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    for c in first_word.chars() {
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
    drop(tx);

    for _ in 0..100u32 {
        match runner.step() {
            GameEvent::Tick => {
                clock.advance_secs(1);
                session.poll();
            }
            GameEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    session.type_char(c);
                }
            }
            GameEvent::Paste(text) => {
                session.on_paste(&text);
            }
            GameEvent::Resize => {}
        }
        if session.phase() == Phase::Ended {
            break;
        }
    }

    assert_eq!(session.phase(), Phase::Ended);
    assert_eq!(session.state().typed, first_word);
    let summary = session.summary().unwrap();
    assert_eq!(summary.correct_words, 1);
    assert_eq!(summary.accuracy_percent, 100);
    assert_eq!(summary.samples.len(), 3);
    assert_eq!(session.display().summaries().len(), 1);
}

#[test]
fn headless_paste_event_is_rejected() {
    let (mut session, _clock) = headless_session(2);
    session.start(SessionParams::new(30, Difficulty::Medium).unwrap());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(GameEvent::Paste(session.state().quote.clone()))
        .unwrap();

    match runner.step() {
        GameEvent::Paste(text) => {
            session.on_paste(&text);
        }
        other => panic!("expected paste, got {other:?}"),
    }

    assert!(session.state().typed.is_empty());
    assert_eq!(session.display().notices().len(), 1);
    assert_eq!(session.phase(), Phase::Running);
}
