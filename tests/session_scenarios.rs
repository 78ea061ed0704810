use assert_matches::assert_matches;
use std::fs;
use tempfile::tempdir;

use typeblast::display::RecordingDisplay;
use typeblast::language::{Difficulty, WordBank};
use typeblast::runtime::{ClockScheduler, ManualClock, Scheduler};
use typeblast::score::WpmPolicy;
use typeblast::session::{Phase, Session, SessionParams, PASTE_NOTICE};
use typeblast::word_generator::{GenerationPolicy, QuoteGenerator, DEFAULT_QUOTE};
use typeblast::Error;

type ScenarioSession = Session<RecordingDisplay, ClockScheduler<ManualClock>>;

fn scenario(
    bank: WordBank,
    generation: GenerationPolicy,
    wpm: WpmPolicy,
) -> (ScenarioSession, ManualClock) {
    let clock = ManualClock::new();
    let session = Session::new(
        QuoteGenerator::new(bank, generation),
        ClockScheduler::new(clock.clone()),
        RecordingDisplay::new(),
    )
    .with_wpm_policy(wpm)
    .with_seed(5);
    (session, clock)
}

fn default_scenario() -> (ScenarioSession, ManualClock) {
    scenario(
        WordBank::builtin(),
        GenerationPolicy::Connected,
        WpmPolicy::ElapsedNormalized,
    )
}

fn first_words(quote: &str, n: usize) -> String {
    quote.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

fn run_out(session: &mut ScenarioSession, clock: &ManualClock, secs: u64) {
    for _ in 0..secs {
        clock.advance_secs(1);
        session.poll();
    }
}

#[test]
fn time_left_counts_down_to_zero_and_stops() {
    let (mut session, clock) = default_scenario();
    session.start(SessionParams::new(15, Difficulty::Easy).unwrap());

    for n in 1..=20u32 {
        clock.advance_secs(1);
        session.poll();
        assert_eq!(session.state().time_left_secs, 15u32.saturating_sub(n));
    }

    assert_eq!(session.phase(), Phase::Ended);
    assert!(!session.timer_active());
    assert_eq!(session.scheduler().active_count(), 0);
    assert_eq!(session.display().summaries().len(), 1);
    assert_eq!(session.display().input_enabled(), Some(false));
    assert_eq!(session.display().last_progress(), Some(100));
}

#[test]
fn late_poll_catches_up_without_overshooting() {
    let (mut session, clock) = default_scenario();
    session.start(SessionParams::new(15, Difficulty::Easy).unwrap());

    clock.advance_secs(40);
    assert_eq!(session.poll(), 15);
    assert_eq!(session.state().time_left_secs, 0);
    assert_eq!(session.samples().len(), 15);
}

#[test]
fn unknown_difficulty_plays_easy() {
    let (mut session, _clock) = default_scenario();

    session.try_start(Some("30"), Some("extreme")).unwrap();

    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.params().unwrap().difficulty, Difficulty::Easy);
    assert!(!session.state().quote.is_empty());
}

#[test]
fn invalid_duration_leaves_session_untouched() {
    let (mut session, _clock) = default_scenario();

    assert_matches!(
        session.try_start(Some("half a minute"), Some("easy")),
        Err(Error::InvalidDuration(_))
    );
    assert_matches!(
        session.try_start(Some("0"), Some("easy")),
        Err(Error::ZeroDuration)
    );
    assert_matches!(session.restart(None), Err(Error::NothingToRestart));

    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.scheduler().active_count(), 0);
}

#[test]
fn paste_never_reaches_the_attempt() {
    let (mut session, _clock) = default_scenario();
    session.start(SessionParams::new(30, Difficulty::Hard).unwrap());
    session.type_char('a');

    let quote = session.state().quote.clone();
    session.on_paste(&quote);

    assert_eq!(session.state().typed, "a");
    assert_eq!(session.display().notices(), vec![PASTE_NOTICE]);
}

#[test]
fn restart_mid_run_keeps_one_timer() {
    let (mut session, clock) = default_scenario();
    session.start(SessionParams::new(30, Difficulty::Easy).unwrap());
    run_out(&mut session, &clock, 10);
    session.on_input("some words");

    session.restart(None).unwrap();
    assert_eq!(session.scheduler().active_count(), 1);
    assert_eq!(session.state().time_left_secs, 30);
    assert!(session.state().typed.is_empty());

    // the old interval must not tick the new run twice
    clock.advance_secs(1);
    assert_eq!(session.poll(), 1);
    assert_eq!(session.state().time_left_secs, 29);
}

#[test]
fn wpm_policies_differ_on_short_runs() {
    for (policy, expected) in [
        (WpmPolicy::ElapsedNormalized, 12),
        (WpmPolicy::DurationScaled, 3),
    ] {
        let (mut session, clock) =
            scenario(WordBank::builtin(), GenerationPolicy::Connected, policy);
        session.start(SessionParams::new(15, Difficulty::Easy).unwrap());
        let typed = first_words(&session.state().quote, 3);
        session.on_input(&typed);

        run_out(&mut session, &clock, 15);

        let summary = session.summary().unwrap();
        assert_eq!(summary.correct_words, 3, "{policy}");
        assert_eq!(summary.wpm, expected, "{policy}");
        assert_eq!(summary.accuracy_percent, 100, "{policy}");
    }
}

#[test]
fn thirty_second_run_doubles_under_duration_scaling() {
    let (mut session, clock) = scenario(
        WordBank::builtin(),
        GenerationPolicy::Fixed,
        WpmPolicy::DurationScaled,
    );
    session.start(SessionParams::new(30, Difficulty::Medium).unwrap());
    let typed = first_words(&session.state().quote, 4);
    session.on_input(&typed);

    run_out(&mut session, &clock, 30);

    assert_eq!(session.summary().unwrap().wpm, 8);
}

#[test]
fn custom_word_bank_with_fallback() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bank.json");
    fs::write(&path, r#"{"easy": ["zip"], "hard": []}"#).unwrap();

    let bank = WordBank::from_path(&path)
        .unwrap()
        .with_fallback(&WordBank::builtin());
    assert!(bank.validate().is_ok());

    let (mut session, _clock) = scenario(bank, GenerationPolicy::Fixed, WpmPolicy::default());
    session.start(SessionParams::new(30, Difficulty::Easy).unwrap());

    let quote = session.state().quote.clone();
    assert!(quote.starts_with("Zip zip"));
    assert!(quote.ends_with("zip."));
    assert_eq!(quote.split_whitespace().count(), 50);
}

#[test]
fn empty_bank_falls_back_to_default_quote() {
    let (mut session, _clock) = scenario(
        WordBank::default(),
        GenerationPolicy::Connected,
        WpmPolicy::default(),
    );
    session.start(SessionParams::new(30, Difficulty::Hard).unwrap());

    assert_eq!(session.state().quote, DEFAULT_QUOTE);
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn reset_then_restart_reuses_last_params() {
    let (mut session, _clock) = default_scenario();
    session.start(SessionParams::new(60, Difficulty::Medium).unwrap());

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.scheduler().active_count(), 0);

    session.restart(None).unwrap();
    assert_eq!(session.state().duration_secs, 60);
    assert_eq!(session.params().unwrap().difficulty, Difficulty::Medium);
}
