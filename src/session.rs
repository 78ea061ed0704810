//! One timed play-through: Idle → Running → Ended.
//!
//! The session owns its quote generator, scheduler and display port. Nothing
//! is global, so any number of sessions can live side by side in tests.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::display::{DisplayPort, Stat};
use crate::error::{Error, Result};
use crate::language::Difficulty;
use crate::runtime::{Scheduler, TimerHandle};
use crate::score::{self, Outcome, ScoreSnapshot, WpmPolicy};
use crate::time_series::TimeSeriesPoint;
use crate::word_generator::QuoteGenerator;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
pub const IDLE_PROMPT: &str = "Press Enter to start the blast!";
pub const PASTE_NOTICE: &str = "Pasting is disabled! Please type the text manually.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// What a session is started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionParams {
    pub duration_secs: u32,
    pub difficulty: Difficulty,
}

impl SessionParams {
    pub fn new(duration_secs: u32, difficulty: Difficulty) -> Result<Self> {
        if duration_secs == 0 {
            return Err(Error::ZeroDuration);
        }
        Ok(Self {
            duration_secs,
            difficulty,
        })
    }

    /// Build from raw control values. Both must be present and the duration
    /// must be a positive integer; an unknown difficulty falls back to easy.
    pub fn parse(duration: Option<&str>, difficulty: Option<&str>) -> Result<Self> {
        let duration = duration.ok_or(Error::MissingSetting("duration"))?.trim();
        let difficulty = difficulty.ok_or(Error::MissingSetting("difficulty"))?;
        let duration_secs = duration
            .parse::<u32>()
            .map_err(|_| Error::InvalidDuration(duration.to_string()))?;

        Self::new(duration_secs, Difficulty::resolve(difficulty))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub duration_secs: u32,
    pub time_left_secs: u32,
    pub phase: Phase,
    pub quote: String,
    pub typed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteVerdict {
    /// The boundary must drop the paste before it reaches the input
    Rejected,
}

/// Final numbers, emitted once when the timer runs out
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub wpm: u32,
    pub accuracy_percent: u8,
    pub correct_words: usize,
    pub typed_chars: usize,
    pub duration_secs: u32,
    pub difficulty: Difficulty,
    pub wpm_policy: WpmPolicy,
    pub samples: Vec<TimeSeriesPoint>,
}

pub struct Session<D: DisplayPort, S: Scheduler> {
    generator: QuoteGenerator,
    scheduler: S,
    display: D,
    rng: StdRng,
    wpm_policy: WpmPolicy,
    state: SessionState,
    params: Option<SessionParams>,
    timer: Option<TimerHandle>,
    samples: Vec<TimeSeriesPoint>,
    summary: Option<Summary>,
}

impl<D: DisplayPort, S: Scheduler> Session<D, S> {
    pub fn new(generator: QuoteGenerator, scheduler: S, display: D) -> Self {
        let mut session = Self {
            generator,
            scheduler,
            display,
            rng: StdRng::from_entropy(),
            wpm_policy: WpmPolicy::default(),
            state: SessionState::default(),
            params: None,
            timer: None,
            samples: Vec::new(),
            summary: None,
        };
        session.publish_idle();
        session
    }

    pub fn with_wpm_policy(mut self, policy: WpmPolicy) -> Self {
        self.wpm_policy = policy;
        self
    }

    /// Make quote generation reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Begin a fresh run. Any interval left over from a previous run is
    /// cancelled before the new one is registered.
    pub fn start(&mut self, params: SessionParams) {
        self.cancel_timer();
        self.samples.clear();
        self.summary = None;

        let quote = self.generator.generate_for(params.difficulty, &mut self.rng);
        log::info!(
            "starting {}s {} session ({} quote, {} wpm policy)",
            params.duration_secs,
            params.difficulty,
            self.generator.policy(),
            self.wpm_policy
        );

        self.state = SessionState {
            duration_secs: params.duration_secs,
            time_left_secs: params.duration_secs,
            phase: Phase::Running,
            quote,
            typed: String::new(),
        };
        self.params = Some(params);

        self.display.render_quote(&self.state.quote, &[]);
        self.display.update_progress(0);
        self.display.update_stat(Stat::TimeLeft(self.state.time_left_secs));
        self.display.update_stat(Stat::Wpm(0));
        self.display.update_stat(Stat::Accuracy(100));
        self.display.set_input_enabled(true);

        self.timer = Some(self.scheduler.start_interval(TICK_PERIOD));
    }

    /// [`Session::start`] from raw control values. Bad values are logged and
    /// leave the session exactly as it was.
    pub fn try_start(&mut self, duration: Option<&str>, difficulty: Option<&str>) -> Result<()> {
        match SessionParams::parse(duration, difficulty) {
            Ok(params) => {
                self.start(params);
                Ok(())
            }
            Err(e) => {
                log::error!("cannot start session: {e}");
                Err(e)
            }
        }
    }

    /// Start again with `params`, or with the previous parameters when `None`.
    pub fn restart(&mut self, params: Option<SessionParams>) -> Result<()> {
        match params.or(self.params) {
            Some(p) => {
                self.start(p);
                Ok(())
            }
            None => {
                log::error!("restart requested before any session was started");
                Err(Error::NothingToRestart)
            }
        }
    }

    /// Back to Idle. The last parameters are kept for [`Session::restart`].
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.state = SessionState::default();
        self.samples.clear();
        self.summary = None;
        self.publish_idle();
    }

    /// One second of play. Does nothing unless Running.
    pub fn tick(&mut self) {
        if self.state.phase != Phase::Running {
            return;
        }

        self.state.time_left_secs = self.state.time_left_secs.saturating_sub(1);
        let elapsed = self.elapsed_secs();
        let snapshot = self.snapshot();

        self.display.update_stat(Stat::TimeLeft(self.state.time_left_secs));
        self.display.update_progress(self.progress_percent());
        self.display.update_stat(Stat::Wpm(snapshot.wpm));
        self.samples.push(TimeSeriesPoint::from_tick(elapsed, snapshot.wpm));

        if self.state.time_left_secs == 0 {
            self.finish();
        }
    }

    /// Run every tick the scheduler says is due. Returns how many ran.
    pub fn poll(&mut self) -> u32 {
        let Some(handle) = self.timer else {
            return 0;
        };

        let due = self.scheduler.take_due(handle);
        let mut ran = 0;
        for _ in 0..due {
            if self.state.phase != Phase::Running {
                break;
            }
            self.tick();
            ran += 1;
        }
        ran
    }

    /// Replace the typed attempt. Ignored unless Running.
    pub fn on_input(&mut self, text: &str) -> bool {
        if self.state.phase != Phase::Running {
            log::debug!("input ignored while {:?}", self.state.phase);
            return false;
        }

        self.state.typed = text.to_string();
        let outcomes = self.outcomes();
        let snapshot = self.snapshot();
        log::debug!(
            "typed {} chars [{}], accuracy {}%, wpm {}",
            self.state.typed.chars().count(),
            score::outcome_marks(&outcomes),
            snapshot.accuracy_percent,
            snapshot.wpm
        );

        self.display.render_quote(&self.state.quote, &outcomes);
        self.display.update_stat(Stat::Accuracy(snapshot.accuracy_percent));
        self.display.update_stat(Stat::Wpm(snapshot.wpm));
        true
    }

    pub fn type_char(&mut self, c: char) -> bool {
        let mut text = self.state.typed.clone();
        text.push(c);
        self.on_input(&text)
    }

    pub fn backspace(&mut self) -> bool {
        let mut text = self.state.typed.clone();
        if text.pop().is_none() {
            return false;
        }
        self.on_input(&text)
    }

    /// Pastes are always refused; the typed text never sees the payload.
    pub fn on_paste(&mut self, payload: &str) -> PasteVerdict {
        log::warn!(
            "rejected paste of {} chars while {:?}",
            payload.chars().count(),
            self.state.phase
        );
        self.display.notify(PASTE_NOTICE);
        PasteVerdict::Rejected
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn params(&self) -> Option<SessionParams> {
        self.params
    }

    pub fn wpm_policy(&self) -> WpmPolicy {
        self.wpm_policy
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn samples(&self) -> &[TimeSeriesPoint] {
        &self.samples
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_some_and(|handle| self.scheduler.is_active(handle))
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.state.duration_secs - self.state.time_left_secs
    }

    pub fn progress_percent(&self) -> u8 {
        if self.state.duration_secs == 0 {
            return 0;
        }
        (f64::from(self.elapsed_secs()) * 100.0 / f64::from(self.state.duration_secs)).round()
            as u8
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        score::grade(&self.state.quote, &self.state.typed)
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        score::snapshot(
            &self.state.quote,
            &self.state.typed,
            self.elapsed_secs(),
            self.state.duration_secs,
            self.wpm_policy,
        )
    }

    fn finish(&mut self) {
        self.cancel_timer();
        self.state.phase = Phase::Ended;
        self.display.set_input_enabled(false);

        let snapshot = self.snapshot();
        let summary = Summary {
            wpm: snapshot.wpm,
            accuracy_percent: snapshot.accuracy_percent,
            correct_words: score::correct_words(&self.state.quote, &self.state.typed),
            typed_chars: self.state.typed.trim().chars().count(),
            duration_secs: self.state.duration_secs,
            difficulty: self.params.map(|p| p.difficulty).unwrap_or_default(),
            wpm_policy: self.wpm_policy,
            samples: self.samples.clone(),
        };
        log::info!(
            "session over: {} wpm, {}% accuracy",
            summary.wpm,
            summary.accuracy_percent
        );

        self.display.show_summary(&summary);
        self.summary = Some(summary);
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn publish_idle(&mut self) {
        self.display.show_prompt(IDLE_PROMPT);
        self.display.update_progress(0);
        self.display.update_stat(Stat::TimeLeft(0));
        self.display.update_stat(Stat::Wpm(0));
        self.display.update_stat(Stat::Accuracy(100));
        self.display.set_input_enabled(false);
    }
}
