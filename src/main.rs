mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, File},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use typeblast::{
    app_dirs::AppDirs,
    config::{self, Config, ConfigStore, FileConfigStore},
    language::{Difficulty, WordBank},
    runtime::{ClockScheduler, CrosstermEventSource, FixedTicker, GameEvent, Runner, SystemClock},
    score::WpmPolicy,
    session::{Phase, Session, SessionParams},
    word_generator::{GenerationPolicy, QuoteGenerator},
};

use crate::ui::Board;

const TICK_RATE_MS: u64 = 100;

/// timed typing-speed game: retype the quote before the clock runs out
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A timed typing game. Pick a difficulty and a duration, retype the generated quote, and get your words per minute and accuracy when the clock runs out."
)]
pub struct Cli {
    /// session length in seconds
    #[clap(short = 's', long)]
    duration: Option<String>,

    /// word tier: easy, medium or hard (anything else plays easy)
    #[clap(short = 'd', long)]
    difficulty: Option<String>,

    /// how quotes are assembled
    #[clap(short = 'g', long, value_enum)]
    generation: Option<GenerationPolicy>,

    /// how correct words turn into words per minute
    #[clap(long, value_enum)]
    wpm_policy: Option<WpmPolicy>,

    /// json file with custom "easy", "medium" and "hard" word lists
    #[clap(short = 'w', long)]
    word_bank: Option<PathBuf>,

    /// seed for reproducible quotes
    #[clap(long)]
    seed: Option<u64>,

    /// log verbosity written to the log file (overrides RUST_LOG)
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
}

impl Cli {
    /// Layer the command line over stored settings
    fn apply(&self, stored: Config) -> typeblast::Result<Config> {
        let duration = self
            .duration
            .clone()
            .unwrap_or_else(|| stored.duration_secs.to_string());
        let difficulty = self
            .difficulty
            .clone()
            .unwrap_or_else(|| stored.difficulty.to_string());
        let params = SessionParams::parse(Some(&duration), Some(&difficulty))?;

        Ok(Config {
            duration_secs: params.duration_secs,
            difficulty: params.difficulty,
            generation: self.generation.unwrap_or(stored.generation),
            wpm_policy: self.wpm_policy.unwrap_or(stored.wpm_policy),
            word_bank: self.word_bank.clone().or(stored.word_bank),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

type TerminalSession = Session<Board, ClockScheduler<SystemClock>>;

pub struct App {
    pub session: TerminalSession,
    pub difficulty: Difficulty,
    pub duration_secs: u32,
    config: Config,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let generator = QuoteGenerator::new(load_word_bank(&config), config.generation);
        let mut session = Session::new(
            generator,
            ClockScheduler::new(SystemClock::new()),
            Board::default(),
        )
        .with_wpm_policy(config.wpm_policy);
        if let Some(seed) = seed {
            session = session.with_seed(seed);
        }

        Self {
            session,
            difficulty: config.difficulty,
            duration_secs: config.duration_secs,
            config,
        }
    }

    pub fn selected_params(&self) -> Option<SessionParams> {
        match SessionParams::new(self.duration_secs, self.difficulty) {
            Ok(params) => Some(params),
            Err(e) => {
                log::error!("invalid selection: {e}");
                None
            }
        }
    }

    /// Settings to persist on exit
    pub fn settings(&self) -> Config {
        Config {
            duration_secs: self.duration_secs,
            difficulty: self.difficulty,
            wpm_policy: self.session.wpm_policy(),
            ..self.config.clone()
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        // a steady stream of keys never lets the runner tick
        self.session.poll();

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            return Control::Quit;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('r') => self.start_selected(),
                KeyCode::Char('n') => self.session.reset(),
                KeyCode::Char('v') => {
                    self.session.on_paste("");
                }
                _ => {}
            }
            return Control::Continue;
        }

        match self.session.phase() {
            Phase::Running => match key.code {
                KeyCode::Char(c) => {
                    self.session.type_char(c);
                }
                KeyCode::Backspace => {
                    self.session.backspace();
                }
                _ => {}
            },
            Phase::Idle | Phase::Ended => match key.code {
                KeyCode::Enter => self.start_selected(),
                KeyCode::Left => self.duration_secs = config::prev_duration(self.duration_secs),
                KeyCode::Right => self.duration_secs = config::next_duration(self.duration_secs),
                KeyCode::Up => self.difficulty = self.difficulty.prev(),
                KeyCode::Down => self.difficulty = self.difficulty.next(),
                _ => {}
            },
        }
        Control::Continue
    }

    pub fn on_paste(&mut self, text: &str) {
        self.session.poll();
        self.session.on_paste(text);
    }

    /// Returns whether the screen needs redrawing
    pub fn on_tick(&mut self) -> bool {
        let ticked = self.session.poll() > 0;
        let expired = self.session.display_mut().expire_notice();
        ticked || expired
    }

    fn start_selected(&mut self) {
        if let Some(params) = self.selected_params() {
            if let Err(e) = self.session.restart(Some(params)) {
                log::error!("could not start: {e}");
            }
        }
    }
}

fn load_word_bank(config: &Config) -> WordBank {
    let builtin = WordBank::builtin();
    let Some(path) = config.word_bank.as_ref() else {
        return builtin;
    };

    match WordBank::from_path(path) {
        Ok(bank) => {
            log::info!("using word bank {}", path.display());
            bank.with_fallback(&builtin)
        }
        Err(e) => {
            log::error!("{e}; using built-in word bank");
            builtin
        }
    }
}

fn init_logging(level: Option<log::LevelFilter>) {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(log_file) = File::create(&path) else {
        return;
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = match cli.apply(store.load()) {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, cli.seed);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = store.save(&app.settings()) {
        log::warn!("could not save settings to {}: {e}", store.path().display());
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let redraw = match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => true,
            GameEvent::Paste(text) => {
                app.on_paste(&text);
                true
            }
            GameEvent::Key(key) => match app.on_key(key) {
                Control::Quit => break,
                Control::Continue => true,
            },
        };

        if redraw {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use typeblast::runtime::Scheduler;
    use typeblast::session::PASTE_NOTICE;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn create_test_app() -> App {
        App::new(Config::default(), Some(7))
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["typeblast"]).unwrap();

        assert_eq!(cli.duration, None);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.generation, None);
        assert_eq!(cli.wpm_policy, None);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "typeblast",
            "-s",
            "60",
            "-d",
            "hard",
            "-g",
            "fixed",
            "--wpm-policy",
            "duration-scaled",
            "--seed",
            "3",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.duration.as_deref(), Some("60"));
        assert_eq!(cli.difficulty.as_deref(), Some("hard"));
        assert_eq!(cli.generation, Some(GenerationPolicy::Fixed));
        assert_eq!(cli.wpm_policy, Some(WpmPolicy::DurationScaled));
        assert_eq!(cli.seed, Some(3));
        assert_eq!(cli.log_level, Some(log::LevelFilter::Debug));
    }

    #[test]
    fn test_cli_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["typeblast", "--wpm-policy", "fastest"]).is_err());
    }

    #[test]
    fn test_cli_apply_overrides_stored() {
        let cli = Cli {
            duration: Some("120".into()),
            wpm_policy: Some(WpmPolicy::DurationScaled),
            ..Cli::default()
        };
        let stored = Config {
            difficulty: Difficulty::Medium,
            ..Config::default()
        };

        let config = cli.apply(stored).unwrap();

        assert_eq!(config.duration_secs, 120);
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.wpm_policy, WpmPolicy::DurationScaled);
        assert_eq!(config.generation, GenerationPolicy::Connected);
    }

    #[test]
    fn test_cli_apply_unknown_difficulty_plays_easy() {
        let cli = Cli {
            difficulty: Some("extreme".into()),
            ..Cli::default()
        };
        let config = cli.apply(Config::default()).unwrap();
        assert_eq!(config.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_cli_apply_rejects_bad_duration() {
        let bad = Cli {
            duration: Some("soon".into()),
            ..Cli::default()
        };
        assert!(bad.apply(Config::default()).is_err());

        let zero = Cli {
            duration: Some("0".into()),
            ..Cli::default()
        };
        assert!(zero.apply(Config::default()).is_err());
    }

    #[test]
    fn test_app_starts_idle() {
        let app = create_test_app();

        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.duration_secs, 30);
        assert_eq!(app.difficulty, Difficulty::Easy);
        assert!(!app.session.display().input_enabled);
    }

    #[test]
    fn test_enter_starts_session() {
        let mut app = create_test_app();

        assert_eq!(app.on_key(key(KeyCode::Enter)), Control::Continue);

        assert_eq!(app.session.phase(), Phase::Running);
        assert!(app.session.display().input_enabled);
        assert_eq!(app.session.display().time_left, 30);
        assert!(app.session.display().quote.is_some());
    }

    #[test]
    fn test_selectors_cycle_only_between_runs() {
        let mut app = create_test_app();

        app.on_key(key(KeyCode::Right));
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.duration_secs, 60);
        assert_eq!(app.difficulty, Difficulty::Medium);

        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Right));
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.duration_secs, 60);
        assert_eq!(app.difficulty, Difficulty::Medium);
        assert_eq!(app.session.state().duration_secs, 60);
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut app = create_test_app();
        app.on_key(key(KeyCode::Enter));
        let first: String = app.session.state().quote.chars().take(3).collect();

        for c in first.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
        app.on_key(key(KeyCode::Char('#')));
        assert_eq!(app.session.state().typed, format!("{first}#"));
        assert_eq!(app.session.display().accuracy, 75);

        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.session.state().typed, first);
        assert_eq!(app.session.display().accuracy, 100);
    }

    #[test]
    fn test_typing_ignored_when_idle() {
        let mut app = create_test_app();
        app.on_key(key(KeyCode::Char('a')));
        assert!(app.session.state().typed.is_empty());
    }

    #[test]
    fn test_paste_is_rejected() {
        let mut app = create_test_app();
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('x')));

        let quote = app.session.state().quote.clone();
        app.on_paste(&quote);
        app.on_key(ctrl('v'));

        assert_eq!(app.session.state().typed, "x");
        assert_eq!(app.session.display().active_notice(), Some(PASTE_NOTICE));
    }

    #[test]
    fn test_ctrl_n_returns_to_idle_and_ctrl_r_restarts() {
        let mut app = create_test_app();
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('x')));

        app.on_key(ctrl('n'));
        assert_eq!(app.session.phase(), Phase::Idle);
        assert!(app.session.display().quote.is_none());

        app.on_key(ctrl('r'));
        assert_eq!(app.session.phase(), Phase::Running);
        assert!(app.session.state().typed.is_empty());
        assert_eq!(app.session.scheduler().active_count(), 1);
    }

    #[test]
    fn test_keys_after_time_runs_out_are_dropped() {
        let config = Config {
            duration_secs: 1,
            ..Config::default()
        };
        let mut app = App::new(config, Some(7));
        app.on_key(key(KeyCode::Enter));

        std::thread::sleep(Duration::from_millis(1300));
        for c in "late".chars() {
            app.on_key(key(KeyCode::Char(c)));
        }

        assert_eq!(app.session.phase(), Phase::Ended);
        assert!(app.session.state().typed.is_empty());
        assert_eq!(app.session.state().time_left_secs, 0);
        assert_eq!(app.session.summary().map(|s| s.typed_chars), Some(0));
        assert!(!app.session.display().input_enabled);
    }

    #[test]
    fn test_paste_after_time_runs_out_still_ends_run() {
        let config = Config {
            duration_secs: 1,
            ..Config::default()
        };
        let mut app = App::new(config, Some(7));
        app.on_key(key(KeyCode::Enter));

        std::thread::sleep(Duration::from_millis(1300));
        app.on_paste("late");

        assert_eq!(app.session.phase(), Phase::Ended);
        assert!(app.session.state().typed.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = create_test_app();
        assert_eq!(app.on_key(key(KeyCode::Esc)), Control::Quit);
        assert_eq!(app.on_key(ctrl('c')), Control::Quit);
    }

    #[test]
    fn test_on_tick_without_elapsed_time() {
        let mut app = create_test_app();
        app.on_key(key(KeyCode::Enter));
        assert!(!app.on_tick());
        assert_eq!(app.session.state().time_left_secs, 30);
    }

    #[test]
    fn test_settings_reflect_selection() {
        let mut app = create_test_app();
        app.on_key(key(KeyCode::Left));
        app.on_key(key(KeyCode::Up));

        let settings = app.settings();

        assert_eq!(settings.duration_secs, 15);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.wpm_policy, WpmPolicy::ElapsedNormalized);
    }

    #[test]
    fn test_settings_keep_session_wpm_policy() {
        let config = Config {
            wpm_policy: WpmPolicy::DurationScaled,
            ..Config::default()
        };
        let app = App::new(config, None);

        assert_eq!(app.session.wpm_policy(), WpmPolicy::DurationScaled);
        assert_eq!(app.settings().wpm_policy, WpmPolicy::DurationScaled);
    }

    #[test]
    fn test_load_word_bank_falls_back_on_missing_file() {
        let config = Config {
            word_bank: Some(PathBuf::from("/no/such/bank.json")),
            ..Config::default()
        };
        let bank = load_word_bank(&config);
        assert!(bank.validate().is_ok());
    }

    #[test]
    fn test_draw_every_phase() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = create_test_app();

        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('q')));
        terminal.draw(|f| ui::draw(&app, f)).unwrap();

        // run the clock out by hand
        for _ in 0..30 {
            app.session.tick();
        }
        assert_eq!(app.session.phase(), Phase::Ended);
        assert!(app.session.display().summary.is_some());
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
    }
}
