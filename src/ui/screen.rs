use ratatui::Frame;

use typeblast::session::Phase;

use crate::ui::{render_idle, render_summary, render_typing};
use crate::App;

/// A UI Screen boundary: responsible for rendering one session phase
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Settings selectors and the start prompt
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_idle(app, f);
    }
}

/// Quote, live stats and the attempt box
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_typing(app, f);
    }
}

/// Finished run with the summary overlay on top
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_summary(app, f);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(IdleScreen),
        Phase::Running => Box::new(TypingScreen),
        Phase::Ended => Box::new(SummaryScreen),
    }
}
