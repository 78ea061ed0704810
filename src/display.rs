use crate::score::Outcome;
use crate::session::Summary;

/// A single numeric readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    TimeLeft(u32),
    Wpm(u32),
    Accuracy(u8),
}

/// Everything the game core needs from whatever draws it. Implementations
/// that lack a surface for a call simply ignore it.
pub trait DisplayPort {
    /// Show the quote with outcomes for the first `outcomes.len()` characters
    fn render_quote(&mut self, quote: &str, outcomes: &[Outcome]);
    /// Placeholder text shown instead of a quote
    fn show_prompt(&mut self, message: &str);
    fn update_progress(&mut self, percent: u8);
    fn update_stat(&mut self, stat: Stat);
    fn set_input_enabled(&mut self, enabled: bool);
    fn show_summary(&mut self, summary: &Summary);
    /// Transient notice for the player
    fn notify(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    RenderQuote(String, Vec<Outcome>),
    ShowPrompt(String),
    UpdateProgress(u8),
    UpdateStat(Stat),
    SetInputEnabled(bool),
    ShowSummary(Summary),
    Notify(String),
}

/// Keeps every call in order, for headless tests
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn last_progress(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::UpdateProgress(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_stat<F>(&self, pick: F) -> Option<u32>
    where
        F: Fn(&Stat) -> Option<u32>,
    {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::UpdateStat(s) => pick(s),
            _ => None,
        })
    }

    pub fn last_time_left(&self) -> Option<u32> {
        self.last_stat(|s| match s {
            Stat::TimeLeft(t) => Some(*t),
            _ => None,
        })
    }

    pub fn last_wpm(&self) -> Option<u32> {
        self.last_stat(|s| match s {
            Stat::Wpm(w) => Some(*w),
            _ => None,
        })
    }

    pub fn last_accuracy(&self) -> Option<u8> {
        self.last_stat(|s| match s {
            Stat::Accuracy(a) => Some(u32::from(*a)),
            _ => None,
        })
        .map(|a| a as u8)
    }

    pub fn input_enabled(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::SetInputEnabled(e) => Some(*e),
            _ => None,
        })
    }

    pub fn summaries(&self) -> Vec<&Summary> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::ShowSummary(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Notify(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_quote(&self) -> Option<(&str, &[Outcome])> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::RenderQuote(q, o) => Some((q.as_str(), o.as_slice())),
            _ => None,
        })
    }
}

impl DisplayPort for RecordingDisplay {
    fn render_quote(&mut self, quote: &str, outcomes: &[Outcome]) {
        self.calls.push(DisplayCall::RenderQuote(quote.to_string(), outcomes.to_vec()));
    }

    fn show_prompt(&mut self, message: &str) {
        self.calls.push(DisplayCall::ShowPrompt(message.to_string()));
    }

    fn update_progress(&mut self, percent: u8) {
        self.calls.push(DisplayCall::UpdateProgress(percent));
    }

    fn update_stat(&mut self, stat: Stat) {
        self.calls.push(DisplayCall::UpdateStat(stat));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.calls.push(DisplayCall::SetInputEnabled(enabled));
    }

    fn show_summary(&mut self, summary: &Summary) {
        self.calls.push(DisplayCall::ShowSummary(summary.clone()));
    }

    fn notify(&mut self, message: &str) {
        self.calls.push(DisplayCall::Notify(message.to_string()));
    }
}
