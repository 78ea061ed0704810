pub mod charting;
pub mod screen;

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use typeblast::display::{DisplayPort, Stat};
use typeblast::score::Outcome;
use typeblast::session::Summary;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Terminal-side state written through the display port and read back when
/// drawing a frame
#[derive(Debug, Clone)]
pub struct Board {
    pub quote: Option<String>,
    pub outcomes: Vec<Outcome>,
    pub prompt: String,
    pub progress: u8,
    pub time_left: u32,
    pub wpm: u32,
    pub accuracy: u8,
    pub input_enabled: bool,
    pub summary: Option<Summary>,
    pub notice: Option<(String, Instant)>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            quote: None,
            outcomes: Vec::new(),
            prompt: String::new(),
            progress: 0,
            time_left: 0,
            wpm: 0,
            accuracy: 100,
            input_enabled: false,
            summary: None,
            notice: None,
        }
    }
}

impl Board {
    pub fn active_notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(_, at)| at.elapsed() < NOTICE_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    /// Drop an expired notice; true if something changed
    pub fn expire_notice(&mut self) -> bool {
        if self.notice.is_some() && self.active_notice().is_none() {
            self.notice = None;
            return true;
        }
        false
    }
}

impl DisplayPort for Board {
    fn render_quote(&mut self, quote: &str, outcomes: &[Outcome]) {
        if quote.is_empty() {
            log::error!("asked to render an empty quote");
            self.quote = None;
            self.prompt = "Error: no quote to display. Please try again.".to_string();
            return;
        }
        self.quote = Some(quote.to_string());
        self.outcomes = outcomes.to_vec();
        self.summary = None;
    }

    fn show_prompt(&mut self, message: &str) {
        self.quote = None;
        self.outcomes.clear();
        self.summary = None;
        self.prompt = message.to_string();
    }

    fn update_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
    }

    fn update_stat(&mut self, stat: Stat) {
        match stat {
            Stat::TimeLeft(t) => self.time_left = t,
            Stat::Wpm(w) => self.wpm = w,
            Stat::Accuracy(a) => self.accuracy = a,
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn show_summary(&mut self, summary: &Summary) {
        self.summary = Some(summary.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notice = Some((message.to_string(), Instant::now()));
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

/// Difficulty and duration selectors; arrows only work between runs
fn render_header(app: &App, f: &mut Frame, area: Rect) {
    let locked = app.session.is_running();
    let selector_style = if locked { dim_bold() } else { bold().fg(Color::Cyan) };

    let line = Line::from(vec![
        Span::styled("typeblast", bold().fg(Color::Magenta)),
        Span::raw("   difficulty "),
        Span::styled(format!("< {} >", app.difficulty), selector_style),
        Span::raw("   duration "),
        Span::styled(format!("< {}s >", app.duration_secs), selector_style),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_stats(board: &Board, f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(u16::from(board.progress))
        .label(format!("{}%", board.progress));
    f.render_widget(gauge, rows[0]);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{}s left   {} wpm   {}% acc",
            board.time_left, board.wpm, board.accuracy
        ),
        bold(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(stats, rows[1]);
}

/// Quote spans: graded characters coloured, the next one underlined, the
/// rest dimmed.
pub fn quote_spans<'a>(quote: &'a str, outcomes: &[Outcome]) -> Vec<Span<'a>> {
    let green = bold().fg(Color::Green);
    let red = bold().fg(Color::Red);

    let mut spans: Vec<Span> = quote
        .chars()
        .zip(outcomes)
        .map(|(c, outcome)| match outcome {
            Outcome::Correct => Span::styled(c.to_string(), green),
            Outcome::Incorrect => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red,
            ),
        })
        .collect();

    let graded_bytes: usize = quote
        .chars()
        .take(outcomes.len())
        .map(char::len_utf8)
        .sum();
    let rest = &quote[graded_bytes..];
    let mut rest_chars = rest.chars();
    if let Some(next) = rest_chars.next() {
        spans.push(Span::styled(
            next.to_string(),
            dim_bold().add_modifier(Modifier::UNDERLINED),
        ));
        spans.push(Span::styled(rest_chars.as_str(), dim_bold()));
    }
    spans
}

fn render_quote(board: &Board, f: &mut Frame, area: Rect) {
    let Some(quote) = board.quote.as_deref() else {
        return;
    };
    let fits_one_line = quote.width() <= area.width as usize;

    let widget = Paragraph::new(Line::from(quote_spans(quote, &board.outcomes)))
        .alignment(if fits_one_line {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_attempt(app: &App, f: &mut Frame, area: Rect) {
    let board = app.session.display();
    let typed = &app.session.state().typed;
    let border_style = if board.input_enabled {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let shown = if board.input_enabled {
        format!("{typed}▏")
    } else {
        typed.to_string()
    };
    let widget = Paragraph::new(shown)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("your attempt"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_footer(board: &Board, legend: &str, f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(notice) = board.active_notice() {
        let widget = Paragraph::new(Span::styled(
            notice,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        f.render_widget(widget, rows[0]);
    }

    let widget = Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(widget, rows[1]);
}

pub fn render_idle(app: &App, f: &mut Frame) {
    let board = app.session.display();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_header(app, f, chunks[0]);
    let prompt = Paragraph::new(Span::styled(
        board.prompt.as_str(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(prompt, chunks[2]);
    render_footer(
        board,
        "(enter) start / (←→) duration / (↑↓) difficulty / (esc)ape",
        f,
        chunks[4],
    );
}

pub fn render_typing(app: &App, f: &mut Frame) {
    let board = app.session.display();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_header(app, f, chunks[0]);
    render_stats(board, f, chunks[2]);
    render_quote(board, f, chunks[4]);
    render_attempt(app, f, chunks[5]);
    render_footer(board, "(ctrl+r) restart / (ctrl+n) menu / (esc)ape", f, chunks[6]);
}

pub fn render_summary(app: &App, f: &mut Frame) {
    // keep the finished run visible behind the overlay
    render_typing(app, f);

    let board = app.session.display();
    let Some(summary) = board.summary.as_ref() else {
        return;
    };

    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(Span::styled(" Game Over! ", bold()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(&summary.samples, summary.duration_secs);
    let points: Vec<(f64, f64)> = summary.samples.iter().map(|p| (*p).into()).collect();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(charting::format_label(overall_duration), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(highest_wpm), bold()),
                ]),
        );
    f.render_widget(chart, chunks[0]);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {} correct words",
            summary.wpm, summary.accuracy_percent, summary.correct_words
        ),
        bold(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(stats, chunks[1]);

    let settings = Paragraph::new(Span::styled(
        format!(
            "{}s · {} · {} wpm",
            summary.duration_secs, summary.difficulty, summary.wpm_policy
        ),
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(settings, chunks[2]);

    let legend = Paragraph::new(Span::styled(
        "(enter) again / (ctrl+n) menu / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, chunks[3]);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.session.phase()).render(app, f);
}
