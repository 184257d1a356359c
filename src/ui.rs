//! TUI module using ratatui.
//!
//! The screen mirrors the session: a text box with an inline error line while
//! submitting, and a scrollable report while showing results. Requests run on
//! a spawned task and report back over a channel, so the screen keeps drawing
//! while the service is thinking.

use crate::analysis::AnalysisResponse;
use crate::client::{AnalysisError, Analyzer};
use crate::render::{format_item, Report, NO_RESULT_MESSAGE, PREDICTION_LEAD};
use crate::session::{
    Completion, PendingRequest, RequestId, ResultsView, Session, SubmissionView, View,
};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    DefaultTerminal, Frame,
};
use std::time::Duration;
use tokio::sync::mpsc;

const TITLE: &str = " Mental Health AI Assistant ";

/// How long to wait for a key before checking for finished requests
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Reply = (RequestId, Result<AnalysisResponse, AnalysisError>);

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Send(PendingRequest),
    Quit,
}

/// UI state on top of the session
#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// First visible line of the results report
    pub scroll: u16,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self { session, scroll: 0 }
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.session.view() {
            View::Submitting(_) => self.handle_submit_key(key),
            View::Showing(_) => self.handle_results_key(key),
        }
    }

    fn handle_submit_key(&mut self, key: KeyEvent) -> Action {
        let loading = self
            .session
            .submission()
            .is_some_and(SubmissionView::is_loading);

        if loading {
            // Request running: only allow Esc to stop waiting
            if key.code == KeyCode::Esc {
                if let Some(id) = self.session.abandon() {
                    tracing::info!(request = id, "request abandoned by user");
                }
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Enter => match self.session.begin_submit() {
                Ok(Some(pending)) => Action::Send(pending),
                Ok(None) => Action::None,
                Err(e) => {
                    tracing::debug!(error = %e, "submission rejected");
                    Action::None
                }
            },
            KeyCode::Esc => Action::Quit,
            KeyCode::Backspace => {
                if let Some(form) = self.session.submission_mut() {
                    form.pop_char();
                }
                Action::None
            }
            KeyCode::Char(c)
                if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() =>
            {
                if let Some(form) = self.session.submission_mut() {
                    form.push_char(c);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('n') => {
                self.session.go_back();
                self.scroll = 0;
                Action::None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Apply a finished request
    pub fn on_reply(&mut self, id: RequestId, outcome: Result<AnalysisResponse, AnalysisError>) {
        if self.session.complete(id, outcome) == Completion::Shown {
            self.scroll = 0;
        }
    }
}

/// Launch the TUI and run until the user quits
pub async fn run<A>(analyzer: A, session: Session) -> Result<()>
where
    A: Analyzer + Clone + Send + Sync + 'static,
{
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, analyzer, App::new(session)).await;
    ratatui::restore();
    result
}

async fn event_loop<A>(terminal: &mut DefaultTerminal, analyzer: A, mut app: App) -> Result<()>
where
    A: Analyzer + Clone + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Reply>();

    loop {
        while let Ok((id, outcome)) = rx.try_recv() {
            app.on_reply(id, outcome);
        }

        terminal.draw(|frame| draw(frame, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Send(pending) => {
                let analyzer = analyzer.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = analyzer.analyze(&pending.text).await;
                    // Receiver is gone once the UI has exited
                    let _ = tx.send((pending.id, outcome));
                });
            }
        }
    }
}

/// Main render function
pub fn draw(frame: &mut Frame, app: &App) {
    let block = Block::bordered()
        .title(TITLE)
        .title_style(Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let area = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    match app.session.view() {
        View::Submitting(form) => draw_submission(frame, form, area),
        View::Showing(results) => draw_results(frame, results, app.scroll, area),
    }
}

fn draw_submission(frame: &mut Frame, form: &SubmissionView, area: Rect) {
    let [heading, input, status, help] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new("Mental Health Text Analysis")
            .style(Style::new().add_modifier(Modifier::BOLD)),
        heading,
    );

    let placeholder = form.input().is_empty();
    let text = if placeholder {
        Line::styled("How are you feeling today?", Style::new().fg(Color::DarkGray))
    } else {
        Line::raw(form.input())
    };
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::bordered().title(" Describe how you feel "))
            .wrap(Wrap { trim: false }),
        input,
    );

    let status_line = if form.is_loading() {
        Line::styled("Analyzing…", Style::new().fg(Color::Yellow).add_modifier(Modifier::ITALIC))
    } else if let Some(error) = form.error() {
        Line::styled(error, Style::new().fg(Color::Red))
    } else {
        Line::raw("")
    };
    frame.render_widget(Paragraph::new(status_line), status);

    let hint = if form.is_loading() {
        "Esc stop waiting · Ctrl-C quit"
    } else {
        "Enter analyze · Esc quit"
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::new().fg(Color::DarkGray)),
        help,
    );
}

fn draw_results(frame: &mut Frame, results: &ResultsView, scroll: u16, area: Rect) {
    let [body, help] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let (lines, hint) = match results {
        ResultsView::NoResult => (
            vec![
                Line::styled(NO_RESULT_MESSAGE, Style::new().add_modifier(Modifier::BOLD)),
                Line::raw(""),
                Line::raw("[ Go back ]"),
            ],
            "Enter go back · q quit",
        ),
        ResultsView::Found(response) => (
            report_lines(&Report::from_response(response)),
            "Enter analyze another · ↑/↓ scroll · q quit",
        ),
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title(" Prediction Result "))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        body,
    );
    frame.render_widget(
        Paragraph::new(hint).style(Style::new().fg(Color::DarkGray)),
        help,
    );
}

/// Report as styled lines for the results pane
fn report_lines(report: &Report) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::raw(PREDICTION_LEAD),
        Line::styled(
            report.prediction.clone(),
            Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ];

    for section in &report.sections {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", section.kind.icon())),
            Span::styled(
                section.kind.title(),
                Style::new().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.extend(
            section
                .items
                .iter()
                .map(|item| Line::raw(format_item(section.kind, item))),
        );
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Transition, EMPTY_INPUT_MESSAGE, GENERIC_FAILURE_MESSAGE};
    use ratatui::{backend::TestBackend, Terminal};
    use reqwest::StatusCode;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(press(KeyCode::Char(c))), Action::None);
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut rows = Vec::new();
        for y in 0..buffer.area.height {
            let row: String = (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            rows.push(row);
        }
        rows.join("\n")
    }

    #[test]
    fn enter_on_blank_input_shows_validation_error() {
        let mut app = App::new(Session::new());
        type_text(&mut app, "   ");
        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);
        assert!(screen(&app).contains(EMPTY_INPUT_MESSAGE));
    }

    #[test]
    fn enter_sends_typed_text() {
        let mut app = App::new(Session::new());
        type_text(&mut app, "I feel lo");
        app.handle_key(press(KeyCode::Char('x')));
        app.handle_key(press(KeyCode::Backspace));
        app.handle_key(press(KeyCode::Char('w')));

        let Action::Send(pending) = app.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a request");
        };
        assert_eq!(pending.text, "I feel low");
        assert!(screen(&app).contains("Analyzing"));

        // Typing is ignored while waiting
        app.handle_key(press(KeyCode::Char('!')));
        assert_eq!(app.session.submission().unwrap().input(), "I feel low");
    }

    #[test]
    fn reply_moves_to_results() {
        let mut app = App::new(Session::new());
        type_text(&mut app, "worried");
        let Action::Send(pending) = app.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a request");
        };

        app.on_reply(pending.id, Ok(AnalysisResponse::new("Anxiety")));
        let shown = screen(&app);
        assert!(shown.contains("Anxiety"));
        assert!(shown.contains("Prediction Result"));
        assert!(!shown.contains("Tips"));
    }

    #[test]
    fn failed_reply_keeps_input_and_shows_generic_error() {
        let mut app = App::new(Session::new());
        type_text(&mut app, "worried");
        let Action::Send(pending) = app.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a request");
        };

        app.on_reply(
            pending.id,
            Err(AnalysisError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }),
        );
        let shown = screen(&app);
        assert!(shown.contains(GENERIC_FAILURE_MESSAGE));
        assert!(shown.contains("worried"));
        assert!(!shown.contains("500"));
    }

    #[test]
    fn esc_abandons_request_and_late_reply_is_ignored() {
        let mut app = App::new(Session::new());
        type_text(&mut app, "worried");
        let Action::Send(pending) = app.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a request");
        };

        app.handle_key(press(KeyCode::Esc));
        app.on_reply(pending.id, Ok(AnalysisResponse::new("Anxiety")));
        assert!(app.session.results().is_none());
        assert!(!app.session.submission().unwrap().is_loading());
    }

    #[test]
    fn no_result_fallback_offers_way_back() {
        let mut app = App::new(Session::showing(Transition::empty()));
        let shown = screen(&app);
        assert!(shown.contains("No result found."));
        assert!(shown.contains("Go back"));

        app.handle_key(press(KeyCode::Enter));
        assert!(app.session.submission().is_some());
    }

    #[test]
    fn results_view_quits_on_q_and_scrolls() {
        let mut app = App::new(Session::showing(Transition::with_result(
            AnalysisResponse::new("Stress"),
        )));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.scroll, 1);
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Action::Quit);
    }

    #[test]
    fn modified_keys_do_not_type() {
        let mut app = App::new(Session::new());
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        app.handle_key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT));
        app.handle_key(press(KeyCode::Char('i')));
        assert_eq!(app.session.submission().unwrap().input(), "Hi");
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = App::new(Session::new());
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(key), Action::Quit);
    }

    #[test]
    fn report_lines_include_sections() {
        let mut response = AnalysisResponse::new("depression");
        response.tips = vec!["Breathe deeply".into()];
        let lines = report_lines(&Report::from_response(&response));
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text.contains(&"  • Breathe deeply".to_string()));
        assert!(text.iter().any(|l| l.contains("Tips")));
    }
}
