//! Ratatui-based terminal UI.
//!
//! Left column: the editable training table (with an inline add form) and the
//! model formula. Right column: the chart and the prediction playground.
//!
//! The event loop owns the training clock: while the trainer is running it
//! polls input with a short timeout and advances one step per elapsed tick.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, LineGauge, Paragraph, Row, Table, TableState},
};

use crate::data::{PointSet, parse_point};
use crate::domain::{CHART_X, CHART_Y, DemoConfig, PREDICTION_MAX};
use crate::error::AppError;
use crate::i18n::{Language, Strings, strings};
use crate::math::{evaluate, sample_curve};
use crate::report::{format_response, formula_terms};
use crate::train::{Trainer, TrainingState};

mod plotters_chart;

use plotters_chart::DoseChart;

/// One training step per frame at roughly 60 fps.
const TICK_RATE: Duration = Duration::from_millis(16);

/// Poll timeout while nothing animates.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Curve resolution for the chart.
const CURVE_SAMPLES: usize = 200;

/// Prediction slider step for PgUp/PgDn.
const DOSE_PAGE: f64 = 10.0;

/// Start the TUI.
pub fn run(config: DemoConfig) -> Result<(), AppError> {
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Dose,
    Response,
}

/// The inline "add point" form.
#[derive(Debug, Clone)]
struct AddForm {
    dose: String,
    response: String,
    field: FormField,
}

impl AddForm {
    fn new() -> Self {
        Self {
            dose: String::new(),
            response: String::new(),
            field: FormField::Dose,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Dose => &mut self.dose,
            FormField::Response => &mut self.response,
        }
    }
}

struct App {
    lang: Language,
    points: PointSet,
    trainer: Trainer,
    selected: usize,
    /// Prediction slider position (mg).
    dose: f64,
    form: Option<AddForm>,
    status: String,
    rng: StdRng,
}

impl App {
    fn new(config: DemoConfig) -> Result<Self, AppError> {
        let (points, row_errors) = crate::app::pipeline::load_points(&config)?;
        let status = match row_errors.first() {
            Some(e) => format!("CSV: {} rows skipped (line {}: {})", row_errors.len(), e.line, e.message),
            None => String::new(),
        };

        Ok(Self {
            lang: config.language,
            points,
            trainer: Trainer::new(config.rates),
            selected: 0,
            dose: config.dose.clamp(0.0, PREDICTION_MAX).round(),
            form: None,
            status,
            rng: StdRng::from_entropy(),
        })
    }

    fn strings(&self) -> &'static Strings {
        strings(self.lang)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        let mut last_tick = Instant::now();
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            let timeout = if self.trainer.is_running() {
                TICK_RATE.saturating_sub(last_tick.elapsed())
            } else {
                IDLE_POLL
            };

            if event::poll(timeout).map_err(|e| AppError::runtime(format!("Event poll error: {e}")))? {
                match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key.code) {
                            break;
                        }
                        needs_redraw = true;
                    }
                    Event::Resize(_, _) => needs_redraw = true,
                    _ => {}
                }
            }

            if self.trainer.is_running() && last_tick.elapsed() >= TICK_RATE {
                self.on_tick();
                last_tick = Instant::now();
                needs_redraw = true;
            }
        }
        Ok(())
    }

    /// Advance training by one step.
    fn on_tick(&mut self) {
        let Some(step) = self.trainer.tick() else {
            return;
        };
        self.status = if step.done {
            self.strings().converged_after(self.trainer.ticks())
        } else {
            self.strings().training_progress(self.trainer.ticks())
        };
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.form.is_some() {
            self.handle_form_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('l') => self.lang = self.lang.toggle(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('t') => self.start_training(),
            KeyCode::Char('a') => {
                if self.trainer.is_editable() {
                    self.form = Some(AddForm::new());
                    self.status.clear();
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.points.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.adjust_dose(-1.0),
            KeyCode::Right => self.adjust_dose(1.0),
            KeyCode::PageDown => self.adjust_dose(-DOSE_PAGE),
            KeyCode::PageUp => self.adjust_dose(DOSE_PAGE),
            KeyCode::Char('e') => self.export_trace(),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.field = match form.field {
                    FormField::Dose => FormField::Response,
                    FormField::Response => FormField::Dose,
                };
            }
            KeyCode::Backspace => {
                form.active_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                form.active_mut().push(c);
            }
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let s = self.strings();
        let added = parse_point(&form.dose, &form.response)
            .and_then(|(x, y)| self.points.add(x, y, &mut self.rng).map(|idx| (idx, x, y)));
        match added {
            Ok((idx, x, y)) => {
                self.selected = idx;
                self.form = None;
                self.status = s.point_added(x, y);
            }
            // Keep the form open so the user can correct the input.
            Err(err) => self.status = s.point_error(&err),
        }
    }

    fn delete_selected(&mut self) {
        if !self.trainer.is_editable() {
            return;
        }
        let Some(id) = self.points.get(self.selected).map(|p| p.id.clone()) else {
            return;
        };
        let s = self.strings();
        self.status = match self.points.delete(&id) {
            Ok(removed) => s.point_deleted(&removed.id),
            Err(err) => s.point_error(&err),
        };
        self.selected = self.selected.min(self.points.len().saturating_sub(1));
    }

    fn start_training(&mut self) {
        if !self.trainer.is_editable() {
            return;
        }
        if self.points.len() < crate::math::MIN_POINTS {
            self.status = self.strings().need_points.to_string();
            return;
        }
        if self.trainer.start(self.points.points()).is_some() {
            self.status = self.strings().training_progress(0);
        }
    }

    fn reset(&mut self) {
        self.points.reset();
        self.trainer.reset();
        self.form = None;
        self.selected = 0;
        self.status = self.strings().data_reset.to_string();
    }

    fn adjust_dose(&mut self, delta: f64) {
        if self.trainer.is_converged() {
            self.dose = (self.dose + delta).clamp(0.0, PREDICTION_MAX);
        }
    }

    fn export_trace(&mut self) {
        if !self.trainer.is_converged() {
            return;
        }
        let s = self.strings();
        self.status = match crate::debug::write_trace_bundle(&self.points, self.trainer.rates()) {
            Ok(path) => s.wrote_file(&path),
            Err(err) => err.to_string(),
        };
    }

    fn prediction(&self) -> Option<f64> {
        self.trainer
            .is_converged()
            .then(|| evaluate(&self.trainer.current(), self.dose))
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.strings();
        let (label, button, color) = match self.trainer.state() {
            TrainingState::Idle => (s.status_waiting, s.btn_train, Color::Gray),
            TrainingState::Running { .. } => (s.status_training, s.btn_training, Color::Yellow),
            TrainingState::Converged { .. } => (s.status_ready, s.btn_trained, Color::Green),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(s.title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(format!("[{label}]"), Style::default().fg(color)),
                Span::raw("  "),
                Span::styled(format!("l: {}", s.language_switch), Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(vec![
                Span::styled(s.subtitle, Style::default().fg(Color::Gray)),
                Span::raw("  "),
                Span::styled(format!("[t] {button}"), Style::default().fg(color)),
                Span::raw(" "),
                Span::styled(format!("[r] {}", s.btn_reset), Style::default().fg(Color::Gray)),
            ]),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let form_height = if self.form.is_some() { 4 } else { 0 };
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(form_height),
                Constraint::Length(7),
            ])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(columns[1]);

        self.draw_table(frame, left[0]);
        if self.form.is_some() {
            self.draw_form(frame, left[1]);
        }
        self.draw_formula(frame, left[2]);
        self.draw_chart(frame, right[0]);
        self.draw_prediction(frame, right[1]);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.strings();
        let lock = if self.trainer.is_editable() { s.editable } else { s.locked };
        let block = Block::default()
            .title(format!("{} | {} ({})", s.section_training, s.table_title, lock))
            .borders(Borders::ALL);

        if self.points.is_empty() {
            let msg = Paragraph::new(s.no_data)
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let header = Row::new([
            Cell::from(s.col_id),
            Cell::from(format!("{} ({})", s.col_dose, s.dose_unit)),
            Cell::from(format!("{} ({})", s.col_response, s.response_unit)),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.points.points().iter().enumerate().map(|(i, p)| {
            Row::new([
                Cell::from((i + 1).to_string()),
                Cell::from(format!("{:.1}", p.x)),
                Cell::from(format!("{:.1}", p.y)),
            ])
        });

        let table = Table::new(
            rows,
            [Constraint::Length(4), Constraint::Percentage(45), Constraint::Percentage(45)],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");

        let mut state = TableState::default();
        if self.trainer.is_editable() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(form) = &self.form else {
            return;
        };
        let s = self.strings();
        let field = |value: &str, placeholder: &str, active: bool| {
            let style = if active {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let text = if value.is_empty() { placeholder.to_string() } else { value.to_string() };
            Span::styled(format!(" {text} "), style)
        };

        let lines = vec![
            Line::from(vec![
                field(&form.dose, s.placeholder_dose, form.field == FormField::Dose),
                Span::raw("  "),
                field(&form.response, s.placeholder_response, form.field == FormField::Response),
            ]),
            Line::from(Span::styled(s.help_form, Style::default().fg(Color::DarkGray))),
        ];

        frame.render_widget(Clear, area);
        let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_formula(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.strings();
        let [(sa, a), (sb, b), (sc, c)] = formula_terms(&self.trainer.current());
        let a_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
        let b_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let c_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::raw("y = "),
                Span::styled(format!("{sa}{a}"), a_style),
                Span::raw(format!("x² {sb} ")),
                Span::styled(b, b_style),
                Span::raw(format!("x {sc} ")),
                Span::styled(c, c_style),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::styled(s.legend_curvature, a_style),
                Span::raw("  "),
                Span::styled(s.legend_linear, b_style),
                Span::raw("  "),
                Span::styled(s.legend_intercept, c_style),
            ]),
            Line::from(Span::styled(s.info_text, Style::default().fg(Color::DarkGray))),
        ];

        let p = Paragraph::new(lines)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(Block::default().title(s.formula_title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.strings();
        let block = Block::default().title(s.chart_title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (curve, points) = chart_series(&self.points, &self.trainer);
        let prediction = self.prediction().map(|y| (self.dose, y));

        let (chart_rect, insets) = chart_layout(inner);
        let widget = DoseChart {
            curve: &curve,
            points: &points,
            prediction,
            x_bounds: CHART_X,
            y_bounds: CHART_Y,
            x_label: s.chart_x,
            y_label: s.chart_y,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, s);
        }
    }

    fn draw_prediction(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.strings();
        let block = Block::default().title(s.section_prediction).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let Some(predicted) = self.prediction() else {
            let msg = Paragraph::new(s.pred_need_train)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(msg, rows[0]);
            return;
        };

        let gauge = LineGauge::default()
            .ratio(self.dose / PREDICTION_MAX)
            .label(format!("{}: {:>2} {}", s.input_label, self.dose, s.dose_unit))
            .filled_style(Style::default().fg(Color::Yellow))
            .unfilled_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(gauge, rows[0]);

        let output = Line::from(vec![
            Span::raw(format!("{}: ", s.output_label)),
            Span::styled(
                format!("{} {}", format_response(predicted), s.response_unit),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(output), rows[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.strings();
        let help = if self.form.is_some() {
            s.help_form
        } else {
            match self.trainer.state() {
                TrainingState::Idle => s.help_idle,
                TrainingState::Running { .. } => s.help_running,
                TrainingState::Converged { .. } => s.help_trained,
            }
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Curve and scatter series for the chart.
fn chart_series(points: &PointSet, trainer: &Trainer) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let curve = sample_curve(&trainer.current(), CHART_X[0], CHART_X[1], CURVE_SAMPLES);
    let scatter = points.points().iter().map(|p| (p.x, p.y)).collect();
    (curve, scatter)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 6,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, s: &Strings) {
    let ticks = 6usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = CHART_X[0] + u * (CHART_X[1] - CHART_X[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        let width = label.len() as u16;
        frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width, height: 1 });
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = CHART_Y[0] + u * (CHART_Y[1] - CHART_Y[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        let width = label.len() as u16;
        frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width, height: 1 });
    }

    let x_label = Paragraph::new(s.chart_x)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(s.chart_y).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(chart.width),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
