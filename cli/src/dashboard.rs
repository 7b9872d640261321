use std::{io, time::Duration};

use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lessonplan_core::time::iso_week_of;
use lessonplan_core::{LessonRepository, ProgressDto, ProgressService, ScheduleRepository};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph, Wrap},
};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    done: Color,
    exam: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan, // Highlights
    muted: Color::DarkGray,
    text: Color::White,
    done: Color::Green,
    exam: Color::Red,
};

const GAUGE_HEIGHT: u16 = 3;

pub struct DashboardApp {
    pub rows: Vec<ProgressDto>,
    pub now: NaiveDateTime,
    pub week_offset: i64,
    /// Last reload failure, shown in the summary panel.
    pub error: Option<String>,
    start: NaiveDateTime,
}

impl DashboardApp {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            rows: Vec::new(),
            now: start,
            week_offset: 0,
            error: None,
            start,
        }
    }

    pub fn next_week(&mut self) {
        self.week_offset += 1;
        self.now = self.start + chrono::Duration::weeks(self.week_offset);
    }

    pub fn previous_week(&mut self) {
        self.week_offset -= 1;
        self.now = self.start + chrono::Duration::weeks(self.week_offset);
    }

    fn reload<R, S>(&mut self, service: &ProgressService<R, S>) -> Result<()>
    where
        R: LessonRepository,
        S: ScheduleRepository,
    {
        let records = service.all_active(self.now)?;
        self.rows = records.iter().map(ProgressDto::from_record).collect();
        Ok(())
    }

    /// Reloads while the screen is up; failures are kept for the summary panel.
    fn refresh<R, S>(&mut self, service: &ProgressService<R, S>)
    where
        R: LessonRepository,
        S: ScheduleRepository,
    {
        self.error = self.reload(service).err().map(|e| format!("{e:#}"));
    }
}

pub fn run<R, S>(service: &ProgressService<R, S>, now: NaiveDateTime) -> Result<()>
where
    R: LessonRepository,
    S: ScheduleRepository,
{
    // Data setup
    let mut app = DashboardApp::new(now);
    app.reload(service)?;

    if app.rows.is_empty() {
        println!("No topics with planned lessons found.");
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app, service);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop<R, S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp,
    service: &ProgressService<R, S>,
) -> Result<()>
where
    R: LessonRepository,
    S: ScheduleRepository,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let moved = match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => {
                            app.previous_week();
                            true
                        }
                        KeyCode::Right | KeyCode::Char('l') => {
                            app.next_week();
                            true
                        }
                        _ => false,
                    };
                    if moved {
                        app.refresh(service);
                    }
                }
            }
        }
    }
    Ok(())
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Gauges + Sidebar
            Constraint::Length(1), // Footer / Help
        ])
        .split(size);

    // --- Header ---
    let (year, week) = iso_week_of(app.now);
    let title = format!(" Week {} - {} ", week, year);
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Min(1),
            Constraint::Length(30),
        ])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled(
        "TOPIC PROGRESS",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let offset_style = if app.week_offset == 0 { THEME.muted } else { THEME.primary };
    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(title, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(THEME.text)),
        Span::styled(format!("{:+}w", app.week_offset), Style::default().fg(offset_style)),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);
    frame.render_widget(header_block, main_layout[0]);

    // --- Main Content Split ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Length(1),
            Constraint::Percentage(30),
        ])
        .split(main_layout[1]);

    draw_gauges(frame, &app.rows, content_chunks[0]);
    draw_info_panel(frame, app, content_chunks[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("WEEK: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[2]);
}

fn draw_gauges(frame: &mut Frame, rows: &[ProgressDto], area: Rect) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" Topics ");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let visible = (inner.height / GAUGE_HEIGHT) as usize;
    if visible == 0 {
        return;
    }
    let shown = rows.len().min(visible);
    let mut constraints = vec![Constraint::Length(GAUGE_HEIGHT); shown];
    constraints.push(Constraint::Min(0));
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (row, slot) in rows.iter().take(shown).zip(slots.iter()) {
        frame.render_widget(topic_gauge(row), *slot);
    }
}

fn topic_gauge(row: &ProgressDto) -> Gauge<'_> {
    let color = row
        .color
        .as_deref()
        .and_then(|c| c.parse::<Color>().ok())
        .unwrap_or(THEME.done);
    let title_style = if row.exam_this_week {
        Style::default().fg(THEME.exam).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(THEME.text)
    };
    let label = if row.exam.is_empty() {
        format!("{}/{}", row.completed, row.planned)
    } else {
        format!("{}/{} · {}", row.completed, row.planned, row.exam)
    };

    Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", row.title), title_style))
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio((row.percent / 100.0).clamp(0.0, 1.0))
        .label(label)
}

fn draw_info_panel(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let planned: u32 = app.rows.iter().map(|r| r.planned).sum();
    let completed: u32 = app.rows.iter().map(|r| r.completed).sum();
    let exams: Vec<&ProgressDto> = app.rows.iter().filter(|r| r.exam_this_week).collect();

    let mut info_text = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("As of:     ", Style::default().fg(THEME.muted)),
            Span::styled(app.now.format("%a %d.%m. %H:%M").to_string(), Style::default().fg(THEME.text)),
        ]),
        Line::from(vec![
            Span::styled("Topics:    ", Style::default().fg(THEME.muted)),
            Span::styled(app.rows.len().to_string(), Style::default().fg(THEME.text)),
        ]),
        Line::from(vec![
            Span::styled("Completed: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{}/{}", completed, planned),
                Style::default().fg(THEME.done).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Exams this week", Style::default().add_modifier(Modifier::BOLD))]),
    ];
    if exams.is_empty() {
        info_text.push(Line::from(Span::styled("none", Style::default().fg(THEME.muted))));
    }
    for row in exams {
        info_text.push(Line::from(Span::styled(
            format!("• {}", row.title),
            Style::default().fg(THEME.exam),
        )));
    }
    if let Some(error) = &app.error {
        info_text.push(Line::from(""));
        info_text.push(Line::from(Span::styled(
            "Reload failed",
            Style::default().fg(THEME.exam).add_modifier(Modifier::BOLD),
        )));
        info_text.push(Line::from(Span::styled(error.as_str(), Style::default().fg(THEME.exam))));
    }

    let info_block = Paragraph::new(info_text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(info_block, area);
}
