use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use power_rankings::{Direction as Movement, League, QualityReport, RankedTeam, Severity, Team};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Rankings,
    Quality,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Rankings => Page::Quality,
            Page::Quality => Page::Rankings,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Rankings => "Power Rankings",
            Page::Quality => "Data Quality",
        }
    }
}

pub struct App {
    pub league: League,
    pub quality: QualityReport,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
}

impl App {
    pub fn new(league: League) -> Self {
        let mut state = TableState::default();
        if !league.rankings.is_empty() {
            state.select(Some(0));
        }

        let quality = league.quality();

        Self {
            league,
            quality,
            state,
            current_page: Page::Rankings,
            show_detail: false,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected(&self) -> Option<&RankedTeam> {
        self.state.selected().and_then(|i| self.league.rankings.get(i))
    }

    /// Merged source data behind the selected ranking row
    pub fn selected_base(&self) -> Option<&Team> {
        let name = &self.selected()?.name;
        self.league.teams.iter().find(|t| &t.name == name)
    }

    pub fn next(&mut self) {
        let len = self.league.rankings.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.league.rankings.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => app.current_page = app.current_page.next(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => {
                    if !app.league.rankings.is_empty() {
                        app.state.select(Some(app.league.rankings.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Rankings if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_rankings(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Rankings => render_rankings(f, chunks[1], app),
        Page::Quality => render_quality(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, page) in [Page::Rankings, Page::Quality].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        app.league.display_name().to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        app.league.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn movement_color(direction: Option<Movement>) -> Color {
    match direction {
        Some(Movement::Up) => Color::Green,
        Some(Movement::Down) => Color::Red,
        _ => Color::DarkGray,
    }
}

fn movement_text(team: &RankedTeam) -> String {
    match (team.direction, team.change) {
        (Some(Movement::Up), Some(change)) => format!("▲ {}", change.as_text()),
        (Some(Movement::Down), Some(change)) => format!("▼ {}", change.as_text()),
        (Some(Movement::NoChange), _) => "--".to_string(),
        _ => "new".to_string(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render_rankings(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["#", "Team", "Record", "Prev", "Move", "Score", "Rec", "Pts", "ECR"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.league.rankings.iter().map(|team| {
        let cells = vec![
            Cell::from(team.rank.to_string()),
            Cell::from(truncate(&team.name, 30)),
            Cell::from(team.record.clone().unwrap_or_default()),
            Cell::from(opt(team.previous_rank)),
            Cell::from(movement_text(team)).style(Style::default().fg(movement_color(team.direction))),
            Cell::from(team.score.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string()))
                .style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(team.record_score.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string())),
            Cell::from(opt(team.points_score)),
            Cell::from(opt(team.ecr_score)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(32),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(4),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Power Rankings "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_quality(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.quality.summary()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if app.quality.issues.is_empty() {
        content.push(Line::from(Span::styled(
            "  ✓ Every team has a complete record in every source",
            Style::default().fg(Color::Green),
        )));
    }

    for issue in &app.quality.issues {
        let color = match issue.severity {
            Severity::Critical => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::DarkGray,
        };
        content.push(Line::from(vec![
            Span::styled(format!("  {:<8} ", format!("{:?}", issue.severity)), Style::default().fg(color)),
            Span::raw(issue.issue.clone()),
        ]));
        content.push(Line::from(Span::styled(
            format!("           → {}", issue.recommendation),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Data Quality "),
    );

    f.render_widget(paragraph, area);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(
        format!("  {}: ", text),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Team Details ");

    let (team, base) = match (app.selected(), app.selected_base()) {
        (Some(t), base) => (t, base),
        (None, _) => {
            f.render_widget(Paragraph::new("No team selected").block(block), area);
            return;
        }
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![label("Team"), Span::raw(team.name.clone())]),
        Line::from(vec![label("Rank"), Span::raw(team.rank.to_string())]),
        Line::from(vec![
            label("Movement"),
            Span::styled(movement_text(team), Style::default().fg(movement_color(team.direction))),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  SCORE",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(vec![label("Record score"), Span::raw(opt(team.record_score))]),
        Line::from(vec![label("Points score"), Span::raw(opt(team.points_score))]),
        Line::from(vec![label("ECR score"), Span::raw(opt(team.ecr_score))]),
        Line::from(vec![label("Total"), Span::raw(opt(team.score))]),
    ];

    if let Some(base) = base {
        content.extend([
            Line::from(""),
            Line::from(Span::styled(
                "  STANDINGS",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from(vec![label("Pct"), Span::raw(opt(base.pct))]),
            Line::from(vec![label("Games back"), Span::raw(opt(base.games_back.clone()))]),
            Line::from(vec![label("Points for"), Span::raw(opt(base.points_for))]),
            Line::from(vec![label("Points against"), Span::raw(opt(base.points_against))]),
            Line::from(vec![label("Home"), Span::raw(opt(base.home.clone()))]),
            Line::from(vec![label("Away"), Span::raw(opt(base.away.clone()))]),
            Line::from(vec![label("Division"), Span::raw(opt(base.division.clone()))]),
            Line::from(vec![label("Streak"), Span::raw(opt(base.streak.clone()))]),
        ]);
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.league.rankings.len();

    let status_spans = vec![
        Span::styled(format!(" Team: {}/{} ", selected, total), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Details | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
