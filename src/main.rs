use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use seasonwise_terminal::dataset::{self, StatsTable};
use seasonwise_terminal::season_metrics::{CATEGORIES, Category, MetricRow};
use seasonwise_terminal::state::{AppState, PickerPane, Screen, SeasonPanel, TeamPanel};
use seasonwise_terminal::{compare_export, persist};

struct App {
    state: AppState,
    table: &'static StatsTable,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    fn new(table: &'static StatsTable) -> Self {
        let tick_ms = std::env::var("SEASONWISE_TICK_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(250)
            .max(50);
        Self {
            state: AppState::new(),
            table,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_ms),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Char('?') {
            self.state.help_overlay = !self.state.help_overlay;
            return;
        }
        match self.state.screen {
            Screen::Compare => self.on_compare_key(key),
            Screen::Picker { .. } => self.on_picker_key(key),
        }
    }

    fn on_compare_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('1') => self.state.focus_slot = 0,
            KeyCode::Char('2') => self.state.focus_slot = 1,
            KeyCode::Tab => self.state.toggle_focus_slot(),
            KeyCode::Enter | KeyCode::Char('p') => {
                let slot = self.state.focus_slot;
                self.state.open_picker(slot, self.table);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.cycle_focus_team(self.table, 1),
            KeyCode::Char('k') | KeyCode::Up => self.state.cycle_focus_team(self.table, -1),
            KeyCode::Char('c') => self.state.cycle_category(),
            KeyCode::Char('a') => self.state.set_category(Category::Attacking),
            KeyCode::Char('d') => self.state.set_category(Category::Defensive),
            KeyCode::Char('o') => self.state.set_category(Category::Overall),
            KeyCode::Char('r') => {
                self.state.focus_slot_mut().clear();
                let slot = self.state.focus_slot;
                self.state.push_log(format!("[INFO] Cleared team {}", slot + 1));
            }
            KeyCode::Char('x') => self.export_comparison(),
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => {
                self.state.picker_back();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if self.state.picker.pane == PickerPane::Teams {
                    self.state.picker_back();
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.state.picker.pane == PickerPane::Leagues {
                    self.state.picker_enter(self.table);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.picker_next(self.table),
            KeyCode::Char('k') | KeyCode::Up => self.state.picker_prev(self.table),
            KeyCode::Enter => {
                if self.state.picker_enter(self.table) {
                    let slot = self.state.focus_slot;
                    let team = self.state.selection.slots[slot]
                        .team
                        .clone()
                        .unwrap_or_default();
                    self.state
                        .push_log(format!("[INFO] Team {} set to {team}", slot + 1));
                }
            }
            _ => {}
        }
    }

    fn export_comparison(&mut self) {
        let any_selected = self
            .state
            .selection
            .slots
            .iter()
            .any(|slot| slot.is_selected());
        if !any_selected {
            self.state
                .push_log("[INFO] Nothing to export, select a team first");
            return;
        }
        let path = compare_export::default_export_path();
        match compare_export::export_comparison(&path, self.table, &self.state.selection) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} rows for {} team(s) to {}",
                report.rows,
                report.teams,
                report.path.display()
            )),
            Err(err) => self
                .state
                .push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    // Fatal load path: report once on stderr and exit before touching the
    // terminal, so a bad file never leaves a half-drawn UI behind.
    let table = match dataset::stats_table() {
        Ok(table) => table,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(table);
    persist::load_into_state(&mut app.state, table);
    app.state.push_log(format!(
        "[INFO] Loaded {} team-season rows from {}",
        table.len(),
        dataset::stats_file_path().display()
    ));
    let skipped = table.summary().rows_skipped;
    if skipped > 0 {
        app.state
            .push_log(format!("[WARN] Skipped {skipped} unusable rows during load"));
    }

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = persist::save_from_state(&app.state) {
        eprintln!("warning: could not save selections: {err:#}");
    }
    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Compare => render_compare(frame, chunks[1], app),
        Screen::Picker { .. } => render_picker(frame, chunks[1], app),
    }

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let line1 = "  ()  SEASONWISE | Season So Far: 2024/25 v 2025/26".to_string();
    let line2 = format!(
        " (__) Category: {} | Focus: Team {} | {} rows loaded",
        app.state.selection.category.label(),
        app.state.focus_slot + 1,
        app.table.len()
    );
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Compare => {
            "1/2 Focus | Tab Switch | Enter Pick Team | j/k Cycle Team | a/d/o/c Category | r Clear | x Export | ? Help | q Quit"
                .to_string()
        }
        Screen::Picker { .. } => {
            "j/k/↑/↓ Move | h/l Pane | Enter Select | Esc/b Back | ? Help | q Quit".to_string()
        }
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_compare(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(category_bar(app.state.selection.category), sections[0]);

    let panels = app.state.comparison(app.table);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(sections[1]);

    for (idx, panel) in panels.iter().enumerate() {
        render_team_column(frame, columns[idx], app, idx, panel);
    }
}

fn category_bar(active: Category) -> Paragraph<'static> {
    let mut spans = vec![Span::raw("Stats: ")];
    for category in CATEGORIES {
        if category == active {
            spans.push(Span::styled(
                format!("[{}]", category.label()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", category.label()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans))
}

fn render_team_column(frame: &mut Frame, area: Rect, app: &App, idx: usize, panel: &TeamPanel) {
    let focused = app.state.focus_slot == idx;
    let title = match &panel.team {
        Some(team) => format!("Team {} - {team}", idx + 1),
        None => format!("Team {}", idx + 1),
    };
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let seasons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    for (season_idx, season_panel) in panel.seasons.iter().enumerate() {
        if season_idx >= seasons.len() {
            break;
        }
        let text = Text::from(season_panel_lines(season_panel));
        frame.render_widget(Paragraph::new(text), seasons[season_idx]);
    }
}

fn season_panel_lines(panel: &SeasonPanel) -> Vec<Line<'static>> {
    match panel {
        SeasonPanel::Prompt => vec![
            Line::raw(""),
            Line::styled("Select a team.", Style::default().fg(Color::DarkGray)),
            Line::styled(
                "(Enter opens the picker)",
                Style::default().fg(Color::DarkGray),
            ),
        ],
        SeasonPanel::NoData { season } => vec![
            Line::raw(""),
            Line::styled(
                format!("No data for {}", season.label()),
                Style::default().fg(Color::Yellow),
            ),
        ],
        SeasonPanel::Stats { season, rows } => {
            let mut lines = vec![Line::styled(
                format!("{}: Per Game", season.label()),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            for row in rows {
                lines.push(Line::styled(
                    row.label.to_string(),
                    Style::default().fg(Color::Gray),
                ));
                lines.push(metric_value_line(row));
            }
            lines
        }
    }
}

fn metric_value_line(row: &MetricRow) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            row.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    match (&row.delta, row.favorable()) {
        (Some(delta), Some(favorable)) => {
            let color = if favorable { Color::Green } else { Color::Red };
            spans.push(Span::styled(
                delta.text.clone(),
                Style::default().fg(color),
            ));
        }
        // No baseline: neutral placeholder, no coloring, no framing.
        _ => spans.push(Span::styled("-", Style::default().fg(Color::DarkGray))),
    }
    Line::from(spans)
}

fn render_picker(frame: &mut Frame, area: Rect, app: &App) {
    let Screen::Picker { slot } = app.state.screen else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let leagues = app.state.picker_leagues(app.table);
    let teams = app.state.picker_teams(app.table);
    let pane = app.state.picker.pane;

    render_picker_list(
        frame,
        columns[0],
        &format!("League (Team {})", slot + 1),
        &leagues,
        app.state.picker.league_idx,
        pane == PickerPane::Leagues,
    );
    render_picker_list(
        frame,
        columns[1],
        "Team",
        &teams,
        app.state.picker.team_idx,
        pane == PickerPane::Teams,
    );
}

fn render_picker_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    selected: usize,
    active: bool,
) {
    let border_style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }
    if items.is_empty() {
        let empty =
            Paragraph::new("Nothing to list").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(selected, items.len(), visible);

    let mut lines = Vec::with_capacity(end - start);
    for idx in start..end {
        let is_cursor = idx == selected;
        let prefix = if is_cursor { "> " } else { "  " };
        let style = if is_cursor && active {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else if is_cursor {
            Style::default().fg(Color::White)
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!("{prefix}{}", items[idx]), style));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Seasonwise Terminal - Help",
        "",
        "Compare:",
        "  1 / 2        Focus a team slot",
        "  Tab          Toggle focused slot",
        "  Enter / p    Open league/team picker",
        "  j/k or ↑/↓   Cycle team within the slot's league",
        "  a / d / o    Attacking / Defensive / Overall stats",
        "  c            Cycle category",
        "  r            Clear focused slot",
        "  x            Export comparison to xlsx",
        "",
        "Picker:",
        "  j/k or ↑/↓   Move",
        "  h/l          Switch pane",
        "  Enter        Select",
        "  Esc / b      Back",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
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

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
