use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use tokio_util::sync::CancellationToken;

use crate::connection::{ConnectionState, Supervisor};
use crate::engine::{filter_and_sort, ShotFilter, SortField, SortState};
use crate::metrics::{
    ammo_totals, license_band, overused_purchases, shot_activity, stock_level, LicenseBand,
    ShotActivity, StockLevel,
};
use crate::models::Shot;
use crate::store::{DashboardData, Store};

const EVENT_POLL: Duration = Duration::from_millis(200);

/// Interactive state for the dashboard screen. Data itself lives in the
/// store; this only tracks what the operator is doing with it.
pub struct DashboardUi {
    pub status: ConnectionState,
    pub filter: ShotFilter,
    pub sort: SortState,
    pub table_state: TableState,
}

impl DashboardUi {
    pub fn new() -> Self {
        Self {
            status: ConnectionState::Connecting,
            filter: ShotFilter::default(),
            sort: SortState::default(),
            table_state: TableState::default(),
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.status, ConnectionState::Disconnected { offline: true })
    }

    fn cycle_weapon_filter(&mut self) {
        self.filter.weapon = match self.filter.weapon.as_deref() {
            None => Some("Rifle".to_string()),
            Some("Rifle") => Some("Shotgun".to_string()),
            Some("Shotgun") => Some("Handgun".to_string()),
            Some("Handgun") => Some("Bow".to_string()),
            Some(_) => None,
        };
    }

    fn toggle_today_filter(&mut self) {
        self.filter.date = match self.filter.date {
            Some(_) => None,
            None => Some(chrono::Utc::now().date_naive()),
        };
    }

    fn move_selection(&mut self, delta: i64, row_count: usize) {
        if row_count == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(row_count as i64) as usize;
        self.table_state.select(Some(next));
    }
}

impl Default for DashboardUi {
    fn default() -> Self {
        Self::new()
    }
}

fn badge_style(status: ConnectionState) -> Style {
    match status {
        ConnectionState::Connected => Style::default().fg(Color::Green),
        ConnectionState::Connecting => Style::default().fg(Color::Yellow),
        ConnectionState::Disconnected { offline: false } => Style::default().fg(Color::Red),
        ConnectionState::Disconnected { offline: true } => {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        }
    }
}

fn sort_marker(state: &DashboardUi, field: SortField) -> &'static str {
    if state.sort.field == field {
        state.sort.direction.arrow()
    } else {
        " "
    }
}

fn stat_card(title: &str, value: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(value)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
}

fn render_stats(f: &mut Frame, area: Rect, data: &DashboardData, activity: ShotActivity) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let totals = ammo_totals(&data.ammunition);
    f.render_widget(
        stat_card("Active Hunters", data.stats.active_hunters.to_string(), Color::Cyan),
        cards[0],
    );
    f.render_widget(
        stat_card("Total Shots", data.stats.total_shots.to_string(), Color::Yellow),
        cards[1],
    );
    f.render_widget(
        stat_card("Rounds in Stock", totals.total_rounds.to_string(), Color::Green),
        cards[2],
    );
    f.render_widget(
        stat_card("Active Locations", data.stats.active_locations.to_string(), Color::Magenta),
        cards[3],
    );
    f.render_widget(
        stat_card(
            "Shots 24h / 7d",
            format!("{} / {}", activity.last_24h, activity.last_7d),
            Color::LightBlue,
        ),
        cards[4],
    );
}

fn shot_row<'a>(shot: &Shot, fresh: bool) -> Row<'a> {
    let style = if fresh {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(shot.hunter_name.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(shot.timestamp.format("%m-%d %H:%M:%S").to_string()),
        Cell::from(shot.location.clone()),
        Cell::from(shot.weapon_used.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(format!("{:.1}", shot.sound_level.unwrap_or(0.0))),
        Cell::from(format!("{:.1}", shot.vibration_level.unwrap_or(0.0))),
    ])
    .style(style)
}

fn render_shot_table(f: &mut Frame, area: Rect, state: &mut DashboardUi, data: &DashboardData, rows: &[Shot]) {
    let mut filter_note = String::new();
    if let Some(weapon) = &state.filter.weapon {
        filter_note.push_str(&format!(" weapon={weapon}"));
    }
    if state.filter.date.is_some() {
        filter_note.push_str(" today");
    }
    let title = if filter_note.is_empty() {
        format!("Shots ({} of {})", rows.len(), data.shots.len())
    } else {
        format!("Shots ({} of {}, filter:{})", rows.len(), data.shots.len(), filter_note)
    };

    let header = Row::new(vec![
        format!("Hunter {}", sort_marker(state, SortField::Hunter)),
        format!("Time {}", sort_marker(state, SortField::Timestamp)),
        format!("Location {}", sort_marker(state, SortField::Location)),
        format!("Weapon {}", sort_marker(state, SortField::Weapon)),
        format!("dB {}", sort_marker(state, SortField::Sound)),
        format!("Hz {}", sort_marker(state, SortField::Vibration)),
    ])
    .style(Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD));

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|s| shot_row(s, s.id.map(|id| data.shots.is_fresh(id)).unwrap_or(false)))
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(18),
            Constraint::Percentage(16),
            Constraint::Percentage(22),
            Constraint::Percentage(16),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_compliance_panel(f: &mut Frame, area: Rect, data: &DashboardData) {
    let mut lines: Vec<Line> = Vec::new();

    for item in &data.ammunition {
        match stock_level(item) {
            StockLevel::Critical => lines.push(Line::from(Span::styled(
                format!("CRITICAL {} ({} left)", item.ammo_type, item.quantity),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))),
            StockLevel::Low => lines.push(Line::from(Span::styled(
                format!("LOW {} ({} left)", item.ammo_type, item.quantity),
                Style::default().fg(Color::Yellow),
            ))),
            StockLevel::Normal => {}
        }
    }

    for license in &data.licenses {
        let holder = license.hunter_name.as_deref().unwrap_or(&license.license_number);
        match license_band(license) {
            LicenseBand::Expired => lines.push(Line::from(Span::styled(
                format!("EXPIRED license: {holder}"),
                Style::default().fg(Color::Red),
            ))),
            LicenseBand::ExpiringSoon => lines.push(Line::from(Span::styled(
                format!("{holder} expires in {}d", license.days_until_expiry),
                Style::default().fg(Color::Yellow),
            ))),
            LicenseBand::Valid => {}
        }
    }

    for (purchase, excess) in overused_purchases(&data.purchases) {
        let holder = purchase.hunter_name.as_deref().unwrap_or("unknown");
        lines.push(Line::from(Span::styled(
            format!("OVERUSE {holder}: {excess} rounds over {}", purchase.ammo_type),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No alerts",
            Style::default().fg(Color::Green),
        )));
    }

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Compliance Alerts"));
    f.render_widget(panel, area);
}

fn render_offline_notice(f: &mut Frame, area: Rect) {
    let notice = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Backend unreachable",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Showing empty placeholder data."),
        Line::from("Press 'r' to retry the connection."),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Offline"));
    f.render_widget(notice, area);
}

pub fn render_dashboard(f: &mut Frame, state: &mut DashboardUi, data: &DashboardData, rows: &[Shot]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Huntwatch Fleet Dashboard",
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(format!("[{}]", state.status), badge_style(state.status)),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let activity = shot_activity(data.shots.shots(), chrono::Utc::now());
    render_stats(f, chunks[1], data, activity);

    if state.is_offline() {
        render_offline_notice(f, chunks[2]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[2]);
        render_shot_table(f, body[0], state, data, rows);
        render_compliance_panel(f, body[1], data);
    }

    let footer = Paragraph::new(
        "↑↓: Navigate | 1-6: Sort column | w: Weapon filter | t: Today only | c: Clear filters | r: Retry | q: Quit",
    )
    .style(Style::default().fg(Color::White))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);
    f.render_widget(footer, chunks[3]);
}

/// Run the dashboard event loop until quit or cancellation. Data arrives
/// through the store; connection status through the supervisor's watch
/// channel.
pub async fn run_dashboard(
    store: Store,
    supervisor: Arc<Supervisor>,
    cancel: CancellationToken,
) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let status_rx = supervisor.status();
    let mut state = DashboardUi::new();

    loop {
        if cancel.is_cancelled() {
            break;
        }
        state.status = *status_rx.borrow();

        let data = store.snapshot().await;
        let rows = filter_and_sort(data.shots.shots(), &state.filter, state.sort);
        let row_count = rows.len();
        terminal.draw(|f| render_dashboard(f, &mut state, &data, &rows))?;

        if !event::poll(EVENT_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up => state.move_selection(-1, row_count),
                KeyCode::Down => state.move_selection(1, row_count),
                KeyCode::Char('1') => state.sort.toggle(SortField::Hunter),
                KeyCode::Char('2') => state.sort.toggle(SortField::Timestamp),
                KeyCode::Char('3') => state.sort.toggle(SortField::Location),
                KeyCode::Char('4') => state.sort.toggle(SortField::Weapon),
                KeyCode::Char('5') => state.sort.toggle(SortField::Sound),
                KeyCode::Char('6') => state.sort.toggle(SortField::Vibration),
                KeyCode::Char('w') => state.cycle_weapon_filter(),
                KeyCode::Char('t') => state.toggle_today_filter(),
                KeyCode::Char('c') => state.filter.clear(),
                KeyCode::Char('r') => {
                    let supervisor = supervisor.clone();
                    tokio::spawn(async move {
                        let _ = supervisor.manual_retry().await;
                    });
                }
                _ => {}
            }
        }
    }

    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}
