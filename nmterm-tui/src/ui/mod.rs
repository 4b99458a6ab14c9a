/*!
 * nmterm TUI Interface
 * Tab bar, per-tab views, popups and the message line
 */

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Level, PasswordPurpose, Prompt, Tab};

// Conservative color palette
const BLUE: Color = Color::Rgb(100, 149, 237);
const GRAY: Color = Color::Rgb(128, 128, 128);
const WHITE: Color = Color::Rgb(255, 255, 255);
const GREEN: Color = Color::Rgb(34, 139, 34);
const RED: Color = Color::Rgb(220, 20, 60);

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Separator
            Constraint::Min(0),    // Current tab
            Constraint::Length(1), // Message line
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    f.render_widget(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(GRAY)),
        chunks[1],
    );

    match app.tab() {
        Tab::Wifi => render_wifi_tab(f, chunks[2], app),
        Tab::Networks => render_networks_tab(f, chunks[2], app),
        Tab::Rfkill => render_rfkill_tab(f, chunks[2], app),
        Tab::Logs => render_logs_tab(f, chunks[2], app),
        Tab::Debug => render_debug_tab(f, chunks[2], app),
    }

    render_message_line(f, chunks[3], app);

    if let Some(prompt) = &app.prompt {
        render_prompt(f, prompt);
    } else if app.detail.is_some() {
        render_detail_popup(f, app);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = app
        .tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            Line::from(vec![
                Span::styled(format!("{}:", i + 1), Style::default().fg(WHITE)),
                Span::styled(tab.title(), Style::default().fg(BLUE)),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_tab)
        .highlight_style(Style::default().fg(WHITE).bg(Color::Black).add_modifier(Modifier::BOLD))
        .divider(" ");

    f.render_widget(tabs, area);
}

fn render_wifi_tab(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(["", "SSID", "MODE", "CHAN", "RATE", "SIGNAL", "BARS", "SECURITY"])
        .style(Style::default().fg(GRAY).add_modifier(Modifier::BOLD));

    let rows = app.snapshot.networks.iter().map(|net| {
        let active = !net.is_hidden() && app.snapshot.is_active(&net.ssid);
        let saved = app.snapshot.profile_for(&net.ssid).is_some();
        let marker = if active {
            Span::styled("●", Style::default().fg(GREEN))
        } else if saved {
            Span::styled("○", Style::default().fg(BLUE))
        } else {
            Span::raw(" ")
        };
        let ssid = if net.is_hidden() {
            Span::styled("<hidden>", Style::default().fg(GRAY))
        } else {
            Span::styled(net.ssid.clone(), Style::default().fg(WHITE))
        };

        Row::new(vec![
            Cell::from(marker),
            Cell::from(ssid),
            Cell::from(net.mode.clone().unwrap_or_default()),
            Cell::from(number(net.channel)),
            Cell::from(net.rate.clone().unwrap_or_default()),
            Cell::from(number(net.signal)),
            Cell::from(Span::styled(
                net.bars.clone().unwrap_or_default(),
                Style::default().fg(signal_color(net.signal)),
            )),
            Cell::from(net.security.clone().unwrap_or_default()),
        ])
    });

    let widths = [
        Constraint::Length(1),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(12),
    ];

    let title = format!(
        "Networks ({})  [Enter] connect  [a] save  [s] rescan",
        app.snapshot.networks.len()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE).title(title))
        .row_highlight_style(Style::default().bg(BLUE).fg(WHITE))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(
        (!app.snapshot.networks.is_empty()).then_some(app.selected_network),
    );
    f.render_stateful_widget(table, area, &mut state);
}

fn render_networks_tab(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(["", "NAME", "UUID", "TYPE", "DEVICE"])
        .style(Style::default().fg(GRAY).add_modifier(Modifier::BOLD));

    let rows = app.snapshot.connections.iter().map(|conn| {
        let (indicator, color) = if conn.connected { ("●", GREEN) } else { ("○", GRAY) };
        Row::new(vec![
            Cell::from(Span::styled(indicator, Style::default().fg(color))),
            Cell::from(Span::styled(conn.name.clone(), Style::default().fg(WHITE))),
            Cell::from(conn.uuid.clone().unwrap_or_default()),
            Cell::from(conn.kind.clone().unwrap_or_default()),
            Cell::from(conn.device.clone().unwrap_or_default()),
        ])
    });

    let widths = [
        Constraint::Length(1),
        Constraint::Min(16),
        Constraint::Length(36),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(
            "Saved connections  [Enter] up/down  [i] details  [x] disconnect  [d] delete",
        ))
        .row_highlight_style(Style::default().bg(BLUE).fg(WHITE))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(
        (!app.snapshot.connections.is_empty()).then_some(app.selected_connection),
    );
    f.render_stateful_widget(table, area, &mut state);
}

fn render_rfkill_tab(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = &app.snapshot.status else {
        let waiting = Paragraph::new("Waiting for NetworkManager status...")
            .style(Style::default().fg(GRAY))
            .alignment(Alignment::Center);
        f.render_widget(waiting, area);
        return;
    };

    let state_color = if status.connected { GREEN } else { RED };
    let field = |label: &'static str, value: &Option<String>| {
        let value = value.clone().unwrap_or_else(|| "?".to_string());
        let color = match value.as_str() {
            "enabled" | "full" => GREEN,
            "disabled" | "none" => RED,
            _ => WHITE,
        };
        Line::from(vec![
            Span::styled(label, Style::default().fg(GRAY)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };

    let checked = match &app.connectivity {
        Some(check) => Line::from(vec![
            Span::styled("  Last check: ", Style::default().fg(GRAY)),
            Span::styled(
                check.state.clone().unwrap_or_else(|| "?".to_string()),
                Style::default().fg(WHITE),
            ),
            Span::styled(check.at.format(" at %H:%M:%S").to_string(), Style::default().fg(GRAY)),
        ]),
        None => Line::from(Span::styled("  Last check: never", Style::default().fg(GRAY))),
    };

    let content = vec![
        Line::from(vec![
            Span::styled("       State: ", Style::default().fg(GRAY)),
            Span::styled(status.state.clone(), Style::default().fg(state_color)),
        ]),
        field("Connectivity: ", &status.connectivity),
        checked,
        Line::from(""),
        field("     WiFi HW: ", &status.wifi_hw),
        field("        WiFi: ", &status.wifi),
        field("     WWAN HW: ", &status.wwan_hw),
        field("        WWAN: ", &status.wwan),
        Line::from(""),
        Line::from("[w] Toggle WiFi radio"),
        Line::from("[n] Toggle networking"),
        Line::from("[c] Check connectivity"),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default().title("Radio switches"))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

fn render_logs_tab(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(1) as usize;
    let end = app.log.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = app
        .log
        .range(start..end)
        .map(|entry| {
            let color = match entry.level {
                Level::Info => WHITE,
                Level::Error => RED,
            };
            Line::from(vec![
                Span::styled(entry.at.format("%H:%M:%S ").to_string(), Style::default().fg(GRAY)),
                Span::styled(entry.text.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().title("Activity"));
    f.render_widget(paragraph, area);
}

fn render_debug_tab(f: &mut Frame, area: Rect, app: &App) {
    let (polled_at, took) = match &app.last_poll {
        Some(stats) => (
            stats.at.format("%H:%M:%S").to_string(),
            format!("{}ms", stats.took.as_millis()),
        ),
        None => ("never".to_string(), "-".to_string()),
    };

    let mut content = vec![
        Line::from(vec![
            Span::styled("Poll seq: ", Style::default().fg(GRAY)),
            Span::styled(app.last_seq.to_string(), Style::default().fg(WHITE)),
        ]),
        Line::from(vec![
            Span::styled("Last poll: ", Style::default().fg(GRAY)),
            Span::styled(format!("{} ({})", polled_at, took), Style::default().fg(WHITE)),
        ]),
        Line::from(vec![
            Span::styled("Visible: ", Style::default().fg(GRAY)),
            Span::styled(
                format!(
                    "{} networks, {} connections",
                    app.snapshot.networks.len(),
                    app.snapshot.connections.len()
                ),
                Style::default().fg(WHITE),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Config", Style::default().fg(BLUE))),
    ];

    let config = serde_json::to_string_pretty(&app.config).unwrap_or_else(|e| e.to_string());
    content.extend(config.lines().map(|l| Line::from(l.to_string())));

    f.render_widget(Paragraph::new(content), area);
}

fn render_message_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.message {
        Some(message) => {
            let color = match message.level {
                Level::Info => GREEN,
                Level::Error => RED,
            };
            Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "[1-5] tabs  [F5] refresh  [Ctrl-C] quit",
            Style::default().fg(GRAY),
        )),
    };

    f.render_widget(Paragraph::new(line), area);
}

fn render_prompt(f: &mut Frame, prompt: &Prompt) {
    let area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, area);

    match prompt {
        Prompt::Password {
            request,
            purpose,
            input,
        } => {
            let title = match purpose {
                PasswordPurpose::Connect => format!("Connect to {}", request.ssid),
                PasswordPurpose::Save => format!("Save {}", request.ssid),
            };
            let masked = "*".repeat(input.value().chars().count());
            let content = vec![
                Line::from(Span::styled("Password:", Style::default().fg(GRAY))),
                Line::from(Span::styled(masked, Style::default().fg(WHITE))),
                Line::from(Span::styled("[Enter] ok  [Esc] cancel", Style::default().fg(GRAY))),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(BLUE));
            f.render_widget(Paragraph::new(content).block(block), area);

            let cursor_x = area.x + 1 + input.visual_cursor() as u16;
            f.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 2));
        }
        Prompt::ConfirmDelete { connection } => {
            let content = vec![
                Line::from(vec![
                    Span::styled("Delete ", Style::default().fg(WHITE)),
                    Span::styled(
                        connection.name.clone(),
                        Style::default().fg(RED).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("?", Style::default().fg(WHITE)),
                ]),
                Line::from(""),
                Line::from(Span::styled("[y] yes  [any key] no", Style::default().fg(GRAY))),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .title("Confirm")
                .border_style(Style::default().fg(RED));
            f.render_widget(Paragraph::new(content).block(block), area);
        }
    }
}

fn render_detail_popup(f: &mut Frame, app: &App) {
    let Some(view) = &app.detail else {
        return;
    };

    let area = centered_rect(80, f.area().height.saturating_sub(4), f.area());
    f.render_widget(Clear, area);

    let width = view.detail.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let lines: Vec<Line> = view
        .detail
        .iter()
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", name, width = width),
                    Style::default().fg(GRAY),
                ),
                Span::styled(value.to_string(), Style::default().fg(WHITE)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{}  [Esc] close", view.id))
        .border_style(Style::default().fg(BLUE));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));
    f.render_widget(paragraph, area);
}

/// Numeric field, `?` when nmcli printed something non-numeric.
fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

fn signal_color(signal: Option<u8>) -> Color {
    match signal {
        Some(s) if s >= 60 => GREEN,
        Some(s) if s >= 30 => BLUE,
        Some(_) => RED,
        None => GRAY,
    }
}

/// Rectangle of `percent_x` width and `height` rows centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
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
