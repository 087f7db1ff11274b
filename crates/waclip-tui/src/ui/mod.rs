use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::actions::SettingToggle;
use crate::app::{App, Mode};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(SettingToggle::ALL.len() as u16 + 3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(frame, chunks[0], app);
    render_settings(frame, chunks[1], app);
    render_message(frame, chunks[2], app);
    render_log(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);

    if app.show_help {
        render_help(frame, size);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let (state, style) = if app.running {
        (
            "Running",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "Stopped",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    };
    let line = Line::from(vec![
        Span::raw("Status: "),
        Span::styled(state, style),
        Span::raw(format!(
            "  every {:.1}s  numbers seen: {}",
            app.settings.poll_interval().as_secs_f64(),
            app.seen_count
        )),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("waclip: clipboard to WhatsApp");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_settings(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let mut lines: Vec<Line> = SettingToggle::ALL
        .iter()
        .enumerate()
        .map(|(index, toggle)| {
            let on = toggle.get(&app.settings);
            let (mark, style) = if on {
                ("[x]", Style::default().fg(Color::Green))
            } else {
                ("[ ]", Style::default().fg(Color::DarkGray))
            };
            Line::from(vec![
                Span::styled(format!("{} ", index + 1), Style::default().fg(Color::Yellow)),
                Span::styled(mark, style),
                Span::raw(format!(" {}", toggle.label())),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled("+/- ", Style::default().fg(Color::Yellow)),
        Span::raw(format!(
            "Check interval: {:.1}s",
            app.settings.poll_interval().as_secs_f64()
        )),
    ]));

    let block = Block::default().borders(Borders::ALL).title("Settings");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_message(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let editing = app.mode == Mode::EditingMessage;
    let mut title = String::from("Message");
    if app.message_is_unsaved() {
        title.push_str(" (unsaved)");
    }
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(app.message.clone(), style)];
    if editing {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_log(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let end = app.log.len().saturating_sub(app.log_offset);
    let start = end.saturating_sub(height);

    let items: Vec<ListItem> = app.log[start..end]
        .iter()
        .map(|entry| {
            let style = if entry.failure {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(entry.text.clone(), style)))
        })
        .collect();

    let title = if app.log_offset > 0 {
        format!("Activity Log (-{})", app.log_offset)
    } else {
        "Activity Log".to_string()
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hint = match app.mode {
        Mode::Normal => {
            "s start/stop  x clear duplicates  e edit message  1-5 toggle  +/- interval  j/k scroll  ? help  q quit"
        }
        Mode::EditingMessage => "enter save  esc done (keep unsaved)  ctrl+u clear  ctrl+w delete word",
    };

    let mut lines = vec![Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(err) = &app.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let modal = centered_rect(70, 60, area);
    frame.render_widget(Clear, modal);

    let text = vec![
        Line::from("Global: q quit, Ctrl+C quit, ? help"),
        Line::from("Monitor: s start/stop, x clear duplicates"),
        Line::from("Message: e edit, enter save as default, esc stop editing"),
        Line::from("Settings: 1-5 toggle (saved immediately), +/- check interval"),
        Line::from("Log: k/j scroll up/down, g oldest, G newest"),
        Line::from(""),
        Line::from("An edited message is used for new chats right away; save it to keep it."),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
