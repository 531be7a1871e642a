use chrono::{Datelike, Local};
use parkstat_core::ReportRepository;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Dialog, DialogKind, Flow, PromptField, View};
use crate::tui::chart::draw_chart;

const DIALOG_MAX_WIDTH: u16 = 70;
const DIALOG_HINT: &str = "Press Enter to continue";

pub fn draw<R: ReportRepository>(f: &mut Frame, app: &App<R>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("PARKSTAT")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let help = match &app.view {
        View::MainMenu => {
            draw_menu(f, app, " Main Menu ", None, main_chunks[1]);
            "j/k: Navigate | 1-4 + Enter: Choose"
        }
        View::AnalysisMenu { period } => {
            let subtitle = format!("Report loaded for {period}");
            draw_menu(f, app, " Analysis Options ", Some(subtitle), main_chunks[1]);
            "j/k: Navigate | 1-5 + Enter: Choose"
        }
        View::Prompt { flow, field } => {
            draw_prompt(f, app, *flow, *field, main_chunks[1]);
            "Enter: Confirm | Esc: Cancel"
        }
        View::Chart { spec, .. } => {
            draw_chart(f, spec, main_chunks[1]);
            "Esc: Close chart"
        }
        View::Live(sim) => {
            draw_live(f, sim.lot(), sim.tick_interval().as_secs_f64(), main_chunks[1]);
            "Esc: Close simulation"
        }
    };

    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);

    if let Some(dialog) = app.dialog() {
        draw_dialog(f, dialog, size);
    }
}

fn draw_menu<R: ReportRepository>(
    f: &mut Frame,
    app: &App<R>,
    title: &str,
    subtitle: Option<String>,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut items: Vec<ListItem> = Vec::new();
    if let Some(subtitle) = subtitle {
        items.push(ListItem::new(Span::styled(subtitle, Style::default().fg(Color::Blue))));
        items.push(ListItem::new(""));
    }
    for (i, label) in app.menu_labels().iter().enumerate() {
        let line = format!("{}. {}", i + 1, label);
        let style = if i == app.selected {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        items.push(ListItem::new(line).style(style));
    }

    let list = List::new(items)
        .block(rounded(title));
    f.render_widget(list, chunks[0]);

    draw_input(f, app, " Choose an option ", chunks[1]);
}

fn draw_prompt<R: ReportRepository>(
    f: &mut Frame,
    app: &App<R>,
    flow: Flow,
    field: PromptField,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let title = match flow {
        Flow::Analyze => " Month Analysis ",
        Flow::Generate => " Generate Report ",
    };
    let question = match (flow, field) {
        (_, PromptField::Month) => "Which month? (enter a number from 1 to 12)".to_string(),
        (Flow::Analyze, PromptField::Year { month }) => format!(
            "Year for month {month}? Enter 1 for 2021, 2 for 2022, 3 for 2023, 4 for 2024, \
             or a full year."
        ),
        (Flow::Generate, PromptField::Year { month }) => format!(
            "Year of the report for month {month}? (e.g. {})",
            Local::now().year()
        ),
    };

    let body = Paragraph::new(question)
        .wrap(Wrap { trim: true })
        .block(rounded(title));
    f.render_widget(body, chunks[0]);

    draw_input(f, app, " Answer ", chunks[1]);
}

fn draw_input<R: ReportRepository>(f: &mut Frame, app: &App<R>, title: &str, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(rounded(title));
    f.render_widget(input, area);

    if app.dialog().is_none() {
        let prefix: String = app.input.chars().take(app.cursor_position).collect();
        f.set_cursor_position((area.x + 1 + prefix.width() as u16, area.y + 1));
    }
}

fn draw_live(f: &mut Frame, lot: &parkstat_core::ParkingLotState, tick_secs: f64, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(lot.status_line(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("Capacity: {} spaces | updated every {tick_secs:.1}s", lot.capacity()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let status = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Real-time Parking Simulation ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(status, chunks[0]);

    let ratio = if lot.capacity() > 0 {
        f64::from(lot.occupied()) / f64::from(lot.capacity())
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(rounded(" Occupancy "))
        .gauge_style(Style::default().fg(if ratio > 0.9 { Color::Red } else { Color::Green }))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[1]);
}

fn draw_dialog(f: &mut Frame, dialog: &Dialog, area: Rect) {
    let color = match dialog.kind {
        DialogKind::Info => Color::Cyan,
        DialogKind::Warning => Color::Yellow,
        DialogKind::Error => Color::Red,
    };

    let width = (dialog.message.width() as u16 + 4)
        .clamp(30, DIALOG_MAX_WIDTH)
        .min(area.width);
    let text_width = width.saturating_sub(2).max(1) as usize;
    let text_lines =
        u16::try_from(wrapped_line_count(&dialog.message, text_width)).unwrap_or(u16::MAX);
    // Borders, the blank spacer and the hint line.
    let height = text_lines.saturating_add(4).min(area.height);
    let rect = centered(area, width, height);

    let body = vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(Span::styled(DIALOG_HINT, Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", dialog.title))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

/// Lines `text` takes once wrapped at word boundaries into `width` columns,
/// the way `Wrap { trim: true }` lays it out. Words wider than a line are
/// split across lines.
fn wrapped_line_count(text: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut lines = 1;
    let mut used = 0;
    for word in text.split_whitespace() {
        let mut word_width = word.width();
        if used > 0 && used + 1 + word_width <= width {
            used += 1 + word_width;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        while word_width > width {
            lines += 1;
            word_width -= width;
        }
        used = word_width;
    }
    lines
}

fn rounded(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
