//! Rendering for the TUI dashboard.
//!
//! Layout, top to bottom: header bar, current-reading card, temperature
//! chart, status bar. The chart has a time-based x-axis (seconds since the
//! session started) and a y-axis that always starts at zero.

use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph};

use crate::format::format_clock;
use crate::tui::app::{App, MonitorStatus};

// Dark palette, Tailwind-inspired
const PRIMARY: Color = Color::Rgb(34, 211, 238); // cyan-400
const SUCCESS: Color = Color::Rgb(74, 222, 128); // green-400
const WARNING: Color = Color::Rgb(251, 191, 36); // amber-400
const DANGER: Color = Color::Rgb(248, 113, 113); // red-400
const INFO: Color = Color::Rgb(96, 165, 250); // blue-400
const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // slate-400
const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // slate-500
const BORDER: Color = Color::Rgb(71, 85, 105); // slate-600

/// Color for a temperature value: cool blue, comfortable green, warm red.
fn temp_color(celsius: f32) -> Color {
    if celsius < 18.0 {
        INFO
    } else if celsius <= 26.0 {
        SUCCESS
    } else {
        DANGER
    }
}

/// Draw the complete TUI interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(3), // Current reading card
            Constraint::Min(5),    // Chart
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, layout[0], app);
    draw_reading_card(frame, layout[1], app);
    draw_chart(frame, layout[2], app);
    draw_status_bar(frame, layout[3], app);
}

/// Header bar: title, connection status, device identity.
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Thingy Monitor ",
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
    )];

    let (icon, icon_color) = match app.status {
        MonitorStatus::Subscribed => ("*".to_string(), SUCCESS),
        MonitorStatus::Connecting => (app.spinner_char().to_string(), WARNING),
        MonitorStatus::Disconnected => ("o".to_string(), TEXT_MUTED),
    };
    spans.push(Span::styled(
        format!(" {} {} ", icon, app.status.label()),
        Style::default().fg(icon_color),
    ));

    if let Some(device) = app.device_label() {
        spans.push(Span::styled(
            format!(" {} ", device),
            Style::default().fg(TEXT_SECONDARY),
        ));
    }

    if app.last_error.is_some() {
        spans.push(Span::styled(
            " ERR ",
            Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Current reading card: the `Temperature: <value>°C` display sink.
fn draw_reading_card(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match app.display_label() {
        Some(label) => {
            let color = app
                .latest
                .map(|r| temp_color(r.celsius()))
                .unwrap_or(TEXT_SECONDARY);
            (label, color)
        }
        None => {
            let hint = match app.status {
                MonitorStatus::Disconnected => "No data - press c to connect",
                MonitorStatus::Connecting => "Connecting... (Esc to cancel)",
                MonitorStatus::Subscribed => "Waiting for notifications...",
            };
            (hint.to_string(), TEXT_MUTED)
        }
    };

    let card = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(" Current ")
            .title_style(Style::default().fg(TEXT_SECONDARY)),
    );
    frame.render_widget(card, area);
}

/// Temperature chart: time on x (second resolution), zero-based y.
fn draw_chart(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(" Temperature (°C) ")
        .title_style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD));

    if app.series.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No readings yet",
                Style::default().fg(TEXT_MUTED),
            )),
        ];
        let hint = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let data = app.series.chart_points(app.origin);
    let x_min = data.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = data.last().map(|p| p.0).unwrap_or(0.0).max(x_min + 60.0);

    // Zero-based y-axis with headroom above the hottest point
    let y_top = (f64::from(app.series.max_celsius().unwrap_or(30.0)).max(10.0) * 1.2).ceil();

    let datasets = vec![
        Dataset::default()
            .name("°C")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PRIMARY))
            .data(&data),
    ];

    let x_labels: Vec<String> = [x_min, (x_min + x_max) / 2.0, x_max]
        .iter()
        .map(|v| format!("{:.0}s", v))
        .collect();
    let y_labels: Vec<String> = [0.0, y_top / 2.0, y_top]
        .iter()
        .map(|v| format!("{:.0}", v))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(TEXT_MUTED))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(TEXT_MUTED))
                .bounds([0.0, y_top])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Context-sensitive key hints for the current state.
fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = Vec::new();
    match app.status {
        MonitorStatus::Disconnected => hints.push(("c", "connect")),
        MonitorStatus::Connecting => hints.push(("Esc", "cancel")),
        MonitorStatus::Subscribed => hints.push(("d", "disconnect")),
    }
    hints.push(("q", "quit"));
    hints
}

/// Status bar: key hints, error text, wall clock.
fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let left_spans = if let Some(error) = &app.last_error {
        vec![Span::styled(
            format!(" {}", error),
            Style::default().fg(DANGER),
        )]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in context_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(TEXT_MUTED)));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(TEXT_MUTED),
            ));
        }
        spans
    };

    let bar = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), bar[0]);

    let clock = Paragraph::new(format_clock(app.local_offset))
        .style(Style::default().fg(TEXT_MUTED))
        .alignment(Alignment::Right);
    frame.render_widget(clock, bar[1]);
}
