use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use transcript::{Speaker, TranscriptEntry};

use crate::App;

const KEYWORD_PANEL_WIDTH: u16 = 26;

pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, body_area, timeline_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [transcript_area, keyword_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(KEYWORD_PANEL_WIDTH)])
            .areas(body_area);

    render_header(frame, app, header_area);
    render_transcript(frame, app, transcript_area);
    render_keywords(frame, app, keyword_area);
    render_timeline(frame, app, timeline_area);
    render_hints(frame, hint_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.paused {
        "⏸ PAUSED"
    } else {
        "▶ PLAYING"
    };
    let text = format!(
        " {} | {} | {}ms/fragment ",
        app.fixture_name, status, app.speed_ms
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn speaker_style(speaker: Speaker) -> Style {
    let color = match speaker {
        Speaker::User => Color::Cyan,
        Speaker::Dispatcher => Color::Yellow,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn entry_line(app: &App, entry: &TranscriptEntry) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{} ", entry.display_time()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{}: ", entry.speaker), speaker_style(entry.speaker)),
    ];

    let text = &entry.text;
    let mut last = 0;
    for range in app.annotator.keywords().find_matches(text) {
        if range.start > last {
            spans.push(Span::raw(text[last..range.start].to_string()));
        }
        spans.push(Span::styled(
            text[range.clone()].to_string(),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
        last = range.end;
    }
    spans.push(Span::raw(text[last..].to_string()));

    Line::from(spans)
}

fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let frame_data = app.annotator.frame();
    let mut lines: Vec<Line> = frame_data
        .entries
        .iter()
        .map(|entry| entry_line(app, entry))
        .collect();

    if let Some(partial) = &frame_data.partial {
        lines.push(Line::from(vec![
            Span::styled(
                format!("         {}: ", partial.speaker),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                partial.text.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            Span::styled("▏", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let rows: usize = lines
        .iter()
        .map(|line| wrapped_rows(line, area.width))
        .sum();
    let scroll = rows.saturating_sub(area.height as usize) as u16;

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default())
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

/// Rows one logical line occupies once wrapped to `width`, assuming breaks
/// land exactly at the width. Scrolling by wrapped rows rather than logical
/// lines keeps the newest entries in view in narrow terminals.
fn wrapped_rows(line: &Line, width: u16) -> usize {
    if width == 0 {
        return 1;
    }
    line.width().div_ceil(width as usize).max(1)
}

fn render_keywords(frame: &mut Frame, app: &App, area: Rect) {
    let frame_data = app.annotator.frame();

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " keywords ",
            Style::default().fg(Color::DarkGray),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut heard: HashSet<String> = HashSet::new();
    for entry in &frame_data.entries {
        for range in app.annotator.keywords().find_matches(&entry.text) {
            heard.insert(entry.text[range].to_lowercase());
        }
    }

    let mut lines = vec![Line::from(Span::styled(
        "vocabulary",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::UNDERLINED),
    ))];

    for term in app.annotator.keywords().terms() {
        let style = if heard.contains(term) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(term.clone(), style)));
    }

    let flagged = frame_data
        .entries
        .iter()
        .filter(|e| e.contains_emergency_keyword)
        .count();

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("entries ", Style::default().fg(Color::DarkGray)),
        Span::raw(frame_data.entries.len().to_string()),
        Span::styled("  flagged ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            flagged.to_string(),
            Style::default().fg(if flagged > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.total();
    let ratio = if total == 0 {
        0.0
    } else {
        app.position as f64 / total as f64
    };
    let label = format!("{}/{}", app.position, total);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(
            " [Space] pause/resume  [←/→] seek  [↑/↓] speed  [Home/End] jump  [q] quit ",
        )
        .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
