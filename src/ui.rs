//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering is a function of the
//! latest [`FeedState`] snapshot plus the view-only fields on `App`; the only
//! thing written back is the viewport height.
//!
//! ## Layout
//!
//! ```text
//! ┌ header: app name ─────────────── language ┐
//! │ card                                      │
//! │ card ...                                  │
//! └ status bar ───────────────────────────────┘
//! ```
//!
//! The error notification and the language picker are popups drawn over the
//! cards.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, CARD_HEIGHT};
use crate::feed::FeedState;
use crate::language::{Region, LANGUAGES};
use crate::source::Article;

/// Lines of extract shown per card.
const EXTRACT_LINES: u16 = 6;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    app.viewport_rows = main_area.height;

    draw_header(app.state(), frame, header_area);
    if app.state().initial_loading && app.state().articles.is_empty() {
        draw_initial_loading(app.state(), frame, main_area);
    } else {
        draw_cards(app, frame, main_area);
    }
    draw_status_bar(app.state(), frame, status_area);

    if let Some(message) = &app.state().error {
        draw_error(message, frame, main_area);
    }
    if let Some(highlighted) = app.picker {
        draw_language_picker(highlighted, app.state(), frame, main_area);
    }
}

fn draw_header(state: &FeedState, frame: &mut Frame, area: Rect) {
    let style = Style::default().bg(Color::Blue).fg(Color::White);
    let [left, right] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(28)]).areas(area);

    let title = Paragraph::new(Line::from(vec![
        Span::raw(" 📖 "),
        Span::styled("WikiScroll", Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .style(style);
    let language = Paragraph::new(format!("🌐 {} ", state.language.label()))
        .alignment(Alignment::Right)
        .style(style);

    frame.render_widget(title, left);
    frame.render_widget(language, right);
}

fn draw_initial_loading(state: &FeedState, frame: &mut Frame, area: Rect) {
    let [center] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let text = Paragraph::new(format!(
        "⟳ Loading random articles from {}…",
        state.language.name
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::LightBlue));
    frame.render_widget(text, center);
}

/// Render cards from the selected one down until the area is full.
fn draw_cards(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let total = state.articles.len();
    let mut y = area.y;

    for (index, article) in state.articles.iter().enumerate().skip(app.selected) {
        let remaining = area.bottom().saturating_sub(y);
        if remaining == 0 {
            return;
        }
        let card_area = Rect::new(area.x, y, area.width, CARD_HEIGHT.min(remaining));
        draw_card(article, index, total, frame, card_area);
        y += card_area.height;
    }

    // Room left below the last card: say what happens next.
    if y < area.bottom() {
        let footer = if state.loading {
            Span::styled("⟳ Loading more articles…", Style::default().fg(Color::LightBlue))
        } else if !state.has_more {
            Span::styled(
                "Feed halted. Press l to switch language.",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw("")
        };
        let footer_area = Rect::new(area.x, y, area.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(footer)).alignment(Alignment::Center),
            footer_area,
        );
    }
}

fn draw_card(article: &Article, index: usize, total: usize, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {}/{} ", index + 1, total));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title_area, _, extract_area, _, image_area, link_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(EXTRACT_LINES),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let title = Paragraph::new(article.title())
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    let extract = Paragraph::new(article.extract())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    let image = Paragraph::new(Line::from(vec![
        Span::styled("🖼  ", Style::default()),
        Span::styled(article.image_url(), Style::default().fg(Color::DarkGray)),
    ]));
    let link = Paragraph::new(Line::from(vec![
        Span::styled("↗  ", Style::default()),
        Span::styled(
            article.url(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        ),
    ]));

    frame.render_widget(title, title_area);
    frame.render_widget(extract, extract_area);
    frame.render_widget(image, image_area);
    frame.render_widget(link, link_area);
}

fn draw_status_bar(state: &FeedState, frame: &mut Frame, area: Rect) {
    let status = if state.loading {
        Span::styled("Loading…", Style::default().fg(Color::Yellow))
    } else if !state.has_more {
        Span::styled("Halted", Style::default().fg(Color::Red))
    } else {
        Span::styled("Ready", Style::default().fg(Color::Green))
    };
    let updated = state
        .last_updated
        .map(|t| format!("updated {}", t.format("%H:%M:%S")))
        .unwrap_or_else(|| "not loaded".into());

    let line = Line::from(vec![
        Span::raw(" "),
        status,
        Span::raw("  "),
        Span::styled(
            format!("{} articles", state.articles.len()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!(" · {} batches", state.batches_loaded),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(updated, Style::default().fg(Color::DarkGray)),
        Span::raw("  q: quit  ↑/↓: scroll  l: language  x: dismiss"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_error(message: &str, frame: &mut Frame, area: Rect) {
    let width = area.width.min(60);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.bottom().saturating_sub(4).max(area.y),
        width,
        4.min(area.height),
    );

    let body = Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(Span::styled("x: dismiss", Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error "),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(body, popup);
}

/// One row of the picker: either a region heading or a language.
enum PickerRow {
    Region(Region),
    Language(usize),
}

/// Picker rows in table order, with a heading before each region.
fn picker_rows() -> Vec<PickerRow> {
    let mut rows = Vec::with_capacity(LANGUAGES.len() + 5);
    let mut current = None;
    for (index, lang) in LANGUAGES.iter().enumerate() {
        if current != Some(lang.region) {
            current = Some(lang.region);
            rows.push(PickerRow::Region(lang.region));
        }
        rows.push(PickerRow::Language(index));
    }
    rows
}

fn draw_language_picker(highlighted: usize, state: &FeedState, frame: &mut Frame, area: Rect) {
    let [popup] = Layout::horizontal([Constraint::Length(36)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Max(20)])
        .flex(Flex::Center)
        .areas(popup);

    let rows = picker_rows();
    let selected_row = rows
        .iter()
        .position(|row| matches!(row, PickerRow::Language(i) if *i == highlighted));

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row {
            PickerRow::Region(region) => ListItem::new(Line::from(Span::styled(
                region.label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))),
            PickerRow::Language(index) => {
                let lang = &LANGUAGES[*index];
                let marker = if lang.code == state.language.code { "●" } else { " " };
                ListItem::new(format!(" {marker} {}", lang.label()))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Language ")
                .title_bottom(" Enter: select  Esc: close "),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸");

    let mut list_state = ListState::default().with_selected(selected_row);
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut list_state);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
