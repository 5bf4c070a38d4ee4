//! Board view: one column per board column, cards stacked top-down, and a
//! floating copy of the dragged card under the pointer

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::cli::tui::app::{App, InputMode};
use crate::cli::tui::layout::{inner, CardStyle, ColumnRegion};
use crate::cli::tui::utils::truncate_str;
use crate::domain::{Task, TaskId};

/// Draw the board layout
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = app.layout();

    draw_header(frame, app, layout.header, layout.new_task_button);

    let target = app.drop_target();
    for region in &layout.columns {
        draw_column(frame, app, region, target.as_deref());
    }

    draw_status_bar(frame, app, layout.status);
    draw_overlay(frame, app);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, button: Rect) {
    let board = app.board();
    let title = Line::from(vec![
        Span::styled("Board", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  {} columns, {} tasks",
            board.columns.len(),
            board.placed_count()
        )),
    ]);

    let header = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);

    let new_task = Paragraph::new("+ New Task")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(new_task, button);
}

fn draw_column(frame: &mut Frame, app: &App, region: &ColumnRegion, target: Option<&str>) {
    let board = app.board();
    let Some(column) = board.column(&region.column) else {
        return;
    };

    let dragging = app.controller().drag_state().is_dragging();
    let hovered = target.is_some_and(|id| {
        column.id.as_str() == id || column.task_ids.iter().any(|t| t.as_str() == id)
    });

    let border_style = if dragging && hovered {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut title = format!("{} ({})", column.title, column.len());
    if region.hidden > 0 {
        title.push_str(&format!(" +{} more", region.hidden));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(block, region.area);

    if column.is_empty() {
        let body = inner(region.area);
        let hint_style = if dragging && target == Some(column.id.as_str()) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let hint = Paragraph::new("Drop tasks here")
            .alignment(Alignment::Center)
            .style(hint_style);
        frame.render_widget(hint, Rect::new(body.x, body.y, body.width, body.height.min(1)));
        return;
    }

    let active = app.controller().active_task_id();
    let selected = app.selected_task_id();

    for card in &region.cards {
        let Some(task) = board.task(&card.task) else {
            continue;
        };

        let state = if Some(&card.task) == active {
            CardState::Placeholder
        } else if dragging && target == Some(card.task.as_str()) {
            CardState::Target
        } else if !dragging && Some(&card.task) == selected {
            CardState::Selected
        } else {
            CardState::Plain
        };

        draw_card(frame, app, task, card.area, state);
    }

    // Keyboard slot past the last card
    if let InputMode::KeyDrag { .. } = app.input_mode() {
        if target == Some(column.id.as_str()) {
            draw_drop_marker(frame, region);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardState {
    Plain,
    Selected,
    /// The card being dragged, left in place
    Placeholder,
    /// The card the drag would land before
    Target,
}

fn draw_card(frame: &mut Frame, app: &App, task: &Task, area: Rect, state: CardState) {
    let (border, text) = match state {
        CardState::Plain => (Style::default().fg(Color::Gray), Style::default()),
        CardState::Selected => (
            Style::default().fg(Color::Cyan),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        CardState::Placeholder => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        ),
        CardState::Target => (Style::default().fg(Color::Yellow), Style::default()),
    };

    let paragraph = Paragraph::new(card_lines(task, app.style(), app.title_width()))
        .style(text)
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(paragraph, area);
}

/// Text lines of a card: the title, then assignee and due date if shown
fn card_lines(task: &Task, style: CardStyle, title_width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(truncate_str(&task.title, title_width))];

    if style.has_footer(task) {
        let mut footer = Vec::new();
        if style.show_assignee {
            if let Some(assignee) = &task.assignee {
                footer.push(Span::styled(
                    format!("@{}", assignee),
                    Style::default().fg(Color::Blue),
                ));
            }
        }
        if style.show_due_date {
            if let Some(due) = &task.due_date {
                if !footer.is_empty() {
                    footer.push(Span::raw("  "));
                }
                footer.push(Span::styled(
                    format!("due {}", due),
                    Style::default().fg(Color::Magenta),
                ));
            }
        }
        lines.push(Line::from(footer));
    }

    lines
}

fn draw_drop_marker(frame: &mut Frame, region: &ColumnRegion) {
    let body = inner(region.area);
    let y = region
        .cards
        .last()
        .map(|card| card.area.bottom())
        .unwrap_or(body.y);
    if y >= body.bottom() {
        return;
    }

    let marker = Paragraph::new("▸ drop here").style(Style::default().fg(Color::Yellow));
    frame.render_widget(marker, Rect::new(body.x, y, body.width, 1));
}

/// Floating copy of the dragged card at the pointer
fn draw_overlay(frame: &mut Frame, app: &App) {
    let (Some((x, y)), Some(task)) = (app.pointer_position(), app.controller().active_task())
    else {
        return;
    };

    let frame_area = frame.area();
    let width = card_width(app, &task.id).min(frame_area.width);
    let height = app.style().card_height(task).min(frame_area.height);

    // Keep the overlay on screen
    let x = x.min(frame_area.right().saturating_sub(width));
    let y = y.min(frame_area.bottom().saturating_sub(height));
    let area = Rect::new(x, y, width, height);

    let paragraph = Paragraph::new(card_lines(task, app.style(), app.title_width())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(ratatui::widgets::BorderType::Double)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Width of the card as laid out, or of the first column's cards
fn card_width(app: &App, task: &TaskId) -> u16 {
    let layout = app.layout();
    layout
        .card(task)
        .map(|card| card.area.width)
        .or_else(|| layout.columns.first().map(|c| inner(c.area).width))
        .unwrap_or(24)
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (content, style) = match app.input_mode() {
        InputMode::Normal if app.controller().drag_state().is_dragging() => (
            "Release to drop, Esc to cancel".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Normal => {
            let msg = app
                .status_message()
                .unwrap_or("[space]pick up [h/j/k/l]move [?]help [q]uit");
            (msg.to_string(), Style::default())
        }
        InputMode::KeyDrag { .. } => (
            "Move with h/j/k/l, Enter to drop, Esc to cancel".to_string(),
            Style::default().fg(Color::Yellow),
        ),
    };

    let status_text = format!("flowtrack [rev {}] {}", app.controller().revision(), content);

    let paragraph = Paragraph::new(status_text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
