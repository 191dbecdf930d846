use ratatui::{prelude::*, widgets::*};

use crate::lifecycle::LifecycleState;
use crate::messages::Cell;

/// Renders one cell's text panel
pub fn render_cell_panel<'a>(cell: Cell, text: &'a str, is_selected: bool, running: usize) -> Paragraph<'a> {
    let color = cell_color(cell);
    let border_style = if is_selected {
        Style::default().fg(color)
    } else {
        Style::default()
    };

    let running = if running > 0 {
        format!(" [running x{}]", running)
    } else {
        String::new()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {}{} ", cell.label(), running))
        .title_style(Style::default().fg(color).bold())
        .title_bottom(Line::from(format!(" {} ", cell.hint())).right_aligned().fg(Color::DarkGray));

    let content = if text.is_empty() {
        Line::from(Span::styled("(nothing yet)", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(Span::styled(text, Style::default().fg(Color::White).bold()))
    };

    Paragraph::new(content).block(block).wrap(Wrap { trim: false })
}

/// Renders the button bar, highlighting the selected button
pub fn render_buttons(selected: Cell) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, cell) in Cell::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let label = format!(" {}:{} ", i + 1, cell.label());
        let style = if *cell == selected {
            Style::default().fg(Color::Black).bg(cell_color(*cell)).bold()
        } else {
            Style::default().fg(cell_color(*cell))
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

/// Cell color
pub fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Live => Color::Green,
        Cell::State => Color::Cyan,
        Cell::Plain => Color::Yellow,
        Cell::Event => Color::Magenta,
    }
}

/// Lifecycle state color
pub fn lifecycle_color(state: LifecycleState) -> Color {
    match state {
        LifecycleState::Resumed => Color::Green,
        LifecycleState::Started => Color::Cyan,
        LifecycleState::Created | LifecycleState::Initialized => Color::Yellow,
        LifecycleState::Destroyed => Color::Red,
    }
}
