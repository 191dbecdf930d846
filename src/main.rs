//! Observable Compare - four reactive value holders side by side
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - presentation surface processing events and deliveries
//! - Cells (Tokio) - state holder with delayed and background emission

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use observable_compare::constants::{APP_NAME, APP_VERSION};
use observable_compare::messages::ui_events::terminal_to_ui_event;
use observable_compare::ui::{lifecycle_color, render_buttons, render_cell_panel};
use observable_compare::{AppActor, Cell, Config, RenderState, StateHolder, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    if let Err(e) = &loaded {
        tracing::warn!(
            error = %format!("{:#}", e),
            "Ignoring unusable config file, using defaults"
        );
    }
    tracing::info!(?config, "Starting {} {}", APP_NAME, APP_VERSION);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn app actor
    let holder = StateHolder::new(config.stream_settings());
    let app_actor = AppActor::new(holder, &config, render_tx);
    let app = tokio::spawn(app_actor.run(ui_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    let _ = app.await;
    tracing::info!("Shut down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Some(event) = terminal_to_ui_event(event::read()?, current_state.show_help) {
                let quit = matches!(event, UiEvent::Quit);
                let _ = ui_tx.send(event);
                if quit {
                    break;
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title bar
            Constraint::Min(12),    // Cell panels
            Constraint::Length(3),  // Buttons
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);
    draw_cells(f, state, main_chunks[1]);
    draw_buttons(f, state, main_chunks[2]);
    draw_status_bar(f, state, main_chunks[3]);

    if let Some(message) = &state.notification {
        draw_toast(f, message, main_chunks[1]);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" surface: "),
        Span::styled(
            state.lifecycle.as_str(),
            Style::default().fg(lifecycle_color(state.lifecycle)).bold(),
        ),
        Span::styled(
            format!("   toasts shown: {}", state.notifications_shown),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_cells(f: &mut Frame, state: &RenderState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (cell, row) in Cell::ALL.iter().zip(rows.iter()) {
        let running = if *cell == Cell::Plain { state.plain_runs } else { 0 };
        let panel = render_cell_panel(*cell, state.text(*cell), state.selected == *cell, running);
        f.render_widget(panel, *row);
    }
}

fn draw_buttons(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Buttons (←/→ select, Enter press) ");
    let buttons = Paragraph::new(render_buttons(state.selected))
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(buttons, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.lifecycle.is_at_least(observable_compare::LifecycleState::Started) {
        " 1-4:trigger | ←/→:select | Enter:press | p:background | ?:help | q:quit "
    } else {
        " Backgrounded - deliveries paused | p:foreground | q:quit "
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_toast(f: &mut Frame, message: &str, area: Rect) {
    let width = (message.len() as u16 + 6).min(area.width);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(3),
        width,
        height: 3.min(area.height),
    };

    let toast = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(Clear, toast_area);
    f.render_widget(toast, toast_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 OBSERVABLE COMPARE - Keyboard Shortcuts

 TRIGGERS
   1 / l              LiveValue   - set "LiveData"
   2 / s              StateValue  - set "StateFlow"
   3 / f              PlainStream - collect Item 0..4
   4 / e              EventStream - emit "SharedFlow"

 BUTTONS
   ← / → / Tab        Select button
   Enter / Space      Press selected button

 SURFACE
   p                  Toggle background/foreground
                      (terminal focus does the same)

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
