use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::config::{ColorConfig, Config};
use crate::tui::app::TuiApp;
use crate::tui::compose::INPUT_INSET;
use crate::tui::marquee::Cell;

/// Split the screen into the marquee (top) and compose (bottom) regions.
pub fn regions(area: Rect, compose_height: u16) -> (Rect, Rect) {
    let compose_height = compose_height.min(area.height);
    let [marquee, compose] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(compose_height)]).areas(area);
    (marquee, compose)
}

/// Width and height inside a region's border.
pub fn interior(area: Rect) -> (usize, usize) {
    (
        area.width.saturating_sub(2) as usize,
        area.height.saturating_sub(2) as usize,
    )
}

pub fn render(frame: &mut Frame, app: &mut TuiApp, config: &Config) {
    app.fit(frame.area());
    let (marquee_area, compose_area) = regions(frame.area(), app.compose_height());

    render_marquee(frame, app, marquee_area, config);
    render_compose(frame, app, compose_area, config);
}

fn render_marquee(frame: &mut Frame, app: &TuiApp, area: Rect, config: &Config) {
    let colors = &config.colors;
    let status_style = Style::default().fg(colors.status);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title_top(
            Line::from(Span::styled(
                config.display.title.as_str(),
                Style::default()
                    .fg(colors.title)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
        );

    if let Some(status) = &app.status_message {
        block = block.title_bottom(
            Line::from(Span::styled(format!(" {} ", status), status_style)).left_aligned(),
        );
    }
    if let Some(at) = app.marquee.last_batch() {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" updated {} ", at.format("%H:%M")),
                status_style,
            ))
            .right_aligned(),
        );
    }

    let lines: Vec<Line> = app
        .marquee
        .rows()
        .map(|row| row_line(row, colors))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One marquee row, with runs of highlighted cells grouped into spans.
fn row_line(row: &[Cell], colors: &ColorConfig) -> Line<'static> {
    let style = |bold: bool| {
        if bold {
            Style::default()
                .fg(colors.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text)
        }
    };

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut bold = false;
    for cell in row {
        if cell.bold != bold && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), style(bold)));
        }
        bold = cell.bold;
        run.push(cell.ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, style(bold)));
    }
    Line::from(spans)
}

fn render_compose(frame: &mut Frame, app: &TuiApp, area: Rect, config: &Config) {
    let colors = &config.colors;
    let status_style = Style::default().fg(colors.status);

    let hint = format!(" Press {} to exit ", config.keybindings.quit_hint());
    let version = format!(" version {} ", env!("CARGO_PKG_VERSION"));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .padding(Padding::horizontal(INPUT_INSET as u16))
        .title_top(Line::from(Span::styled(app.mouse_status(), status_style)).right_aligned())
        .title_bottom(
            Line::from(Span::styled(
                hint,
                status_style.add_modifier(Modifier::BOLD),
            ))
            .left_aligned(),
        )
        .title_bottom(Line::from(Span::styled(version, status_style)).right_aligned());

    let lines: Vec<Line> = app
        .compose
        .display_lines()
        .into_iter()
        .map(|text| Line::from(Span::styled(text, Style::default().fg(colors.input))))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if app.cursor_visible && area.width > 2 && area.height > 2 {
        let (line, column) = app.compose.cursor_position();
        let x = area.x + 1 + INPUT_INSET as u16 + column as u16;
        let y = area.y + 1 + line as u16;
        frame.set_cursor_position(Position::new(
            x.min(area.right().saturating_sub(2)),
            y.min(area.bottom().saturating_sub(2)),
        ));
    }
}
