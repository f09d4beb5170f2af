pub mod layout;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};
use webbrowser::Browser;

use crate::App;
use layout::{ScreenLayout, RESET_LABEL};
use target10::{celebration::ConfettiAnimation, session::Phase};

/// Dotted frame around the play field
const DOTTED: border::Set = border::Set {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    vertical_left: "┆",
    vertical_right: "┆",
    horizontal_top: "┄",
    horizontal_bottom: "┄",
};

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let layout = ScreenLayout::new(area);

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        Paragraph::new(Span::styled("target10", bold_style))
            .alignment(Alignment::Center)
            .render(layout.title, buf);

        Paragraph::new(Span::styled(session.status_line(), bold_style))
            .alignment(Alignment::Center)
            .render(layout.status, buf);

        Block::default()
            .borders(Borders::ALL)
            .border_set(DOTTED)
            .render(layout.field, buf);

        // the pre-game target is inert, so draw it muted
        let live = session.phase() == Phase::Playing;
        for target in session.targets() {
            if let Some(rect) = layout.target_rect(target) {
                render_bullseye(rect, live, buf);
            }
        }

        let legend = if session.phase() == Phase::Finished {
            Paragraph::new(Span::styled(RESET_LABEL, bold_style.fg(Color::White)))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Gray)),
                )
                .style(Style::default().bg(Color::DarkGray))
                .render(layout.button, buf);

            if let Some(line) = session.flavor_text() {
                Paragraph::new(Span::styled(
                    line.to_string(),
                    italic_style.fg(Color::Magenta),
                ))
                .alignment(Alignment::Center)
                .render(layout.flavor, buf);
            }

            if Browser::is_available() {
                "(r)un it back / (t)weet / (esc)ape"
            } else {
                "(r)un it back / (esc)ape"
            }
        } else {
            "click with the mouse / (esc)ape"
        };

        Paragraph::new(Span::styled(legend, italic_style.patch(dim_style)))
            .alignment(Alignment::Center)
            .render(layout.legend, buf);

        if self.confetti.is_active {
            render_confetti(&self.confetti, area, buf);
        }
    }
}

/// Concentric rings: white rim, red body, ringed eye in the middle
fn render_bullseye(rect: Rect, live: bool, buf: &mut Buffer) {
    let modifier = if live { Modifier::BOLD } else { Modifier::DIM };
    let center_x = rect.x as f64 + (rect.width as f64 - 1.0) / 2.0;
    let center_y = rect.y as f64 + (rect.height as f64 - 1.0) / 2.0;
    let radius_x = (rect.width as f64 / 2.0).max(0.5);
    let radius_y = (rect.height as f64 / 2.0).max(0.5);

    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            let dx = (x as f64 - center_x) / radius_x;
            let dy = (y as f64 - center_y) / radius_y;
            let dist = (dx * dx + dy * dy).sqrt();

            let (symbol, color) = if x == rect.left() && rect.width > 1 {
                ("◖", Color::White)
            } else if x + 1 == rect.right() && rect.width > 1 {
                ("◗", Color::White)
            } else if dist < 0.6 {
                ("◉", Color::Red)
            } else {
                ("●", Color::Red)
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(symbol);
                cell.set_style(Style::default().fg(color).add_modifier(modifier));
            }
        }
    }
}

/// Render confetti on top of everything else
fn render_confetti(confetti: &ConfettiAnimation, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for piece in &confetti.pieces {
        if piece.x < 0.0 || piece.y < 0.0 {
            continue;
        }
        let x = piece.x as u16;
        let y = piece.y as u16;

        if x < area.width && y < area.height {
            let color = colors[piece.color_index % colors.len()];
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&piece.symbol.to_string());
                cell.set_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
            }
        }
    }
}
