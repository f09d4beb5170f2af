use ratatui::layout::{Constraint, Direction, Layout, Rect};
use target10::target::{Target, FIELD_SIZE, TARGET_SIZE};
use unicode_width::UnicodeWidthStr;

/// Preferred inner size of the play field in cells. Terminal cells are about
/// twice as tall as they are wide, so a square field is twice as wide.
const FIELD_COLS: u16 = 40;
const FIELD_ROWS: u16 = 20;

pub const RESET_LABEL: &str = "run it back";

/// Where everything sits for a given terminal area. Rendering and click
/// routing both go through this, so a click lands on what was drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub status: Rect,
    pub field: Rect,
    pub field_inner: Rect,
    pub button: Rect,
    pub flavor: Rect,
    pub legend: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        // title, status, gap, borders, gap, button, flavor, gap, legend
        let reserved = 12;
        let rows = FIELD_ROWS
            .min(area.height.saturating_sub(reserved))
            .min(area.width.saturating_sub(2) / 2);
        let cols = (rows * 2).min(FIELD_COLS);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),        // title
                Constraint::Length(1),        // status
                Constraint::Length(1),        // padding
                Constraint::Length(rows + 2), // field
                Constraint::Length(1),        // padding
                Constraint::Length(3),        // reset button
                Constraint::Length(1),        // flavor text
                Constraint::Length(1),        // padding
                Constraint::Length(1),        // legend
                Constraint::Min(0),
            ])
            .split(area);

        let field = centered(chunks[3], cols + 2, rows + 2);
        let field_inner = Rect::new(
            field.x + 1,
            field.y + 1,
            field.width.saturating_sub(2),
            field.height.saturating_sub(2),
        );
        let button_width = RESET_LABEL.width() as u16 + 4;
        let button = centered(chunks[5], button_width, 3);

        Self {
            title: chunks[0],
            status: chunks[1],
            field,
            field_inner,
            button,
            flavor: chunks[6],
            legend: chunks[8],
        }
    }

    /// Cells covered by `target`, or None when the field has no room to draw it
    pub fn target_rect(&self, target: &Target) -> Option<Rect> {
        let inner = self.field_inner;
        if inner.width == 0 || inner.height == 0 {
            return None;
        }
        let scale = |extent: u16| extent as f64 / FIELD_SIZE;
        let width = ((TARGET_SIZE * scale(inner.width)).round() as u16).clamp(1, inner.width);
        let height = ((TARGET_SIZE * scale(inner.height)).round() as u16).clamp(1, inner.height);
        let col = ((target.x * scale(inner.width)) as u16).min(inner.width - width);
        let row = ((target.y * scale(inner.height)) as u16).min(inner.height - height);
        Some(Rect::new(inner.x + col, inner.y + row, width, height))
    }

    pub fn hits_target(&self, target: &Target, column: u16, row: u16) -> bool {
        self.target_rect(target)
            .is_some_and(|rect| contains(rect, column, row))
    }

    pub fn hits_button(&self, column: u16, row: u16) -> bool {
        contains(self.button, column, row)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
