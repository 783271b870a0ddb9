//! Measurement rulers along the top and left edges of the canvas.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

/// Thickness of each ruler bar.
pub const RULER_SIZE: f32 = 20.0;
const TICK_LENGTH: f32 = 5.0;
const BAR_COLOR: Color32 = Color32::from_rgb(249, 250, 251);
const BORDER_COLOR: Color32 = Color32::from_rgb(209, 213, 219);
const TICK_COLOR: Color32 = Color32::from_rgb(107, 114, 128);
const MARKER_COLOR: Color32 = Color32::from_rgb(239, 68, 68);

/// One labelled tick, `offset` canvas units from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f32,
    pub label: String,
}

/// Ticks from 0 to `length` inclusive, every `spacing` units.
pub fn ticks(length: f32, spacing: f32) -> Vec<Tick> {
    if spacing <= 0.0 || !spacing.is_finite() || length < 0.0 {
        return Vec::new();
    }
    let count = (length / spacing).floor() as usize;
    (0..=count)
        .map(|i| {
            let offset = i as f32 * spacing;
            Tick {
                offset,
                label: format!("{}", offset.round() as i64),
            }
        })
        .collect()
}

/// Text of the pointer badge, e.g. `120 × 45`.
pub fn pointer_badge(pointer: Pos2) -> String {
    format!("{} × {}", pointer.x.round() as i64, pointer.y.round() as i64)
}

/// Draws both rulers around `canvas` (screen space) and, when the pointer is
/// over the canvas, its marker lines and coordinate badge.
pub fn paint(painter: &Painter, canvas: Rect, spacing: f32, pointer: Option<Pos2>) {
    let font = FontId::proportional(10.0);
    let top = Rect::from_min_size(
        canvas.left_top() - Vec2::new(0.0, RULER_SIZE),
        Vec2::new(canvas.width(), RULER_SIZE),
    );
    let left = Rect::from_min_size(
        canvas.left_top() - Vec2::new(RULER_SIZE, 0.0),
        Vec2::new(RULER_SIZE, canvas.height()),
    );
    for bar in [top, left] {
        painter.rect_filled(bar, 0.0, BAR_COLOR);
        painter.rect_stroke(bar, 0.0, Stroke::new(1.0, BORDER_COLOR));
    }

    for tick in ticks(canvas.width(), spacing) {
        let x = top.min.x + tick.offset;
        painter.line_segment(
            [Pos2::new(x, top.max.y - TICK_LENGTH), Pos2::new(x, top.max.y)],
            Stroke::new(1.0, TICK_COLOR),
        );
        painter.text(
            Pos2::new(x, top.center().y - 2.0),
            Align2::CENTER_CENTER,
            tick.label,
            font.clone(),
            TICK_COLOR,
        );
    }
    for tick in ticks(canvas.height(), spacing) {
        let y = left.min.y + tick.offset;
        painter.line_segment(
            [Pos2::new(left.max.x - TICK_LENGTH, y), Pos2::new(left.max.x, y)],
            Stroke::new(1.0, TICK_COLOR),
        );
        painter.text(
            Pos2::new(left.center().x - 2.0, y),
            Align2::CENTER_CENTER,
            tick.label,
            font.clone(),
            TICK_COLOR,
        );
    }

    let Some(pointer) = pointer else {
        return;
    };
    let screen = canvas.min + pointer.to_vec2();
    painter.line_segment(
        [Pos2::new(screen.x, top.min.y), Pos2::new(screen.x, top.max.y)],
        Stroke::new(1.0, MARKER_COLOR),
    );
    painter.line_segment(
        [Pos2::new(left.min.x, screen.y), Pos2::new(left.max.x, screen.y)],
        Stroke::new(1.0, MARKER_COLOR),
    );

    let galley = painter.layout_no_wrap(
        pointer_badge(pointer),
        FontId::monospace(11.0),
        Color32::WHITE,
    );
    let badge = Rect::from_min_size(
        canvas.min + Vec2::splat(4.0),
        galley.size() + Vec2::new(12.0, 6.0),
    );
    painter.rect_filled(badge, 4.0, Color32::from_black_alpha(153));
    painter.galley(badge.min + Vec2::new(6.0, 3.0), galley, Color32::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_the_whole_edge() {
        let ticks = ticks(800.0, 50.0);
        assert_eq!(ticks.len(), 17);
        assert_eq!(ticks[0].label, "0");
        assert_eq!(ticks[16].offset, 800.0);
        assert_eq!(ticks[16].label, "800");
    }

    #[test]
    fn partial_last_interval_has_no_tick() {
        let ticks = ticks(620.0, 50.0);
        assert_eq!(ticks.last().map(|t| t.offset), Some(600.0));
    }

    #[test]
    fn bad_spacing_draws_nothing() {
        assert!(ticks(800.0, 0.0).is_empty());
        assert!(ticks(800.0, -5.0).is_empty());
    }

    #[test]
    fn badge_shows_rounded_coordinates() {
        assert_eq!(pointer_badge(Pos2::new(120.4, 44.6)), "120 × 45");
    }
}
