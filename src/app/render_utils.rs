use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(250, 250, 250));
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Directed link as a line with a filled arrowhead, endpoints pulled back by
/// `endpoint_offset` so the marker sits on the target circle's rim.
pub(super) fn draw_arrow(
    painter: &Painter,
    from: Pos2,
    to: Pos2,
    endpoint_offset: f32,
    width: f32,
    color: Color32,
) {
    let delta = to - from;
    let length = delta.length();
    if length <= 2.0 * endpoint_offset {
        return;
    }
    let direction = delta / length;

    let start = from + direction * endpoint_offset;
    let end = to - direction * endpoint_offset;
    painter.line_segment([start, end], Stroke::new(width, color));

    let head = (4.0 + width * 1.5).min(length * 0.4);
    let normal = vec2(-direction.y, direction.x);
    painter.add(eframe::egui::Shape::convex_polygon(
        vec![
            end,
            end - direction * head + normal * (head * 0.5),
            end - direction * head - normal * (head * 0.5),
        ],
        color,
        Stroke::NONE,
    ));
}
