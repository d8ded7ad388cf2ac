use eframe::egui::{Vec2, vec2};

const INITIAL_RADIUS: f32 = 10.0;

/// Deterministic phyllotaxis spiral for initial body placement, so the first
/// simulation ticks start from distinct, collision-free positions.
pub fn phyllotaxis(index: usize) -> Vec2 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(radius * angle.cos(), radius * angle.sin())
}

/// Entropy rate is shown to 4 decimals when positive; the degenerate 0 is
/// printed bare.
pub fn format_entropy(rate: f64) -> String {
    if rate > 0.0 {
        format!("{rate:.4}")
    } else {
        format!("{rate}")
    }
}
