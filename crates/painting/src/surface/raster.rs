//! Dab rasterization for the CPU surface

use tracing::trace;

use super::{CpuSurface, DabPaint, GradientStop, HighlightPaint};

/// Sample a gradient at `t` (0 = center, 1 = outer radius).
///
/// Colors are interpolated with premultiplied alpha, like a 2D canvas, so a
/// stop fading to transparent does not drag its neighbours toward black.
/// Returns straight-alpha RGBA.
pub fn gradient_at(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    if t <= first.offset {
        return first.color;
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return mix_premultiplied(a.color, b.color, k);
        }
    }

    stops[stops.len() - 1].color
}

fn mix_premultiplied(a: [f32; 4], b: [f32; 4], k: f32) -> [f32; 4] {
    let alpha = a[3] + (b[3] - a[3]) * k;
    if alpha <= 0.0 {
        return [0.0; 4];
    }
    let channel = |i: usize| (a[i] * a[3] + (b[i] * b[3] - a[i] * a[3]) * k) / alpha;
    [channel(0), channel(1), channel(2), alpha]
}

impl CpuSurface {
    /// Paint an elliptical dab filled with its radial gradient.
    ///
    /// The gradient is circular around the center with the ellipse's major
    /// radius, and the ellipse clips it, which is how a canvas fills a scaled
    /// arc with an unscaled radial gradient.
    ///
    /// Returns the bounding box of the affected region (x, y, width, height)
    /// in physical pixels, or None if the dab is outside the surface.
    pub fn rasterize_dab(&mut self, dab: &DabPaint) -> Option<(u32, u32, u32, u32)> {
        let scale = self.scale;
        let center_x = dab.center.x * scale;
        let center_y = dab.center.y * scale;
        let radius_major = dab.radius_x * scale;
        let radius_minor = dab.radius_y * scale;
        let outer = dab.outer_radius() * scale;

        if !(radius_major > 0.0 && radius_minor > 0.0) || dab.core_alpha() <= 0.0 {
            return None;
        }

        // Bounding box of an ellipse with semi-axes a, b rotated by θ:
        //   half_w = sqrt(a² cos²θ + b² sin²θ)
        //   half_h = sqrt(a² sin²θ + b² cos²θ)
        let cos_a = dab.angle.cos();
        let sin_a = dab.angle.sin();
        let cos_sq = cos_a * cos_a;
        let sin_sq = sin_a * sin_a;
        let a_sq = radius_major * radius_major;
        let b_sq = radius_minor * radius_minor;

        let half_w = (a_sq * cos_sq + b_sq * sin_sq).sqrt();
        let half_h = (a_sq * sin_sq + b_sq * cos_sq).sqrt();

        let x_min = ((center_x - half_w).floor().max(0.0) as u32).min(self.width);
        let y_min = ((center_y - half_h).floor().max(0.0) as u32).min(self.height);
        let x_max = ((center_x + half_w).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((center_y + half_h).ceil().max(0.0) as u32).min(self.height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        for py in y_min..y_max {
            for px in x_min..x_max {
                // Use pixel center
                let dx = (px as f32 + 0.5) - center_x;
                let dy = (py as f32 + 0.5) - center_y;

                // Rotate by -angle into the ellipse frame
                let ex = (dx * cos_a + dy * sin_a) / radius_major;
                let ey = (-dx * sin_a + dy * cos_a) / radius_minor;
                if ex * ex + ey * ey > 1.0 {
                    continue;
                }

                let t = (dx * dx + dy * dy).sqrt() / outer;
                let color = gradient_at(&dab.stops, t);
                if color[3] > 0.0 {
                    self.blend_pixel(px, py, color, 1.0);
                }
            }
        }

        let width = x_max - x_min;
        let height = y_max - y_min;
        trace!(
            "CpuSurface::rasterize_dab: ({}, {}) {}x{}",
            x_min, y_min, width, height
        );
        Some((x_min, y_min, width, height))
    }

    /// Overlay a flat highlight disc. Returns the affected bounding box like
    /// [`CpuSurface::rasterize_dab`].
    pub fn rasterize_highlight(
        &mut self,
        highlight: &HighlightPaint,
    ) -> Option<(u32, u32, u32, u32)> {
        let scale = self.scale;
        let center_x = highlight.center.x * scale;
        let center_y = highlight.center.y * scale;
        let radius = highlight.radius * scale;
        if !(radius > 0.0) || highlight.color[3] <= 0.0 {
            return None;
        }

        let x_min = ((center_x - radius).floor().max(0.0) as u32).min(self.width);
        let y_min = ((center_y - radius).floor().max(0.0) as u32).min(self.height);
        let x_max = ((center_x + radius).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((center_y + radius).ceil().max(0.0) as u32).min(self.height);
        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        let radius_sq = radius * radius;
        for py in y_min..y_max {
            for px in x_min..x_max {
                let dx = (px as f32 + 0.5) - center_x;
                let dy = (py as f32 + 0.5) - center_y;
                if dx * dx + dy * dy <= radius_sq {
                    self.overlay_pixel(px, py, highlight.color);
                }
            }
        }
        Some((x_min, y_min, x_max - x_min, y_max - y_min))
    }
}
