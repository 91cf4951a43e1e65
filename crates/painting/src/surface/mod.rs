//! Drawing surfaces
//!
//! [`PaintSurface`] is the seam between the renderer and whatever actually
//! shows pixels: a browser canvas, or the [`CpuSurface`] raster used for
//! native replay and tests.

mod raster;

use glam::Vec2;

use crate::color::Hsv;
use crate::constants::{
    GRADIENT_EDGE_HUE_SHIFT, GRADIENT_MID_ALPHA, GRADIENT_MID_HUE_SHIFT, GRADIENT_MID_STOP,
    HIGHLIGHT_ALPHA, HIGHLIGHT_SATURATION, HIGHLIGHT_VALUE,
};
use crate::types::Dab;

pub use raster::gradient_at;

/// One color stop of a radial gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position 0.0 (center) to 1.0 (outer radius)
    pub offset: f32,
    /// Straight-alpha RGBA
    pub color: [f32; 4],
}

/// Everything a surface needs to paint one dab this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DabPaint {
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
    pub angle: f32,
    pub stops: [GradientStop; 3],
    pub highlight: Option<HighlightPaint>,
}

/// Flat disc drawn over a dab with the overlay blend mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightPaint {
    pub center: Vec2,
    pub radius: f32,
    /// Straight-alpha RGBA
    pub color: [f32; 4],
}

impl DabPaint {
    /// Gradient for `dab` with its core at `alpha`.
    ///
    /// The mid stop is slightly shifted in hue and darker, the edge is fully
    /// transparent so dabs melt into each other.
    pub fn new(dab: &Dab, alpha: f32) -> Self {
        let core = dab.color;
        let mid = core.shifted(GRADIENT_MID_HUE_SHIFT, -0.10, -0.06);
        let edge = core.shifted(GRADIENT_EDGE_HUE_SHIFT, -0.18, -0.12);
        // Highlight fades in step with the core
        let life = if dab.base_alpha > 0.0 {
            (alpha / dab.base_alpha).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            center: dab.center,
            radius_x: dab.radius_x,
            radius_y: dab.radius_y,
            angle: dab.angle,
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: core.to_rgba(alpha),
                },
                GradientStop {
                    offset: GRADIENT_MID_STOP,
                    color: mid.to_rgba(alpha * GRADIENT_MID_ALPHA),
                },
                GradientStop {
                    offset: 1.0,
                    color: edge.to_rgba(0.0),
                },
            ],
            highlight: dab.highlight.map(|h| HighlightPaint {
                center: h.center,
                radius: h.radius,
                color: Hsv::new(core.hue, HIGHLIGHT_SATURATION, HIGHLIGHT_VALUE)
                    .to_rgba(HIGHLIGHT_ALPHA * life),
            }),
        }
    }

    /// Radius of the gradient circle
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius_x.max(self.radius_y)
    }

    /// Core opacity
    #[inline]
    pub fn core_alpha(&self) -> f32 {
        self.stops[0].color[3]
    }
}

/// A drawing surface the renderer paints into every frame
pub trait PaintSurface {
    /// Match the viewport: `width`/`height` in CSS pixels, `scale` is the
    /// device pixel ratio (already clamped by the caller)
    fn resize(&mut self, width: u32, height: u32, scale: f32);

    /// Clear to fully transparent
    fn clear(&mut self);

    /// Paint one dab with source-over compositing, then its highlight (if
    /// any) with the overlay blend mode
    fn fill_dab(&mut self, dab: &DabPaint);

    /// Backing store size in physical pixels
    fn size(&self) -> (u32, u32);
}

/// A CPU RGBA surface for painting
///
/// Stores premultiplied pixels as [f32; 4] at physical resolution
/// (CSS size × device pixel ratio).
pub struct CpuSurface {
    /// Physical dimensions
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio applied to incoming CSS coordinates
    scale: f32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given physical dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            scale: 1.0,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Fill the surface with a solid premultiplied color
    pub fn fill(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Get a pixel at the given physical coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Composite a straight-alpha color over a pixel (source-over)
    /// Formula: out = src * a + dst * (1 - a)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];

        let src_alpha = (color[3] * opacity).clamp(0.0, 1.0);
        let inv_src_alpha = 1.0 - src_alpha;

        self.pixels[index] = [
            color[0] * src_alpha + dst[0] * inv_src_alpha,
            color[1] * src_alpha + dst[1] * inv_src_alpha,
            color[2] * src_alpha + dst[2] * inv_src_alpha,
            src_alpha + dst[3] * inv_src_alpha,
        ];
    }

    /// Composite a straight-alpha color over a pixel with the overlay blend
    /// mode: shadows darken, lights brighten.
    #[inline]
    pub fn overlay_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];

        let src_alpha = color[3].clamp(0.0, 1.0);
        let dst_alpha = dst[3];
        let mut out = [0.0; 4];
        for i in 0..3 {
            let backdrop = if dst_alpha > 0.0 { dst[i] / dst_alpha } else { 0.0 };
            let source = color[i];
            let mixed = if backdrop <= 0.5 {
                2.0 * backdrop * source
            } else {
                1.0 - 2.0 * (1.0 - backdrop) * (1.0 - source)
            };
            out[i] = src_alpha * (1.0 - dst_alpha) * source
                + src_alpha * dst_alpha * mixed
                + (1.0 - src_alpha) * dst[i];
        }
        out[3] = src_alpha + dst_alpha * (1.0 - src_alpha);
        self.pixels[index] = out;
    }

    /// Straight-alpha 8-bit RGBA, row-major, for image encoders and `ImageData`
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &[r, g, b, a] in &self.pixels {
            let (r, g, b) = if a > 0.0 {
                (r / a, g / a, b / a)
            } else {
                (0.0, 0.0, 0.0)
            };
            out.extend([r, g, b, a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
        }
        out
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Number of pixels with any coverage
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0.0).count()
    }
}

impl PaintSurface for CpuSurface {
    fn resize(&mut self, width: u32, height: u32, scale: f32) {
        self.scale = scale;
        self.width = (width as f32 * scale).floor() as u32;
        self.height = (height as f32 * scale).floor() as u32;
        let pixel_count = (self.width as usize) * (self.height as usize);
        self.pixels.clear();
        self.pixels.resize(pixel_count, [0.0; 4]);
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_dab(&mut self, dab: &DabPaint) {
        self.rasterize_dab(dab);
        if let Some(highlight) = &dab.highlight {
            self.rasterize_highlight(highlight);
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
