//! Background canvas surface
//!
//! A full-viewport `<canvas>` behind the page content. Dabs are drawn with the
//! 2D context: a circular radial gradient clipped by the rotated ellipse, plus
//! an optional pale disc composited with `overlay`.

use painting::{DabPaint, PaintSurface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::HostError;

/// CSS applied to the canvas so it never intercepts input or covers content
const CANVAS_STYLE: [(&str, &str); 6] = [
    ("position", "fixed"),
    ("left", "0"),
    ("top", "0"),
    ("z-index", "-1"),
    ("pointer-events", "none"),
    ("display", "block"),
];

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    /// CSS size of the viewport
    css_width: u32,
    css_height: u32,
}

impl CanvasSurface {
    /// Create the background canvas and prepend it to `<body>`.
    ///
    /// Returns `Ok(None)` when the browser refuses a 2D context; the painter
    /// then runs without drawing.
    pub fn install(document: &Document) -> Result<Option<Self>, HostError> {
        let body = document.body().ok_or(HostError::NoBody)?;
        let canvas = document
            .create_element("canvas")
            .map_err(HostError::dom)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::Dom("created element is not a canvas".into()))?;

        let context = match canvas.get_context("2d").map_err(HostError::dom)? {
            Some(ctx) => ctx
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| HostError::Dom("unexpected 2d context type".into()))?,
            None => {
                web_sys::console::warn_1(&"pigment: no 2d canvas context, painting disabled".into());
                return Ok(None);
            }
        };

        canvas.set_attribute("aria-hidden", "true").map_err(HostError::dom)?;
        let style = canvas.style();
        for (name, value) in CANVAS_STYLE {
            style.set_property(name, value).map_err(HostError::dom)?;
        }
        body.prepend_with_node_1(&canvas).map_err(HostError::dom)?;

        Ok(Some(Self {
            canvas,
            context,
            css_width: 0,
            css_height: 0,
        }))
    }

    fn draw(&self, dab: &DabPaint) -> Result<(), JsValue> {
        let ctx = &self.context;
        let cx = dab.center.x as f64;
        let cy = dab.center.y as f64;

        let gradient =
            ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, dab.outer_radius() as f64)?;
        for stop in &dab.stops {
            gradient.add_color_stop(stop.offset, &css_rgba(stop.color))?;
        }

        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.begin_path();
        ctx.ellipse(
            cx,
            cy,
            dab.radius_x as f64,
            dab.radius_y as f64,
            dab.angle as f64,
            0.0,
            std::f64::consts::TAU,
        )?;
        ctx.fill();

        if let Some(highlight) = &dab.highlight {
            ctx.set_global_composite_operation("overlay")?;
            ctx.set_fill_style_str(&css_rgba(highlight.color));
            ctx.begin_path();
            ctx.arc(
                highlight.center.x as f64,
                highlight.center.y as f64,
                highlight.radius as f64,
                0.0,
                std::f64::consts::TAU,
            )?;
            ctx.fill();
            ctx.set_global_composite_operation("source-over")?;
        }
        Ok(())
    }
}

impl PaintSurface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32, scale: f32) {
        self.css_width = width;
        self.css_height = height;
        self.canvas.set_width((width as f32 * scale).floor() as u32);
        self.canvas.set_height((height as f32 * scale).floor() as u32);

        let style = self.canvas.style();
        for (name, value) in css_size(width, height) {
            if let Err(err) = style.set_property(name, &value) {
                web_sys::console::warn_2(&format!("pigment: canvas {} failed", name).into(), &err);
            }
        }

        // Resizing resets the context; draw in CSS pixels from here on
        let scale = scale as f64;
        if let Err(err) = self.context.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            web_sys::console::warn_2(&"pigment: set_transform failed".into(), &err);
        }
    }

    fn clear(&mut self) {
        self.context
            .clear_rect(0.0, 0.0, self.css_width as f64, self.css_height as f64);
    }

    fn fill_dab(&mut self, dab: &DabPaint) {
        if let Err(err) = self.draw(dab) {
            web_sys::console::warn_2(&"pigment: dab draw failed".into(), &err);
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

/// CSS `width` and `height` declarations for a viewport size
fn css_size(width: u32, height: u32) -> [(&'static str, String); 2] {
    [
        ("width", format!("{}px", width)),
        ("height", format!("{}px", height)),
    ]
}

/// Format a straight-alpha RGBA color as a CSS `rgba()` string
pub fn css_rgba(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    let alpha = if color[3].is_finite() {
        color[3].clamp(0.0, 1.0)
    } else {
        0.0
    };
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        alpha
    )
}
