//! Drawing surface abstraction
//!
//! The game draws through the `Surface` trait so every screen and mini-game
//! stays platform-free. The browser build backs it with an immediate-mode 2D
//! canvas (full repaint every frame); tests and the native smoke shell use
//! `NullSurface`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An RGBA color. Alpha lives here so callers never juggle a separate
/// global-alpha stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string for canvas fill/stroke styles.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Shared palette
pub mod palette {
    use super::Color;

    pub const BG: Color = Color::rgb(18, 22, 32);
    pub const PANEL: Color = Color::rgb(30, 36, 52);
    pub const ACCENT: Color = Color::rgb(255, 150, 60);
    pub const GOOD: Color = Color::rgb(90, 220, 120);
    pub const BAD: Color = Color::rgb(235, 80, 80);
    pub const INK: Color = Color::rgb(235, 238, 245);
    pub const DIM: Color = Color::rgb(140, 148, 165);
    pub const WATER: Color = Color::rgb(70, 140, 255);
    pub const GOLD: Color = Color::rgb(250, 210, 90);
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle centered on `center`.
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Immediate-mode drawing operations, logical-pixel coordinates.
pub trait Surface {
    /// Logical surface size (CSS pixels, not backing-store pixels).
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    fn text(&mut self, s: &str, pos: Vec2, size: f32, color: Color, align: Align);
}

/// Surface that draws nothing. Used by the native smoke shell and by tests
/// that only care about update logic.
#[derive(Debug, Clone)]
pub struct NullSurface {
    pub size: Vec2,
}

impl NullSurface {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            size: Vec2::new(w, h),
        }
    }
}

impl Surface for NullSurface {
    fn size(&self) -> Vec2 {
        self.size
    }
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _width: f32) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {}
    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _color: Color, _width: f32) {}
    fn line(&mut self, _from: Vec2, _to: Vec2, _color: Color, _width: f32) {}
    fn text(&mut self, _s: &str, _pos: Vec2, _size: f32, _color: Color, _align: Align) {}
}

/// Canvas-backed surface for the browser build.
///
/// The backing store is sized to CSS size × device pixel ratio and the
/// context is scaled once, so all drawing stays in logical units.
#[cfg(target_arch = "wasm32")]
pub struct CanvasSurface {
    canvas: web_sys::HtmlCanvasElement,
    ctx: web_sys::CanvasRenderingContext2d,
    logical: Vec2,
}

#[cfg(target_arch = "wasm32")]
impl CanvasSurface {
    pub fn new(canvas: web_sys::HtmlCanvasElement) -> Option<Self> {
        use wasm_bindgen::JsCast;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .ok()?;
        let mut surface = Self {
            canvas,
            ctx,
            logical: Vec2::ZERO,
        };
        surface.fit_to_element();
        Some(surface)
    }

    /// Resize the backing store to match the element's CSS size. Call on
    /// startup and on every viewport resize.
    pub fn fit_to_element(&mut self) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let w = self.canvas.client_width().max(1) as f64;
        let h = self.canvas.client_height().max(1) as f64;
        self.canvas.set_width((w * dpr) as u32);
        self.canvas.set_height((h * dpr) as u32);
        // Resetting width clears the transform, so re-apply the DPR scale.
        let _ = self.ctx.scale(dpr, dpr);
        self.logical = Vec2::new(w as f32, h as f32);
    }
}

#[cfg(target_arch = "wasm32")]
impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.logical
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(0.0, 0.0, self.logical.x as f64, self.logical.y as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx
            .stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn text(&mut self, s: &str, pos: Vec2, size: f32, color: Color, align: Align) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .set_font(&format!("{}px 'Trebuchet MS', sans-serif", size as u32));
        self.ctx.set_text_align(match align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        });
        let _ = self.ctx.fill_text(s, pos.x as f64, pos.y as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(60.0, 35.0)));
        assert!(!r.contains(Vec2::new(111.0, 35.0)));
        assert!(!r.contains(Vec2::new(60.0, 61.0)));
    }

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(Vec2::new(50.0, 50.0), 20.0, 10.0);
        assert_eq!(r.x, 40.0);
        assert_eq!(r.y, 45.0);
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb(255, 0, 10).css(), "rgba(255,0,10,1.000)");
        let faded = palette::BAD.with_alpha(0.25);
        assert!(faded.css().ends_with("0.250)"));
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(2.0).a, 1.0);
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(-1.0).a, 0.0);
    }
}
