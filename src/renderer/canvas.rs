//! Canvas 2D backend

use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::control::Painter;

/// Powder-blue sky
pub const BACKGROUND: [f32; 3] = [0.69, 0.88, 0.90];

fn css_color(color: [f32; 3], alpha: f32) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        alpha.clamp(0.0, 1.0)
    )
}

/// Draws into a `<canvas>` in CSS pixels, scaled for the device pixel ratio
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// Size in CSS pixels
    pub size: Vec2,
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, dpr: f64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut renderer = Self {
            ctx,
            size: Vec2::ZERO,
            dpr,
        };
        renderer.resize(canvas);
        Ok(renderer)
    }

    /// Match the backing store to the canvas' CSS size
    pub fn resize(&mut self, canvas: &HtmlCanvasElement) {
        let w = canvas.client_width().max(1);
        let h = canvas.client_height().max(1);
        canvas.set_width((w as f64 * self.dpr) as u32);
        canvas.set_height((h as f64 * self.dpr) as u32);
        self.size = Vec2::new(w as f32, h as f32);

        if let Err(e) = self
            .ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
        {
            log::warn!("Failed to set canvas transform: {:?}", e);
        }
        log::info!("Canvas resized to {}x{} (dpr {})", w, h, self.dpr);
    }

    /// Fill the whole canvas with the background color
    pub fn clear(&self) {
        self.ctx.set_fill_style_str(&css_color(BACKGROUND, 1.0));
        self.ctx
            .fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }
}

impl Painter for CanvasRenderer {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 3], alpha: f32) {
        self.ctx.set_fill_style_str(&css_color(color, alpha));
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn fill_rect(
        &mut self,
        center: Vec2,
        half_size: Vec2,
        rotation: f32,
        color: [f32; 3],
        alpha: f32,
    ) {
        self.ctx.set_fill_style_str(&css_color(color, alpha));
        if rotation == 0.0 {
            let min = center - half_size;
            let size = half_size * 2.0;
            self.ctx
                .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
            return;
        }

        self.ctx.save();
        let placed = self
            .ctx
            .translate(center.x as f64, center.y as f64)
            .and_then(|_| self.ctx.rotate(rotation as f64));
        if placed.is_ok() {
            self.ctx.fill_rect(
                -half_size.x as f64,
                -half_size.y as f64,
                half_size.x as f64 * 2.0,
                half_size.y as f64 * 2.0,
            );
        }
        self.ctx.restore();
    }
}
