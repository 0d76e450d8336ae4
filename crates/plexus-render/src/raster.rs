//! Software RGBA rasterizer
//!
//! Pixels are stored as straight (non-premultiplied) RGBA8 and every shape
//! is blended source-over. Coverage is computed per pixel center from the
//! signed distance to the shape edge, which gives one pixel of anti-aliasing.

use plexus_core::{Canvas, Color, Vec2};

#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    scale: f32,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            scale: 1.0,
        }
    }

    /// Raw RGBA bytes, row-major, straight alpha
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Whether any pixel has non-zero alpha
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// The surface as an image with its transparency intact
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Flatten the surface over an opaque backdrop color
    pub fn composite_over(&self, backdrop: Color) -> image::RgbaImage {
        let [br, bg, bb] = backdrop.to_rgb8();
        let mut out = image::RgbaImage::new(self.width, self.height);
        for (dst, src) in out.pixels_mut().zip(self.pixels.chunks_exact(4)) {
            let a = src[3] as f32 / 255.0;
            let mix = |s: u8, b: u8| (s as f32 * a + b as f32 * (1.0 - a)).round() as u8;
            dst.0 = [mix(src[0], br), mix(src[1], bg), mix(src[2], bb), 255];
        }
        out
    }

    fn to_physical(&self, p: Vec2) -> Vec2 {
        p * self.scale
    }

    /// Pixel-index bounding box of a logical-free physical rect, clipped
    fn clip_box(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32 - 1.0);
        let y1 = max.y.ceil().min(self.height as f32 - 1.0);
        if !(x0 <= x1 && y0 <= y1) {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn blend(&mut self, x: u32, y: u32, color: [f32; 3], alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.pixels[i..i + 4];
        let da = dst[3] as f32 / 255.0;
        let out_a = alpha + da * (1.0 - alpha);
        for c in 0..3 {
            let dc = dst[c] as f32 / 255.0;
            let value = (color[c] * alpha + dc * da * (1.0 - alpha)) / out_a;
            dst[c] = (value * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Shade every pixel in the box with `coverage(pixel_center)` as alpha.
    fn shade<F>(&mut self, min: Vec2, max: Vec2, color: Color, coverage: F)
    where
        F: Fn(Vec2) -> f32,
    {
        let Some((x0, y0, x1, y1)) = self.clip_box(min, max) else {
            return;
        };
        let rgb = color.to_array();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                self.blend(x, y, rgb, coverage(center));
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn reset_transform(&mut self) {
        self.scale = 1.0;
    }

    fn scale(&mut self, factor: f32) {
        self.scale *= factor;
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill_halo(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32) {
        let c = self.to_physical(center);
        let r = radius * self.scale;
        if !(r > 0.0) || opacity <= 0.0 {
            return;
        }
        let extent = Vec2::splat(r);
        self.shade(c - extent, c + extent, color, |p| {
            let d = p.distance(c);
            if d >= r {
                0.0
            } else {
                opacity * (1.0 - d / r)
            }
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32) {
        let c = self.to_physical(center);
        let r = radius * self.scale;
        if !(r > 0.0) || opacity <= 0.0 {
            return;
        }
        let extent = Vec2::splat(r + 1.0);
        self.shade(c - extent, c + extent, color, |p| {
            opacity * (r - p.distance(c) + 0.5).clamp(0.0, 1.0)
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, opacity: f32) {
        let a = self.to_physical(from);
        let b = self.to_physical(to);
        let w = width * self.scale;
        if !(w > 0.0) || opacity <= 0.0 {
            return;
        }
        // Hairlines keep a one-pixel footprint and fade instead of thinning
        let half = w.max(1.0) * 0.5;
        let alpha = opacity * w.min(1.0);
        let pad = Vec2::splat(half + 1.0);
        self.shade(a.min(b) - pad, a.max(b) + pad, color, |p| {
            alpha * (half - distance_to_segment(p, a, b) + 0.5).clamp(0.0, 1.0)
        });
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
