use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{MakeoverError, MakeoverResult};

/// Owned premultiplied RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Transparent pixmap. Zero-sized pixmaps are allowed and simply hold no pixels.
    pub fn new(width: u32, height: u32) -> MakeoverResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wraps already-premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> MakeoverResult<Self> {
        if data.len() != byte_len(width, height)? {
            return Err(MakeoverError::validation(
                "pixmap data must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps straight-alpha RGBA8 bytes, premultiplying in place.
    pub fn from_straight(width: u32, height: u32, mut data: Vec<u8>) -> MakeoverResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// Decodes any format supported by `image` (PNG, JPEG, WebP, ...).
    pub fn decode(bytes: &[u8]) -> MakeoverResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_straight(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel_straight(&self, x: u32, y: u32) -> [u8; 4] {
        unpremultiply(self.pixel(x, y))
    }

    pub fn fill_transparent(&mut self) {
        self.data.fill(0);
    }

    /// True if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Straight-alpha copy of the buffer, the layout image encoders expect.
    pub fn to_straight(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Encodes the pixmap as a PNG image.
    pub fn encode_png(&self) -> MakeoverResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_straight())
            .ok_or_else(|| MakeoverError::validation("pixmap dimensions do not match data"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }

    /// Bilinear sample at continuous pixel coordinates, premultiplied and in `[0, 1]`.
    ///
    /// Pixel centers sit at `i + 0.5`; edges clamp so drawn sprites keep crisp borders.
    pub(crate) fn sample_bilinear(&self, x: f64, y: f64) -> [f32; 4] {
        if self.is_empty() {
            return [0.0; 4];
        }
        let fx = (x - 0.5).clamp(0.0, f64::from(self.width - 1));
        let fy = (y - 0.5).clamp(0.0, f64::from(self.height - 1));
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = (fx - f64::from(x0)) as f32;
        let ty = (fy - f64::from(y0)) as f32;

        let p00 = self.pixel(x0, y0);
        let p10 = self.pixel(x1, y0);
        let p01 = self.pixel(x0, y1);
        let p11 = self.pixel(x1, y1);
        let mut out = [0.0f32; 4];
        for c in 0..4 {
            let top = f32::from(p00[c]) * (1.0 - tx) + f32::from(p10[c]) * tx;
            let bottom = f32::from(p01[c]) * (1.0 - tx) + f32::from(p11[c]) * tx;
            out[c] = (top * (1.0 - ty) + bottom * ty) / 255.0;
        }
        out
    }
}

fn byte_len(width: u32, height: u32) -> MakeoverResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MakeoverError::validation("pixmap size overflow"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
    }
}

fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0; 4];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/raster/pixmap.rs"]
mod tests;
