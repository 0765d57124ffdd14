use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};

use crate::errors::{NodeError, NodeResult};

/// Channel counts the PNG encoder understands (grayscale, RGB, RGBA).
const ENCODABLE_CHANNELS: [usize; 3] = [1, 3, 4];

/// A multi-dimensional image buffer as produced by the host graph, with
/// samples in `[0, 1]`. Supported shapes are `(B, C, H, W)`, `(B, H, W, C)`,
/// `(C, H, W)` and `(H, W, C)`; only the first batch element is encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

/// How the channel dimension is laid out relative to the spatial ones.
#[derive(Debug, Clone, Copy)]
enum Layout {
    ChannelFirst,
    ChannelLast,
}

impl ImageTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> NodeResult<Self> {
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim));

        match expected {
            Some(count) if count == data.len() && !shape.is_empty() => Ok(Self { shape, data }),
            _ => Err(NodeError::validation(
                "image",
                "Sample count does not match the tensor shape",
            )),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Collapse the tensor into a single interleaved 8-bit pixel frame.
    ///
    /// A matching channel-first interpretation wins over channel-last when a
    /// shape satisfies both, so `(3, H, W)` is always read as planar RGB.
    pub fn normalize(&self) -> NodeResult<PixelFrame> {
        let (layout, batch, channels, height, width) = match *self.shape.as_slice() {
            [b, c, h, w] if ENCODABLE_CHANNELS.contains(&c) => (Layout::ChannelFirst, b, c, h, w),
            [b, h, w, c] if ENCODABLE_CHANNELS.contains(&c) => (Layout::ChannelLast, b, c, h, w),
            [c, h, w] if ENCODABLE_CHANNELS.contains(&c) => (Layout::ChannelFirst, 1, c, h, w),
            [h, w, c] if ENCODABLE_CHANNELS.contains(&c) => (Layout::ChannelLast, 1, c, h, w),
            _ => return Err(NodeError::unsupported_shape(&self.shape)),
        };

        if batch > 1 {
            log::debug!("Encoding only the first of {} batch elements", batch);
        }

        let frame_width = u32::try_from(width)
            .map_err(|_| NodeError::unsupported_shape(&self.shape))?;
        let frame_height = u32::try_from(height)
            .map_err(|_| NodeError::unsupported_shape(&self.shape))?;

        // Batch element 0 starts at offset 0 for both layouts.
        let mut pixels = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    let index = match layout {
                        Layout::ChannelFirst => c * height * width + y * width + x,
                        Layout::ChannelLast => (y * width + x) * channels + c,
                    };
                    pixels.push(quantize(self.data[index]));
                }
            }
        }

        Ok(PixelFrame {
            width: frame_width,
            height: frame_height,
            channels: channels as u8,
            pixels,
        })
    }
}

/// Row-major interleaved 8-bit pixels, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFrame {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl PixelFrame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Encode the frame as a PNG byte buffer.
    pub fn encode_png(&self) -> NodeResult<Vec<u8>> {
        let image = match self.channels {
            1 => GrayImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgba8),
            _ => None,
        }
        .ok_or_else(|| {
            NodeError::validation("image", "Pixel buffer does not match frame dimensions")
        })?;

        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;

        log::debug!(
            "Encoded {}x{} frame ({} channels) to {} bytes of PNG",
            self.width,
            self.height,
            self.channels,
            buffer.get_ref().len()
        );

        Ok(buffer.into_inner())
    }
}

fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
