//! Decoded image sources and their loading lifecycle.

use std::io::Cursor;
use std::sync::Arc;

use image::ImageReader;
use tracing::debug;

use super::orientation::{apply_orientation, read_orientation};
use super::{ImageError, RasterBuffer, SourceFormat};
use crate::config::EngineConfig;

/// Lifecycle state of an [`ImageSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    /// Nothing has been uploaded yet.
    Empty,
    /// A decode has been requested and has not finished.
    Loading,
    /// Pixels are decoded and available.
    Ready,
    /// The last decode failed.
    Failed(ImageError),
}

#[derive(Debug, Clone)]
enum Inner {
    Empty,
    Loading,
    Ready {
        image: Arc<RasterBuffer>,
        format: SourceFormat,
    },
    Failed(ImageError),
}

/// A decoded raster image together with its loading state.
///
/// Pixels exist if and only if the source is `Ready`. A ready source is
/// immutable; cloning it shares the pixel buffer, so previews and exports
/// can read the same source without copying or locking.
#[derive(Debug, Clone)]
pub struct ImageSource {
    inner: Inner,
}

impl Default for ImageSource {
    fn default() -> Self {
        Self::empty()
    }
}

impl ImageSource {
    /// A source with no image.
    pub fn empty() -> Self {
        Self { inner: Inner::Empty }
    }

    /// A source whose decode is in flight.
    pub fn loading() -> Self {
        Self {
            inner: Inner::Loading,
        }
    }

    /// A source that failed to load.
    pub fn failed(error: ImageError) -> Self {
        Self {
            inner: Inner::Failed(error),
        }
    }

    /// Wrap an already decoded buffer as a ready source.
    ///
    /// Returns `ImageError::DecodeFailed` if the buffer length does not
    /// match its dimensions or either dimension is zero.
    pub fn from_raster(image: RasterBuffer, format: SourceFormat) -> Result<Self, ImageError> {
        if image.width == 0 || image.height == 0 {
            return Err(ImageError::DecodeFailed(
                "image has zero width or height".to_string(),
            ));
        }
        let expected = RasterBuffer::expected_len(image.width, image.height);
        if image.pixels.len() != expected {
            return Err(ImageError::DecodeFailed(format!(
                "pixel buffer holds {} bytes, expected {}",
                image.pixels.len(),
                expected
            )));
        }
        Ok(Self {
            inner: Inner::Ready {
                image: Arc::new(image),
                format,
            },
        })
    }

    /// Decode `bytes` with default settings and the given byte limit.
    ///
    /// # Errors
    ///
    /// - `ImageError::EmptyInput` for zero-length input
    /// - `ImageError::TooLarge` when `bytes.len() > max_size`
    /// - `ImageError::UnsupportedFormat` for anything but JPEG, PNG, GIF or WEBP
    /// - `ImageError::DecodeFailed` for corrupt or truncated data
    pub fn load(bytes: &[u8], max_size: usize) -> Result<Self, ImageError> {
        let config = EngineConfig {
            max_input_bytes: max_size,
            ..EngineConfig::default()
        };
        Self::load_with_config(bytes, &config)
    }

    /// Decode `bytes` using all limits and switches from `config`.
    pub fn load_with_config(bytes: &[u8], config: &EngineConfig) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyInput);
        }
        if bytes.len() > config.max_input_bytes {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                limit: config.max_input_bytes,
            });
        }

        let format = SourceFormat::sniff(bytes).ok_or(ImageError::UnsupportedFormat)?;

        // Check the header before allocating anything for the pixels.
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
            .into_dimensions()
            .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;
        let limit = config.max_image_dimension;
        if width > limit || height > limit {
            return Err(ImageError::DimensionsTooLarge {
                width,
                height,
                limit,
            });
        }

        let mut limits = image::Limits::default();
        limits.max_image_width = Some(limit);
        limits.max_image_height = Some(limit);

        let mut reader = ImageReader::with_format(Cursor::new(bytes), format.to_image_format());
        reader.limits(limits);
        let img = reader
            .decode()
            .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

        let img = if config.apply_exif_orientation {
            apply_orientation(img, read_orientation(bytes))
        } else {
            img
        };

        let raster = RasterBuffer::from_rgba_image(img.into_rgba8());
        debug!(
            ?format,
            width = raster.width,
            height = raster.height,
            "decoded image source"
        );
        Self::from_raster(raster, format)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SourceState {
        match &self.inner {
            Inner::Empty => SourceState::Empty,
            Inner::Loading => SourceState::Loading,
            Inner::Ready { .. } => SourceState::Ready,
            Inner::Failed(e) => SourceState::Failed(e.clone()),
        }
    }

    /// True when pixels are available.
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, Inner::Ready { .. })
    }

    /// The decoded buffer, if ready.
    pub fn raster(&self) -> Option<&RasterBuffer> {
        match &self.inner {
            Inner::Ready { image, .. } => Some(&**image),
            _ => None,
        }
    }

    /// RGBA8 pixel data, if ready.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.raster().map(|r| r.pixels.as_slice())
    }

    /// Width in pixels (0 unless ready).
    pub fn width(&self) -> u32 {
        self.raster().map_or(0, |r| r.width)
    }

    /// Height in pixels (0 unless ready).
    pub fn height(&self) -> u32 {
        self.raster().map_or(0, |r| r.height)
    }

    /// Container format of the decoded upload, if ready.
    pub fn format(&self) -> Option<SourceFormat> {
        match &self.inner {
            Inner::Ready { format, .. } => Some(*format),
            _ => None,
        }
    }
}
