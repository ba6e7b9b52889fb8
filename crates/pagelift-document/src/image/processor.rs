// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decodes photographed pages into owned buffers and encodes
// rectified pages for the host to persist.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use pagelift_core::error::{PageliftError, Result};
use tracing::{debug, info, instrument};

/// Owned wrapper around one in-memory page image.
///
/// ```ignore
/// let page = ImageProcessor::open("photo.jpg")?;
/// let scanned = scanner.scan_document(page.as_dynamic())?;
/// ImageProcessor::from_dynamic(scanned.image).save_jpeg("page_001.jpg", 90)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    /// Decode a photographed page from disk; the format is guessed from the
    /// file contents and extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|err| PageliftError::ImageError(format!("{}: {err}", path.display())))?;
        info!(width = decoded.width(), height = decoded.height(), "Page loaded");
        Ok(Self { image: decoded })
    }

    /// Decode an encoded page held in memory.
    #[instrument(skip_all, fields(bytes = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(data)
            .map_err(|err| PageliftError::ImageError(format!("undecodable page: {err}")))?;
        debug!(width = decoded.width(), height = decoded.height(), "Page decoded");
        Ok(Self { image: decoded })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Lossless encoding, used for in-memory batches and tests.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut encoded = Cursor::new(Vec::new());
        self.image
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|err| PageliftError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(encoded.into_inner())
    }

    /// JPEG at `quality` (1-100). Alpha is dropped; grayscale pages stay
    /// single-channel.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, quality);
        let encoded = match &self.image {
            DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        };
        encoded.map_err(|err| PageliftError::ImageError(format!("JPEG encoding failed: {err}")))?;
        Ok(out)
    }

    /// Write the image as a JPEG file.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), quality))]
    pub fn save_jpeg(&self, path: impl AsRef<Path>, quality: u8) -> Result<()> {
        let bytes = self.to_jpeg_bytes(quality)?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!(bytes = bytes.len(), "Page written");
        Ok(())
    }
}
