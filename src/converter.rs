//! Per-file transcoding.
//!
//! Decoding and encoding are delegated to the `image` crate. Each call owns
//! its file handle, so handles are released on every exit path.

use crate::{
    error::{Error, Result},
    format::ImageFormat,
};
use image::{
    DynamicImage, Frame, ImageResult,
    codecs::{gif::GifEncoder, jpeg::JpegEncoder, png::PngEncoder},
};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tracing::{debug, error};

/// JPEG quality used for every encode.
const JPEG_QUALITY: u8 = 100;

/// NeuQuant sampling factor for GIF palettes; 1 samples every pixel.
const GIF_SPEED: i32 = 1;

/// Converts single images from one format to another.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Converter {
    from: ImageFormat,
    to: ImageFormat,
}

impl Converter {
    pub(crate) const fn new(from: ImageFormat, to: ImageFormat) -> Self {
        Self { from, to }
    }

    /// Decodes `source`, re-encodes it and writes it to `destination`.
    ///
    /// The destination's parent directories are created first.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation, decoding, encoding or the
    /// final write fails. A partially written output is removed.
    pub(crate) fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            debug!("Creating output directory {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let image = self.decode(source)?;
        self.encode(&image, destination)
    }

    /// Decodes `path` with the source format's decoder.
    pub(crate) fn decode(&self, path: &Path) -> Result<DynamicImage> {
        debug!("Decoding {} image {}", self.from, path.display());

        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        image::load(BufReader::new(file), self.from.codec())
            .map_err(|e| Error::decode(path, self.from, &e))
    }

    /// Encodes `image` in the target format and writes it to `path`.
    pub(crate) fn encode(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        debug!("Encoding {} image to {}", self.to, path.display());

        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);

        let result = write_image(image, self.to, &mut writer)
            .map_err(|e| Error::encode(path, self.to, &e))
            .and_then(|()| writer.flush().map_err(|e| Error::io(path, e)));
        drop(writer);

        if let Err(primary) = result {
            remove_partial(path);
            return Err(primary);
        }

        Ok(())
    }
}

/// Writes `image` to `writer` using the encoder for `format`.
fn write_image<W: Write>(
    image: &DynamicImage,
    format: ImageFormat,
    writer: &mut W,
) -> ImageResult<()> {
    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(writer, JPEG_QUALITY))
        }
        ImageFormat::Png => image.write_with_encoder(PngEncoder::new(writer)),
        ImageFormat::Gif => {
            let mut encoder = GifEncoder::new_with_speed(writer, GIF_SPEED);
            encoder.encode_frame(Frame::new(image.to_rgba8()))
        }
    }
}

/// Removes a partially written output after a failed encode.
///
/// A failure here is logged and never replaces the encode error.
fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => error!("Failed to remove partial output {}: {}", path.display(), e),
    }
}
