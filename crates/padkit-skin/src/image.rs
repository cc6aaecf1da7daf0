//! Skin artwork loading.
//!
//! Images are decoded off the calling thread; geometry never waits for
//! them. A failed load leaves the view on its placeholder.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use padkit_types::error::LoadError;

use crate::descriptor::SkinDescriptor;
use crate::traits::SkinTraits;

/// A decoded image as 8-bit RGBA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Source of skin artwork.
pub trait ImageLoader: Send + Sync {
    /// Load the preferred asset of the representation for `traits`.
    fn load(&self, skin: &SkinDescriptor, traits: SkinTraits) -> Result<SkinImage, LoadError>;
}

/// Reads assets from the skin's directory on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl FsImageLoader {
    /// Filesystem path of the asset `load` would read.
    pub fn asset_path(skin: &SkinDescriptor, traits: SkinTraits) -> Result<PathBuf, LoadError> {
        if !skin.supports(traits) {
            return Err(LoadError::UnsupportedTrait(traits.to_string()));
        }
        let name = skin
            .asset(traits, None)
            .ok_or_else(|| LoadError::MissingAsset(format!("{traits} declares no assets")))?;
        let dir = skin
            .source()
            .asset_dir()
            .ok_or_else(|| LoadError::MissingAsset(format!("{name} (skin has no directory)")))?;
        Ok(dir.join(name))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, skin: &SkinDescriptor, traits: SkinTraits) -> Result<SkinImage, LoadError> {
        let path = Self::asset_path(skin, traits)?;
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
            return Err(LoadError::UnsupportedFormat(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(LoadError::MissingAsset(path.display().to_string()));
        }
        let bytes = std::fs::read(&path)?;
        let image = decode_png(&bytes)?;
        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(image)
    }
}

/// Decode a PNG into RGBA8.
pub fn decode_png(bytes: &[u8]) -> Result<SkinImage, LoadError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| LoadError::Decode(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| LoadError::Decode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 0xFF])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 0xFF]).collect(),
        png::ColorType::Indexed => {
            return Err(LoadError::Decode("indexed PNG was not expanded".into()));
        },
    };

    Ok(SkinImage {
        width: info.width,
        height: info.height,
        rgba,
    })
}

/// An image load running on a worker thread.
///
/// Dropping the handle abandons the load; the worker discards its result.
#[derive(Debug)]
pub struct PendingImage {
    traits: SkinTraits,
    rx: Receiver<Result<SkinImage, LoadError>>,
}

impl PendingImage {
    pub fn spawn(
        loader: Arc<dyn ImageLoader>,
        skin: Arc<SkinDescriptor>,
        traits: SkinTraits,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = loader.load(&skin, traits);
            if tx.send(result).is_err() {
                log::debug!("Image for {traits} finished after its view went away");
            }
        });
        Self { traits, rx }
    }

    /// Traits the image was requested for.
    pub fn traits(&self) -> SkinTraits {
        self.traits
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> Option<Result<SkinImage, LoadError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_lost())),
        }
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<SkinImage, LoadError> {
        self.rx.recv().unwrap_or_else(|_| Err(worker_lost()))
    }
}

fn worker_lost() -> LoadError {
    LoadError::Io(io::Error::other("image worker exited without a result"))
}
