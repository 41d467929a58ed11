//! Two-slot workbench
//!
//! Holds the fitted inputs, the last output, and a status line. Operations
//! are refused until both slots are loaded; a refused or failed operation
//! leaves the output exactly as it was.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, info, instrument, warn};

use crate::canvas::{blank_canvas, fit_to_canvas};
use crate::error::{WorkbenchError, WorkbenchResult};
use crate::ops::Operation;

const STATUS_INITIAL: &str =
    "Load two images (ideally of a similar size), then apply an operation.";
const STATUS_LOADED: &str = "Images loaded. You can now apply an operation.";

/// Input slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Left operand; the minuend for `subtract`, weighted by alpha in a blend
    First,
    /// Right operand
    Second,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// Two input canvases and one output canvas
#[derive(Debug, Clone)]
pub struct Workbench {
    inputs: [Option<RgbaImage>; 2],
    output: RgbaImage,
    status: String,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbench {
    /// Empty workbench with a blank output
    pub fn new() -> Self {
        Self {
            inputs: [None, None],
            output: blank_canvas(),
            status: STATUS_INITIAL.to_string(),
        }
    }

    /// Decode encoded image bytes into a slot
    ///
    /// On a decode error the slot keeps whatever it held before.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load(&mut self, slot: Slot, bytes: &[u8]) -> WorkbenchResult<()> {
        let image = image::load_from_memory(bytes)?;
        self.load_image(slot, &image);
        Ok(())
    }

    /// Read and decode an image file into a slot
    pub fn load_path(&mut self, slot: Slot, path: impl AsRef<Path>) -> WorkbenchResult<()> {
        let bytes = std::fs::read(path)?;
        self.load(slot, &bytes)
    }

    /// Fit an already decoded image into a slot
    pub fn load_image(&mut self, slot: Slot, image: &DynamicImage) {
        debug!(%slot, width = image.width(), height = image.height(), "Loading image");
        self.inputs[slot.index()] = Some(fit_to_canvas(image));
        self.status = STATUS_LOADED.to_string();
    }

    /// Whether a slot holds an image
    pub fn is_loaded(&self, slot: Slot) -> bool {
        self.inputs[slot.index()].is_some()
    }

    /// Fitted canvas for a slot, if loaded
    pub fn input(&self, slot: Slot) -> Option<&RgbaImage> {
        self.inputs[slot.index()].as_ref()
    }

    /// Run an operation on the two inputs and replace the output
    #[instrument(skip(self), fields(op = operation.name()))]
    pub fn apply(&mut self, operation: Operation) -> WorkbenchResult<&RgbaImage> {
        let [Some(first), Some(second)] = &self.inputs else {
            warn!("Operation requested before both images were loaded");
            return Err(WorkbenchError::MissingInputs);
        };

        self.output = operation.apply(first, second)?;
        self.status = format!("Operation: {operation}.");
        info!(status = %self.status, "Operation applied");
        Ok(&self.output)
    }

    /// Current output canvas
    pub fn output(&self) -> &RgbaImage {
        &self.output
    }

    /// Current status line
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Encode the output canvas as PNG
    pub fn encode_output(&self) -> WorkbenchResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.output.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Write the output canvas to a file, format chosen by extension
    pub fn save_output(&self, path: impl AsRef<Path>) -> WorkbenchResult<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;

        match format {
            // No alpha channel in JPEG
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(self.output.clone())
                .to_rgb8()
                .save_with_format(path, format)?,
            _ => self.output.save_with_format(path, format)?,
        }

        debug!(path = %path.display(), ?format, "Output written");
        Ok(())
    }
}
