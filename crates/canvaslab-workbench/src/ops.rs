//! Pixel-wise image algebra
//!
//! All operations work channel by channel on RGBA, alpha included, and
//! saturate to `[0, 255]`.

use std::fmt;

use image::{Rgba, RgbaImage};

use crate::alpha::Alpha;
use crate::error::WorkbenchError;

/// One of the six workbench operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Saturating sum
    Add,
    /// Saturating difference, first minus second
    Subtract,
    /// Bitwise AND
    And,
    /// Bitwise OR
    Or,
    /// Bitwise XOR
    Xor,
    /// Weighted sum `alpha * first + (1 - alpha) * second`
    Blend(Alpha),
}

impl Operation {
    /// Short name used in logs and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Blend(_) => "blend",
        }
    }

    /// Combine a single channel value
    pub fn channel(&self, first: u8, second: u8) -> u8 {
        match self {
            Self::Add => first.saturating_add(second),
            Self::Subtract => first.saturating_sub(second),
            Self::And => first & second,
            Self::Or => first | second,
            Self::Xor => first ^ second,
            Self::Blend(alpha) => {
                let mixed = alpha.value() * f64::from(first) + alpha.beta() * f64::from(second);
                mixed.round().clamp(0.0, 255.0) as u8
            }
        }
    }

    /// Combine two images of equal size into a new one
    pub fn apply(&self, first: &RgbaImage, second: &RgbaImage) -> Result<RgbaImage, WorkbenchError> {
        if first.dimensions() != second.dimensions() {
            return Err(WorkbenchError::SizeMismatch {
                first: first.dimensions(),
                second: second.dimensions(),
            });
        }

        let (width, height) = first.dimensions();
        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let a = first.get_pixel(x, y);
            let b = second.get_pixel(x, y);
            Rgba(std::array::from_fn(|i| self.channel(a[i], b[i])))
        }))
    }
}

impl fmt::Display for Operation {
    /// Human-readable description for the status line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "image addition"),
            Self::Subtract => write!(f, "image subtraction"),
            Self::And => write!(f, "bitwise AND"),
            Self::Or => write!(f, "bitwise OR"),
            Self::Xor => write!(f, "bitwise XOR"),
            Self::Blend(alpha) => write!(f, "blend with α={alpha} and β={:.2}", alpha.beta()),
        }
    }
}
