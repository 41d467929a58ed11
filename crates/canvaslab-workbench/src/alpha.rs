//! Blend weight

use std::fmt;
use std::str::FromStr;

use crate::error::WorkbenchError;

/// Weight of the first image in a blend, always within `[0, 1]`
///
/// The second image gets the complementary weight [`Alpha::beta`].
/// Displays with two decimals, like the slider readout.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Alpha(f64);

impl Alpha {
    /// Equal weight for both images
    pub const HALF: Self = Self(0.5);

    /// Validate a weight
    pub fn new(value: f64) -> Result<Self, WorkbenchError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WorkbenchError::invalid_alpha(value))
        }
    }

    /// Weight of the first image
    pub fn value(self) -> f64 {
        self.0
    }

    /// Weight of the second image (`1 - alpha`)
    pub fn beta(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self::HALF
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Alpha {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| WorkbenchError::invalid_alpha(s))?;
        Self::new(value)
    }
}

impl TryFrom<f64> for Alpha {
    type Error = WorkbenchError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
