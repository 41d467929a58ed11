//! # Canvaslab Workbench
//!
//! Pixel-wise algebra over two images. Each input is fitted onto a fixed
//! 400x300 transparent canvas, then combined channel by channel with one of
//! six operations: add, subtract, and, or, xor, or an alpha blend.
//!
//! ```no_run
//! use canvaslab_workbench::{Alpha, Operation, Slot, Workbench};
//!
//! # fn main() -> Result<(), canvaslab_workbench::WorkbenchError> {
//! let mut bench = Workbench::new();
//! bench.load_path(Slot::First, "first.png")?;
//! bench.load_path(Slot::Second, "second.jpg")?;
//! bench.apply(Operation::Blend(Alpha::new(0.3)?))?;
//! bench.save_output("blend.png")?;
//! # Ok(())
//! # }
//! ```

pub mod alpha;
pub mod canvas;
pub mod cli;
pub mod error;
pub mod ops;
pub mod workbench;

pub use alpha::Alpha;
pub use canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, Placement, fit_to_canvas};
pub use error::{WorkbenchError, WorkbenchResult};
pub use ops::Operation;
pub use workbench::{Slot, Workbench};
