//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::alpha::Alpha;
use crate::ops::Operation;

#[derive(Debug, Parser)]
#[command(
    name = "canvaslab-workbench",
    version,
    about = "Combine two images pixel by pixel"
)]
pub struct Cli {
    /// Operation to apply
    #[arg(value_enum)]
    pub op: OpName,

    /// First input image
    pub first: PathBuf,

    /// Second input image
    pub second: PathBuf,

    /// Output file; the format follows the extension
    #[arg(long, short)]
    pub output: PathBuf,

    /// Weight of the first image for `blend`, between 0 and 1
    #[arg(long, default_value_t = Alpha::default())]
    pub alpha: Alpha,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Operation names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpName {
    Add,
    Subtract,
    And,
    Or,
    Xor,
    Blend,
}

impl OpName {
    /// Resolve to an operation, using `alpha` for blends
    pub fn operation(self, alpha: Alpha) -> Operation {
        match self {
            Self::Add => Operation::Add,
            Self::Subtract => Operation::Subtract,
            Self::And => Operation::And,
            Self::Or => Operation::Or,
            Self::Xor => Operation::Xor,
            Self::Blend => Operation::Blend(alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blend() {
        let cli = Cli::try_parse_from([
            "canvaslab-workbench",
            "blend",
            "a.png",
            "b.png",
            "-o",
            "out.png",
            "--alpha",
            "0.3",
        ])
        .unwrap();

        assert_eq!(cli.op, OpName::Blend);
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(
            cli.op.operation(cli.alpha),
            Operation::Blend(Alpha::new(0.3).unwrap())
        );
    }

    #[test]
    fn test_default_alpha() {
        let cli =
            Cli::try_parse_from(["canvaslab-workbench", "xor", "a.png", "b.png", "-o", "x.png"])
                .unwrap();
        assert_eq!(cli.alpha, Alpha::HALF);
        assert_eq!(cli.op.operation(cli.alpha), Operation::Xor);
    }

    #[test]
    fn test_alpha_out_of_range() {
        let result = Cli::try_parse_from([
            "canvaslab-workbench",
            "blend",
            "a.png",
            "b.png",
            "-o",
            "out.png",
            "--alpha",
            "1.5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_operation() {
        let result =
            Cli::try_parse_from(["canvaslab-workbench", "multiply", "a.png", "b.png", "-o", "o.png"]);
        assert!(result.is_err());
    }
}
