//! Formatting layers and writers
//!
//! Each output is built as a boxed layer over the plain registry so that the
//! builder can stack any combination of them without a type per combination.

use std::fs::{self, File};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{Layer, Registry};

use crate::config::{ConsoleConfig, FileConfig, JsonlConfig, RotationStrategy};
use crate::error::LoggingError;

/// A type-erased layer over the base registry
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Create a JSONL formatting layer writing to `writer`
///
/// This configures tracing-subscriber's JSON formatter with settings
/// suited to log aggregation systems.
pub fn jsonl_layer<W>(writer: W, jsonl: &JsonlConfig) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(jsonl.include_current_span)
        .with_span_list(jsonl.include_spans)
        .flatten_event(jsonl.flatten_events)
        .with_file(jsonl.include_location)
        .with_line_number(jsonl.include_location)
        .with_thread_ids(jsonl.include_thread_info)
        .with_thread_names(jsonl.include_thread_info)
        .with_writer(writer)
        .boxed()
}

/// Create the console layer: pretty when configured, JSONL otherwise
pub fn console_layer(console: &ConsoleConfig, jsonl: &JsonlConfig) -> BoxedLayer {
    if console.pretty {
        tracing_subscriber::fmt::layer()
            .with_ansi(console.ansi)
            .with_target(true)
            .boxed()
    } else {
        jsonl_layer(std::io::stdout, jsonl)
    }
}

/// Open a non-blocking writer for file output
///
/// `Never` truncates a single `<prefix>.log`; the rotating strategies
/// append to dated files managed by `tracing-appender`.
pub fn file_writer(file: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&file.directory)?;

    let writer = match file.rotation {
        RotationStrategy::Never => {
            let path = file.directory.join(format!("{}.log", file.prefix));
            tracing_appender::non_blocking(File::create(path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &file.directory,
            &file.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &file.directory,
            &file.prefix,
        )),
    };

    Ok(writer)
}
