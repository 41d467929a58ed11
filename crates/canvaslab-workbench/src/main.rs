use anyhow::Context;
use canvaslab_logging::SubscriberBuilder;
use canvaslab_workbench::cli::Cli;
use canvaslab_workbench::{Slot, Workbench};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = SubscriberBuilder::new().with_level(&cli.log_level).init();

    let mut bench = Workbench::new();
    bench
        .load_path(Slot::First, &cli.first)
        .with_context(|| format!("failed to load {}", cli.first.display()))?;
    bench
        .load_path(Slot::Second, &cli.second)
        .with_context(|| format!("failed to load {}", cli.second.display()))?;

    bench.apply(cli.op.operation(cli.alpha))?;
    bench
        .save_output(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("{}", bench.status());
    Ok(())
}
