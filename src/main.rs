use clap::{Parser, Subcommand};
use log::info;
use sok_plot::{config::Benchmark, env::Env, tasks::plot::Plot};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = Env::SYS_NAME)]
struct Cli {
    // The name of the task to execute
    #[clap(subcommand)]
    task: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the benchmarks with a built-in chart configuration
    List {},
    /// Render the stacked phase breakdown of a benchmark as SVG
    Plot {
        /// Benchmark whose chart configuration to use
        #[arg(value_enum)]
        benchmark: Benchmark,
        /// Results directories, rendered onto the same figure in order.
        /// Defaults to `<results root>/<benchmark>`
        #[arg(long, num_args = 1..)]
        results: Vec<PathBuf>,
        /// YAML chart configuration overriding the built-in one
        #[arg(long)]
        config: Option<String>,
        /// Output SVG path. Defaults to `<plots root>/<name>.svg`
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the mean phase durations of every label in seconds
    Summary {
        #[arg(value_enum)]
        benchmark: Benchmark,
        #[arg(long)]
        results: Option<PathBuf>,
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    sok_plot::init_logging(false);

    let cli = Cli::parse();
    match &cli.task {
        Command::List {} => {
            Plot::list();
        }
        Command::Plot {
            benchmark,
            results,
            config,
            out,
        } => {
            let config = Plot::chart_config(benchmark, config.as_deref())?;
            let results = if results.is_empty() {
                vec![Plot::default_results_dir(benchmark)]
            } else {
                results.clone()
            };
            let path = Plot::plot(&config, &results, out.clone())?;
            info!("{benchmark}: done (out={})", path.display());
        }
        Command::Summary {
            benchmark,
            results,
            config,
        } => {
            let config = Plot::chart_config(benchmark, config.as_deref())?;
            let results = results
                .clone()
                .unwrap_or_else(|| Plot::default_results_dir(benchmark));
            Plot::summary(&config, &results)?;
        }
    }

    Ok(())
}
