use crate::{
    aggregate::PhaseDurations,
    config::{Benchmark, ChartConfig},
    env::Env,
    figure::{self, Figure},
    loader,
    table::ResultTable,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

pub struct Plot {}

impl Plot {
    /// Chart configuration for `benchmark`, read from `config_path` when
    /// given.
    pub fn chart_config(benchmark: &Benchmark, config_path: Option<&str>) -> Result<ChartConfig> {
        match config_path {
            Some(path) => ChartConfig::from_path(path),
            None => Ok(benchmark.config()),
        }
    }

    pub fn default_results_dir(benchmark: &Benchmark) -> PathBuf {
        Env::results_root().join(benchmark.to_string())
    }

    pub fn default_out_path(config: &ChartConfig) -> PathBuf {
        Env::plots_root().join(format!("{}.svg", config.name))
    }

    pub fn list() {
        for benchmark in Benchmark::iter_variants() {
            let config = benchmark.config();
            println!(
                "{benchmark}: layout={}, scale={}, phases={}",
                config.layout_mode,
                config.scale,
                config
                    .phases
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<String>>()
                    .join("/")
            );
        }
    }

    /// Render every results directory onto one figure and save it as SVG.
    /// Returns the path of the generated plot.
    pub fn plot(
        config: &ChartConfig,
        results_dirs: &[PathBuf],
        out: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let mut figure: Option<Figure> = None;
        for dir in results_dirs {
            debug!("rendering results (path={})", dir.display());
            let (labels, tables) = loader::load_results(dir)?;
            if labels.is_empty() {
                continue;
            }

            figure = Some(
                figure::render(&labels, &tables, figure.take(), config)
                    .with_context(|| format!("error rendering results (path={})", dir.display()))?,
            );
        }

        let Some(figure) = figure else {
            anyhow::bail!("no results to plot (dirs={results_dirs:?})");
        };
        let out = out.unwrap_or_else(|| Self::default_out_path(config));
        figure.save_svg(&out)?;

        Ok(out)
    }

    /// Per-label phase means, skipping labels without results.
    pub fn summarize<S: AsRef<str>>(
        labels: &[S],
        tables: &[ResultTable],
        config: &ChartConfig,
    ) -> Result<Vec<(String, PhaseDurations)>> {
        let mut rows = Vec::new();
        for (label, table) in labels.iter().zip(tables) {
            let label = label.as_ref();
            if let Some(durations) = PhaseDurations::from_table(label, table, &config.phases)? {
                rows.push((label.to_string(), durations));
            }
        }

        Ok(rows)
    }

    pub fn summary(config: &ChartConfig, results_dir: &Path) -> Result<()> {
        let (labels, tables) = loader::load_results(results_dir)?;
        let rows = Self::summarize(&labels, &tables, config)?;
        info!(
            "summarized {} of {} labels (path={})",
            rows.len(),
            labels.len(),
            results_dir.display()
        );

        let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0).max(5);
        let mut header = format!("{:<width$}", "label");
        for phase in &config.phases {
            header.push_str(&format!(" {:>15}", phase.name));
        }
        header.push_str(&format!(" {:>10} {:>10}", "total", "error"));
        println!("{header}");

        for (label, durations) in &rows {
            let mut line = format!("{label:<width$}");
            for mean in &durations.means {
                line.push_str(&format!(" {mean:>15.3}"));
            }
            line.push_str(&format!(
                " {:>10.3} {:>10.3}",
                durations.total(),
                durations.error
            ));
            println!("{line}");
        }

        Ok(())
    }
}
