use anyhow::Result;
use sok_plot::{
    config::{Benchmark, ChartConfig, Style},
    layout::{LayoutMode, Positions},
    render, PlotError,
};
use std::{collections::BTreeMap, fs};
use tempfile::tempdir;

mod common;

use common::{empty_run, single_run};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn test_flat_render_skips_empty_table() -> Result<()> {
    sok_plot::init_logging(true);

    let figure = render(
        &["A", "B"],
        &[single_run(100.0, 200.0, 300.0, 400.0), empty_run()],
        None,
        &ChartConfig::default(),
    )?;

    assert_eq!(figure.bars().len(), 1);
    let bar = &figure.bars()[0];
    assert_eq!(bar.label, "A");
    assert_eq!(bar.x, 0.0);
    assert_eq!(bar.error, 0.0);

    let heights: Vec<f64> = bar.segments.iter().map(|s| s.height).collect();
    assert_eq!(heights, vec![0.1, 0.2, 0.3, 0.4]);
    let bottoms: Vec<f64> = bar.segments.iter().map(|s| s.bottom).collect();
    assert!(close(bottoms[3], 0.1 + 0.2 + 0.3));
    assert!(close(bar.total(), 1.0));

    assert!(figure.bars().iter().all(|b| b.x != 1.0));
    // The legend is built from the phases, not from the bars
    assert_eq!(figure.legend().len(), 4);

    Ok(())
}

#[test]
fn test_rendered_heights_are_seconds() -> Result<()> {
    let ms = [1.0, 123.456, 98_765.4, 1_500_000.0];
    let figure = render(
        &["SEAL-BFV"],
        &[single_run(ms[0], ms[1], ms[2], ms[3])],
        None,
        &ChartConfig::default(),
    )?;

    for (segment, value) in figure.bars()[0].segments.iter().zip(ms) {
        assert!((segment.height - value / 1000.0).abs() < 1e-12);
    }

    Ok(())
}

#[test]
fn test_grouped_tick_between_group_members() -> Result<()> {
    let config = ChartConfig {
        layout_mode: LayoutMode::Grouped,
        positions: Positions {
            flat: vec![],
            grouped: BTreeMap::from([("A".to_string(), (0, 0)), ("B".to_string(), (0, 1))]),
        },
        group_labels: vec!["AB".to_string()],
        ..ChartConfig::default()
    };

    let figure = render(
        &["A", "B"],
        &[
            single_run(100.0, 200.0, 300.0, 400.0),
            single_run(400.0, 300.0, 200.0, 100.0),
        ],
        None,
        &config,
    )?;

    let a = figure.bar("A").unwrap();
    let b = figure.bar("B").unwrap();
    assert!(close(b.x - a.x, config.bar_width));
    assert_eq!(figure.ticks().len(), 1);
    assert!(close(figure.ticks()[0].x, (a.x + b.x) / 2.0));
    assert_eq!(figure.ticks()[0].text, "AB");

    Ok(())
}

#[test]
fn test_display_names_only_change_tick_text() -> Result<()> {
    let config = Benchmark::Nn.config();
    let figure = render(
        &["SEALion", "Lattigo"],
        &[
            single_run(1.0, 2.0, 3.0, 4.0),
            single_run(1.0, 2.0, 3.0, 4.0),
        ],
        None,
        &config,
    )?;

    // Lattigo has no flat position in the nn chart
    assert_eq!(figure.bars().len(), 1);
    assert_eq!(figure.bars()[0].label, "SEALion");
    assert_eq!(figure.bars()[0].x, 1.0);

    let texts: Vec<&str> = figure.ticks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts.len(), 6);
    assert_eq!(texts[1], "SEALion\n(MLP)");

    let plain = render(
        &["Lattigo"],
        &[single_run(1.0, 2.0, 3.0, 4.0)],
        None,
        &ChartConfig::default(),
    )?;
    assert_eq!(plain.ticks()[0].text, "Lattigo");

    Ok(())
}

#[test]
fn test_missing_column_is_fatal() {
    let table = sok_plot::ResultTable::from_columns([("t_keygen", vec![1.0])]).unwrap();
    let err = render(&["A"], &[table], None, &ChartConfig::default()).unwrap_err();
    assert_eq!(
        err,
        PlotError::MissingColumn {
            label: "A".to_string(),
            column: "t_input_encryption".to_string(),
        }
    );
}

#[test]
fn test_log_axis_labels_use_magnitude_suffix() -> Result<()> {
    let config = Benchmark::Kernel.config();
    let figure = render(
        &["TFHE"],
        &[single_run(10.0, 10.0, 1_500_000.0, 10.0)],
        None,
        &config,
    )?;

    assert_eq!(figure.scale().format_value(1_500_000.0), "1.5M");
    assert_eq!(figure.scale().format_tick(3.0), "1K");
    assert_eq!(figure.y_range(), -2.0..4.0);

    Ok(())
}

#[test]
fn test_overlay_accumulates_bars() -> Result<()> {
    let config = Benchmark::Nn.config();
    let first = render(
        &["SEALion"],
        &[single_run(1.0, 2.0, 3.0, 4.0)],
        None,
        &config,
    )?;
    let snapshot = first.clone();

    let overlaid = render(
        &["EVA-MLP"],
        &[single_run(5.0, 6.0, 7.0, 8.0)],
        Some(first),
        &config,
    )?;
    assert_eq!(overlaid.bars().len(), 2);
    assert!(overlaid.bar("SEALion").is_some());
    assert!(overlaid.bar("EVA-MLP").is_some());
    // Ticks at the same position are not duplicated
    assert_eq!(overlaid.ticks().len(), 6);

    // Rendering into another figure leaves the first one alone
    let other = render(
        &["nGraph-HE-MLP"],
        &[single_run(1.0, 1.0, 1.0, 1.0)],
        None,
        &config,
    )?;
    let _ = render(
        &["nGraph-HE-LeNet5"],
        &[single_run(1.0, 1.0, 1.0, 1.0)],
        Some(other),
        &config,
    )?;
    assert_eq!(snapshot.bars().len(), 1);
    assert_eq!(snapshot.bars()[0].label, "SEALion");

    Ok(())
}

#[test]
fn test_overlay_asserts_new_style() -> Result<()> {
    let first = render(
        &["A"],
        &[single_run(1.0, 2.0, 3.0, 4.0)],
        None,
        &ChartConfig::default(),
    )?;

    let config = ChartConfig {
        style: Style {
            dpi: 300.0,
            ..Style::default()
        },
        ..ChartConfig::default()
    };
    let second = render(&["A"], &[single_run(1.0, 2.0, 3.0, 4.0)], Some(first), &config)?;
    assert_eq!(second.style().dpi, 300.0);
    assert_eq!(second.bars().len(), 2);

    Ok(())
}

#[test]
fn test_every_preset_renders_to_svg() -> Result<()> {
    let dir = tempdir()?;

    for benchmark in Benchmark::iter_variants() {
        let config = benchmark.config();
        let labels: Vec<String> = match benchmark {
            Benchmark::Nn => config.positions.flat.clone(),
            Benchmark::Cardio => vec![
                "Cingulata-UNOPT".to_string(),
                "SEAL-BFV-Batched".to_string(),
                "Lobster-OPT-PARAMS".to_string(),
            ],
            Benchmark::Kernel => config.positions.grouped.keys().cloned().collect(),
        };
        let tables: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let scale = (i + 1) as f64;
                // One bar per chart reaches the upper panel of the nn chart
                let computation = if i == 0 { 125_000.0 } else { 3_000.0 * scale };
                single_run(100.0 * scale, 200.0 * scale, computation, 50.0 * scale)
            })
            .collect();

        let figure = render(&labels, &tables, None, &config)?;
        assert_eq!(figure.bars().len(), labels.len());

        let path = dir.path().join("plots").join(format!("{benchmark}.svg"));
        figure.save_svg(&path)?;
        let svg = fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Decryption"));
    }

    Ok(())
}

#[test]
fn test_typeset_toggle_changes_tick_text() -> Result<()> {
    let mut config = Benchmark::Kernel.config();
    let tables = [single_run(1.0, 2.0, 3.0, 4.0)];

    let svg = render(&["E3-SEAL"], &tables, None, &config)?.to_svg_string()?;
    assert!(svg.contains("(Native/E³)"));

    config.style.typeset = false;
    let svg = render(&["E3-SEAL"], &tables, None, &config)?.to_svg_string()?;
    assert!(svg.contains("(Native/E3)"));

    Ok(())
}
