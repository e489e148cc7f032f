#![allow(dead_code)]

use anyhow::Result;
use sok_plot::ResultTable;
use std::{fs, path::Path};

pub const HEADER: &str = "t_keygen,t_input_encryption,t_computation,t_decryption";

/// One-row table with the four phase timings in milliseconds.
pub fn single_run(keygen: f64, encryption: f64, computation: f64, decryption: f64) -> ResultTable {
    ResultTable::from_columns([
        ("t_keygen", vec![keygen]),
        ("t_input_encryption", vec![encryption]),
        ("t_computation", vec![computation]),
        ("t_decryption", vec![decryption]),
    ])
    .unwrap()
}

pub fn empty_run() -> ResultTable {
    ResultTable::from_reader(format!("{HEADER}\n").as_bytes()).unwrap()
}

/// Write `rows` as `<dir>/<label>/results.csv`.
pub fn write_results(dir: &Path, label: &str, rows: &[[f64; 4]]) -> Result<()> {
    let label_dir = dir.join(label);
    fs::create_dir_all(&label_dir)?;

    let mut csv = format!("{HEADER}\n");
    for row in rows {
        csv.push_str(&format!("{},{},{},{}\n", row[0], row[1], row[2], row[3]));
    }
    fs::write(label_dir.join("results.csv"), csv)?;

    Ok(())
}
