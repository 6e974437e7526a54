//! One-shot prediction for a single observation.
//!
//! Usage: `predict-record <artifact.json> <record.json | data.csv> [row]`
//!
//! A `.csv` input is read as the fire dataset; `row` picks the 0-based data
//! row (default 0).

use anyhow::{bail, Context};
use api::{dataset::load_csv_row, init_logging, LABEL_FIELD};
use feature_engine::RawRecord;
use inference_engine::InferenceEngine;
use std::path::Path;

const USAGE: &str = "usage: predict-record <artifact.json> <record.json | data.csv> [row]";

fn read_record(path: &str, row: usize) -> anyhow::Result<RawRecord> {
    let is_csv = Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        return load_csv_row(path, row).with_context(|| format!("reading row {} of {}", row, path));
    }

    let text = std::fs::read_to_string(path).with_context(|| format!("reading record {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing record {}", path))
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (artifact_path, record_path) = match (args.next(), args.next()) {
        (Some(artifact), Some(record)) => (artifact, record),
        _ => bail!(USAGE),
    };
    let row = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("row index {:?}; {}", raw, USAGE))?,
        None => 0,
    };

    init_logging("warn", false)?;

    let engine = InferenceEngine::load(&artifact_path)
        .with_context(|| format!("loading model artifact {}", artifact_path))?;

    let record = read_record(&record_path, row)?;

    let result = engine.predict_record(&record.without(LABEL_FIELD))?;
    for warning in &result.prediction.range_warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", result.prediction.burned_area);

    Ok(())
}
