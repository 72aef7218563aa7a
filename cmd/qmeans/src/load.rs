//! Dataset loading from CSV, TSV and JSON files.

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use qmeans_kmeans::Dataset;
use serde::Deserialize;

/// How to read a dataset file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    /// Field delimiter for CSV input. Defaults to ',' (tab for `.tsv`).
    pub delimiter: Option<char>,

    /// Whether the first CSV row holds column names. Default: true.
    pub header: Option<bool>,

    /// Zero-based columns to keep, in order. Default: all.
    pub columns: Option<Vec<usize>>,
}

/// JSON input: a bare matrix or an object with a `rows` matrix.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRows {
    Matrix(Vec<Vec<f64>>),
    Object { rows: Vec<Vec<f64>> },
}

/// Loads a dataset, picking the format from the file extension.
pub fn load(path: &Path, opts: &InputOptions) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let rows = match ext.as_str() {
        "csv" | "txt" => parse_csv(&data, opts.delimiter.unwrap_or(','), opts.header.unwrap_or(true)),
        "tsv" => parse_csv(&data, opts.delimiter.unwrap_or('\t'), opts.header.unwrap_or(true)),
        "json" => parse_json(&data),
        other => bail!("unsupported input format {:?} (expected csv, tsv or json)", other),
    }
    .with_context(|| format!("load {}", path.display()))?;

    let rows = match &opts.columns {
        Some(columns) => select_columns(rows, columns)?,
        None => rows,
    };

    Dataset::new(rows).with_context(|| format!("load {}", path.display()))
}

fn parse_csv(data: &[u8], delimiter: char, header: bool) -> Result<Vec<Vec<f64>>> {
    if !delimiter.is_ascii() {
        bail!("delimiter {delimiter:?} must be a single ASCII character");
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(header)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Report 1-based line numbers counting the header.
        let line = i + 1 + usize::from(header);
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field
                    .parse::<f64>()
                    .with_context(|| format!("line {line}, column {col}: not a number: {field:?}"))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_json(data: &[u8]) -> Result<Vec<Vec<f64>>> {
    let rows = match serde_json::from_slice::<JsonRows>(data)? {
        JsonRows::Matrix(rows) => rows,
        JsonRows::Object { rows } => rows,
    };
    Ok(rows)
}

fn select_columns(rows: Vec<Vec<f64>>, columns: &[usize]) -> Result<Vec<Vec<f64>>> {
    if columns.is_empty() {
        bail!("column selection is empty");
    }
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            columns
                .iter()
                .map(|&c| {
                    row.get(c)
                        .copied()
                        .with_context(|| format!("row {i} has no column {c} ({} columns)", row.len()))
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}
