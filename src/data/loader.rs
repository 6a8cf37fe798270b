use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Float32Array, Float64Array, LargeStringArray, StringArray, StringViewArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{SpectrumContext, SpectrumId, SpectrumMetadata};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a processed 1-D spectrum from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `ppm` and `intensity`, one row per sample
/// * `.json`    – `{ "id": ..., "ppm": [...], "intensity": [...], "label": "13C" }`
/// * `.csv`     – columns `ppm` and `intensity`, one row per sample
///
/// Optional `label`, `frequency` and `solvent` fields fill the metadata; in
/// the tabular formats they are read from the first row.
pub fn load_file(path: &Path) -> Result<SpectrumContext> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let spectrum = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    validate(&spectrum)?;
    Ok(spectrum)
}

fn validate(spectrum: &SpectrumContext) -> Result<()> {
    if spectrum.shift_axis.len() != spectrum.intensities.len() {
        bail!(
            "ppm has {} values but intensity has {}",
            spectrum.shift_axis.len(),
            spectrum.intensities.len()
        );
    }
    if spectrum.is_empty() {
        bail!("Spectrum has no samples");
    }
    Ok(())
}

/// Spectrum id derived from the file name.
fn file_stem_id(path: &Path) -> SpectrumId {
    SpectrumId(
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("spectrum")
            .to_string(),
    )
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct JsonSpectrum {
    id: Option<String>,
    ppm: Vec<f64>,
    intensity: Vec<f64>,
    #[serde(default)]
    label: String,
    frequency: Option<f64>,
    solvent: Option<String>,
}

/// Expected JSON schema:
///
/// ```json
/// {
///   "id": "menthol-13c",
///   "ppm": [220.0, 219.9, ...],
///   "intensity": [0.01, 0.02, ...],
///   "label": "13C",
///   "frequency": 100.6,
///   "solvent": "CDCl3"
/// }
/// ```
fn load_json(path: &Path) -> Result<SpectrumContext> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let raw: JsonSpectrum = serde_json::from_str(&text).context("parsing JSON spectrum")?;

    let id = raw
        .id
        .map(SpectrumId)
        .unwrap_or_else(|| file_stem_id(path));
    let metadata = SpectrumMetadata {
        isotope_label: raw.label,
        frequency_mhz: raw.frequency,
        solvent: raw.solvent,
    };
    Ok(SpectrumContext::new(id, raw.ppm, raw.intensity, metadata))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, then one sample per row.
/// `ppm` and `intensity` are required; `label`, `frequency` and `solvent`
/// are optional and only read from the first data row.
fn load_csv(path: &Path) -> Result<SpectrumContext> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let col = |name: &str| headers.iter().position(|h| h == name);
    let ppm_idx = col("ppm").context("CSV missing 'ppm' column")?;
    let y_idx = col("intensity").context("CSV missing 'intensity' column")?;
    let label_idx = col("label");
    let freq_idx = col("frequency");
    let solvent_idx = col("solvent");

    let mut ppm = Vec::new();
    let mut intensity = Vec::new();
    let mut metadata = SpectrumMetadata::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        ppm.push(parse_float(record.get(ppm_idx).unwrap_or(""), row_no, "ppm")?);
        intensity.push(parse_float(record.get(y_idx).unwrap_or(""), row_no, "intensity")?);

        if row_no == 0 {
            let text = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            metadata.isotope_label = text(label_idx).unwrap_or_default();
            metadata.solvent = text(solvent_idx);
            metadata.frequency_mhz = text(freq_idx).and_then(|s| s.parse().ok());
        }
    }

    Ok(SpectrumContext::new(file_stem_id(path), ppm, intensity, metadata))
}

fn parse_float(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one spectrum.
///
/// Expected schema:
/// - `ppm`: Float64 or Float32 – chemical shift per sample
/// - `intensity`: Float64 or Float32 – signal per sample
/// - optional `id`, `label`, `solvent` (Utf8) and `frequency` (float),
///   taken from the first row
fn load_parquet(path: &Path) -> Result<SpectrumContext> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut ppm = Vec::new();
    let mut intensity = Vec::new();
    let mut first: Option<(Option<String>, SpectrumMetadata)> = None;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        ppm.extend(float_column(&batch, "ppm")?);
        intensity.extend(float_column(&batch, "intensity")?);

        if first.is_none() && batch.num_rows() > 0 {
            let metadata = SpectrumMetadata {
                isotope_label: string_cell(&batch, "label").unwrap_or_default(),
                frequency_mhz: float_cell(&batch, "frequency"),
                solvent: string_cell(&batch, "solvent"),
            };
            first = Some((string_cell(&batch, "id"), metadata));
        }
    }

    let (id, metadata) = first.unwrap_or_default();
    let id = id.map(SpectrumId).unwrap_or_else(|| file_stem_id(path));
    Ok(SpectrumContext::new(id, ppm, intensity, metadata))
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a Arc<dyn Array>> {
    let idx = batch.schema().index_of(name).ok()?;
    Some(batch.column(idx))
}

/// Read a whole Float64/Float32 column; nulls become NaN.
fn float_column(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let col = column(batch, name)
        .with_context(|| format!("Parquet file missing '{name}' column"))?;

    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
    } else {
        bail!(
            "Column '{name}' is {:?}, expected Float64 or Float32",
            col.data_type()
        )
    }
}

/// First-row value of an optional string column.
fn string_cell(batch: &RecordBatch, name: &str) -> Option<String> {
    let col = column(batch, name)?;
    if col.is_empty() || col.is_null(0) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(0).to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|s| s.value(0).to_string()),
        DataType::Utf8View => col
            .as_any()
            .downcast_ref::<StringViewArray>()
            .map(|s| s.value(0).to_string()),
        _ => None,
    }
}

/// First-row value of an optional float column.
fn float_cell(batch: &RecordBatch, name: &str) -> Option<f64> {
    let col = column(batch, name)?;
    if col.is_empty() || col.is_null(0) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Some(arr.value(0))
    } else {
        col.as_any()
            .downcast_ref::<Float32Array>()
            .map(|arr| arr.value(0) as f64)
    }
}
