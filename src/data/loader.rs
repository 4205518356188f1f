use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{
    ColorColumn, LaunchDataset, LaunchRecord, Outcome, COL_BOOSTER_CATEGORY, COL_BOOSTER_VERSION,
    COL_CLASS, COL_LAUNCH_SITE, COL_PAYLOAD_MASS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `Launch Site`, `Payload Mass (kg)`, `class`
///   required, booster columns optional, anything else ignored
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., "class": ... }, ...]`
/// * `.parquet` – same columns as the CSV layout
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} launches from {} (payload {}..={} kg, sites {:?}, colour column {:?})",
        dataset.len(),
        path.display(),
        dataset.min_payload(),
        dataset.max_payload(),
        dataset.sites(),
        dataset.color_column().map(ColorColumn::header),
    );

    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell parsing shared by the text formats
// ---------------------------------------------------------------------------

fn parse_payload(raw: &str, row: usize) -> Result<f64, LoadError> {
    let invalid = || LoadError::InvalidPayload {
        row,
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// `class` is written as `0`/`1` by most exporters, but `0.0`/`1.0` shows up
/// when the column went through a float dtype.
fn parse_class(raw: &str, row: usize) -> Result<Outcome, LoadError> {
    let trimmed = raw.trim();
    let class = trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    });
    class
        .and_then(Outcome::from_class)
        .ok_or_else(|| LoadError::InvalidClass {
            row,
            value: raw.to_string(),
        })
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV launch table from any reader.
pub fn read_csv<R: Read>(input: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &'static str| position(name).ok_or(LoadError::MissingColumn(name));

    let site_idx = required(COL_LAUNCH_SITE)?;
    let payload_idx = required(COL_PAYLOAD_MASS)?;
    let class_idx = required(COL_CLASS)?;
    let category_idx = position(COL_BOOSTER_CATEGORY);
    let version_idx = position(COL_BOOSTER_VERSION);

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let mut record = LaunchRecord::new(
            cell(site_idx).trim(),
            parse_payload(cell(payload_idx), row_no)?,
            parse_class(cell(class_idx), row_no)?,
        );
        record.booster_version_category = category_idx.and_then(|i| optional_text(cell(i)));
        record.booster_version = version_idx.and_then(|i| optional_text(cell(i)));
        records.push(record);
    }

    let color_column = ColorColumn::detect(category_idx.is_some(), version_idx.is_some());
    Ok(LaunchDataset::from_records(records, color_column)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Parse a records-oriented JSON launch table (the default
/// `df.to_json(orient='records')` layout).
///
/// A column counts as present when any row carries the key, so a missing
/// required key on a single row is reported against that row.
pub fn parse_json(text: &str) -> Result<LaunchDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut has_category = false;
    let mut has_version = false;
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        has_category |= obj.contains_key(COL_BOOSTER_CATEGORY);
        has_version |= obj.contains_key(COL_BOOSTER_VERSION);

        let site = match json_required(obj, COL_LAUNCH_SITE, i)? {
            JsonValue::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        let payload = match json_required(obj, COL_PAYLOAD_MASS, i)? {
            JsonValue::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoadError::InvalidPayload {
                    row: i,
                    value: n.to_string(),
                })?,
            JsonValue::String(s) => parse_payload(s, i)?,
            other => {
                return Err(LoadError::InvalidPayload {
                    row: i,
                    value: other.to_string(),
                }
                .into())
            }
        };
        let outcome = match json_required(obj, COL_CLASS, i)? {
            JsonValue::Bool(b) => {
                if *b {
                    Outcome::Success
                } else {
                    Outcome::Failure
                }
            }
            JsonValue::String(s) => parse_class(s, i)?,
            other => parse_class(&other.to_string(), i)?,
        };

        let mut record = LaunchRecord::new(site, payload, outcome);
        record.booster_version_category = json_optional_text(obj, COL_BOOSTER_CATEGORY);
        record.booster_version = json_optional_text(obj, COL_BOOSTER_VERSION);
        records.push(record);
    }

    let color_column = ColorColumn::detect(has_category, has_version);
    Ok(LaunchDataset::from_records(records, color_column)?)
}

fn json_required<'a>(
    obj: &'a Map<String, JsonValue>,
    column: &'static str,
    row: usize,
) -> Result<&'a JsonValue, LoadError> {
    match obj.get(column) {
        None => Err(LoadError::MissingColumn(column)),
        Some(JsonValue::Null) => Err(LoadError::NullValue { row, column }),
        Some(v) => Ok(v),
    }
}

fn json_optional_text(obj: &Map<String, JsonValue>, column: &str) -> Option<String> {
    match obj.get(column)? {
        JsonValue::Null => None,
        JsonValue::String(s) => optional_text(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet launch table.
///
/// Expected schema:
/// - `Launch Site`: Utf8 / LargeUtf8
/// - `Payload Mass (kg)`: any integer or float type
/// - `class`: integer, float or boolean
/// - `Booster Version Category` / `Booster Version`: optional Utf8
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let required = |name: &'static str| {
        schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name))
    };
    let site_idx = required(COL_LAUNCH_SITE)?;
    let payload_idx = required(COL_PAYLOAD_MASS)?;
    let class_idx = required(COL_CLASS)?;
    let category_idx = schema.index_of(COL_BOOSTER_CATEGORY).ok();
    let version_idx = schema.index_of(COL_BOOSTER_VERSION).ok();

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let site = extract_text(batch.column(site_idx), row, COL_LAUNCH_SITE)?
                .ok_or(LoadError::NullValue {
                    row: row_no,
                    column: COL_LAUNCH_SITE,
                })?;
            let payload = extract_number(batch.column(payload_idx), row, COL_PAYLOAD_MASS)?
                .ok_or(LoadError::NullValue {
                    row: row_no,
                    column: COL_PAYLOAD_MASS,
                })?;
            if !payload.is_finite() {
                return Err(LoadError::InvalidPayload {
                    row: row_no,
                    value: payload.to_string(),
                }
                .into());
            }
            let outcome = extract_class(batch.column(class_idx), row, row_no)?;

            let mut record = LaunchRecord::new(site.trim(), payload, outcome);
            if let Some(idx) = category_idx {
                record.booster_version_category =
                    extract_text(batch.column(idx), row, COL_BOOSTER_CATEGORY)?
                        .and_then(|s| optional_text(&s));
            }
            if let Some(idx) = version_idx {
                record.booster_version = extract_text(batch.column(idx), row, COL_BOOSTER_VERSION)?
                    .and_then(|s| optional_text(&s));
            }
            records.push(record);
        }

        row_offset += batch.num_rows();
    }

    let color_column = ColorColumn::detect(category_idx.is_some(), version_idx.is_some());
    Ok(LaunchDataset::from_records(records, color_column)?)
}

// -- Parquet / Arrow helpers --

fn unsupported(col: &Arc<dyn Array>, column: &'static str) -> LoadError {
    LoadError::UnsupportedColumnType {
        column,
        data_type: format!("{:?}", col.data_type()),
    }
}

/// Read a string cell; `None` for nulls.
fn extract_text(
    col: &Arc<dyn Array>,
    row: usize,
    column: &'static str,
) -> Result<Option<String>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => return Err(unsupported(col, column)),
    };
    Ok(Some(value))
}

/// Read a numeric cell as `f64`; `None` for nulls.
fn extract_number(
    col: &Arc<dyn Array>,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        _ => return Err(unsupported(col, column)),
    };
    Ok(Some(value))
}

fn extract_class(col: &Arc<dyn Array>, row: usize, row_no: usize) -> Result<Outcome, LoadError> {
    if col.is_null(row) {
        return Err(LoadError::NullValue {
            row: row_no,
            column: COL_CLASS,
        });
    }
    if let DataType::Boolean = col.data_type() {
        return Ok(if col.as_boolean().value(row) {
            Outcome::Success
        } else {
            Outcome::Failure
        });
    }
    let raw = extract_number(col, row, COL_CLASS)?.unwrap_or(f64::NAN);
    parse_class(&raw.to_string(), row_no)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,VAFB SLC-4E,1,500.0,F9 v1.1  B1003,v1.1
4,KSC LC-39A,1,5300.0,F9 FT B1031.1,FT
";

    fn load_err(result: Result<LaunchDataset>) -> LoadError {
        result
            .unwrap_err()
            .downcast::<LoadError>()
            .expect("expected a LoadError")
    }

    #[test]
    fn csv_reads_required_and_booster_columns() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 5300.0);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "KSC LC-39A", "VAFB SLC-4E"]);
        assert_eq!(ds.color_column(), Some(ColorColumn::BoosterVersionCategory));

        let first = &ds.records()[0];
        assert_eq!(first.outcome, Outcome::Failure);
        assert_eq!(first.booster_version_category.as_deref(), Some("v1.0"));
        assert_eq!(first.booster_version.as_deref(), Some("F9 v1.0  B0003"));
    }

    #[test]
    fn csv_without_category_falls_back_to_version() {
        let text = "Launch Site,Payload Mass (kg),class,Booster Version\nA,10,1,F9\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.color_column(), Some(ColorColumn::BoosterVersion));
    }

    #[test]
    fn csv_without_booster_columns_has_no_colouring() {
        let text = "Launch Site,Payload Mass (kg),class\nA,10,1\nB,20,0\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.color_column(), None);
        assert!(ds.color_values().is_empty());
    }

    #[test]
    fn csv_missing_required_column_is_fatal() {
        let text = "Launch Site,class\nA,1\n";
        assert_eq!(
            load_err(read_csv(text.as_bytes())),
            LoadError::MissingColumn(COL_PAYLOAD_MASS)
        );
    }

    #[test]
    fn csv_rejects_non_binary_class() {
        let text = "Launch Site,Payload Mass (kg),class\nA,10,2\n";
        assert_eq!(
            load_err(read_csv(text.as_bytes())),
            LoadError::InvalidClass {
                row: 0,
                value: "2".to_string()
            }
        );
    }

    #[test]
    fn csv_accepts_float_encoded_class() {
        let text = "Launch Site,Payload Mass (kg),class\nA,10,1.0\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn csv_rejects_nan_payload() {
        let text = "Launch Site,Payload Mass (kg),class\nA,NaN,1\n";
        assert!(matches!(
            load_err(read_csv(text.as_bytes())),
            LoadError::InvalidPayload { row: 0, .. }
        ));
    }

    #[test]
    fn csv_with_header_only_is_empty() {
        let text = "Launch Site,Payload Mass (kg),class\n";
        assert_eq!(load_err(read_csv(text.as_bytes())), LoadError::EmptyDataset);
    }

    #[test]
    fn json_records_are_loaded() {
        let text = r#"[
            {"Launch Site": "A", "Payload Mass (kg)": 500, "class": 1, "Booster Version Category": "FT"},
            {"Launch Site": "B", "Payload Mass (kg)": 1500.5, "class": false}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.max_payload(), 1500.5);
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
        assert_eq!(ds.records()[1].booster_version_category, None);
        assert_eq!(ds.color_column(), Some(ColorColumn::BoosterVersionCategory));
    }

    #[test]
    fn json_null_in_required_column_is_fatal() {
        let text = r#"[{"Launch Site": "A", "Payload Mass (kg)": null, "class": 1}]"#;
        assert_eq!(
            load_err(parse_json(text)),
            LoadError::NullValue {
                row: 0,
                column: COL_PAYLOAD_MASS
            }
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert_eq!(
            load_err(load_file(Path::new("launches.xlsx"))),
            LoadError::UnsupportedExtension("xlsx".to_string())
        );
    }

    #[test]
    fn csv_header_with_byte_order_mark_is_recognised() {
        let text = "\u{feff}Launch Site,Payload Mass (kg),class\nA,10,1\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.sites(), ["A"]);
        assert_eq!(ds.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn json_row_without_class_is_fatal() {
        let text = r#"[
            {"Launch Site": "A", "Payload Mass (kg)": 500, "class": 1},
            {"Launch Site": "B", "Payload Mass (kg)": 700}
        ]"#;
        assert_eq!(
            load_err(parse_json(text)),
            LoadError::MissingColumn(COL_CLASS)
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_file(Path::new("does-not-exist.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("opening CSV file"));
        assert!(load_file(Path::new("does-not-exist.parquet")).is_err());
    }

    // -- Parquet --

    /// Write `columns` as a single-batch parquet file under the temp dir.
    fn write_parquet(name: &str, columns: Vec<(&str, ArrayRef)>) -> PathBuf {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let path = std::env::temp_dir().join(format!(
            "launch-dash-{name}-{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn load_parquet_file(name: &str, columns: Vec<(&str, ArrayRef)>) -> Result<LaunchDataset> {
        let path = write_parquet(name, columns);
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        result
    }

    fn sites(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    #[test]
    fn parquet_reads_required_and_booster_columns() {
        let ds = load_parquet_file(
            "full",
            vec![
                (COL_LAUNCH_SITE, sites(&["KSC LC-39A", "CCAFS LC-40", "KSC LC-39A"])),
                (
                    COL_PAYLOAD_MASS,
                    Arc::new(Float64Array::from(vec![5300.0, 0.0, 2500.5])) as ArrayRef,
                ),
                (COL_CLASS, Arc::new(Int64Array::from(vec![1, 0, 1])) as ArrayRef),
                (
                    COL_BOOSTER_CATEGORY,
                    Arc::new(StringArray::from(vec![Some("FT"), Some("v1.0"), None])) as ArrayRef,
                ),
            ],
        )
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 5300.0);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "KSC LC-39A"]);
        assert_eq!(ds.color_column(), Some(ColorColumn::BoosterVersionCategory));

        let records = ds.records();
        assert_eq!(records[0].outcome, Outcome::Success);
        assert_eq!(records[1].outcome, Outcome::Failure);
        assert_eq!(records[0].booster_version_category.as_deref(), Some("FT"));
        assert_eq!(records[2].booster_version_category, None);
    }

    #[test]
    fn parquet_boolean_class_is_accepted() {
        let ds = load_parquet_file(
            "bool-class",
            vec![
                (COL_LAUNCH_SITE, sites(&["A", "B"])),
                (COL_PAYLOAD_MASS, Arc::new(Int64Array::from(vec![100, 200])) as ArrayRef),
                (COL_CLASS, Arc::new(BooleanArray::from(vec![true, false])) as ArrayRef),
            ],
        )
        .unwrap();

        assert_eq!(ds.records()[0].outcome, Outcome::Success);
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
        assert_eq!(ds.color_column(), None);
    }

    #[test]
    fn parquet_text_payload_column_is_rejected() {
        let result = load_parquet_file(
            "text-payload",
            vec![
                (COL_LAUNCH_SITE, sites(&["A"])),
                (COL_PAYLOAD_MASS, sites(&["500"])),
                (COL_CLASS, Arc::new(Int64Array::from(vec![1])) as ArrayRef),
            ],
        );

        assert_eq!(
            load_err(result),
            LoadError::UnsupportedColumnType {
                column: COL_PAYLOAD_MASS,
                data_type: "Utf8".to_string(),
            }
        );
    }

    #[test]
    fn parquet_null_payload_is_fatal() {
        let result = load_parquet_file(
            "null-payload",
            vec![
                (COL_LAUNCH_SITE, sites(&["A", "B"])),
                (
                    COL_PAYLOAD_MASS,
                    Arc::new(Float64Array::from(vec![Some(500.0), None])) as ArrayRef,
                ),
                (COL_CLASS, Arc::new(Int64Array::from(vec![1, 0])) as ArrayRef),
            ],
        );

        assert_eq!(
            load_err(result),
            LoadError::NullValue {
                row: 1,
                column: COL_PAYLOAD_MASS
            }
        );
    }

    #[test]
    fn parquet_missing_class_column_is_fatal() {
        let result = load_parquet_file(
            "no-class",
            vec![
                (COL_LAUNCH_SITE, sites(&["A"])),
                (COL_PAYLOAD_MASS, Arc::new(Float64Array::from(vec![1.0])) as ArrayRef),
            ],
        );

        assert_eq!(load_err(result), LoadError::MissingColumn(COL_CLASS));
    }
}
