//! Hand the assembled tables to consumers as files.

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Array, Float64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use parquet::{
    arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties,
};
use std::{fs, fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::indicators::IndicatorTable;
use crate::process::DataWarning;

const DATE_COLUMN: &str = "date";

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

impl IndicatorTable {
    /// `date` as Date32 followed by one non-null Float64 column per indicator.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = vec![Field::new(DATE_COLUMN, DataType::Date32, false)];
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(
            self.dates().iter().copied().map(days_since_epoch).collect::<Vec<_>>(),
        ))];

        for name in self.columns() {
            let values = self.column(name).unwrap_or_default();
            fields.push(Field::new(name, DataType::Float64, false));
            arrays.push(Arc::new(Float64Array::from(values.to_vec())));
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
            .with_context(|| format!("building record batch for {}", self.name()))
    }
}

/// Write `table` as a single-row-group Parquet file.
pub fn write_parquet<P: AsRef<Path>>(table: &IndicatorTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let batch = table.to_record_batch()?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    info!(path = %path.display(), rows = table.len(), "wrote parquet");
    Ok(())
}

/// Write `table` as CSV: ISO dates in the first column, then one column
/// per indicator.
pub fn write_csv<P: AsRef<Path>>(table: &IndicatorTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {:?}", path))?;

    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(table.columns().iter().cloned());
    wtr.write_record(&header).context("writing CSV header")?;

    for (date, values) in table.rows() {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)
            .with_context(|| format!("writing CSV row {}", date))?;
    }
    wtr.flush().context("flushing CSV")?;
    info!(path = %path.display(), rows = table.len(), "wrote csv");
    Ok(())
}

/// Pretty-print `warnings` as a JSON array.
pub fn write_warnings_json<P: AsRef<Path>>(warnings: &[DataWarning], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut text = serde_json::to_string_pretty(warnings).context("serializing warnings")?;
    text.push('\n');
    fs::write(path, text).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorSet;
    use crate::schema::SourceId;
    use crate::series::Series;
    use parquet::file::reader::{FileReader, SerializedFileReader};

    fn sample() -> IndicatorTable {
        let d = |day| NaiveDate::from_ymd_opt(2023, 5, day).unwrap();
        IndicatorSet::new()
            .with(
                "target_rate",
                Series::from_points("x", vec![(d(1), Some(11.25)), (d(2), Some(11.25))]),
            )
            .with(
                "fx_yoy",
                Series::from_points("y", vec![(d(1), Some(-8.5)), (d(2), Some(-8.25))]),
            )
            .materialize("daily")
    }

    #[test]
    fn test_record_batch_layout() -> Result<()> {
        let batch = sample().to_record_batch()?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.schema().field(0).name(), DATE_COLUMN);
        let dates = batch
            .column(0)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        assert_eq!(dates.value(0), 19478);
        Ok(())
    }

    #[test]
    fn test_write_parquet_row_count() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("daily.parquet");
        write_parquet(&sample(), &path)?;
        let reader = SerializedFileReader::new(File::open(&path)?)?;
        assert_eq!(reader.metadata().file_metadata().num_rows(), 2);
        assert_eq!(reader.metadata().file_metadata().schema_descr().num_columns(), 3);
        Ok(())
    }

    #[test]
    fn test_write_csv_and_warnings() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("daily.csv");
        write_csv(&sample(), &csv_path)?;
        let text = fs::read_to_string(&csv_path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["date,target_rate,fx_yoy", "2023-05-01,11.25,-8.5", "2023-05-02,11.25,-8.25"]);

        let json_path = dir.path().join("warnings.json");
        write_warnings_json(
            &[DataWarning::ApproximatedData {
                source: SourceId::Wages,
                column: "Comercio".into(),
                longest_gap: 4,
            }],
            &json_path,
        )?;
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path)?)?;
        assert_eq!(parsed[0]["kind"], "approximated_data");
        assert_eq!(parsed[0]["column"], "Comercio");
        Ok(())
    }
}
