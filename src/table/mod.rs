// src/table/mod.rs
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use serde_json::Value;

use crate::fetch::Record;

/// Union of field names across all records, in first-seen order.
/// A record missing one of these keys renders as an empty cell in its row.
pub fn column_union(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Render one JSON value as a CSV cell.
/// Strings are written verbatim, nulls as empty cells, everything else as its
/// JSON text (nested structures come out as compact JSON).
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write `records` as a CSV table at `path`.
///
/// The first column is a numeric row index starting at 0 under an empty
/// header cell; the remaining header cells are the column union. Row order
/// equals record order. Returns the number of data rows written.
pub fn write_csv(records: &[Record], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let columns = column_union(records);

    let mut wtr =
        Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(String::new());
    header.extend(columns.iter().cloned());
    wtr.write_record(&header)
        .with_context(|| format!("writing header to {}", path.display()))?;

    for (idx, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(idx.to_string());
        for col in &columns {
            row.push(record.get(col).map(cell_text).unwrap_or_default());
        }
        wtr.write_record(&row)
            .with_context(|| format!("writing row {} to {}", idx, path.display()))?;
    }

    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn records(json: &str) -> Vec<Record> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn column_union_preserves_first_seen_order() {
        let rows = records(r#"[{"b":1,"a":2},{"c":3,"a":4}]"#);
        // serde_json::Map keeps key insertion order within a record
        assert_eq!(column_union(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn cells_render_strings_verbatim_and_nulls_empty() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&serde_json::json!("Ghana")), "Ghana");
        assert_eq!(cell_text(&serde_json::json!(7)), "7");
        assert_eq!(cell_text(&serde_json::json!(true)), "true");
        assert_eq!(cell_text(&serde_json::json!({"k":"v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn writes_indexed_rows_with_missing_keys_as_empty_cells() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Countries.csv");
        let rows = records(r#"[{"a":1},{"a":2},{"a":3,"b":"x"}]"#);

        write_csv(&rows, &path)?;

        let out = fs::read_to_string(&path)?;
        assert_eq!(out, ",a,b\n0,1,\n1,2,\n2,3,x\n");
        Ok(())
    }

    #[test]
    fn paginated_scenario_produces_three_rows_in_order() -> Result<()> {
        // pages [{"a":1},{"a":2}] then [{"a":3}] concatenated upstream
        let dir = tempdir()?;
        let path = dir.path().join("Statistics.csv");
        let rows = records(r#"[{"a":1},{"a":2},{"a":3}]"#);

        let written = write_csv(&rows, &path)?;

        assert_eq!(written, 3);
        let out = fs::read_to_string(&path)?;
        assert_eq!(out, ",a\n0,1\n1,2\n2,3\n");
        Ok(())
    }

    #[test]
    fn empty_dataset_writes_header_only() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Mechanisms.csv");

        let written = write_csv(&[], &path)?;

        assert_eq!(written, 0);
        let out = fs::read_to_string(&path)?;
        assert_eq!(out.lines().count(), 1);
        Ok(())
    }

    #[test]
    fn embedded_commas_and_quotes_are_quoted() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Assessments.csv");
        let rows = records(r#"[{"note":"mining, informal","src":"\"ILO\""}]"#);

        write_csv(&rows, &path)?;

        let out = fs::read_to_string(&path)?;
        assert_eq!(out, ",note,src\n0,\"mining, informal\",\"\"\"ILO\"\"\"\n");
        Ok(())
    }

    #[test]
    fn rerun_on_identical_records_is_byte_identical() -> Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let rows = records(r#"[{"a":1,"b":"x"},{"b":"y"}]"#);

        write_csv(&rows, &first)?;
        write_csv(&rows, &second)?;

        assert_eq!(fs::read(&first)?, fs::read(&second)?);
        Ok(())
    }
}
