use crate::{
    Error, Result,
    model::{FEATURE_COUNT, FEATURE_NAMES},
};
use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use std::collections::HashMap;

/// A decoded CSV upload: header row plus string cells, row order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::malformed(format!("file is not valid UTF-8: {e}")))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // headers are kept verbatim, column names must match exactly
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Fields)
            .from_reader(text.as_bytes());

        let headers = dedupe_headers(
            reader
                .headers()
                .map_err(|e| Error::malformed(format!("cannot read CSV header: {e}")))?
                .iter()
                .map(str::to_string),
        );
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(Error::malformed("CSV file has no header row"));
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::malformed(format!("cannot read CSV row {}: {e}", index + 1))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Positions of the model's input columns, in feature order.
    pub fn feature_indices(&self) -> Result<[usize; FEATURE_COUNT]> {
        let mut indices = [0usize; FEATURE_COUNT];
        let mut missing = Vec::new();
        for (slot, name) in indices.iter_mut().zip(FEATURE_NAMES) {
            match self.column_index(name) {
                Some(index) => *slot = index,
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                missing,
                required: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            });
        }
        Ok(indices)
    }
}

/// Renames repeated header names to `name.1`, `name.2`, ... so every column
/// keeps its own key. A generated name that is already taken gets its own
/// suffix in turn (`a, a, a.1` becomes `a, a.1, a.1.1`).
fn dedupe_headers(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    names
        .map(|mut name| {
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}

/// Converts a pass-through cell to JSON: numbers stay numbers, empty cells
/// become null, anything else is kept as text.
pub fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return Value::from(int);
    }
    match cell.parse::<f64>() {
        Ok(float) if float.is_finite() => Value::from(float),
        _ => Value::String(cell.to_string()),
    }
}
