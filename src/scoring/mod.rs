//! Turns an uploaded CSV into scored records and batch statistics.

mod table;
mod types;

pub use table::{CsvTable, cell_value};
pub use types::{InputRecord, PredictionReport, ScoredRecord, Statistics};

use crate::{
    Error, Result,
    model::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, GENUINE, Scorer},
};
use serde_json::Map;
use tracing::debug;

/// Output columns; uploaded columns with these names are not passed through.
const OUTPUT_COLUMNS: [&str; 3] = ["prediction", "probability", "result_text"];

/// Scores every row of `bytes` (a CSV with a header row). The batch either
/// fully succeeds or fails as a whole.
pub fn score_csv(bytes: &[u8], scorer: &Scorer) -> Result<PredictionReport> {
    let table = CsvTable::parse(bytes)?;
    let feature_indices = table.feature_indices()?;
    let passthrough = passthrough_columns(&table, &feature_indices);

    debug!(
        "Scoring {} rows ({} pass-through columns)",
        table.len(),
        passthrough.len()
    );

    let mut records = Vec::with_capacity(table.len());
    for (row_index, row) in table.rows.iter().enumerate() {
        let features = parse_features(row, &feature_indices, row_index)?;
        let classification = scorer.score(&features)?;

        let mut extra = Map::new();
        for &column in &passthrough {
            extra.insert(table.headers[column].clone(), cell_value(&row[column]));
        }

        records.push(scored_record(
            InputRecord::from_features(features),
            classification.label,
            classification.probability,
            extra,
        ));
    }

    let statistiques = Statistics::from_records(&records);
    Ok(PredictionReport {
        table_predictions: records,
        statistiques,
    })
}

fn passthrough_columns(table: &CsvTable, feature_indices: &[usize; FEATURE_COUNT]) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .filter(|(index, name)| {
            !feature_indices.contains(index)
                && !FEATURE_NAMES.contains(&name.as_str())
                && !OUTPUT_COLUMNS.contains(&name.as_str())
        })
        .map(|(index, _)| index)
        .collect()
}

fn parse_features(
    row: &[String],
    feature_indices: &[usize; FEATURE_COUNT],
    row_index: usize,
) -> Result<FeatureVector> {
    let mut features = [0.0; FEATURE_COUNT];
    for ((slot, &column), name) in features.iter_mut().zip(feature_indices).zip(FEATURE_NAMES) {
        let cell = &row[column];
        *slot = match cell.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                return Err(Error::malformed(format!(
                    "row {}, column '{name}': invalid number '{cell}'",
                    row_index + 1
                )));
            }
        };
    }
    Ok(features)
}

/// Builds the scored record for one row from the classifier's label and
/// genuine-class probability (in `[0, 1]`).
pub fn scored_record(
    input: InputRecord,
    label: u8,
    genuine_probability: f64,
    extra: Map<String, serde_json::Value>,
) -> ScoredRecord {
    let probability = round2(genuine_probability * 100.0);
    ScoredRecord {
        input,
        prediction: label,
        probability,
        result_text: result_text(label, probability),
        extra,
    }
}

/// `"Vrai à P%"` for genuine notes, `"Faux à (100-P)%"` otherwise.
pub fn result_text(label: u8, probability: f64) -> String {
    if label == GENUINE {
        format!("Vrai à {}%", format_percent(probability))
    } else {
        format!("Faux à {}%", format_percent(round2(100.0 - probability)))
    }
}

/// Rounds half to even at two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Shortest round-trip form, always with a decimal part (`92.0`, `7.65`).
fn format_percent(value: f64) -> String {
    format!("{value:?}")
}

impl Statistics {
    pub fn from_records(records: &[ScoredRecord]) -> Self {
        let total = records.len();
        let vrais = records.iter().filter(|r| r.prediction == GENUINE).count();
        let faux = total - vrais;

        Self {
            total,
            vrais,
            faux,
            pourcentage_vrais: percent_of(vrais, total),
            pourcentage_faux: percent_of(faux, total),
        }
    }
}

/// Share of `count` in `total` as a percentage at two decimals, `0.0` for an
/// empty batch.
///
/// For a ratio of two counts the scaled half-to-even rounding of [`round2`]
/// agrees with correctly rounding the exact binary value, so no decimal
/// conversion is needed here.
pub fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}
