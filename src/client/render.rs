//! Plain-text rendering of the upload preview and the scoring results.

use crate::{
    model::FEATURE_NAMES,
    scoring::{CsvTable, PredictionReport, Statistics},
};
use serde_json::Value;
use std::fmt::Write;

const CHART_WIDTH: usize = 40;
const GENUINE_MARK: char = '█';
const COUNTERFEIT_MARK: char = '░';

pub fn render_preview(table: &CsvTable, rows: usize) -> String {
    let mut out = String::from("Aperçu des données envoyées :\n");
    out.push_str(&render_table(&table.headers, table.head(rows)));
    if table.len() > rows {
        let _ = writeln!(out, "… {} lignes au total", table.len());
    }
    out
}

/// Aligns `rows` under `headers`, one line per row.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

/// Input columns first, then pass-through columns, then the model outputs.
pub fn prediction_columns(report: &PredictionReport) -> Vec<String> {
    let mut columns: Vec<String> = FEATURE_NAMES.iter().map(|c| c.to_string()).collect();
    for record in &report.table_predictions {
        for key in record.extra.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns.extend(["prediction", "probability", "result_text"].map(String::from));
    columns
}

pub fn render_predictions(report: &PredictionReport) -> String {
    let columns = prediction_columns(report);
    let rows: Vec<Vec<String>> = report
        .table_predictions
        .iter()
        .map(|record| {
            let value = serde_json::to_value(record).unwrap_or(Value::Null);
            columns
                .iter()
                .map(|column| display_value(value.get(column)))
                .collect()
        })
        .collect();

    let mut out = String::from("Table de prédictions\n");
    out.push_str(&render_table(&columns, &rows));
    out
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn render_statistics(stats: &Statistics) -> String {
    format!(
        "Statistiques globales\n\
         - Total d'entrées : {}\n\
         - Nombre de vrais billets : {} ({:?}%)\n\
         - Nombre de faux billets : {} ({:?}%)\n",
        stats.total, stats.vrais, stats.pourcentage_vrais, stats.faux, stats.pourcentage_faux
    )
}

/// Two-slice proportion chart of genuine vs counterfeit counts.
pub fn render_chart(stats: &Statistics) -> String {
    let mut out = String::from("Répartition des vrais / faux billets\n");
    if stats.total == 0 {
        out.push_str("(aucune donnée)\n");
        return out;
    }

    let genuine_width =
        ((stats.vrais as f64 / stats.total as f64) * CHART_WIDTH as f64).round() as usize;
    let counterfeit_width = CHART_WIDTH - genuine_width;

    let _ = writeln!(
        out,
        "[{}{}]",
        GENUINE_MARK.to_string().repeat(genuine_width),
        COUNTERFEIT_MARK.to_string().repeat(counterfeit_width)
    );
    let _ = writeln!(
        out,
        "{GENUINE_MARK} Vrais billets : {} ({:?}%)",
        stats.vrais, stats.pourcentage_vrais
    );
    let _ = writeln!(
        out,
        "{COUNTERFEIT_MARK} Faux billets : {} ({:?}%)",
        stats.faux, stats.pourcentage_faux
    );
    out
}

pub fn render_report(report: &PredictionReport) -> String {
    format!(
        "{}\n{}\n{}",
        render_predictions(report),
        render_statistics(&report.statistiques),
        render_chart(&report.statistiques)
    )
}
