use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dataset::{self, StatsTable};
use crate::schema::SEASONS;
use crate::season_metrics::{self, METRIC_SPECS, Polarity};
use crate::state::SelectionState;

pub struct ExportReport {
    pub path: PathBuf,
    pub teams: usize,
    pub rows: usize,
}

pub fn default_export_path() -> PathBuf {
    let dir = std::env::var("SEASONWISE_EXPORT_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| ".".to_string());
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(dir).join(format!("season_comparison_{stamp}.xlsx"))
}

/// Write the current comparison to an xlsx workbook: every metric for both
/// selected teams and both seasons, regardless of the active category view,
/// plus a source-info sheet. Empty slots are skipped.
pub fn export_comparison(
    path: &Path,
    table: &StatsTable,
    selection: &SelectionState,
) -> Result<ExportReport> {
    let mut comparison_rows = vec![vec![
        "Team".to_string(),
        "League".to_string(),
        "Season".to_string(),
        "Category".to_string(),
        "Metric".to_string(),
        "Value".to_string(),
        "Delta".to_string(),
        "Polarity".to_string(),
    ]];

    let mut teams = 0usize;
    for slot in &selection.slots {
        let (Some(league), Some(team)) = (slot.league.as_deref(), slot.team.as_deref()) else {
            continue;
        };
        teams += 1;
        let mut prev = None;
        for season in SEASONS {
            let Some(rec) = table.get(team, season) else {
                prev = None;
                continue;
            };
            let snap = season_metrics::derive_snapshot(rec);
            let rows = season_metrics::all_metric_rows(rec, &snap, prev.as_ref());
            for (spec, row) in METRIC_SPECS.iter().zip(&rows) {
                comparison_rows.push(vec![
                    team.to_string(),
                    league.to_string(),
                    season.label().to_string(),
                    spec.category.label().to_string(),
                    row.label.to_string(),
                    row.value.clone(),
                    row.delta
                        .as_ref()
                        .map(|d| d.text.clone())
                        .unwrap_or_else(|| "-".to_string()),
                    polarity_label(row.polarity).to_string(),
                ]);
            }
            prev = Some(snap);
        }
    }

    let summary = table.summary();
    let source_rows = vec![
        vec![
            "Source File".to_string(),
            dataset::stats_file_path().display().to_string(),
        ],
        vec!["Rows Loaded".to_string(), summary.rows_loaded.to_string()],
        vec!["Rows Skipped".to_string(), summary.rows_skipped.to_string()],
        vec![
            "Exported At".to_string(),
            Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    ];

    let mut workbook = Workbook::new();
    let sheet = workbook
        .add_worksheet()
        .set_name("Comparison")
        .context("name comparison sheet")?;
    write_rows(sheet, &comparison_rows)?;
    let sheet = workbook
        .add_worksheet()
        .set_name("Source")
        .context("name source sheet")?;
    write_rows(sheet, &source_rows)?;
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        teams,
        rows: comparison_rows.len() - 1,
    })
}

fn polarity_label(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Normal => "normal",
        Polarity::Inverse => "inverse",
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
