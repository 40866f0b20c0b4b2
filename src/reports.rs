// ===== modelforge/src/reports.rs =====
use crate::model::Candidate;
use crate::tuner::Stage;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// Leaderboard of the run so far: ascending by loss, untrained candidates
/// last. Pure rendering; intended for driver progress output.
pub fn leaderboard_table(models: &[Candidate]) -> Table {
    let mut ranked: Vec<&Candidate> = models.iter().collect();
    ranked.sort_by(|a, b| {
        f64::total_cmp(
            &a.final_loss.unwrap_or(f64::INFINITY),
            &b.final_loss.unwrap_or(f64::INFINITY),
        )
    });

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Name", "Model", "Status", "Loss", "Train Time"]);

    for (rank, m) in ranked.iter().enumerate() {
        let loss = m
            .final_loss
            .map(|l| format!("{:.6}", l))
            .unwrap_or_else(|| "-".to_string());
        let train_time = m
            .train_time
            .map(|t| format!("{:.2}s", t))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(&m.name),
            Cell::new(m.model_type().to_string()),
            Cell::new(m.status.to_string()),
            Cell::new(loss).set_alignment(CellAlignment::Right),
            Cell::new(train_time).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// The planned stage sequence, one row per stage.
pub fn plan_table(stages: &[Stage]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_header(vec!["Step", "Stage"]);
    for (i, stage) in stages.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(stage.to_string()),
        ]);
    }
    table
}
