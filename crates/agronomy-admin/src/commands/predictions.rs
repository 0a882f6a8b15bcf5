use agronomy_core::db::predictions::{self, PredictionRecord};
use agronomy_core::db::DbPool;
use anyhow::{ensure, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

pub async fn show_recent(pool: &DbPool, limit: i64) -> Result<()> {
    ensure!(limit > 0, "--limit must be positive");
    let records = predictions::recent_predictions(pool, limit).await?;
    if records.is_empty() {
        println!("No predictions stored yet.");
        return Ok(());
    }
    println!("{}", predictions_table(&records));
    Ok(())
}

pub fn predictions_table(records: &[PredictionRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "When (UTC)", "Crop", "Class", "N", "P", "K", "Temp", "Humidity", "pH", "Rainfall", "User",
    ]);
    for record in records {
        table.add_row(vec![
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.predicted_crop.clone().unwrap_or_else(|| "-".to_string()),
            record.class_id.to_string(),
            record.nitrogen.to_string(),
            record.phosphorus.to_string(),
            record.potassium.to_string(),
            record.temperature.to_string(),
            record.humidity.to_string(),
            record.ph.to_string(),
            record.rainfall.to_string(),
            record
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "anonymous".to_string()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn unmapped_and_anonymous_rows_render_placeholders() {
        let record = PredictionRecord {
            prediction_id: Uuid::new_v4(),
            nitrogen: 90.0,
            phosphorus: 42.0,
            potassium: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
            class_id: 40,
            predicted_crop: None,
            user_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        };
        let rendered = predictions_table(&[record]).to_string();
        assert!(rendered.contains("2025-03-01 12:00:00"));
        assert!(rendered.contains("anonymous"));
        assert!(rendered.contains("202.9"));
    }
}
