use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::DbPool;
use crate::features::Feature;
use crate::pipeline::Prediction;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PredictionRecord {
    pub prediction_id: Uuid,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub class_id: i64,
    /// `None` when the classifier produced an id outside the label table.
    pub predicted_crop: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn from_prediction(prediction: &Prediction, user_id: Option<Uuid>) -> Self {
        let features = &prediction.features;
        Self {
            prediction_id: Uuid::new_v4(),
            nitrogen: features.get(Feature::Nitrogen),
            phosphorus: features.get(Feature::Phosphorus),
            potassium: features.get(Feature::Potassium),
            temperature: features.get(Feature::Temperature),
            humidity: features.get(Feature::Humidity),
            ph: features.get(Feature::Ph),
            rainfall: features.get(Feature::Rainfall),
            class_id: prediction.class_id,
            predicted_crop: prediction.crop.map(str::to_string),
            user_id,
            created_at: Utc::now(),
        }
    }
}

pub async fn insert_prediction(pool: &DbPool, record: &PredictionRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO predictions (
            prediction_id,
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
            class_id,
            predicted_crop,
            user_id,
            created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(record.prediction_id)
    .bind(record.nitrogen)
    .bind(record.phosphorus)
    .bind(record.potassium)
    .bind(record.temperature)
    .bind(record.humidity)
    .bind(record.ph)
    .bind(record.rainfall)
    .bind(record.class_id)
    .bind(&record.predicted_crop)
    .bind(record.user_id)
    .bind(record.created_at)
    .execute(pool)
    .await
    .with_context(|| "failed to insert prediction")?;
    Ok(())
}

pub async fn recent_predictions(pool: &DbPool, limit: i64) -> Result<Vec<PredictionRecord>> {
    sqlx::query_as::<_, PredictionRecord>(
        r#"
        SELECT
            prediction_id,
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
            class_id,
            predicted_crop,
            user_id,
            created_at
        FROM predictions
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .with_context(|| "failed to load recent predictions")
}
