use std::collections::HashSet;

use crate::errors::ModelError;

/// Index of the largest score; the first index wins a tie.
pub(crate) fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores.iter().copied().enumerate() {
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

pub(crate) fn validate_classes(artifact: &'static str, classes: &[i64]) -> Result<(), ModelError> {
    if classes.is_empty() {
        return Err(ModelError::invalid(artifact, "class list is empty"));
    }
    let mut seen = HashSet::with_capacity(classes.len());
    for class in classes {
        if !seen.insert(*class) {
            return Err(ModelError::invalid(
                artifact,
                format!("class {class} is listed more than once"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_matrix(
    artifact: &'static str,
    label: &str,
    rows: &[Vec<f64>],
    expected_rows: usize,
) -> Result<usize, ModelError> {
    if rows.len() != expected_rows {
        return Err(ModelError::invalid(
            artifact,
            format!("expected {expected_rows} {label} rows, found {}", rows.len()),
        ));
    }
    let width = rows.first().map(Vec::len).unwrap_or_default();
    if width == 0 {
        return Err(ModelError::invalid(artifact, format!("{label} rows are empty")));
    }
    for (index, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(ModelError::invalid(
                artifact,
                format!("{label} row {index} has {} values, expected {width}", row.len()),
            ));
        }
        if row.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::invalid(
                artifact,
                format!("{label} row {index} contains a non-finite value"),
            ));
        }
    }
    Ok(width)
}
