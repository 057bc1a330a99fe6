//! Charts of a trained model's results.

use super::chart::{ChartKind, ChartSpec, ReferenceLine};
use crate::error::{PipelineError, Result};
use agri_learning::ModelResults;
use polars::prelude::*;

pub const FEATURE_IMPORTANCE_CHART: &str = "feature_Importance";
pub const ACTUAL_VS_PREDICTED_CHART: &str = "actual_vs_predicted";

/// Bar chart of feature importances, most important first.
pub fn feature_importance_chart(results: &ModelResults) -> Result<ChartSpec> {
    let mut ranked = results.feature_importance.clone();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (features, weights): (Vec<String>, Vec<f64>) = ranked.into_iter().unzip();

    let df = df!("Feature" => features, "Importance" => weights)?;
    ChartSpec::from_frame(
        FEATURE_IMPORTANCE_CHART,
        ChartKind::Bar,
        "Feature Importance",
        "Feature",
        "Importance",
        &df,
    )
}

/// Scatter of test targets against predictions with a `y = x` line spanning
/// the observed range.
pub fn actual_vs_predicted_chart(results: &ModelResults) -> Result<ChartSpec> {
    if results.y_test.is_empty() || results.y_test.len() != results.y_pred.len() {
        return Err(PipelineError::ReportGenerationFailed(format!(
            "Cannot plot {} prediction(s) against {} actual value(s)",
            results.y_pred.len(),
            results.y_test.len()
        )));
    }

    let min = results.y_test.iter().copied().fold(f64::INFINITY, f64::min);
    let max = results.y_test.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let df = df!(
        "Actual" => results.y_test.clone(),
        "Predicted" => results.y_pred.clone()
    )?;
    Ok(ChartSpec::from_frame(
        ACTUAL_VS_PREDICTED_CHART,
        ChartKind::Scatter,
        "Actual vs Predicted",
        "Actual",
        "Predicted",
        &df,
    )?
    .with_reference_line(ReferenceLine {
        x0: min,
        y0: min,
        x1: max,
        y1: max,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_learning::FeatureMatrix;
    use serde_json::json;

    fn results(y_test: Vec<f64>, y_pred: Vec<f64>) -> ModelResults {
        let empty = FeatureMatrix {
            feature_names: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            rows: Vec::new(),
        };
        ModelResults {
            x_train: empty.clone(),
            x_test: empty,
            y_train: Vec::new(),
            y_test,
            y_pred,
            feature_importance: vec![
                ("a".to_string(), 0.2),
                ("b".to_string(), 0.5),
                ("c".to_string(), 0.3),
            ],
            train_indices: Vec::new(),
            test_indices: Vec::new(),
        }
    }

    #[test]
    fn test_importances_sorted_descending() {
        let chart = feature_importance_chart(&results(vec![1.0], vec![1.0])).unwrap();
        assert_eq!(chart.name, "feature_Importance");
        assert_eq!(
            chart.column_values("Feature").unwrap(),
            vec![&json!("b"), &json!("c"), &json!("a")]
        );
    }

    #[test]
    fn test_reference_line_spans_actuals() {
        let chart = actual_vs_predicted_chart(&results(vec![3.0, 1.0, 7.0], vec![2.0, 2.0, 6.0]))
            .unwrap();
        assert_eq!(
            chart.reference_line,
            Some(ReferenceLine {
                x0: 1.0,
                y0: 1.0,
                x1: 7.0,
                y1: 7.0
            })
        );
        assert_eq!(chart.rows.len(), 3);
    }

    #[test]
    fn test_empty_predictions_rejected() {
        let err = actual_vs_predicted_chart(&results(vec![], vec![])).unwrap_err();
        assert_eq!(err.error_code(), "REPORT_GENERATION_FAILED");
    }
}
