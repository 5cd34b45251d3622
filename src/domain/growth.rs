//! BMI computation and nutrition status classification.
//!
//! Thresholds are fixed pediatric screening bands; `age_months` and
//! `gender` are accepted so the signature is ready for age/sex-specific
//! curves, but do not currently influence the result.

use crate::api::models::children::Gender;
use crate::db::models::alerts::AlertType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Nutrition status bands derived from BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "nutrition_status", rename_all = "lowercase")]
pub enum NutritionStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl std::fmt::Display for NutritionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NutritionStatus::Underweight => write!(f, "underweight"),
            NutritionStatus::Normal => write!(f, "normal"),
            NutritionStatus::Overweight => write!(f, "overweight"),
            NutritionStatus::Obese => write!(f, "obese"),
        }
    }
}

/// Compute BMI as weight (kg) over height (m) squared, rounded to the
/// nearest two decimal places of the f64 quotient. A non-positive
/// height yields the 0.0 sentinel rather than a division error;
/// callers validate height before persisting, so the sentinel only
/// guards arithmetic.
pub fn bmi(weight_kg: f64, height_m: f64) -> f64 {
    if height_m <= 0.0 {
        return 0.0;
    }
    let raw = weight_kg / (height_m * height_m);
    (raw * 100.0).round() / 100.0
}

/// Classify an already-computed BMI into a nutrition status band.
///
/// Bands: below 14 underweight, 14 to below 18 normal, 18 to below 20
/// overweight, 20 and above obese. Boundary values land in the upper
/// band.
#[allow(unused_variables)]
pub fn classify(bmi: f64, age_months: Option<i32>, gender: Option<Gender>) -> NutritionStatus {
    if bmi < 14.0 {
        NutritionStatus::Underweight
    } else if bmi < 18.0 {
        NutritionStatus::Normal
    } else if bmi < 20.0 {
        NutritionStatus::Overweight
    } else {
        NutritionStatus::Obese
    }
}

/// Alert recommendation produced from a nutrition status.
pub struct AlertRecommendation {
    pub alert_type: AlertType,
    pub message: &'static str,
}

/// Decide whether a nutrition status warrants raising an alert.
/// Normal produces nothing; overweight and obese share a single alert
/// type and message.
pub fn alert_for(status: NutritionStatus) -> Option<AlertRecommendation> {
    match status {
        NutritionStatus::Underweight => Some(AlertRecommendation {
            alert_type: AlertType::Underweight,
            message: "Child is underweight. Nutritional assessment recommended.",
        }),
        NutritionStatus::Overweight | NutritionStatus::Obese => Some(AlertRecommendation {
            alert_type: AlertType::Overweight,
            message: "Child is overweight. Dietary consultation recommended.",
        }),
        NutritionStatus::Normal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_basic() {
        // 10 / 0.8^2 computes to just under 15.625 in f64, so
        // two-place rounding lands on 15.62.
        assert_eq!(bmi(10.0, 0.8), 15.62);
        assert_eq!(bmi(16.0, 1.0), 16.0);
    }

    #[test]
    fn test_bmi_rounds_to_two_places() {
        // 12.3 / (0.87^2) = 16.2505... => 16.25
        assert_eq!(bmi(12.3, 0.87), 16.25);
    }

    #[test]
    fn test_bmi_zero_or_negative_height_sentinel() {
        assert_eq!(bmi(10.0, 0.0), 0.0);
        assert_eq!(bmi(10.0, -0.5), 0.0);
    }

    #[test]
    fn test_classify_band_boundaries() {
        assert_eq!(classify(13.9, None, None), NutritionStatus::Underweight);
        assert_eq!(classify(14.0, None, None), NutritionStatus::Normal);
        assert_eq!(classify(17.9, None, None), NutritionStatus::Normal);
        assert_eq!(classify(18.0, None, None), NutritionStatus::Overweight);
        assert_eq!(classify(19.9, None, None), NutritionStatus::Overweight);
        assert_eq!(classify(20.0, None, None), NutritionStatus::Obese);
        assert_eq!(classify(35.0, None, None), NutritionStatus::Obese);
    }

    #[test]
    fn test_sentinel_bmi_classifies_underweight() {
        assert_eq!(classify(bmi(10.0, 0.0), None, None), NutritionStatus::Underweight);
    }

    #[test]
    fn test_age_and_gender_do_not_shift_bands() {
        assert_eq!(
            classify(16.0, Some(24), Some(Gender::Male)),
            classify(16.0, None, None)
        );
        assert_eq!(
            classify(19.0, Some(6), Some(Gender::Female)),
            classify(19.0, Some(60), None)
        );
    }

    #[test]
    fn test_alert_for_underweight() {
        let rec = alert_for(NutritionStatus::Underweight).unwrap();
        assert_eq!(rec.alert_type, AlertType::Underweight);
        assert_eq!(
            rec.message,
            "Child is underweight. Nutritional assessment recommended."
        );
    }

    #[test]
    fn test_alert_for_overweight_and_obese_share_type() {
        let over = alert_for(NutritionStatus::Overweight).unwrap();
        let obese = alert_for(NutritionStatus::Obese).unwrap();
        assert_eq!(over.alert_type, AlertType::Overweight);
        assert_eq!(obese.alert_type, AlertType::Overweight);
        assert_eq!(
            over.message,
            "Child is overweight. Dietary consultation recommended."
        );
        assert_eq!(over.message, obese.message);
    }

    #[test]
    fn test_alert_for_normal_is_none() {
        assert!(alert_for(NutritionStatus::Normal).is_none());
    }
}
