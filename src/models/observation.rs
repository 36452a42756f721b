use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Record type discriminator for vegetation-index rows.
pub const VEGETATION_RECORD: &str = "vegetation";

/// One day of weather for a farm, as delivered by the weather fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    /// mm
    pub precip: f64,
    /// °C
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    /// %
    pub humidity: f64,
}

impl WeatherObservation {
    /// Finite values and no negative precipitation.
    pub fn is_well_formed(&self) -> bool {
        self.precip >= 0.0
            && [
                self.precip,
                self.temp,
                self.temp_max,
                self.temp_min,
                self.humidity,
            ]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationObservation {
    pub date: NaiveDate,
    #[serde(alias = "NDVI")]
    pub ndvi: f64,
    #[serde(alias = "EVI")]
    pub evi: f64,
    #[serde(alias = "LAI")]
    pub lai: f64,
    #[serde(alias = "data_type", default = "default_record_type")]
    pub record_type: String,
}

fn default_record_type() -> String {
    VEGETATION_RECORD.to_string()
}

impl VegetationObservation {
    pub fn is_vegetation(&self) -> bool {
        self.record_type == VEGETATION_RECORD
    }
}

/// Soil survey values for one farm. pH may be scaled by 10 or 100 and the
/// particle fractions may be g/kg or percent; classifications may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilSurvey {
    #[serde(alias = "phh2o_avg", default)]
    pub ph_raw: Option<f64>,
    #[serde(alias = "clay_pct_avg", default)]
    pub clay: Option<f64>,
    #[serde(alias = "sand_pct_avg", default)]
    pub sand: Option<f64>,
    #[serde(alias = "silt_pct_avg", default)]
    pub silt: Option<f64>,
    #[serde(alias = "soc_avg", default)]
    pub soc: Option<f64>,
    #[serde(alias = "cec_avg", default)]
    pub cec: Option<f64>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub nutrient_status: Option<String>,
    #[serde(default)]
    pub ph_status: Option<String>,
}

/// Everything the collaborators deliver for one farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmObservations {
    pub farm_id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub weather: Vec<WeatherObservation>,
    #[serde(default)]
    pub vegetation: Vec<VegetationObservation>,
    #[serde(default)]
    pub soil: Option<SoilSurvey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegetation_record_accepts_source_column_names() {
        let row: VegetationObservation = serde_json::from_str(
            r#"{"date":"2024-07-01","NDVI":0.55,"EVI":0.41,"LAI":2.1,"data_type":"vegetation"}"#,
        )
        .unwrap();
        assert!(row.is_vegetation());
        assert!((row.ndvi - 0.55).abs() < 1e-12);

        let moisture: VegetationObservation = serde_json::from_str(
            r#"{"date":"2024-07-01","ndvi":0.0,"evi":0.0,"lai":0.0,"record_type":"soil_moisture"}"#,
        )
        .unwrap();
        assert!(!moisture.is_vegetation());
    }

    #[test]
    fn soil_survey_fields_are_optional() {
        let soil: SoilSurvey = serde_json::from_str(r#"{"phh2o_avg": 69.0}"#).unwrap();
        assert_eq!(soil.ph_raw, Some(69.0));
        assert!(soil.texture.is_none());
        assert!(soil.clay.is_none());
    }

    #[test]
    fn weather_row_well_formed() {
        let mut row = WeatherObservation {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            precip: 3.2,
            temp: 28.0,
            temp_max: 33.0,
            temp_min: 24.0,
            humidity: 70.0,
        };
        assert!(row.is_well_formed());
        row.precip = f64::NAN;
        assert!(!row.is_well_formed());
        row.precip = -0.5;
        assert!(!row.is_well_formed());
        row.precip = 0.0;
        assert!(row.is_well_formed());
    }
}
