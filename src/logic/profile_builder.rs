use super::calculations::{
    drought_stress_days, heat_stress_days, mean, rainy_days, sample_std_dev, seasonal_rainfall,
    total_precipitation, KHARIF_MONTHS, RABI_MONTHS, RECENT_WINDOW_DAYS,
};
use crate::error::{AgroError, Result};
use crate::models::{
    FarmObservations, FarmProfile, NutrientStatus, PhStatus, SoilSurvey, VegetationHealth,
    VegetationObservation,
};

/// NDVI at or above this is a sensor artifact.
const NDVI_SENSOR_LIMIT: f64 = 1.0;

const DEFAULT_NDVI: f64 = 0.2;
const DEFAULT_EVI: f64 = 0.2;
const DEFAULT_LAI: f64 = 0.5;

const NEUTRAL_PH: f64 = 7.0;
const DEFAULT_TEXTURE: &str = "Loam";
const DEFAULT_CLAY_PCT: f64 = 30.0;
const DEFAULT_SAND_PCT: f64 = 40.0;
const DEFAULT_SILT_PCT: f64 = 30.0;
const DEFAULT_SOC: f64 = 1.5;
const DEFAULT_CEC: f64 = 15.0;

/// Convert a SoilGrids-style pH (possibly ×10 or ×100) to the 0-14 scale.
///
/// Missing or non-positive readings fall back to neutral.
pub fn fix_soil_ph(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        NEUTRAL_PH
    } else if raw > 100.0 {
        raw / 100.0
    } else if raw > 14.0 {
        raw / 10.0
    } else {
        raw
    }
}

/// USDA texture-triangle class for the given particle fractions (percent).
pub fn classify_texture(clay: f64, sand: f64, silt: f64) -> &'static str {
    let total = clay + sand + silt;
    let (clay, sand, silt) = if total > 0.0 {
        (clay / total * 100.0, sand / total * 100.0, silt / total * 100.0)
    } else {
        (clay, sand, silt)
    };

    if sand >= 85.0 {
        "Sand"
    } else if sand >= 70.0 && clay <= 15.0 {
        "Loamy Sand"
    } else if (sand >= 43.0 && clay <= 7.0) || (sand >= 52.0 && (7.0..=20.0).contains(&clay)) {
        "Sandy Loam"
    } else if (7.0..=27.0).contains(&clay) && (28.0..=50.0).contains(&silt) && sand <= 52.0 {
        "Loam"
    } else if silt >= 50.0 && (12.0..=27.0).contains(&clay) {
        "Silt Loam"
    } else if silt >= 80.0 && clay <= 12.0 {
        "Silt"
    } else if (20.0..=35.0).contains(&clay) && silt <= 28.0 && sand >= 45.0 {
        "Sandy Clay Loam"
    } else if (27.0..=40.0).contains(&clay) && (20.0..=45.0).contains(&sand) {
        "Clay Loam"
    } else if (27.0..=40.0).contains(&clay) && sand <= 20.0 {
        "Silty Clay Loam"
    } else if clay >= 35.0 && sand >= 45.0 {
        "Sandy Clay"
    } else if clay >= 40.0 && silt >= 40.0 {
        "Silty Clay"
    } else if clay >= 40.0 {
        "Clay"
    } else {
        "Loam"
    }
}

struct SoilSummary {
    ph: f64,
    clay_pct: f64,
    sand_pct: f64,
    silt_pct: f64,
    soc: f64,
    cec: f64,
    texture: String,
    nutrient_status: NutrientStatus,
}

impl Default for SoilSummary {
    fn default() -> Self {
        Self {
            ph: NEUTRAL_PH,
            clay_pct: DEFAULT_CLAY_PCT,
            sand_pct: DEFAULT_SAND_PCT,
            silt_pct: DEFAULT_SILT_PCT,
            soc: DEFAULT_SOC,
            cec: DEFAULT_CEC,
            texture: DEFAULT_TEXTURE.to_string(),
            nutrient_status: NutrientStatus::Moderate,
        }
    }
}

struct VegetationSummary {
    ndvi: f64,
    evi: f64,
    lai: f64,
}

/// Reduces one farm's raw observations to a [`FarmProfile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FarmProfileBuilder;

impl FarmProfileBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, obs: &FarmObservations) -> Result<FarmProfile> {
        let farm_id = obs.farm_id.as_str();

        if obs.weather.is_empty() {
            return Err(AgroError::profile(farm_id, "no weather data"));
        }
        if !obs.lat.is_finite() || !obs.lon.is_finite() {
            return Err(AgroError::profile(
                farm_id,
                format!("invalid coordinates ({}, {})", obs.lat, obs.lon),
            ));
        }
        if let Some(bad) = obs.weather.iter().find(|r| !r.is_well_formed()) {
            return Err(AgroError::profile(
                farm_id,
                format!("malformed weather row dated {}", bad.date),
            ));
        }

        let mut weather = obs.weather.clone();
        weather.sort_by_key(|r| r.date);

        let temps: Vec<f64> = weather.iter().map(|r| r.temp).collect();
        let avg_temp = mean(temps.iter().copied()).unwrap_or_default();
        let avg_humidity = mean(weather.iter().map(|r| r.humidity)).unwrap_or_default();

        let recent = &weather[weather.len().saturating_sub(RECENT_WINDOW_DAYS)..];
        let recent_rainfall = total_precipitation(recent);
        let recent_avg_temp = mean(recent.iter().map(|r| r.temp)).unwrap_or_default();
        let recent_avg_humidity = mean(recent.iter().map(|r| r.humidity)).unwrap_or_default();

        let vegetation = summarize_vegetation(farm_id, &obs.vegetation);
        let vegetation_health = VegetationHealth::from_ndvi(vegetation.ndvi);

        let soil = match &obs.soil {
            Some(survey) => summarize_soil(farm_id, survey)?,
            None => {
                tracing::debug!(farm_id, "No soil survey, using neutral soil defaults");
                SoilSummary::default()
            }
        };

        let profile = FarmProfile {
            farm_id: obs.farm_id.clone(),
            lat: obs.lat,
            lon: obs.lon,
            total_rainfall: total_precipitation(&weather),
            rainy_days: rainy_days(&weather),
            avg_temp,
            avg_humidity,
            kharif_rainfall: seasonal_rainfall(&weather, &KHARIF_MONTHS),
            rabi_rainfall: seasonal_rainfall(&weather, &RABI_MONTHS),
            ndvi_mean: vegetation.ndvi,
            evi_mean: vegetation.evi,
            lai_mean: vegetation.lai,
            vegetation_health,
            soil_ph: soil.ph,
            ph_status: PhStatus::from_ph(soil.ph),
            clay_pct: soil.clay_pct,
            sand_pct: soil.sand_pct,
            silt_pct: soil.silt_pct,
            soc: soil.soc,
            cec: soil.cec,
            texture: soil.texture,
            nutrient_status: soil.nutrient_status,
            heat_stress_days: heat_stress_days(&weather),
            drought_stress_days: drought_stress_days(&weather),
            temp_variability: sample_std_dev(&temps),
            recent_rainfall,
            recent_avg_temp,
            recent_avg_humidity,
        };

        tracing::debug!(
            farm_id,
            total_rainfall = profile.total_rainfall,
            avg_temp = profile.avg_temp,
            ndvi = profile.ndvi_mean,
            soil_ph = profile.soil_ph,
            "Farm profile built"
        );

        Ok(profile)
    }
}

fn summarize_vegetation(farm_id: &str, rows: &[VegetationObservation]) -> VegetationSummary {
    let veg_rows: Vec<&VegetationObservation> = rows.iter().filter(|r| r.is_vegetation()).collect();
    let valid: Vec<&VegetationObservation> = veg_rows
        .iter()
        .copied()
        .filter(|r| r.ndvi.is_finite() && r.ndvi < NDVI_SENSOR_LIMIT)
        .collect();

    let discarded = veg_rows.len() - valid.len();
    if discarded > 0 {
        tracing::warn!(farm_id, discarded, "Discarded vegetation rows with NDVI >= 1.0");
    }

    if valid.is_empty() {
        return VegetationSummary {
            ndvi: DEFAULT_NDVI,
            evi: DEFAULT_EVI,
            lai: DEFAULT_LAI,
        };
    }

    VegetationSummary {
        ndvi: mean(valid.iter().map(|r| r.ndvi)).unwrap_or(DEFAULT_NDVI),
        evi: mean(valid.iter().map(|r| r.evi)).unwrap_or(DEFAULT_EVI),
        lai: mean(valid.iter().map(|r| r.lai)).unwrap_or(DEFAULT_LAI),
    }
}

fn summarize_soil(farm_id: &str, survey: &SoilSurvey) -> Result<SoilSummary> {
    let malformed = |field: &str, value: f64| {
        AgroError::profile(
            farm_id,
            format!("malformed soil row: {} = {}", field, value),
        )
    };
    let non_negative = |field: &str, value: Option<f64>, default: f64| -> Result<f64> {
        match value {
            Some(v) if !v.is_finite() || v < 0.0 => Err(malformed(field, v)),
            Some(v) => Ok(v),
            None => Ok(default),
        }
    };

    let ph = match survey.ph_raw {
        Some(raw) => {
            let fixed = fix_soil_ph(raw);
            if raw > 14.0 {
                tracing::warn!(farm_id, raw_ph = raw, fixed_ph = fixed, "Rescaled soil pH");
            }
            fixed
        }
        None => NEUTRAL_PH,
    };

    let mut clay = non_negative("clay", survey.clay, DEFAULT_CLAY_PCT)?;
    let mut sand = non_negative("sand", survey.sand, DEFAULT_SAND_PCT)?;
    let mut silt = non_negative("silt", survey.silt, DEFAULT_SILT_PCT)?;
    // SoilGrids reports particle fractions in g/kg
    if clay.max(sand).max(silt) > 100.0 {
        clay /= 10.0;
        sand /= 10.0;
        silt /= 10.0;
    }

    let mut soc = non_negative("soc", survey.soc, DEFAULT_SOC)?;
    // dg/kg
    if soc > 100.0 {
        soc /= 100.0;
    }
    let cec = non_negative("cec", survey.cec, DEFAULT_CEC)?;

    let texture = survey
        .texture
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| classify_texture(clay, sand, silt).to_string());

    let nutrient_status = match survey.nutrient_status.as_deref() {
        Some(label) => NutrientStatus::from_str(label).unwrap_or_else(|| {
            tracing::warn!(farm_id, label, "Unknown nutrient status, classifying from SOC/CEC");
            NutrientStatus::from_soc_cec(soc, cec)
        }),
        None => NutrientStatus::from_soc_cec(soc, cec),
    };

    Ok(SoilSummary {
        ph,
        clay_pct: clay,
        sand_pct: sand,
        silt_pct: silt,
        soc,
        cec,
        texture,
        nutrient_status,
    })
}
