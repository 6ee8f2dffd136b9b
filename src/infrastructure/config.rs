use crate::infrastructure::error::EngineError;
use chrono_tz::Tz;
use std::fs;
use std::path::Path;

const SCHEDULING_JSON: &str = "scheduling.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub timezone: Tz,
    pub lead_time_minutes: u32,
    pub slot_granularity_minutes: u32,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub staff_column_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            lead_time_minutes: 30,
            slot_granularity_minutes: 30,
            day_start_hour: 8,
            day_end_hour: 20,
            staff_column_limit: 4,
        }
    }
}

pub fn ensure_default_configs(config_dir: &Path) -> Result<(), EngineError> {
    let path = config_dir.join(SCHEDULING_JSON);
    if !path.exists() {
        let defaults = serde_json::json!({
            "schema": 1,
            "timezone": "UTC",
            "leadTimeMinutes": 30,
            "slotGranularityMinutes": 30,
            "dayWindow": { "startHour": 8, "endHour": 20 },
            "staffColumnLimit": 4
        });
        let formatted = serde_json::to_string_pretty(&defaults)?;
        fs::write(path, format!("{formatted}\n"))?;
    }
    Ok(())
}

pub fn load_engine_config(config_dir: &Path) -> EngineConfig {
    let mut config = EngineConfig::default();
    let path = config_dir.join(SCHEDULING_JSON);
    let Ok(raw) = fs::read_to_string(&path) else {
        return config;
    };
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&raw) else {
        log::warn!("malformed {}, using defaults", path.display());
        return config;
    };
    if parsed.get("schema").and_then(serde_json::Value::as_u64) != Some(1) {
        log::warn!("unsupported schema in {}, using defaults", path.display());
        return config;
    }

    if let Some(timezone) = parsed
        .get("timezone")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        match timezone.parse::<Tz>() {
            Ok(tz) => config.timezone = tz,
            Err(_) => log::warn!("unknown timezone '{timezone}', keeping {}", config.timezone),
        }
    }
    if let Some(value) = parsed
        .get("leadTimeMinutes")
        .and_then(serde_json::Value::as_u64)
    {
        config.lead_time_minutes = value as u32;
    }
    if let Some(value) = parsed
        .get("slotGranularityMinutes")
        .and_then(serde_json::Value::as_u64)
    {
        config.slot_granularity_minutes = (value as u32).max(1);
    }
    if let Some(day_window) = parsed.get("dayWindow") {
        if let Some(value) = day_window
            .get("startHour")
            .and_then(serde_json::Value::as_u64)
        {
            config.day_start_hour = (value as u32).min(23);
        }
        if let Some(value) = day_window.get("endHour").and_then(serde_json::Value::as_u64) {
            config.day_end_hour = (value as u32).min(24);
        }
    }
    if config.day_end_hour <= config.day_start_hour {
        let defaults = EngineConfig::default();
        config.day_start_hour = defaults.day_start_hour;
        config.day_end_hour = defaults.day_end_hour;
    }
    if let Some(value) = parsed
        .get("staffColumnLimit")
        .and_then(serde_json::Value::as_u64)
    {
        config.staff_column_limit = (value as usize).max(1);
    }

    config
}
