//! Setting value validation.
//!
//! The library accepts any threshold or weight; the CLI is stricter so a
//! typo in `.env` does not silently produce a blank page.

use mono_raster::FitMode;

/// Largest accepted output width or height in pixels.
pub const MAX_DIMENSION: i64 = 4096;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "RASTER_WIDTH" | "RASTER_HEIGHT" => validate_int_range(value, 1, MAX_DIMENSION)?,
        "RASTER_FIT_MODE" => {
            value.parse::<FitMode>().map_err(|e| e.to_string())?;
        }
        "RASTER_THRESHOLD" | "RASTER_QUANT_WEIGHT" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(0.0..=1.0).contains(&v) {
                return Err("must be between 0.0 and 1.0".into());
            }
        }
        "RASTER_PAD" => validate_int_range(value, 0, 255)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
