//! Runtime rasterization settings loaded from the environment.

use mono_raster::{FitMode, Letterbox, RasterOptions};
use tracing::warn;

use super::validation::validate_setting;

/// Settings the CLI feeds into [`RasterOptions`].
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    pub mode: FitMode,
    pub threshold: f32,
    pub quant_weight: f32,
    pub pad: u8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        let opts = RasterOptions::default();
        Self {
            width: opts.width,
            height: opts.height,
            mode: opts.resize.mode,
            threshold: opts.threshold,
            quant_weight: opts.quant_weight,
            pad: u8::MAX,
        }
    }
}

impl RasterConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or invalid values.
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let g = |key: &str| -> Option<String> {
            let value = lookup(key).filter(|v| !v.is_empty())?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(e) => {
                    warn!(key, value = %value, "Ignoring invalid setting: {e}");
                    None
                }
            }
        };

        Self {
            width: parse_or(g("RASTER_WIDTH"), defaults.width),
            height: parse_or(g("RASTER_HEIGHT"), defaults.height),
            mode: parse_or(g("RASTER_FIT_MODE"), defaults.mode),
            threshold: parse_or(g("RASTER_THRESHOLD"), defaults.threshold),
            quant_weight: parse_or(g("RASTER_QUANT_WEIGHT"), defaults.quant_weight),
            pad: parse_or(g("RASTER_PAD"), defaults.pad),
        }
    }

    /// Check every value against the same rules used for the environment.
    pub fn validate(&self) -> Result<(), String> {
        let entries = [
            ("RASTER_WIDTH", self.width.to_string()),
            ("RASTER_HEIGHT", self.height.to_string()),
            ("RASTER_FIT_MODE", self.mode.to_string()),
            ("RASTER_THRESHOLD", self.threshold.to_string()),
            ("RASTER_QUANT_WEIGHT", self.quant_weight.to_string()),
            ("RASTER_PAD", self.pad.to_string()),
        ];
        for (key, value) in &entries {
            validate_setting(key, value).map_err(|e| format!("{key}={value}: {e}"))?;
        }
        Ok(())
    }

    pub fn to_options(&self) -> RasterOptions {
        RasterOptions::new()
            .with_size(self.width, self.height)
            .with_mode(self.mode)
            .with_letterbox(Letterbox::Pad(self.pad))
            .with_threshold(self.threshold)
            .with_quant_weight(self.quant_weight)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = RasterConfig::load_from(lookup_in(&[]));
        assert_eq!(config, RasterConfig::default());
        assert_eq!(config.width, 384);
        assert_eq!(config.mode, FitMode::Fill);
    }

    #[test]
    fn test_environment_overrides() {
        let config = RasterConfig::load_from(lookup_in(&[
            ("RASTER_WIDTH", "576"),
            ("RASTER_HEIGHT", "800"),
            ("RASTER_FIT_MODE", "fit"),
            ("RASTER_THRESHOLD", "0.4"),
            ("RASTER_QUANT_WEIGHT", "0.2"),
            ("RASTER_PAD", "0"),
        ]));
        assert_eq!(config.width, 576);
        assert_eq!(config.height, 800);
        assert_eq!(config.mode, FitMode::Fit);
        assert!((config.threshold - 0.4).abs() < f32::EPSILON);
        assert!((config.quant_weight - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.pad, 0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RasterConfig::load_from(lookup_in(&[
            ("RASTER_WIDTH", "0"),
            ("RASTER_FIT_MODE", "zoom"),
            ("RASTER_THRESHOLD", "3"),
            ("RASTER_HEIGHT", ""),
        ]));
        assert_eq!(config, RasterConfig::default());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = RasterConfig::default();
        assert!(config.validate().is_ok());

        config.threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("RASTER_THRESHOLD=1.5"), "{err}");
    }

    #[test]
    fn test_to_options_carries_values() {
        let config = RasterConfig {
            width: 100,
            height: 50,
            mode: FitMode::Stretch,
            threshold: 0.3,
            quant_weight: 0.1,
            pad: 9,
        };
        let opts = config.to_options();
        assert_eq!((opts.width, opts.height), (100, 50));
        assert_eq!(opts.resize.mode, FitMode::Stretch);
        assert_eq!(opts.resize.letterbox, Letterbox::Pad(9));
        assert!((opts.threshold - 0.3).abs() < f32::EPSILON);
        assert!((opts.quant_weight - 0.1).abs() < f32::EPSILON);
    }
}
