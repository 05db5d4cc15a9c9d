#![cfg_attr(not(feature = "std"), no_std)]

use boid_core::{BruteForce, FlockStats, Margins, Params, ParamsError, SearchError, Vector2D};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a 2D position in arena coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("arena must have a positive size (got {width}x{height})")]
    Arena { width: f32, height: f32 },
    #[cfg(feature = "std")]
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Boid simulation configuration as loaded from disk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub visual_range: f32,
    pub protected_range: f32,
    pub centering_factor: f32,
    pub matching_factor: f32,
    pub avoidfactor: f32,
    pub turnfactor: f32,
    pub minspeed: f32,
    pub maxspeed: f32,
    pub bias_increment: f32,
    pub maxbias: f32,
    pub initial_bias: f32,
    pub boid_count: usize,
    pub scout_right_count: usize,
    pub scout_left_count: usize,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 50.0,
            visual_range: 50.0,
            protected_range: 25.0,
            centering_factor: 0.005,
            matching_factor: 0.05,
            avoidfactor: 0.05,
            turnfactor: 1.0,
            minspeed: 2.0,
            maxspeed: 4.0,
            bias_increment: 0.00004,
            maxbias: 0.01,
            initial_bias: 0.001,
            boid_count: 100,
            scout_right_count: 10,
            scout_left_count: 10,
        }
    }
}

impl FlockSettings {
    pub fn params(&self) -> Result<Params, ParamsError> {
        Params {
            centering_factor: self.centering_factor,
            matching_factor: self.matching_factor,
            avoidfactor: self.avoidfactor,
            turnfactor: self.turnfactor,
            minspeed: self.minspeed,
            maxspeed: self.maxspeed,
            bias_increment: self.bias_increment,
            maxbias: self.maxbias,
            margins: Margins::inset(self.width, self.height, self.margin),
        }
        .validated()
    }

    pub fn search(&self) -> Result<BruteForce, SearchError> {
        BruteForce::new(self.visual_range, self.protected_range)
    }

    #[cfg(feature = "std")]
    pub fn layout(&self) -> boid_core::PopulationLayout {
        boid_core::PopulationLayout {
            boid_count: self.boid_count,
            scout_right_count: self.scout_right_count,
            scout_left_count: self.scout_left_count,
            width: self.width,
            height: self.height,
            initial_bias: self.initial_bias,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SettingsError::Arena {
                width: self.width,
                height: self.height,
            });
        }
        self.params()?;
        self.search()?;
        Ok(())
    }

    /// Parses and validates settings; missing fields take their defaults.
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Summary of one settled frame, emitted by the runner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub boid_count: usize,
    pub centroid: Position,
    pub mean_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub scout_right_bias: Option<f32>,
    pub scout_left_bias: Option<f32>,
}

impl FrameReport {
    pub fn new(frame: u64, stats: &FlockStats) -> Self {
        Self {
            frame,
            boid_count: stats.count,
            centroid: stats.centroid.into(),
            mean_speed: stats.mean_speed,
            min_speed: stats.min_speed,
            max_speed: stats.max_speed,
            scout_right_bias: stats.scout_right_bias,
            scout_left_bias: stats.scout_left_bias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = FlockSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.params().unwrap(), Params::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = FlockSettings::from_json(r#"{"boid_count": 12, "turnfactor": 0.2}"#).unwrap();
        assert_eq!(settings.boid_count, 12);
        assert_eq!(settings.turnfactor, 0.2);
        assert_eq!(settings.maxspeed, FlockSettings::default().maxspeed);
    }

    #[test]
    fn test_rejects_inverted_speeds() {
        let err = FlockSettings::from_json(r#"{"minspeed": 6.0, "maxspeed": 3.0}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Params(ParamsError::SpeedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let err = FlockSettings::from_json(r#"{"visual_range": 10.0, "protected_range": 20.0}"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Search(SearchError::Ranges { .. })));
    }

    #[test]
    fn test_rejects_empty_arena() {
        let err = FlockSettings::from_json(r#"{"width": 0.0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Arena { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            FlockSettings::from_json("{ boid_count: "),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_margins_from_settings() {
        let params = FlockSettings::default().params().unwrap();
        assert_eq!(params.margins, Margins::inset(800.0, 600.0, 50.0));
    }

    #[test]
    fn test_frame_report_serializes() {
        let stats = FlockStats {
            count: 3,
            centroid: Vector2D::new(1.0, 2.0),
            mean_speed: 3.0,
            min_speed: 2.0,
            max_speed: 4.0,
            scout_right_bias: Some(0.5),
            scout_left_bias: None,
        };

        let json = serde_json::to_string(&FrameReport::new(7, &stats)).unwrap();

        assert!(json.contains(r#""frame":7"#));
        assert!(json.contains(r#""centroid":{"x":1.0,"y":2.0}"#));
        assert!(json.contains(r#""scout_left_bias":null"#));
    }
}
