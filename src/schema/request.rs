//! Export request parameters.

use serde::{Deserialize, Serialize};

use super::RenderSettings;

/// Lowest frame number accepted for export.
pub const MIN_FRAME: i32 = 1;

/// Highest frame number accepted for export.
pub const MAX_FRAME: i32 = 300_000;

/// Upper bound for the world scale written into the header.
pub const MAX_WORLD_SCALE: f32 = 1000.0;

fn default_frame_start() -> i32 {
    1
}

fn default_frame_end() -> i32 {
    250
}

fn default_world_scale() -> f32 {
    1.0
}

fn default_only_selected() -> bool {
    true
}

/// Parameters of a single export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// First exported frame (inclusive).
    #[serde(default = "default_frame_start")]
    pub frame_start: i32,
    /// Last exported frame (inclusive).
    #[serde(default = "default_frame_end")]
    pub frame_end: i32,
    /// World scale stored in the header. Transforms are not rescaled.
    #[serde(default = "default_world_scale")]
    pub world_scale: f32,
    /// Export only the selected objects instead of every scene object.
    #[serde(default = "default_only_selected")]
    pub only_selected: bool,
    /// Replace `frame_start`/`frame_end` with the scene's own frame range.
    #[serde(default)]
    pub use_scene_frame_range: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            frame_start: default_frame_start(),
            frame_end: default_frame_end(),
            world_scale: default_world_scale(),
            only_selected: default_only_selected(),
            use_scene_frame_range: false,
        }
    }
}

impl ExportRequest {
    /// Create a request for an explicit frame range with default options.
    pub fn with_range(frame_start: i32, frame_end: i32) -> Self {
        Self {
            frame_start,
            frame_end,
            ..Default::default()
        }
    }

    /// Frame range actually exported, honoring `use_scene_frame_range`.
    pub fn resolve_range(&self, render: &RenderSettings) -> (i32, i32) {
        if self.use_scene_frame_range {
            (render.frame_start, render.frame_end)
        } else {
            (self.frame_start, self.frame_end)
        }
    }

    /// Validate request parameters against the scene they will run on.
    pub fn validate(&self, render: &RenderSettings) -> Result<(), ConfigError> {
        let (start, end) = self.resolve_range(render);
        for frame in [start, end] {
            if !(MIN_FRAME..=MAX_FRAME).contains(&frame) {
                return Err(ConfigError::FrameOutOfBounds { frame });
            }
        }
        if start > end {
            return Err(ConfigError::InvertedFrameRange { start, end });
        }
        if !self.world_scale.is_finite() || !(0.0..=MAX_WORLD_SCALE).contains(&self.world_scale) {
            return Err(ConfigError::InvalidWorldScale(self.world_scale));
        }
        render.validate()
    }
}

/// Request and scene validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "Frame {frame} is outside the exportable range {min}..={max}",
        min = MIN_FRAME,
        max = MAX_FRAME
    )]
    FrameOutOfBounds { frame: i32 },
    #[error("Start frame {start} is after end frame {end}")]
    InvertedFrameRange { start: i32, end: i32 },
    #[error("World scale {0} must be finite and within 0..={max}", max = MAX_WORLD_SCALE)]
    InvalidWorldScale(f32),
    #[error("Pixel aspect Y must be non-zero")]
    InvalidPixelAspect,
    #[error("Frame rate {0} must be positive")]
    InvalidFrameRate(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_operator() {
        let request = ExportRequest::default();
        assert_eq!(request.frame_start, 1);
        assert_eq!(request.frame_end, 250);
        assert_eq!(request.world_scale, 1.0);
        assert!(request.only_selected);
        assert!(!request.use_scene_frame_range);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let request: ExportRequest = serde_json::from_str(r#"{"frame_end": 10}"#).unwrap();
        assert_eq!(request.frame_start, 1);
        assert_eq!(request.frame_end, 10);
        assert!(request.only_selected);
    }

    #[test]
    fn test_scene_frame_range_overrides_request() {
        let render = RenderSettings {
            frame_start: 20,
            frame_end: 40,
            ..Default::default()
        };
        let mut request = ExportRequest::with_range(1, 5);
        assert_eq!(request.resolve_range(&render), (1, 5));

        request.use_scene_frame_range = true;
        assert_eq!(request.resolve_range(&render), (20, 40));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let render = RenderSettings::default();
        let err = ExportRequest::with_range(10, 3).validate(&render).unwrap_err();
        assert_eq!(err, ConfigError::InvertedFrameRange { start: 10, end: 3 });
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_frames() {
        let render = RenderSettings::default();
        assert_eq!(
            ExportRequest::with_range(0, 3).validate(&render),
            Err(ConfigError::FrameOutOfBounds { frame: 0 })
        );
        assert_eq!(
            ExportRequest::with_range(1, MAX_FRAME + 1).validate(&render),
            Err(ConfigError::FrameOutOfBounds { frame: MAX_FRAME + 1 })
        );
    }

    #[test]
    fn test_validate_world_scale() {
        let render = RenderSettings::default();
        let mut request = ExportRequest::with_range(1, 1);

        request.world_scale = 0.0;
        assert!(request.validate(&render).is_ok());

        request.world_scale = 1000.5;
        assert!(matches!(
            request.validate(&render),
            Err(ConfigError::InvalidWorldScale(_))
        ));

        request.world_scale = f32::NAN;
        assert!(request.validate(&render).is_err());
    }

    #[test]
    fn test_single_frame_range_is_valid() {
        let render = RenderSettings::default();
        assert!(ExportRequest::with_range(7, 7).validate(&render).is_ok());
    }
}
