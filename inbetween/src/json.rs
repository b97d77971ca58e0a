//! JSON interchange for tween requests coming from the editor shell.
//!
//! Everything parsed here is checked against `geometry::limits` before it
//! reaches the engine, which itself assumes finite, bounded input.

use crate::bindings::{BindingSet, ConnectionEdit, CorrespondenceGroup};
use crate::geometry::limits;
use crate::model::{Frame, MatchStrategy, Stroke, TWEEN_ID_BASE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parameter '{0}' must be finite")]
    NonFinite(String),
    #[error("parameter '{param}' out of range [{min}, {max}], got {got}")]
    OutOfRange { param: String, min: f32, max: f32, got: f32 },
    #[error("{what} exceeds the limit of {limit}")]
    TooLarge { what: &'static str, limit: usize },
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("stroke id {0} is in the range reserved for generated strokes")]
    ReservedId(u32),
}

impl InputError {
    /// Stable machine-readable code for the JS result objects.
    pub fn code(&self) -> &'static str {
        match self {
            InputError::Json(_) => "invalid_json",
            InputError::NonFinite(_) => "non_finite",
            InputError::OutOfRange { .. } => "out_of_range",
            InputError::TooLarge { .. } => "too_large",
            InputError::UnsupportedVersion(_) => "unsupported_version",
            InputError::ReservedId(_) => "reserved_id",
        }
    }
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Everything `compute_tween` needs, as sent by the editor shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TweenRequest {
    #[serde(default = "default_version")]
    pub version: u32,
    pub frame_index: u32,
    pub prev: Frame,
    pub next: Frame,
    #[serde(default)]
    pub bindings: BindingSet,
    #[serde(default)]
    pub strategy: MatchStrategy,
}

fn check_coord(param: &str, v: f32) -> Result<(), InputError> {
    if !v.is_finite() {
        return Err(InputError::NonFinite(param.to_string()));
    }
    if !limits::in_coord_bounds(v) {
        return Err(InputError::OutOfRange {
            param: param.to_string(),
            min: limits::COORD_MIN,
            max: limits::COORD_MAX,
            got: v,
        });
    }
    Ok(())
}

pub fn validate_stroke(s: &Stroke) -> Result<usize, InputError> {
    if s.id >= TWEEN_ID_BASE {
        return Err(InputError::ReservedId(s.id));
    }
    if s.points.len() > limits::MAX_POINTS_PER_STROKE {
        return Err(InputError::TooLarge { what: "points per stroke", limit: limits::MAX_POINTS_PER_STROKE });
    }
    for p in &s.points {
        check_coord("x", p.x)?;
        check_coord("y", p.y)?;
        for h in p.handle_in.iter().chain(p.handle_out.iter()) {
            check_coord("handle.x", h.x)?;
            check_coord("handle.y", h.y)?;
        }
    }
    let st = &s.style;
    if !limits::in_width_bounds(st.width) {
        return Err(InputError::OutOfRange { param: "width".into(), min: 0.0, max: limits::WIDTH_MAX, got: st.width });
    }
    for (name, v) in [("taper_start", st.taper_start), ("taper_end", st.taper_end)] {
        if !v.is_finite() {
            return Err(InputError::NonFinite(name.to_string()));
        }
    }
    Ok(s.points.len())
}

/// Returns the number of points in the frame.
pub fn validate_frame(f: &Frame) -> Result<usize, InputError> {
    if f.strokes.len() > limits::MAX_STROKES_PER_FRAME {
        return Err(InputError::TooLarge { what: "strokes per frame", limit: limits::MAX_STROKES_PER_FRAME });
    }
    if f.guides.len() > limits::MAX_GUIDES_PER_FRAME {
        return Err(InputError::TooLarge { what: "guides per frame", limit: limits::MAX_GUIDES_PER_FRAME });
    }
    let mut total = 0;
    for s in f.strokes.iter().chain(&f.guides) {
        total += validate_stroke(s)?;
    }
    Ok(total)
}

pub fn validate_groups(groups: &[CorrespondenceGroup]) -> Result<(), InputError> {
    if groups.len() > limits::MAX_BINDING_GROUPS {
        return Err(InputError::TooLarge { what: "binding groups", limit: limits::MAX_BINDING_GROUPS });
    }
    if groups
        .iter()
        .any(|g| g.sources.len() > limits::MAX_IDS_PER_GROUP || g.targets.len() > limits::MAX_IDS_PER_GROUP)
    {
        return Err(InputError::TooLarge { what: "ids per group", limit: limits::MAX_IDS_PER_GROUP });
    }
    Ok(())
}

impl TweenRequest {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.version != FORMAT_VERSION {
            return Err(InputError::UnsupportedVersion(self.version));
        }
        let total = validate_frame(&self.prev)? + validate_frame(&self.next)?;
        if total > limits::MAX_POINTS_TOTAL {
            return Err(InputError::TooLarge { what: "total points", limit: limits::MAX_POINTS_TOTAL });
        }
        validate_groups(&self.bindings.groups)
    }

    pub fn from_json_value(v: Value) -> Result<Self, InputError> {
        let req: TweenRequest = serde_json::from_value(v)?;
        req.validate()?;
        Ok(req)
    }

    pub fn from_json_str(s: &str) -> Result<Self, InputError> {
        let req: TweenRequest = serde_json::from_str(s)?;
        req.validate()?;
        Ok(req)
    }
}

pub fn strokes_to_json(strokes: &[Stroke]) -> Value {
    serde_json::to_value(strokes).unwrap_or(Value::Null)
}

pub fn groups_from_json_value(v: Value) -> Result<Vec<CorrespondenceGroup>, InputError> {
    let groups: Vec<CorrespondenceGroup> = serde_json::from_value(v)?;
    validate_groups(&groups)?;
    Ok(groups)
}

pub fn edit_from_json_value(v: Value) -> Result<ConnectionEdit, InputError> {
    Ok(serde_json::from_value(v)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(x: f64) -> Value {
        json!({
            "frame_index": 5,
            "prev": { "index": 0, "strokes": [ { "id": 1, "points": [ {"x": x, "y": 0.0}, {"x": 10.0, "y": 0.0} ] } ] },
            "next": { "index": 10, "strokes": [ { "id": 2, "points": [ {"x": 0.0, "y": 5.0}, {"x": 10.0, "y": 5.0} ] } ] },
            "strategy": "spatial"
        })
    }

    #[test]
    fn minimal_request_parses_with_defaults() {
        let req = TweenRequest::from_json_value(request(0.0)).unwrap();
        assert_eq!(req.version, FORMAT_VERSION);
        assert_eq!(req.strategy, MatchStrategy::Spatial);
        assert_eq!(req.prev.strokes[0].style.width, 1.0);
        assert!(req.bindings.groups.is_empty());
    }

    #[test]
    fn out_of_bounds_coordinate_is_rejected() {
        let err = TweenRequest::from_json_value(request(1e9)).unwrap_err();
        assert_eq!(err.code(), "out_of_range");
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut v = request(0.0);
        v["version"] = json!(7);
        let err = TweenRequest::from_json_value(v).unwrap_err();
        assert!(matches!(err, InputError::UnsupportedVersion(7)));
    }

    #[test]
    fn malformed_json_maps_to_code() {
        let err = TweenRequest::from_json_str("{ nope").unwrap_err();
        assert_eq!(err.code(), "invalid_json");
    }
}
