pub mod model;
pub mod bindings;
pub mod config;
pub mod engine;
pub mod geometry {
    pub mod cubic;
    pub mod flatten;
    pub mod limits;
    pub mod math;
    pub mod path;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod automatch;
    pub mod interpolate;
    pub mod phase;
    pub mod split;
    pub mod style;
    pub mod topology;
}
pub mod json;

pub use bindings::{apply_edit, explode, regroup, BindingSet, ConflictPolicy, Connection, ConnectionEdit, CorrespondenceGroup};
pub use config::TweenConfig;
pub use engine::{compute_tween, tween_time, TweenEngine, TweenKey};
pub use json::{InputError, TweenRequest};
pub use model::{Color, Easing, Frame, MatchStrategy, Point, Stroke, StrokeId, StrokeStyle, Vec2, TWEEN_ID_BASE};
