//! Geoquiz is the core of an interactive, timed, click-to-identify map quiz.
//!
//! A prompt names a geographic entity, the learner clicks it on a rendered
//! map, and the core scores correctness, advances through a randomized
//! sequence, and reports a final result. The crate owns the parts that need
//! real engineering and leaves presentation (painting, audio, speech, modal
//! chrome) to the host behind the [`FeedbackDispatcher`] trait.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: SVG map bytes -> scene arena + entity registry
//!    ([`decode_svg_map`], or [`SceneBuilder`] for programmatic scenes)
//! 2. **Resolve**: entity -> root-space bounding box despite arbitrary nested
//!    transforms ([`resolve_bounding_box`])
//! 3. **Zoom**: region pool -> padded coordinate window, applied once layout
//!    has settled ([`ViewportController`])
//! 4. **Play**: shuffled prompts, scoring, feedback dispatch
//!    ([`SessionController`], orchestrated by [`QuizEngine`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: prompt order derives from an explicit seed.
//! - **Single-threaded**: every state transition happens synchronously inside
//!   a pointer or control-command handler; there is no hidden parallelism.
//! - **Presentation-free**: the core reads geometry and toggles style classes;
//!   it never draws, plays audio, or speaks.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod geometry;
mod map;
mod overlay;
mod quiz;

pub use foundation::core::{
    Affine, BezPath, Canvas, Point, Rect, Vec2, device_to_root, invert_affine, map_rect_corners,
    view_transform,
};
pub use foundation::error::{GeoquizError, GeoquizResult};
pub use geometry::resolve::{pad_fraction, resolve_bounding_box, union_boxes};
pub use geometry::viewport::ViewportController;
pub use map::decode::decode_svg_map;
pub use map::model::{
    Entity, HitTargetRule, MapConfig, RegionDefinition, RegionTable, RegionTag, ScoringPolicy,
};
pub use map::scene::{MapScene, NodeId, SceneBuilder, SceneNode, StyleClass};
pub use overlay::labels::{Label, LabelOverlay};
pub use overlay::targets::{HitTarget, HitTargetOverlay};
pub use quiz::engine::{Command, HudSnapshot, QuizEngine};
pub use quiz::feedback::{FeedbackDispatcher, NullFeedback, SessionSummary, SessionToken};
pub use quiz::session::{QuizSession, SelectionOutcome, SessionController, SessionState};
