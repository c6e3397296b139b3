use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::foundation::core::{BezPath, Canvas, Point, Rect};
use crate::map::model::{
    Entity, HitTargetRule, MapConfig, RegionDefinition, RegionTable, RegionTag, ScoringPolicy,
};
use crate::map::scene::{MapScene, SceneBuilder, StyleClass};
use crate::quiz::feedback::{FeedbackDispatcher, SessionSummary, SessionToken};
use crate::quiz::session::{SelectionOutcome, SessionState};
use kurbo::Shape;

#[derive(Default)]
struct Recorded {
    prompts: Vec<String>,
    wrongs: Vec<String>,
    finished: Vec<SessionSummary>,
    rejected: u32,
}

#[derive(Clone, Default)]
struct SharedFeedback(Rc<RefCell<Recorded>>);

impl FeedbackDispatcher for SharedFeedback {
    fn on_prompt_shown(&mut self, _token: SessionToken, entity: &Entity) {
        self.0.borrow_mut().prompts.push(entity.id.clone());
    }

    fn on_wrong(&mut self, _token: SessionToken, clicked: &Entity) {
        self.0.borrow_mut().wrongs.push(clicked.id.clone());
    }

    fn on_session_finished(&mut self, _token: SessionToken, summary: &SessionSummary) {
        self.0.borrow_mut().finished.push(summary.clone());
    }

    fn on_region_change_rejected(&mut self) {
        self.0.borrow_mut().rejected += 1;
    }
}

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.0)
}

fn entity(id: &str, name: &str, region: &str) -> Entity {
    Entity {
        id: id.to_string(),
        display_name: name.to_string(),
        region: RegionTag::new(region),
    }
}

fn americas_scene() -> MapScene {
    let mut b = SceneBuilder::new(
        Canvas::new(1000, 600).unwrap(),
        Rect::new(0.0, 0.0, 1000.0, 600.0),
    );
    b.path(rect_path(100.0, 50.0, 300.0, 150.0), Some("ca"));
    b.path(rect_path(100.0, 150.0, 300.0, 250.0), Some("us"));
    b.path(rect_path(100.0, 250.0, 300.0, 300.0), Some("mx"));
    b.path(rect_path(690.0, 364.0, 692.0, 366.0), Some("bs"));
    b.finish()
}

fn americas_config() -> MapConfig {
    MapConfig {
        entities: vec![
            entity("ca", "Canada", "north"),
            entity("us", "United States", "north"),
            entity("mx", "Mexico", "north"),
            entity("bs", "Bahamas", "caribbean"),
            entity("zz", "Atlantis", "caribbean"),
        ],
        regions: RegionTable::new(vec![
            RegionDefinition {
                tag: RegionTag::new("north"),
                padding_fraction: 0.1,
            },
            RegionDefinition {
                tag: RegionTag::new("caribbean"),
                padding_fraction: 0.2,
            },
        ]),
        hit_targets: vec![HitTargetRule {
            entity_id: "bs".to_string(),
            radius: 24.0,
        }],
        scoring: ScoringPolicy::PerPrompt,
    }
}

fn engine_with(fx: &SharedFeedback) -> QuizEngine {
    QuizEngine::new(americas_scene(), americas_config(), Box::new(fx.clone()), 7).unwrap()
}

#[test]
fn unmatched_entities_are_silently_excluded() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);

    assert_eq!(engine.catalog().len(), 4);
    assert!(engine.catalog().iter().all(|e| e.id != "zz"));

    engine.start();
    assert_eq!(engine.session().session().order().len(), 4);
}

#[test]
fn region_change_is_rejected_while_running() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);
    engine.start();
    let order = engine.session().session().order().to_vec();

    assert!(!engine.set_region(RegionTag::new("north")));
    assert_eq!(fx.0.borrow().rejected, 1);
    assert_eq!(engine.active_region(), &RegionTag::all());
    assert_eq!(engine.state(), SessionState::Running);
    assert_eq!(engine.session().session().order(), order.as_slice());
    assert_eq!(engine.session().session().score(), 0);
}

#[test]
fn region_viewport_applies_after_two_render_passes() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);
    let original = engine.scene().window();

    assert!(engine.set_region(RegionTag::new("north")));
    assert_eq!(engine.scene().window(), original);

    assert!(!engine.on_render_pass());
    assert_eq!(engine.scene().window(), original);

    assert!(engine.on_render_pass());
    // Union of ca/us/mx is (100,50)-(300,300); padded by 10% per axis.
    assert_eq!(engine.scene().window(), Rect::new(80.0, 25.0, 320.0, 325.0));
}

#[test]
fn all_region_restores_the_original_window() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);
    let original = engine.scene().window();

    engine.set_region(RegionTag::new("north"));
    engine.on_render_pass();
    engine.on_render_pass();
    assert_ne!(engine.scene().window(), original);

    engine.set_region(RegionTag::all());
    engine.on_render_pass();
    engine.on_render_pass();
    assert_eq!(engine.scene().window(), original);
}

#[test]
fn sub_regions_dim_entities_outside_the_pool() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);

    engine.set_region(RegionTag::new("north"));
    assert!(engine.scene().has_style("bs", StyleClass::Dimmed));
    assert!(!engine.scene().has_style("ca", StyleClass::Dimmed));

    engine.set_region(RegionTag::all());
    assert!(!engine.scene().has_style("bs", StyleClass::Dimmed));
}

#[test]
fn clicks_route_through_the_hit_target_overlay_first() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);

    // Caribbean pool is just the Bahamas; the prompt is deterministic.
    engine.set_region(RegionTag::new("caribbean"));
    engine.on_render_pass();
    engine.on_render_pass();

    // Compute the ring center in device space before clicking: the caribbean
    // window is zoomed, so device coordinates are not root coordinates.
    let center = engine.overlay().get("bs").unwrap().center;
    let ring_edge = Point::new(center.x + 20.0, center.y);
    let device = engine.scene().view_transform().unwrap() * ring_edge;

    engine.start();
    assert_eq!(engine.handle_click(device), SelectionOutcome::Finished);

    assert!(engine.scene().has_style("bs", StyleClass::Correct));
    assert!(engine.scene().has_style("bs", StyleClass::Locked));
    assert!(engine.labels().get("bs").is_some());
    let summary = &fx.0.borrow().finished[0];
    assert_eq!(summary.percent, 100);
    assert!(summary.perfect);
}

#[test]
fn wrong_clicks_set_a_transient_flash() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);

    engine.start();
    let target = engine
        .session()
        .session()
        .current_target()
        .unwrap()
        .id
        .clone();
    let decoy = engine
        .catalog()
        .iter()
        .find(|e| e.id != target)
        .unwrap()
        .id
        .clone();

    assert_eq!(engine.handle_selection(&decoy), SelectionOutcome::Wrong);
    assert!(engine.scene().has_style(&decoy, StyleClass::Wrong));
    assert_eq!(fx.0.borrow().wrongs, vec![decoy.clone()]);

    engine.clear_wrong_flash(&decoy);
    assert!(!engine.scene().has_style(&decoy, StyleClass::Wrong));
}

#[test]
fn primary_action_toggles_start_and_reset() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);

    engine.primary_action();
    assert_eq!(engine.state(), SessionState::Running);

    // Start-over resets to Idle and never auto-starts.
    engine.primary_action();
    assert_eq!(engine.state(), SessionState::Idle);

    engine.primary_action();
    assert_eq!(engine.state(), SessionState::Running);
}

#[test]
fn dispatch_routes_commands() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);

    engine.dispatch(Command::SetRegion(RegionTag::new("north")));
    engine.dispatch(Command::RenderPass);
    engine.dispatch(Command::RenderPass);
    assert_eq!(engine.scene().window(), Rect::new(80.0, 25.0, 320.0, 325.0));

    engine.dispatch(Command::PrimaryAction);
    assert_eq!(engine.state(), SessionState::Running);

    // A click in the ocean changes nothing.
    let device = engine.scene().view_transform().unwrap() * Point::new(90.0, 40.0);
    engine.dispatch(Command::Select(device));
    assert_eq!(engine.session().session().wrong(), 0);
}

#[test]
fn unknown_selections_are_ignored() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);
    engine.start();

    assert_eq!(engine.handle_selection("zz"), SelectionOutcome::Ignored);
    assert_eq!(engine.handle_selection("nope"), SelectionOutcome::Ignored);
    assert_eq!(engine.session().session().wrong(), 0);
}

#[test]
fn hud_reports_progress_and_accuracy() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);
    engine.start();

    let target = engine
        .session()
        .session()
        .current_target()
        .unwrap()
        .id
        .clone();
    engine.handle_selection(&target);

    let hud = engine.hud();
    assert_eq!(hud.progress, (1, 4));
    assert_eq!(hud.accuracy_percent, 100);
}

#[test]
fn resize_repositions_labels() {
    let fx = SharedFeedback::default();
    let mut engine = engine_with(&fx);
    engine.start();

    // Answer everything so every entity has a label.
    while engine.state() == SessionState::Running {
        let target = engine
            .session()
            .session()
            .current_target()
            .unwrap()
            .id
            .clone();
        engine.handle_selection(&target);
    }
    let before = engine.labels().get("ca").unwrap().anchor;

    engine.handle_resize(Canvas::new(500, 300).unwrap());
    let after = engine.labels().get("ca").unwrap().anchor;
    assert!((after.x - before.x * 0.5).abs() < 1e-9);
    assert!((after.y - before.y * 0.5).abs() < 1e-9);
}
