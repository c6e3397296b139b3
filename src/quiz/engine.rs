use crate::{
    foundation::core::{Canvas, Point},
    foundation::error::GeoquizResult,
    geometry::viewport::ViewportController,
    map::model::{Entity, MapConfig, RegionTag},
    map::scene::{MapScene, StyleClass},
    overlay::labels::LabelOverlay,
    overlay::targets::HitTargetOverlay,
    quiz::feedback::FeedbackDispatcher,
    quiz::session::{SelectionOutcome, SessionController, SessionState},
};

/// Pointer/keyboard surface of the quiz.
///
/// Hosts map raw input events onto these commands; there is no other control
/// surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// The start button or spacebar: Idle/Finished starts a run, Running
    /// resets to Idle (start-over never auto-starts).
    PrimaryAction,
    /// A pointer selection at a device-space point.
    Select(Point),
    /// A region mode button.
    SetRegion(RegionTag),
    /// One render pass completed.
    RenderPass,
}

/// Scoreboard snapshot for the host's HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Prompts advanced and total prompts.
    pub progress: (usize, usize),
    /// Observational elapsed time.
    pub elapsed_ms: u64,
    /// Correct clicks over all clicks.
    pub accuracy_percent: u32,
}

/// Orchestration facade tying the core components together.
///
/// The engine owns the scene, the geometry overlays, the viewport controller,
/// and the session controller, and enforces the cross-component rules: region
/// changes are rejected while a run is live, clicks resolve through the
/// synthetic-target overlay before native shapes, and every layout-affecting
/// change rebuilds the derived overlays.
pub struct QuizEngine {
    scene: MapScene,
    config: MapConfig,
    catalog: Vec<Entity>,
    overlay: HitTargetOverlay,
    labels: LabelOverlay,
    viewport: ViewportController,
    session: SessionController,
    fx: Box<dyn FeedbackDispatcher>,
}

impl QuizEngine {
    /// Build an engine over a decoded scene and a validated configuration.
    ///
    /// Configured entities with no matching shape in the map document are
    /// silently excluded from the active pool (this is not an error). The
    /// initial viewport is the document's full window.
    pub fn new(
        scene: MapScene,
        config: MapConfig,
        fx: Box<dyn FeedbackDispatcher>,
        seed: u64,
    ) -> GeoquizResult<Self> {
        config.validate()?;

        let mut catalog = Vec::with_capacity(config.entities.len());
        for entity in &config.entities {
            if scene.contains_entity(&entity.id) {
                catalog.push(entity.clone());
            } else {
                tracing::debug!(entity = %entity.id, "entity has no shape in map document; excluded");
            }
        }

        let mut overlay = HitTargetOverlay::new();
        overlay.rebuild(&scene, &config.hit_targets);

        let viewport = ViewportController::new(config.regions.clone());
        let session = SessionController::new(seed, config.scoring);

        Ok(Self {
            scene,
            config,
            catalog,
            overlay,
            labels: LabelOverlay::new(),
            viewport,
            session,
            fx,
        })
    }

    /// The scene, for hosts that paint it.
    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    /// The active hit-target overlay.
    pub fn overlay(&self) -> &HitTargetOverlay {
        &self.overlay
    }

    /// The label overlay.
    pub fn labels(&self) -> &LabelOverlay {
        &self.labels
    }

    /// The session controller.
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Entities present in both the configuration and the map document.
    pub fn catalog(&self) -> &[Entity] {
        &self.catalog
    }

    /// The active region tag.
    pub fn active_region(&self) -> &RegionTag {
        self.viewport.active_region()
    }

    /// Current session lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Route one command from the host's input layer.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::PrimaryAction => self.primary_action(),
            Command::Select(point) => {
                self.handle_click(point);
            }
            Command::SetRegion(tag) => {
                self.set_region(tag);
            }
            Command::RenderPass => {
                self.on_render_pass();
            }
        }
    }

    /// Start button / spacebar behavior: start when Idle or Finished, reset to
    /// Idle (without auto-starting) when Running.
    pub fn primary_action(&mut self) {
        if self.session.state() == SessionState::Running {
            self.reset_to_idle();
        } else {
            self.start();
        }
    }

    /// Start a run over the active region's pool.
    ///
    /// Returns `false` without side effects while a run is already live.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> bool {
        if self.session.state() == SessionState::Running {
            return false;
        }
        self.labels.clear();
        self.scene.clear_all_styles();
        self.apply_dimming();

        let active = self.viewport.active_region().clone();
        let pool = self.pool_for(&active);
        self.session.start(&pool, self.fx.as_mut())
    }

    /// Reset to the canonical Idle state from any state.
    pub fn reset_to_idle(&mut self) {
        self.session.reset_to_idle();
        self.labels.clear();
        self.scene.clear_all_styles();
        self.apply_dimming();
    }

    /// Switch the active region.
    ///
    /// Rejected without side effects while a run is live; the dispatcher is
    /// notified so the host can hint the user. An accepted switch resets the
    /// session to Idle and latches a viewport recomputation for after layout
    /// settles (see [`QuizEngine::on_render_pass`]). Redundant calls with the
    /// current region are safe.
    #[tracing::instrument(skip(self))]
    pub fn set_region(&mut self, tag: RegionTag) -> bool {
        if self.session.state() == SessionState::Running {
            self.fx.on_region_change_rejected();
            return false;
        }

        self.session.reset_to_idle();
        self.labels.clear();
        self.scene.clear_all_styles();

        let pool_ids = self.pool_for(&tag).into_iter().map(|e| e.id).collect();
        self.viewport.request_region(tag, pool_ids);
        self.apply_dimming();
        true
    }

    /// Advance one render pass.
    ///
    /// When a latched viewport applies, the derived overlays are rebuilt and
    /// label anchors repositioned. Returns whether a window was applied.
    pub fn on_render_pass(&mut self) -> bool {
        let applied = self.viewport.on_render_pass(&mut self.scene);
        if applied {
            self.overlay.rebuild(&self.scene, &self.config.hit_targets);
            self.labels.reposition_all(&self.scene, &self.overlay);
        }
        applied
    }

    /// Host resize: update the device canvas and re-anchor device-space labels.
    pub fn handle_resize(&mut self, canvas: Canvas) {
        self.scene.set_canvas(canvas);
        self.labels.reposition_all(&self.scene, &self.overlay);
    }

    /// Resolve a device-space click to an entity and feed it to the session.
    ///
    /// Synthetic hit targets take precedence over native shapes; both route
    /// into the same resolution path.
    pub fn handle_click(&mut self, device: Point) -> SelectionOutcome {
        let Some(root) = self.scene.device_to_root(device) else {
            return SelectionOutcome::Ignored;
        };
        let id = self
            .overlay
            .hit_test(root)
            .map(str::to_string)
            .or_else(|| self.scene.hit_test_native(root).map(str::to_string));
        let Some(id) = id else {
            return SelectionOutcome::Ignored;
        };
        self.handle_selection(&id)
    }

    /// Feed an already-resolved entity selection to the session.
    ///
    /// Unknown ids never mutate state. A correct answer locks the entity and
    /// places its label; a wrong click sets the transient `Wrong` class that
    /// hosts clear via [`QuizEngine::clear_wrong_flash`] after their flash.
    pub fn handle_selection(&mut self, entity_id: &str) -> SelectionOutcome {
        let Some(entity) = self.catalog.iter().find(|e| e.id == entity_id).cloned() else {
            return SelectionOutcome::Ignored;
        };

        let outcome = self.session.handle_selection(&entity, self.fx.as_mut());
        match outcome {
            SelectionOutcome::Correct | SelectionOutcome::Finished => {
                self.scene.set_style(&entity.id, StyleClass::Correct);
                self.scene.set_style(&entity.id, StyleClass::Locked);
                self.labels.add_for(&self.scene, &self.overlay, &entity);
            }
            SelectionOutcome::Wrong => {
                self.scene.set_style(&entity.id, StyleClass::Wrong);
            }
            SelectionOutcome::Ignored => {}
        }
        outcome
    }

    /// Clear the transient wrong flash from an entity.
    pub fn clear_wrong_flash(&mut self, entity_id: &str) {
        self.scene.clear_style(entity_id, StyleClass::Wrong);
    }

    /// Scoreboard snapshot for the host's HUD tick.
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            progress: self.session.progress(),
            elapsed_ms: self.session.elapsed_ms(),
            accuracy_percent: self.session.accuracy_percent(),
        }
    }

    fn pool_for(&self, tag: &RegionTag) -> Vec<Entity> {
        if tag.is_all() {
            return self.catalog.clone();
        }
        self.catalog
            .iter()
            .filter(|e| e.region == *tag)
            .cloned()
            .collect()
    }

    fn apply_dimming(&mut self) {
        let active = self.viewport.active_region().clone();
        for entity in &self.catalog {
            let dim = !active.is_all() && entity.region != active;
            if dim {
                self.scene.set_style(&entity.id, StyleClass::Dimmed);
            } else {
                self.scene.clear_style(&entity.id, StyleClass::Dimmed);
            }
        }
    }
}

impl std::fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizEngine")
            .field("state", &self.session.state())
            .field("active_region", self.viewport.active_region())
            .field("catalog_len", &self.catalog.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quiz/engine.rs"]
mod tests;
