use std::collections::HashSet;
use std::time::Instant;

use crate::{
    foundation::math::{Fnv1a64, Rng64, shuffle},
    map::model::{Entity, ScoringPolicy},
    quiz::feedback::{FeedbackDispatcher, SessionSummary, SessionToken},
};

/// Session lifecycle states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Initial and terminal-safe state; nothing is being asked.
    #[default]
    Idle,
    /// A timed run is in progress.
    Running,
    /// A run completed; the summary is available.
    Finished,
}

/// Outcome of one pointer selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// No session is running (or the id is unknown); nothing changed.
    Ignored,
    /// The current prompt was answered; the next prompt was emitted.
    Correct,
    /// The current prompt was answered and it was the last one.
    Finished,
    /// A wrong entity was clicked; the prompt stays open.
    Wrong,
}

/// One timed run from `start` to `finish`/`reset_to_idle`.
///
/// All per-run fields live in this one value, replaced atomically within a
/// single handler invocation; resetting is one assignment to canonical
/// defaults. Exactly one session is live at a time.
#[derive(Clone, Debug, Default)]
pub struct QuizSession {
    state: SessionState,
    pool: Vec<Entity>,
    order: Vec<String>,
    index: usize,
    score: u32,
    wrong: u32,
    attempted_current: bool,
    completed: HashSet<String>,
    started_at: Option<Instant>,
    summary: Option<SessionSummary>,
}

impl QuizSession {
    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Shuffled prompt order (a permutation of the pool's ids).
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Index of the current prompt; equals `order().len()` once finished.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Points earned so far. Never exceeds [`QuizSession::index`].
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Wrong clicks so far (all prompts combined).
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    /// Entity currently being asked, if the session is running.
    pub fn current_target(&self) -> Option<&Entity> {
        if self.state != SessionState::Running {
            return None;
        }
        let id = self.order.get(self.index)?;
        self.pool.iter().find(|e| e.id == *id)
    }

    /// Final summary, available once finished.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }
}

/// Quiz Session Controller.
///
/// Owns the one live [`QuizSession`] and drives its transitions. Prompt order
/// is a uniform random permutation derived from the controller seed and the
/// run counter, so a given controller replays identically. Invalid transition
/// requests are silent no-ops: they never mutate state and never error past
/// this boundary.
#[derive(Debug)]
pub struct SessionController {
    session: QuizSession,
    policy: ScoringPolicy,
    seed: u64,
    runs: u64,
    token: SessionToken,
}

impl SessionController {
    /// Controller in the canonical Idle state.
    pub fn new(seed: u64, policy: ScoringPolicy) -> Self {
        Self {
            session: QuizSession::default(),
            policy,
            seed,
            runs: 0,
            token: SessionToken::default(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// The live session value.
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Active scoring policy.
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Token identifying the current session lifetime.
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Start a fresh run over `pool`.
    ///
    /// Valid from Idle or Finished; a running session is left untouched and
    /// `false` is returned. An empty pool finishes immediately at 0/0.
    pub fn start(&mut self, pool: &[Entity], fx: &mut dyn FeedbackDispatcher) -> bool {
        if self.session.state == SessionState::Running {
            return false;
        }

        self.runs += 1;
        self.token = SessionToken(self.token.0 + 1);

        let mut order: Vec<String> = pool.iter().map(|e| e.id.clone()).collect();
        let mut rng = Rng64::new(run_seed(self.seed, self.runs));
        shuffle(&mut order, &mut rng);

        self.session = QuizSession {
            state: SessionState::Running,
            pool: pool.to_vec(),
            order,
            index: 0,
            score: 0,
            wrong: 0,
            attempted_current: false,
            completed: HashSet::new(),
            started_at: Some(Instant::now()),
            summary: None,
        };

        if self.session.order.is_empty() {
            self.finish(fx);
            return true;
        }

        self.emit_prompt(fx);
        true
    }

    /// Resolve one pointer selection against the current target.
    ///
    /// No-op unless Running. A wrong click never advances the prompt and
    /// repeated wrong clicks never further penalize the score.
    pub fn handle_selection(
        &mut self,
        clicked: &Entity,
        fx: &mut dyn FeedbackDispatcher,
    ) -> SelectionOutcome {
        if self.session.state != SessionState::Running {
            return SelectionOutcome::Ignored;
        }

        let target_id = self.session.order[self.session.index].clone();
        if clicked.id == target_id && !self.session.completed.contains(&target_id) {
            self.session.completed.insert(target_id);
            let earned = match self.policy {
                ScoringPolicy::PerPrompt => true,
                ScoringPolicy::FirstClickOnly => !self.session.attempted_current,
            };
            if earned {
                self.session.score += 1;
            }
            self.session.index += 1;
            self.session.attempted_current = false;
            fx.on_correct(self.token, clicked);

            if self.session.index == self.session.order.len() {
                self.finish(fx);
                SelectionOutcome::Finished
            } else {
                self.emit_prompt(fx);
                SelectionOutcome::Correct
            }
        } else {
            self.session.wrong += 1;
            self.session.attempted_current = true;
            fx.on_wrong(self.token, clicked);
            SelectionOutcome::Wrong
        }
    }

    /// Finish the current run; valid only from Running.
    ///
    /// Freezes elapsed time, computes the percent and the perfect flag, and
    /// notifies the dispatcher. Returns whether a run was finished.
    pub fn finish(&mut self, fx: &mut dyn FeedbackDispatcher) -> bool {
        if self.session.state != SessionState::Running {
            return false;
        }

        let elapsed_ms = self
            .session
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        let total = self.session.order.len() as u32;
        let percent = if total == 0 {
            0
        } else {
            (100.0 * f64::from(self.session.score) / f64::from(total)).round() as u32
        };
        let summary = SessionSummary {
            score: self.session.score,
            total,
            percent,
            elapsed_ms,
            perfect: percent == 100 && total > 0,
        };

        self.session.state = SessionState::Finished;
        self.session.started_at = None;
        self.session.summary = Some(summary.clone());
        fx.on_session_finished(self.token, &summary);
        true
    }

    /// Return to the canonical Idle state; valid from any state.
    ///
    /// Bumps the session token so any delayed fire-and-forget effect from the
    /// superseded session can be recognized as stale and dropped. Never
    /// re-enters Running automatically.
    pub fn reset_to_idle(&mut self) {
        self.token = SessionToken(self.token.0 + 1);
        self.session = QuizSession::default();
    }

    /// Milliseconds elapsed: live while Running, frozen once Finished, zero
    /// when Idle. Purely observational, never an enforcement deadline.
    pub fn elapsed_ms(&self) -> u64 {
        match self.session.state {
            SessionState::Running => self
                .session
                .started_at
                .map(|t| t.elapsed().as_millis() as u64)
                .unwrap_or(0),
            SessionState::Finished => self
                .session
                .summary
                .as_ref()
                .map(|s| s.elapsed_ms)
                .unwrap_or(0),
            SessionState::Idle => 0,
        }
    }

    /// Prompts advanced and total prompts.
    pub fn progress(&self) -> (usize, usize) {
        (self.session.index, self.session.order.len())
    }

    /// Click accuracy readout for the HUD: correct clicks over all clicks.
    ///
    /// Each completed prompt took exactly one correct click, so correct
    /// clicks equal [`QuizSession::index`]. Zero before the first click.
    pub fn accuracy_percent(&self) -> u32 {
        let correct_clicks = self.session.index as u32;
        let answered = correct_clicks + self.session.wrong;
        if answered == 0 {
            return 0;
        }
        (100.0 * f64::from(correct_clicks) / f64::from(answered)).round() as u32
    }

    fn emit_prompt(&self, fx: &mut dyn FeedbackDispatcher) {
        if let Some(entity) = self.session.current_target() {
            fx.on_prompt_shown(self.token, entity);
        }
    }
}

fn run_seed(seed: u64, runs: u64) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(seed);
    h.write_u64(runs);
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/quiz/session.rs"]
mod tests;
