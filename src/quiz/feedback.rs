use crate::map::model::Entity;

/// Monotonic token identifying one session lifetime.
///
/// Every session event carries the token current at dispatch time. Speech,
/// tone, and confetti effects are fire-and-forget; a dispatcher that delays
/// work must check the token is still current before applying it, so a stale
/// callback can never reference a session that no longer exists.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct SessionToken(pub u64);

/// Final result payload delivered on session finish.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionSummary {
    /// Prompts answered correctly (per the active scoring policy).
    pub score: u32,
    /// Total prompts in the session.
    pub total: u32,
    /// `round(100 * score / total)`, 0 for an empty session.
    pub percent: u32,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
    /// Whether every prompt was answered for full credit.
    pub perfect: bool,
}

/// Presentation-layer sink for session events.
///
/// The core consumes this interface but never implements presentation: color
/// flashes, tones, speech, modals, and confetti all live behind it. Methods
/// are infallible by signature and must not panic: a failing audio or speech
/// backend is the dispatcher's problem and can never reach scoring or state
/// correctness. Every method has a no-op default so dispatchers implement
/// only what they present.
pub trait FeedbackDispatcher {
    /// A new prompt is being asked.
    fn on_prompt_shown(&mut self, token: SessionToken, entity: &Entity) {
        let _ = (token, entity);
    }

    /// The current prompt was answered correctly.
    fn on_correct(&mut self, token: SessionToken, entity: &Entity) {
        let _ = (token, entity);
    }

    /// A wrong entity was clicked; `clicked` is the entity that was hit.
    fn on_wrong(&mut self, token: SessionToken, clicked: &Entity) {
        let _ = (token, clicked);
    }

    /// The session finished; carries the final summary.
    fn on_session_finished(&mut self, token: SessionToken, summary: &SessionSummary) {
        let _ = (token, summary);
    }

    /// A region change was attempted mid-run and rejected.
    fn on_region_change_rejected(&mut self) {}
}

/// Dispatcher that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFeedback;

impl FeedbackDispatcher for NullFeedback {}
