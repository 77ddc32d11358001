//! Host-facing contract shared by all four engines

use crate::report::ResultSink;
use crate::session::{GameKind, GameResult, Session, SessionPhase};

/// One mini-game instance driven by a host (UI shell, test, demo loop).
///
/// Game-specific input (`tick`, `flap`, `select`, `click`, ...) lives on the
/// concrete engine types; this trait covers the lifecycle every game shares.
pub trait MiniGame {
    /// Parameter preset chosen at `start`
    type Config: Default;
    /// Owned, read-only projection for the presentation layer
    type Snapshot;

    fn kind(&self) -> GameKind;

    /// Begin a session. An in-flight session is reset first.
    fn start(&mut self, config: Self::Config);

    /// Return to `Idle`, cancelling anything pending. Idempotent.
    fn reset(&mut self);

    fn render_state(&self) -> Self::Snapshot;

    fn session(&self) -> &Session;

    /// Install the callback invoked once per session on `Ended`
    fn set_on_end(&mut self, sink: Box<dyn ResultSink>);

    /// Result of the most recent finished session, if it has not been reset
    fn last_result(&self) -> Option<&GameResult>;

    fn start_default(&mut self) {
        self.start(Self::Config::default());
    }

    fn phase(&self) -> SessionPhase {
        self.session().phase
    }

    fn score(&self) -> u32 {
        self.session().score
    }
}
