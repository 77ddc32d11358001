//! Result delivery
//!
//! Engines hand their finished [`GameResult`] to a caller-supplied sink,
//! synchronously and once per session. What the sink does with it
//! (storage, analytics) is the host's business.

use crate::session::GameResult;

/// Receiver for finished sessions
pub trait ResultSink {
    fn on_end(&mut self, result: &GameResult);
}

impl<F> ResultSink for F
where
    F: FnMut(&GameResult),
{
    fn on_end(&mut self, result: &GameResult) {
        self(result)
    }
}

/// Per-engine emitter. Remembers the last result so hosts without a sink can poll.
#[derive(Default)]
pub struct Reporter {
    sink: Option<Box<dyn ResultSink>>,
    last: Option<GameResult>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("has_sink", &self.sink.is_some())
            .field("last", &self.last)
            .finish()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&mut self, sink: Box<dyn ResultSink>) {
        self.sink = Some(sink);
    }

    /// Deliver a result (no retries; sink failures are the sink's problem)
    pub fn emit(&mut self, result: GameResult) {
        log::info!(
            "{} ended: score={} time={}ms completed={}",
            result.game_type.as_str(),
            result.score,
            result.time_played_ms,
            result.completed
        );
        self.last = Some(result);
        if let Some(sink) = self.sink.as_mut() {
            sink.on_end(&result);
        }
    }

    pub fn last(&self) -> Option<&GameResult> {
        self.last.as_ref()
    }

    /// Forget the previous session's result (sink stays attached)
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> GameResult {
        GameResult {
            game_type: GameKind::Breakout,
            score: 800,
            time_played_ms: 60_000,
            completed: true,
        }
    }

    #[test]
    fn test_closure_sink_receives_result() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_sink = Rc::clone(&seen);

        let mut reporter = Reporter::new();
        reporter.set_sink(Box::new(move |r: &GameResult| seen_in_sink.borrow_mut().push(*r)));
        reporter.emit(sample());

        assert_eq!(seen.borrow().as_slice(), &[sample()]);
        assert_eq!(reporter.last(), Some(&sample()));
    }

    #[test]
    fn test_no_sink_still_records_last() {
        let mut reporter = Reporter::new();
        assert!(reporter.last().is_none());
        reporter.emit(sample());
        assert_eq!(reporter.last().map(|r| r.score), Some(800));
        reporter.clear();
        assert!(reporter.last().is_none());
    }
}
