//! Virtual-time scheduler for delayed callbacks
//!
//! The host advances time explicitly; due events are handed back in due-time
//! order (FIFO for equal times) so the owning engine can apply them and
//! schedule follow-ups. Nothing here reads the real clock.
//!
//! Every scheduled event is stamped with the current epoch. `cancel_all`
//! drops everything pending and bumps the epoch, so an event from an old
//! chain can never fire into a new session.

/// Handle for cancelling a single scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    id: TimerId,
    due_ms: u64,
    epoch: u64,
    event: E,
}

/// Ordered queue of delayed events on a virtual clock
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now_ms: u64,
    epoch: u64,
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            epoch: 0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Cancellation generation; bumped by `cancel_all`
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `event` to fire `delay_ms` after the current virtual time
    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            epoch: self.epoch,
            event,
        });
        id
    }

    /// Cancel one event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Drop every pending event and start a new epoch
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.epoch += 1;
    }

    /// Pop the earliest event due at or before `until_ms`, moving the clock to
    /// its due time. Returns `None` once nothing else is due.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<E> {
        loop {
            let idx = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, s)| s.due_ms <= until_ms)
                .min_by_key(|(_, s)| (s.due_ms, s.id.0))
                .map(|(i, _)| i)?;

            let scheduled = self.pending.remove(idx);
            self.now_ms = self.now_ms.max(scheduled.due_ms);
            if scheduled.epoch == self.epoch {
                return Some(scheduled.event);
            }
            log::debug!("dropping stale timeline event from epoch {}", scheduled.epoch);
        }
    }

    /// Move the clock forward to `until_ms` (after draining `pop_due`)
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
