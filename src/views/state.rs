//! Per-view fetch state
//!
//! Each view fetches its resource independently and tracks a tri-state
//! value. A [`ViewSlot`] hands out generation tickets so that a fetch which
//! resolves after a newer one started, or after the view was detached, is
//! dropped instead of overwriting fresher state.

use std::future::Future;
use std::sync::Mutex;

/// Loading / error / data state of a single view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Data(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> From<Result<T, String>> for ViewState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => ViewState::Data(data),
            Err(message) => ViewState::Error(message),
        }
    }
}

/// Proof that a fetch was started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
struct SlotInner<T> {
    generation: u64,
    attached: bool,
    state: ViewState<T>,
}

/// Holder for one view's state with stale-result protection
#[derive(Debug)]
pub struct ViewSlot<T> {
    inner: Mutex<SlotInner<T>>,
}

impl<T: Clone> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ViewSlot<T> {
    /// New attached slot in the loading state
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                generation: 0,
                attached: true,
                state: ViewState::Loading,
            }),
        }
    }

    /// Start a fetch: bumps the generation and resets to `Loading`
    pub fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = ViewState::Loading;
        Ticket(inner.generation)
    }

    /// Apply a fetch result if its ticket is still current.
    ///
    /// Returns whether the result was applied.
    pub fn complete(&self, ticket: Ticket, result: Result<T, String>) -> bool {
        let mut inner = self.lock();
        if !inner.attached || inner.generation != ticket.0 {
            tracing::debug!(
                ticket = ticket.0,
                current = inner.generation,
                attached = inner.attached,
                "Dropping stale view result"
            );
            return false;
        }
        inner.state = result.into();
        true
    }

    /// Run `fetch` under a fresh ticket and apply its result
    pub async fn load<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = Result<T, String>>,
    {
        let ticket = self.begin();
        let result = fetch.await;
        self.complete(ticket, result)
    }

    /// Detach the view; in-flight fetches will no longer apply
    pub fn detach(&self) {
        let mut inner = self.lock();
        inner.attached = false;
        inner.generation += 1;
    }

    /// Re-attach the view in the loading state
    pub fn attach(&self) {
        let mut inner = self.lock();
        inner.attached = true;
        inner.state = ViewState::Loading;
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ViewState<T> {
        self.lock().state.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotInner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_loading() {
        let slot: ViewSlot<u32> = ViewSlot::new();
        assert!(slot.state().is_loading());
        assert!(slot.is_attached());
    }

    #[test]
    fn test_complete_applies_current_ticket() {
        let slot = ViewSlot::new();
        let ticket = slot.begin();

        assert!(slot.complete(ticket, Ok(7)));
        assert_eq!(slot.state(), ViewState::Data(7));
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let slot = ViewSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.complete(second, Ok("fresh")));
        assert!(!slot.complete(first, Ok("stale")));
        assert_eq!(slot.state(), ViewState::Data("fresh"));
    }

    #[test]
    fn test_detached_slot_ignores_results() {
        let slot: ViewSlot<u32> = ViewSlot::new();
        let ticket = slot.begin();
        slot.detach();

        assert!(!slot.complete(ticket, Err("boom".to_string())));
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_reattach_requires_new_ticket() {
        let slot = ViewSlot::new();
        let old = slot.begin();
        slot.detach();
        slot.attach();

        assert!(!slot.complete(old, Ok(1)));
        let ticket = slot.begin();
        assert!(slot.complete(ticket, Ok(2)));
        assert_eq!(slot.state().data(), Some(&2));
    }

    #[tokio::test]
    async fn test_load_records_error() {
        let slot: ViewSlot<u32> = ViewSlot::new();

        let applied = slot.load(async { Err("Error loading stats".to_string()) }).await;

        assert!(applied);
        assert_eq!(slot.state().error(), Some("Error loading stats"));
    }
}
