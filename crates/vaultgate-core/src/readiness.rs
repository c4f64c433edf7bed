//! Readiness signal for hosts that assemble their page from fragments.
//!
//! The host registers every fragment it is still loading and marks each one
//! complete when its markup is in place. Once nothing is outstanding the
//! signal fires and waiting gates render. Firing again later (after more
//! fragments were registered and completed) wakes waiters a second time.

use std::collections::BTreeSet;

use tokio::sync::watch;
use tracing::debug;

pub struct Readiness {
    pending: BTreeSet<String>,
    tx: watch::Sender<u64>,
}

impl Readiness {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            pending: BTreeSet::new(),
            tx,
        }
    }

    pub fn subscribe(&self) -> ReadyWaiter {
        ReadyWaiter {
            rx: self.tx.subscribe(),
        }
    }

    /// Record a fragment the host has started loading
    pub fn register(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        debug!(%fragment, "Fragment registered");
        self.pending.insert(fragment);
    }

    /// Mark a fragment loaded. Fires when it was the last one outstanding.
    /// Unknown fragments are ignored.
    pub fn complete(&mut self, fragment: &str) {
        if !self.pending.remove(fragment) {
            return;
        }
        debug!(%fragment, remaining = self.pending.len(), "Fragment complete");
        if self.pending.is_empty() {
            self.fire();
        }
    }

    /// Fire if nothing is outstanding. Returns whether it fired.
    pub fn announce(&mut self) -> bool {
        if !self.pending.is_empty() {
            return false;
        }
        self.fire();
        true
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Has the signal fired at least once
    pub fn has_fired(&self) -> bool {
        *self.tx.borrow() > 0
    }

    fn fire(&mut self) {
        self.tx.send_modify(|generation| *generation += 1);
        debug!(generation = *self.tx.borrow(), "Host ready");
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ReadyWaiter {
    rx: watch::Receiver<u64>,
}

impl ReadyWaiter {
    /// Resolve once the host has been ready at least once. Returns `false`
    /// if the [`Readiness`] was dropped without ever firing.
    pub async fn ready(&mut self) -> bool {
        self.rx.wait_for(|generation| *generation > 0).await.is_ok()
    }

    /// Resolve on the next firing after the last one this waiter saw.
    /// Returns `false` if the [`Readiness`] was dropped.
    pub async fn next_ready(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_last_fragment() {
        let mut readiness = Readiness::new();
        readiness.register("navbar");
        readiness.register("footer");

        readiness.complete("navbar");
        assert!(!readiness.has_fired());

        readiness.complete("unknown");
        assert!(!readiness.has_fired());

        readiness.complete("footer");
        assert!(readiness.has_fired());
        assert_eq!(readiness.pending(), 0);
    }

    #[test]
    fn test_announce_waits_for_pending() {
        let mut readiness = Readiness::new();
        readiness.register("navbar");
        assert!(!readiness.announce());

        readiness.complete("navbar");
        assert!(readiness.announce());
    }

    #[tokio::test]
    async fn test_waiter_after_fire_resolves_immediately() {
        let mut readiness = Readiness::new();
        assert!(readiness.announce());

        let mut waiter = readiness.subscribe();
        assert!(waiter.ready().await);
    }

    #[tokio::test]
    async fn test_waiter_wakes_on_completion() {
        let mut readiness = Readiness::new();
        readiness.register("navbar");
        let mut waiter = readiness.subscribe();

        let task = tokio::spawn(async move { waiter.ready().await });
        readiness.complete("navbar");

        assert!(task.await.unwrap());
    }

    #[tokio::test]
    async fn test_dropped_before_firing() {
        let readiness = Readiness::new();
        let mut waiter = readiness.subscribe();
        drop(readiness);
        assert!(!waiter.ready().await);
    }

    #[tokio::test]
    async fn test_next_waits_for_another_firing() {
        let mut readiness = Readiness::new();
        let mut waiter = readiness.subscribe();
        readiness.announce();
        assert!(waiter.ready().await);

        readiness.register("late-fragment");
        readiness.complete("late-fragment");
        assert!(waiter.next_ready().await);
    }
}
