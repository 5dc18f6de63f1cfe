//! Tracks in-flight connection-handler threads so shutdown can join every
//! one of them before the process exits.
//!
//! Grounded on the original server's `TAILQ`-based thread list paired with
//! a condition variable that each worker signals on completion, letting the
//! main thread reap finished handlers without blocking the accept loop.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread::JoinHandle;

struct Slot {
    id: u64,
    handle: Option<JoinHandle<()>>,
    peer_addr: SocketAddr,
    done: bool,
}

#[derive(Default)]
pub struct HandlerRegistry {
    slots: Mutex<Vec<Slot>>,
    completed: Condvar,
    next_id: AtomicU64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a slot for a handler that is about to be spawned, returning
    /// an id the caller passes into the handler closure (for `mark_done`)
    /// and into `attach` once the `JoinHandle` is known.
    ///
    /// Reserving the slot before spawning closes a race where the handler
    /// thread could run to completion and call `mark_done` before the main
    /// thread got around to registering its `JoinHandle` — that would leave
    /// `mark_done` with nothing to mark, and a slot inserted afterward that
    /// can never be marked done, hanging `join_all` forever.
    pub fn reserve(&self, peer_addr: SocketAddr) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().expect("registry mutex poisoned").push(Slot {
            id,
            handle: None,
            peer_addr,
            done: false,
        });
        log::debug!("reserved handler slot {id} for {peer_addr}");
        id
    }

    /// Attaches the now-known `JoinHandle` to a previously reserved slot.
    pub fn attach(&self, id: u64, handle: JoinHandle<()>) {
        let mut slots = self.slots.lock().expect("registry mutex poisoned");
        if let Some(slot) = slots.iter_mut().find(|s| s.id == id) {
            slot.handle = Some(handle);
        }
        self.completed.notify_all();
    }

    /// Marks the calling handler's slot done and wakes anyone waiting to
    /// reap it. `id` is the value `reserve` returned for this handler.
    pub fn mark_done(&self, id: u64) {
        let mut slots = self.slots.lock().expect("registry mutex poisoned");
        if let Some(slot) = slots.iter_mut().find(|s| s.id == id) {
            slot.done = true;
        }
        self.completed.notify_all();
    }

    /// Joins and drops every slot that is both done and has its handle
    /// attached, without blocking on slots still running. Call this
    /// periodically from the accept loop so the registry doesn't grow
    /// without bound across a long-lived server.
    pub fn reap_finished(&self) {
        let mut slots = self.slots.lock().expect("registry mutex poisoned");
        let mut i = 0;
        while i < slots.len() {
            if slots[i].done && slots[i].handle.is_some() {
                let slot = slots.remove(i);
                log::debug!("deregistered handler for {}", slot.peer_addr);
                if let Some(handle) = slot.handle {
                    if let Err(err) = handle.join() {
                        log::error!("connection handler thread panicked: {err:?}");
                    }
                }
            } else {
                i += 1;
            }
        }
    }

    /// Blocks until every registered handler has finished and joins them
    /// all. Used during graceful shutdown.
    pub fn join_all(&self) {
        loop {
            let slots = self.slots.lock().expect("registry mutex poisoned");
            if slots.is_empty() {
                return;
            }
            if slots.iter().all(|s| s.done && s.handle.is_some()) {
                drop(slots);
                self.reap_finished();
                return;
            }
            let _guard = self
                .completed
                .wait_timeout(slots, std::time::Duration::from_millis(200))
                .expect("registry mutex poisoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn join_all_waits_for_every_handler_to_signal_done() {
        let registry = Arc::new(HandlerRegistry::new());
        let started = Arc::new(AtomicBool::new(false));

        let id = registry.reserve(addr(9000));
        let registry_for_thread = Arc::clone(&registry);
        let started_for_thread = Arc::clone(&started);
        let handle = std::thread::Builder::new()
            .spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(50));
                started_for_thread.store(true, Ordering::SeqCst);
                registry_for_thread.mark_done(id);
            })
            .unwrap();
        registry.attach(id, handle);

        registry.join_all();
        assert!(started.load(Ordering::SeqCst));
    }

    #[test]
    fn reap_finished_only_removes_done_slots() {
        let registry = HandlerRegistry::new();
        let id = registry.reserve(addr(9001));
        let handle = std::thread::spawn(|| {});
        registry.attach(id, handle);
        registry.reap_finished();
        assert_eq!(registry.slots.lock().unwrap().len(), 1);
    }

    #[test]
    fn mark_done_before_attach_is_not_lost() {
        // Exercises the race the TOCTOU fix closes: the handler finishes
        // and calls `mark_done` before the spawning thread calls `attach`.
        let registry = HandlerRegistry::new();
        let id = registry.reserve(addr(9002));
        registry.mark_done(id);
        let handle = std::thread::spawn(|| {});
        registry.attach(id, handle);
        registry.reap_finished();
        assert!(registry.slots.lock().unwrap().is_empty());
    }
}
