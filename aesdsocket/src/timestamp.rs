//! Background thread that appends a formatted timestamp line to the sink
//! on a fixed cadence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use aesd_shared::constants::{TIMESTAMP_FORMAT, TIMESTAMP_INTERVAL_SECS};

use crate::sink::Sink;

pub struct TimestampProducer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimestampProducer {
    /// Spawns the producer thread. It wakes every
    /// `TIMESTAMP_INTERVAL_SECS` seconds, appends a `timestamp:...` line to
    /// `sink`, and checks for shutdown in between sleeps so `stop` is
    /// honored promptly rather than only after a full interval.
    pub fn spawn(sink: Arc<Sink>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("timestamp-producer".into())
            .spawn(move || Self::run(sink, stop_for_thread))
            .expect("failed to spawn timestamp producer thread");
        Self {
            stop,
            handle: Some(handle),
        }
    }

    fn run(sink: Arc<Sink>, stop: Arc<AtomicBool>) {
        let interval = Duration::from_secs(TIMESTAMP_INTERVAL_SECS);
        let poll = Duration::from_millis(200);
        let mut elapsed = Duration::ZERO;
        while !stop.load(Ordering::Relaxed) {
            std::thread::sleep(poll);
            elapsed += poll;
            if elapsed < interval {
                continue;
            }
            elapsed = Duration::ZERO;
            let line = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
            if let Err(err) = sink.append_and_read_all(line.as_bytes()) {
                log::warn!("timestamp producer failed to append: {err}");
            }
        }
    }
}

impl Drop for TimestampProducer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
