use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::MarkovResult;

/// Designation of a supervised worker: a name and the closure it runs.
///
/// The monitor respawns the worker under the same name whenever it finds
/// it dead, so the closure must be callable any number of times.
pub struct WorkerSpec {
	name: String,
	body: Arc<dyn Fn() + Send + Sync + 'static>,
}

impl WorkerSpec {
	/// Creates a worker designation.
	pub fn new<F>(name: &str, body: F) -> Self
	where
		F: Fn() + Send + Sync + 'static,
	{
		Self {
			name: name.to_owned(),
			body: Arc::new(body),
		}
	}

	/// Spawns the worker on a named OS thread.
	fn spawn(&self) -> std::io::Result<JoinHandle<()>> {
		let body = Arc::clone(&self.body);
		thread::Builder::new()
			.name(self.name.clone())
			.spawn(move || body())
	}
}

/// Background task that keeps a designated worker thread alive.
///
/// # State machine
/// `Stopped -> Running -> Stopped`, no other states. While running, the
/// monitor wakes once per interval, checks whether the worker thread has
/// finished, and respawns it if so.
///
/// # Notes
/// - The monitor thread is daemon-like: it is signalled, never joined, and
///   does not block process shutdown.
/// - Stopping is bounded by one interval: the loop re-checks the flag
///   right after each sleep.
pub struct LivenessMonitor {
	running: Arc<AtomicBool>,
	handle: Option<JoinHandle<()>>,
}

impl LivenessMonitor {
	/// Creates a stopped monitor.
	pub fn new() -> Self {
		Self {
			running: Arc::new(AtomicBool::new(false)),
			handle: None,
		}
	}

	/// Returns true while the monitor loop is scheduled to keep running.
	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::SeqCst)
	}

	/// Spawns the worker and the monitor loop watching it.
	///
	/// # Parameters
	/// - `interval`: Sleep between liveness checks. Injected so tests can
	///   observe revivals without wall-clock waits.
	/// - `spec`: The supervised worker's designation.
	///
	/// # Errors
	/// Returns an error if the worker or monitor thread cannot be spawned.
	///
	/// # Notes
	/// - A no-op when the monitor is already running.
	pub fn start(&mut self, interval: Duration, spec: WorkerSpec) -> MarkovResult<()> {
		if self.is_running() {
			return Ok(());
		}

		let mut worker = spec.spawn()?;

		// Fresh flag per start, so a previous loop still draining its last
		// sleep can never be re-armed.
		let running = Arc::new(AtomicBool::new(true));
		self.running = Arc::clone(&running);

		let handle = thread::Builder::new()
			.name("liveness-monitor".to_owned())
			.spawn(move || {
				while running.load(Ordering::SeqCst) {
					thread::sleep(interval);
					if !running.load(Ordering::SeqCst) {
						break;
					}
					if worker.is_finished() {
						log::warn!("worker '{}' died; trying to revive", spec.name);
						match spec.spawn() {
							Ok(revived) => {
								worker = revived;
								log::info!("successfully restarted worker '{}'", spec.name);
							}
							Err(e) => {
								log::error!("failed to restart worker '{}': {e}", spec.name);
							}
						}
					}
				}
			})?;
		self.handle = Some(handle);

		Ok(())
	}

	/// Signals the monitor loop to stop.
	///
	/// The loop terminates after its current sleep elapses; the already
	/// spawned worker is left to finish on its own.
	pub fn stop(&mut self) {
		self.running.store(false, Ordering::SeqCst);
		self.handle = None;
	}
}

impl Default for LivenessMonitor {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::AtomicUsize;

	const TICK: Duration = Duration::from_millis(10);

	#[test]
	fn test_monitor_revives_dead_worker() {
		let spawned = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&spawned);
		// Worker exits immediately, so every check finds it dead
		let spec = WorkerSpec::new("mortal", move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		let mut monitor = LivenessMonitor::new();
		monitor.start(TICK, spec).unwrap();
		assert!(monitor.is_running());

		thread::sleep(TICK * 10);
		assert!(
			spawned.load(Ordering::SeqCst) >= 2,
			"worker was never revived"
		);

		monitor.stop();
		assert!(!monitor.is_running());

		// One interval may still be in flight; after it drains, the
		// revival count must stay put.
		thread::sleep(TICK * 5);
		let settled = spawned.load(Ordering::SeqCst);
		thread::sleep(TICK * 5);
		assert_eq!(settled, spawned.load(Ordering::SeqCst));
	}

	#[test]
	fn test_monitor_leaves_live_worker_alone() {
		let spawned = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&spawned);
		// Worker outlives the whole test
		let spec = WorkerSpec::new("survivor", move || {
			counter.fetch_add(1, Ordering::SeqCst);
			thread::sleep(Duration::from_secs(60));
		});

		let mut monitor = LivenessMonitor::new();
		monitor.start(TICK, spec).unwrap();

		thread::sleep(TICK * 10);
		assert_eq!(spawned.load(Ordering::SeqCst), 1);

		// Starting again while running is a no-op
		let noop = WorkerSpec::new("ignored", || {});
		monitor.start(TICK, noop).unwrap();
		thread::sleep(TICK * 5);
		assert_eq!(spawned.load(Ordering::SeqCst), 1);

		monitor.stop();
	}

	#[test]
	fn test_monitor_can_restart_after_stop() {
		let mut monitor = LivenessMonitor::new();
		monitor.start(TICK, WorkerSpec::new("first", || {})).unwrap();
		monitor.stop();
		assert!(!monitor.is_running());

		monitor.start(TICK, WorkerSpec::new("second", || {})).unwrap();
		assert!(monitor.is_running());
		monitor.stop();
	}
}
