//! Call scheduler
//!
//! The scheduler accepts "call later" requests, holds them in an in-memory
//! store, and periodically sweeps the store for due entries, placing each
//! through the configured [`CallPlacer`]. Entries transition from pending to
//! executed or failed exactly once; terminal entries are purged after a
//! retention window.
//!
//! The store lives only in process memory: a restart drops every pending
//! entry. This is a documented limitation of the component, not a bug.

pub mod config;

pub use config::SchedulerConfig;

use crate::call::{CallRequest, CallResponse, CallSchedule, CallStatus, ScheduledCall};
use crate::placer::CallPlacer;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Call scheduler - places calls now or at a scheduled time
///
/// Cheap to clone; clones share the same store and sweep loop. Construct one
/// instance per process, call [`CallScheduler::start`] to begin sweeping,
/// and hand clones to whatever route handlers need to schedule or cancel
/// calls.
///
/// `schedule`, `cancel`, and the read operations never touch the network;
/// only [`CallScheduler::place_immediately`] and the sweep do.
///
/// # Example
///
/// ```rust,no_run
/// use outdial::{CallRequest, CallSchedule, CallScheduler, SchedulerConfig};
/// use outdial::placer::HttpCallPlacer;
/// use std::sync::Arc;
///
/// # async fn example() -> outdial::Result<()> {
/// let placer = Arc::new(
///     HttpCallPlacer::builder()
///         .base_url("https://api.vapi.ai")
///         .api_key("sk-…")
///         .build()?,
/// );
///
/// let scheduler = CallScheduler::new(placer, SchedulerConfig::default());
/// scheduler.start();
///
/// let request = CallRequest::builder()
///     .customer_name("Jordan Reyes")
///     .phone_number("4155550000")
///     .assistant_id("asst_listing_followup")
///     .phone_number_id("line_sf_office")
///     .build()?;
///
/// let response = scheduler.schedule(request, CallSchedule::time_of_day("17:00", "America/New_York"))?;
/// assert_eq!(response.status, "scheduled");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CallScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    placer: Arc<dyn CallPlacer>,
    config: SchedulerConfig,
    store: Mutex<HashMap<String, ScheduledCall>>,
    /// Serializes sweeps: a manual sweep overlapping the timer must not
    /// double-place an entry.
    sweep_lock: tokio::sync::Mutex<()>,
    shutdown: AtomicBool,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

/// Outcome of one sweep pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Due entries for which a placement was attempted
    pub attempted: usize,
    /// Attempts the voice API accepted
    pub executed: usize,
    /// Attempts that failed (including timeouts)
    pub failed: usize,
    /// Terminal entries deleted by the cleanup pass
    pub purged: usize,
}

/// Store counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Entries waiting for their scheduled time
    pub pending: usize,
    /// Entries placed successfully and still within the retention window
    pub executed: usize,
    /// Entries that failed placement and are still within the retention window
    pub failed: usize,
}

impl CallScheduler {
    /// Create a new scheduler
    ///
    /// The scheduler does not sweep until [`CallScheduler::start`] is called;
    /// hosts driving their own cadence can call [`CallScheduler::sweep`]
    /// directly instead.
    #[must_use]
    pub fn new(placer: Arc<dyn CallPlacer>, config: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                placer,
                config,
                store: Mutex::new(HashMap::new()),
                sweep_lock: tokio::sync::Mutex::new(()),
                shutdown: AtomicBool::new(false),
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Schedule a call for later placement
    ///
    /// Validates and normalizes the request, resolves `when` to an absolute
    /// instant, and stores the entry as pending. Returns a [`CallResponse`]
    /// whose `id` is the scheduled-call id and whose status is
    /// `"scheduled"`, so callers can treat scheduled and immediate calls
    /// uniformly. Never blocks on network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed request or a schedule
    /// with no resolvable time; nothing is stored in that case.
    pub fn schedule(&self, request: CallRequest, when: CallSchedule) -> Result<CallResponse> {
        let request = request.normalize()?;
        let now = Utc::now();
        let scheduled_time = when.resolve(now)?;

        let call = ScheduledCall {
            id: Uuid::new_v4().to_string(),
            scheduled_time,
            request,
            status: CallStatus::Pending,
            created_at: now,
            last_error: None,
        };

        let response = CallResponse {
            id: call.id.clone(),
            status: "scheduled".to_string(),
            scheduled_time: Some(scheduled_time),
        };

        tracing::debug!(
            id = %call.id,
            number = %call.request.phone_number,
            at = %scheduled_time,
            "call scheduled"
        );

        self.store().insert(call.id.clone(), call);
        Ok(response)
    }

    /// Cancel a scheduled call
    ///
    /// Returns whether an entry was removed. Idempotent: cancelling an
    /// unknown id returns `false`. Cancelling a terminal entry just deletes
    /// the stale record. Has no effect on a placement already in flight.
    pub fn cancel(&self, id: &str) -> bool {
        let removed = self.store().remove(id).is_some();
        if removed {
            tracing::debug!(%id, "scheduled call cancelled");
        }
        removed
    }

    /// Snapshot of all pending entries
    pub fn list_pending(&self) -> Vec<ScheduledCall> {
        self.store()
            .values()
            .filter(|call| call.status == CallStatus::Pending)
            .cloned()
            .collect()
    }

    /// Snapshot of every entry still in the store, terminal ones included
    pub fn list_all(&self) -> Vec<ScheduledCall> {
        self.store().values().cloned().collect()
    }

    /// Snapshot of a single entry
    pub fn get(&self, id: &str) -> Option<ScheduledCall> {
        self.store().get(id).cloned()
    }

    /// Store counts by status
    pub fn stats(&self) -> SchedulerStats {
        let store = self.store();
        let mut stats = SchedulerStats::default();
        for call in store.values() {
            match call.status {
                CallStatus::Pending => stats.pending += 1,
                CallStatus::Executed => stats.executed += 1,
                CallStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Validate, normalize, and place a call right now
    ///
    /// The direct pass-through the sweep reuses. Errors from the placer
    /// propagate to the caller; no scheduler-imposed timeout applies on this
    /// path.
    pub async fn place_immediately(&self, request: CallRequest) -> Result<CallResponse> {
        let request = request.normalize()?;
        self.inner.placer.place(&request).await
    }

    /// Start the background sweep loop
    ///
    /// Sweeps once immediately, so entries already due at startup are not
    /// delayed a full period, then once per configured interval. Idempotent
    /// while the loop is running. Must be called from within a tokio
    /// runtime.
    pub fn start(&self) {
        let mut sweeper = lock(&self.inner.sweeper);
        if sweeper.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        self.inner.shutdown.store(false, Ordering::Relaxed);
        let scheduler = self.clone();
        *sweeper = Some(tokio::spawn(scheduler.run()));
    }

    /// Stop the background sweep loop
    ///
    /// Aborts the loop task; a placement in flight at that moment may be
    /// dropped without a status transition.
    pub fn stop(&self) {
        self.inner.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = lock(&self.inner.sweeper).take() {
            handle.abort();
        }
    }

    /// Sweep loop driven by the interval timer
    async fn run(self) {
        tracing::info!(
            interval = ?self.inner.config.sweep_interval,
            retention = ?self.inner.config.retention,
            "call scheduler started"
        );

        self.sweep().await;

        let mut timer = tokio::time::interval(self.inner.config.sweep_interval);
        // The interval's first tick completes immediately; the eager sweep
        // above already covered it.
        timer.tick().await;

        while !self.inner.shutdown.load(Ordering::Relaxed) {
            timer.tick().await;
            if self.inner.shutdown.load(Ordering::Relaxed) {
                break;
            }
            self.sweep().await;
        }

        tracing::info!("call scheduler stopped");
    }

    /// Run one sweep pass
    ///
    /// Places every due pending entry, recording `executed` or `failed` per
    /// entry, then purges terminal entries older than the retention window.
    /// One entry's failure is isolated: it is logged, recorded on the entry,
    /// and never stops the rest of the batch. Concurrent sweeps are
    /// serialized.
    pub async fn sweep(&self) -> SweepReport {
        let _guard = self.inner.sweep_lock.lock().await;
        let now = Utc::now();

        let due: Vec<(String, CallRequest)> = self
            .store()
            .values()
            .filter(|call| call.is_due(now))
            .map(|call| (call.id.clone(), call.request.clone()))
            .collect();

        let mut report = SweepReport {
            attempted: due.len(),
            ..SweepReport::default()
        };

        for (id, request) in due {
            let outcome = match tokio::time::timeout(
                self.inner.config.placement_timeout,
                self.inner.placer.place(&request),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(Error::placement(format!(
                    "placement timed out after {:?}",
                    self.inner.config.placement_timeout
                ))),
            };

            let mut store = self.store();
            // Cancelled while the placement was in flight; nothing to record.
            let Some(call) = store.get_mut(&id) else {
                continue;
            };

            match outcome {
                Ok(response) => {
                    call.status = CallStatus::Executed;
                    report.executed += 1;
                    tracing::info!(%id, call_id = %response.id, "scheduled call placed");
                }
                Err(e) => {
                    call.status = CallStatus::Failed;
                    call.last_error = Some(e.to_string());
                    report.failed += 1;
                    tracing::warn!(%id, error = %e, "scheduled call placement failed");
                }
            }
        }

        report.purged = self.purge_expired(now);

        if report.attempted > 0 || report.purged > 0 {
            tracing::debug!(
                attempted = report.attempted,
                executed = report.executed,
                failed = report.failed,
                purged = report.purged,
                "sweep finished"
            );
        }

        report
    }

    /// Delete terminal entries older than the retention window
    ///
    /// Pending entries are never purged, regardless of age: they stay
    /// visible and cancellable until they execute or are cancelled.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let Ok(retention) = chrono::Duration::from_std(self.inner.config.retention) else {
            return 0;
        };
        let Some(cutoff) = now.checked_sub_signed(retention) else {
            return 0;
        };

        let mut store = self.store();
        let before = store.len();
        store.retain(|_, call| {
            call.status == CallStatus::Pending || call.scheduled_time >= cutoff
        });
        before - store.len()
    }

    fn store(&self) -> std::sync::MutexGuard<'_, HashMap<String, ScheduledCall>> {
        lock(&self.inner.store)
    }
}

/// Lock a mutex, recovering the guard if a test thread panicked with it held
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
