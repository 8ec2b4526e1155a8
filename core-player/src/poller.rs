//! # State Poller
//!
//! Drives the availability state machine and turns consecutive status polls
//! into [`PlayerEvent`]s.
//!
//! ## Cycle
//!
//! ```text
//!            both processes up                    tokens acquired
//! Unavailable ───────────────────▶ Booting ───────────────────────▶ Available
//!      ▲                              │ token error                     │
//!      │◀─────────────────────────────┘                                 │
//!      │◀───────────────── player or helper gone ───────────────────────┘
//! ```
//!
//! Each call to [`StatePoller::update`] is one cycle:
//!
//! 1. Check both processes. If either is gone the cycle ends (launching the
//!    helper when only the helper is missing, at most once per
//!    [`HELPER_LAUNCH_GRACE`]), and an `Available` poller becomes
//!    `Unavailable`.
//! 2. Acquire tokens if the poller is not yet `Available`. Failure aborts the
//!    cycle and leaves the poller `Unavailable`.
//! 3. Fetch the status, build the new [`PlayerState`] and diff it against the
//!    previous one.
//! 4. Publish the snapshot, then every event of the cycle in order.
//!
//! Cycles are serialized: a manual `update` waits for a running one. A cycle
//! dropped while acquiring tokens leaves the availability it started with.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::ProcessInspector;
use core_auth::{LocalTokenSource, SessionTokens, TokenSource};
use core_catalog::{CatalogClient, Track};
use core_runtime::config::{CoreConfig, ProcessConfig, MIN_POLL_INTERVAL};
use core_runtime::{EventBus, LengthUnit, PlayerEvent, SessionEvent};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::client::LocalPlayerClient;
use crate::error::{PlayerError, Result};
use crate::state::{Availability, PlayerSnapshot, PlayerState};

/// How long a launched helper gets to show up in the process table before
/// it is launched again.
pub const HELPER_LAUNCH_GRACE: Duration = Duration::from_secs(10);

/// State carried from one cycle to the next.
///
/// `availability` is only ever `Unavailable` or `Available` here; `Booting`
/// exists in the published snapshot while tokens are in flight.
#[derive(Default)]
struct CycleState {
    availability: Availability,
    tokens: Option<SessionTokens>,
    previous: PlayerState,
    helper_launched_at: Option<Instant>,
}

/// Puts the published availability back if a boot is abandoned mid-flight.
struct BootGuard<'a> {
    snapshot: &'a RwLock<PlayerSnapshot>,
    restore: Availability,
    armed: bool,
}

impl<'a> BootGuard<'a> {
    fn publish_booting(snapshot: &'a RwLock<PlayerSnapshot>, restore: Availability) -> Self {
        snapshot.write().availability = Availability::Booting;
        Self {
            snapshot,
            restore,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for BootGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(restored = %self.restore, "Boot abandoned");
            self.snapshot.write().availability = self.restore;
        }
    }
}

pub struct StatePoller {
    inspector: Arc<dyn ProcessInspector>,
    token_source: Arc<dyn TokenSource>,
    local: LocalPlayerClient,
    catalog: Arc<CatalogClient>,
    event_bus: EventBus,
    processes: ProcessConfig,
    length_unit: LengthUnit,
    cycle: Mutex<CycleState>,
    snapshot: RwLock<PlayerSnapshot>,
}

impl StatePoller {
    pub fn new(
        inspector: Arc<dyn ProcessInspector>,
        token_source: Arc<dyn TokenSource>,
        local: LocalPlayerClient,
        catalog: Arc<CatalogClient>,
        event_bus: EventBus,
        processes: ProcessConfig,
        length_unit: LengthUnit,
    ) -> Self {
        Self {
            inspector,
            token_source,
            local,
            catalog,
            event_bus,
            processes,
            length_unit,
            cycle: Mutex::new(CycleState::default()),
            snapshot: RwLock::new(PlayerSnapshot::default()),
        }
    }

    /// Poller talking to the local service and token endpoint from `config`.
    pub fn from_config(config: &CoreConfig, catalog: Arc<CatalogClient>, event_bus: EventBus) -> Self {
        let token_source = LocalTokenSource::new(
            config.http_client.clone(),
            config.clock.clone(),
            config.endpoints.clone(),
        );
        let local = LocalPlayerClient::new(
            config.http_client.clone(),
            config.clock.clone(),
            config.endpoints.clone(),
        );

        Self::new(
            config.process_inspector.clone(),
            Arc::new(token_source),
            local,
            catalog,
            event_bus,
            config.processes.clone(),
            config.poll.length_unit,
        )
    }

    /// Latest settled state.
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.read().clone()
    }

    pub fn availability(&self) -> Availability {
        self.snapshot.read().availability
    }

    pub fn current_track(&self) -> Option<Track> {
        self.snapshot.read().state.track.clone()
    }

    /// Run one poll cycle and return the events it produced.
    ///
    /// Events produced before a failure (for instance becoming available
    /// just before a status fetch fails) are still published on the bus.
    #[instrument(skip(self))]
    pub async fn update(&self) -> Result<Vec<PlayerEvent>> {
        let mut cycle = self.cycle.lock().await;
        let mut events = Vec::new();

        let outcome = self.run_cycle(&mut cycle, &mut events).await;

        {
            let mut snapshot = self.snapshot.write();
            snapshot.availability = cycle.availability;
            snapshot.state = cycle.previous.clone();
        }

        for event in &events {
            self.event_bus.emit(event.clone()).ok();
        }

        outcome.map(|()| events)
    }

    async fn run_cycle(&self, cycle: &mut CycleState, events: &mut Vec<PlayerEvent>) -> Result<()> {
        let player_running = self.inspector.is_running(&self.processes.player_process);
        let helper_running = self.inspector.is_running(&self.processes.helper_process);

        if helper_running {
            cycle.helper_launched_at = None;
        }

        if !(player_running && helper_running) {
            if cycle.availability.is_available() {
                info!(player_running, helper_running, "Player became unavailable");
                events.push(PlayerEvent::AvailabilityChanged { available: false });
            }
            cycle.availability = Availability::Unavailable;
            cycle.tokens = None;

            if player_running {
                self.launch_helper(cycle);
            }
            return Ok(());
        }

        let cached = match cycle.availability {
            Availability::Available => cycle.tokens.clone(),
            _ => None,
        };
        let tokens = match cached {
            Some(tokens) => tokens,
            None => self.boot(cycle, events).await?,
        };

        let status = match self.local.status(&tokens).await {
            Ok(status) => status,
            Err(e @ PlayerError::Remote { .. }) => {
                // Rejected tokens are re-acquired on the next cycle.
                cycle.tokens = None;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let state = PlayerState::from_status(status, &cycle.previous, &self.catalog, self.length_unit);
        events.extend(state.changes_since(&cycle.previous));
        cycle.previous = state;

        debug!(events = events.len(), "Poll cycle complete");
        Ok(())
    }

    async fn boot(&self, cycle: &mut CycleState, events: &mut Vec<PlayerEvent>) -> Result<SessionTokens> {
        let was_available = cycle.availability.is_available();
        let guard = BootGuard::publish_booting(&self.snapshot, cycle.availability);
        debug!("Acquiring session tokens");

        let acquired = self.token_source.acquire().await;
        guard.disarm();

        match acquired {
            Ok(tokens) => {
                cycle.availability = Availability::Available;
                cycle.tokens = Some(tokens.clone());
                if !was_available {
                    info!("Player became available");
                    events.push(PlayerEvent::AvailabilityChanged { available: true });
                }
                self.event_bus.emit(SessionEvent::TokensAcquired).ok();
                Ok(tokens)
            }
            Err(e) => {
                warn!(error = %e, "Token acquisition failed");
                cycle.availability = Availability::Unavailable;
                cycle.tokens = None;
                if was_available {
                    events.push(PlayerEvent::AvailabilityChanged { available: false });
                }
                self.event_bus
                    .emit(SessionEvent::TokenError {
                        message: e.to_string(),
                    })
                    .ok();
                Err(e.into())
            }
        }
    }

    fn launch_helper(&self, cycle: &mut CycleState) {
        if let Some(launched_at) = cycle.helper_launched_at {
            if launched_at.elapsed() < HELPER_LAUNCH_GRACE {
                debug!("Helper launch still pending");
                return;
            }
        }

        let Some(path) = &self.processes.helper_path else {
            warn!("Helper is not running and no helper path is configured");
            self.event_bus
                .emit(SessionEvent::HelperLaunchFailed {
                    path: None,
                    message: "no helper path configured".to_string(),
                })
                .ok();
            return;
        };

        match self.inspector.launch(path) {
            Ok(()) => {
                info!(path = %path.display(), "Launched web helper");
                cycle.helper_launched_at = Some(Instant::now());
                self.event_bus
                    .emit(SessionEvent::HelperLaunched {
                        path: path.display().to_string(),
                    })
                    .ok();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to launch web helper");
                self.event_bus
                    .emit(SessionEvent::HelperLaunchFailed {
                        path: Some(path.display().to_string()),
                        message: e.to_string(),
                    })
                    .ok();
            }
        }
    }

    /// Start the player if it is not running.
    ///
    /// Returns `true` when a launch was issued.
    pub fn ensure_player_running(&self) -> Result<bool> {
        if self.inspector.is_running(&self.processes.player_process) {
            return Ok(false);
        }

        let path = self
            .processes
            .player_path
            .as_ref()
            .ok_or_else(|| PlayerError::Launch("no player path configured".to_string()))?;

        self.inspector
            .launch(path)
            .map_err(|e| PlayerError::Launch(e.to_string()))?;

        info!(path = %path.display(), "Launched player");
        Ok(true)
    }

    /// Poll every `interval` on a background task until the handle is
    /// stopped or dropped.
    ///
    /// Cancellation is observed between cycles; a running cycle completes.
    pub fn start_auto_update(self: &Arc<Self>, interval: Duration) -> Result<AutoUpdateHandle> {
        if interval < MIN_POLL_INTERVAL {
            return Err(PlayerError::InvalidInterval {
                requested_ms: interval.as_millis(),
                minimum_ms: MIN_POLL_INTERVAL.as_millis(),
            });
        }

        let cancellation_token = CancellationToken::new();
        let cancelled = cancellation_token.clone();
        let poller = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                if let Err(e) = poller.update().await {
                    warn!(error = %e, "Poll cycle failed");
                }
            }

            debug!("Auto update stopped");
        });

        info!(interval_ms = interval.as_millis() as u64, "Auto update started");
        Ok(AutoUpdateHandle {
            cancellation_token,
            task: Some(task),
        })
    }
}

/// Handle to a running auto-update task. Dropping it stops the task.
pub struct AutoUpdateHandle {
    cancellation_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AutoUpdateHandle {
    /// Request a stop without waiting.
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancellation_token.is_cancelled()
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the task and wait for an in-flight cycle to finish.
    pub async fn stop(mut self) {
        self.cancellation_token.cancel();
        if let Some(task) = self.task.take() {
            task.await.ok();
        }
    }
}

impl Drop for AutoUpdateHandle {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
