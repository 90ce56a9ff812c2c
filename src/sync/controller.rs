//! Keeps the displayed satellites in step with the desired set

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::data::{SatelliteData, SatelliteDataCache, TleSource};
use crate::propagation::SubpointLocator;
use crate::scene::{BodyKind, Scene};

use super::{FetchOutcome, FetchRequest, FetchWorker, SyncError};

/// Where a desired id currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackState {
    Fetching { generation: u64 },
    Displayed,
    /// Lookup failed; not retried until asked
    Failed { reason: String },
}

/// Row of the active satellite list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntry {
    pub id: String,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Loading,
    Displayed { name: String },
    Failed { reason: String },
}

/// What one reconcile pass did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: Vec<String>,
    pub requested: Vec<String>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.requested.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub applied: usize,
    /// Results for ids that were removed or re-requested while in flight
    pub discarded: usize,
}

pub struct SatelliteSync {
    desired: BTreeSet<String>,
    tracked: HashMap<String, TrackState>,
    cache: SatelliteDataCache,
    /// Satellite id -> registry name of its scene object
    displayed: HashMap<String, String>,
    worker: FetchWorker,
    next_generation: u64,
}

impl SatelliteSync {
    pub fn new(source: Arc<dyn TleSource>, locator: Arc<dyn SubpointLocator>) -> Self {
        Self {
            desired: BTreeSet::new(),
            tracked: HashMap::new(),
            cache: SatelliteDataCache::new(),
            displayed: HashMap::new(),
            worker: FetchWorker::new(source, locator),
            next_generation: 0,
        }
    }

    pub fn desired(&self) -> &BTreeSet<String> {
        &self.desired
    }

    pub fn state(&self, satellite_id: &str) -> Option<&TrackState> {
        self.tracked.get(satellite_id)
    }

    pub fn cache(&self) -> &SatelliteDataCache {
        &self.cache
    }

    /// Scene object name for a displayed id
    pub fn displayed_name(&self, satellite_id: &str) -> Option<&str> {
        self.displayed.get(satellite_id).map(String::as_str)
    }

    pub fn displayed_ids(&self) -> BTreeSet<String> {
        self.displayed.keys().cloned().collect()
    }

    /// Number of lookups whose results are still awaited
    pub fn in_flight(&self) -> usize {
        self.tracked
            .values()
            .filter(|state| matches!(state, TrackState::Fetching { .. }))
            .count()
    }

    /// Active list rows in id order
    pub fn entries(&self) -> Vec<ActiveEntry> {
        self.desired
            .iter()
            .map(|id| {
                let status = match self.tracked.get(id) {
                    Some(TrackState::Displayed) => EntryStatus::Displayed {
                        name: self
                            .cache
                            .get(id)
                            .map(|data| data.name.clone())
                            .unwrap_or_default(),
                    },
                    Some(TrackState::Failed { reason }) => EntryStatus::Failed {
                        reason: reason.clone(),
                    },
                    Some(TrackState::Fetching { .. }) | None => EntryStatus::Loading,
                };
                ActiveEntry {
                    id: id.clone(),
                    status,
                }
            })
            .collect()
    }

    /// Make `desired` the wanted set and bring the scene towards it.
    ///
    /// Ids no longer wanted are removed first; missing ids are then handed
    /// to the fetch worker. Results land in [`SatelliteSync::poll`].
    pub fn reconcile(&mut self, scene: &mut Scene, desired: BTreeSet<String>) -> ReconcileReport {
        self.desired = desired;
        let mut report = ReconcileReport::default();

        let mut to_remove: Vec<String> = self
            .tracked
            .keys()
            .filter(|id| !self.desired.contains(*id))
            .cloned()
            .collect();
        to_remove.sort();
        for id in to_remove {
            self.drop_id(scene, &id);
            report.removed.push(id);
        }

        let to_add: Vec<String> = self
            .desired
            .iter()
            .filter(|id| !self.tracked.contains_key(*id))
            .cloned()
            .collect();
        for id in to_add {
            self.begin_fetch(&id);
            report.requested.push(id);
        }

        if !report.is_empty() {
            log::debug!(
                "Reconciled: removed {:?}, requested {:?}",
                report.removed,
                report.requested
            );
        }
        report
    }

    /// Reconcile against the current desired set
    pub fn resync(&mut self, scene: &mut Scene) -> ReconcileReport {
        let desired = self.desired.clone();
        self.reconcile(scene, desired)
    }

    /// Add an id typed by the user. Empty and already-desired ids are ignored.
    pub fn request(&mut self, scene: &mut Scene, raw_id: &str) -> bool {
        let id = raw_id.trim();
        if id.is_empty() || self.desired.contains(id) {
            return false;
        }
        let mut desired = self.desired.clone();
        desired.insert(id.to_string());
        self.reconcile(scene, desired);
        true
    }

    /// Drop an id from the desired set, the cache, the displayed map and the
    /// scene in one step
    pub fn remove(&mut self, scene: &mut Scene, satellite_id: &str) -> bool {
        let was_desired = self.desired.contains(satellite_id);
        self.drop_id(scene, satellite_id);
        self.resync(scene);
        was_desired
    }

    /// Fetch a failed id again
    pub fn retry(&mut self, satellite_id: &str) -> bool {
        match self.tracked.get(satellite_id) {
            Some(TrackState::Failed { .. }) if self.desired.contains(satellite_id) => {
                self.begin_fetch(satellite_id);
                true
            }
            _ => false,
        }
    }

    /// Apply every finished lookup without blocking
    pub fn poll(&mut self, scene: &mut Scene) -> PollSummary {
        let mut summary = PollSummary::default();
        while let Some(outcome) = self.worker.try_recv() {
            self.record(scene, outcome, &mut summary);
        }
        summary
    }

    /// Block until nothing is in flight or `timeout` passes.
    ///
    /// Returns true when every lookup has settled.
    pub fn settle(&mut self, scene: &mut Scene, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut summary = PollSummary::default();
        while self.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.worker.recv_timeout(remaining) {
                Some(outcome) => self.record(scene, outcome, &mut summary),
                None => return false,
            }
        }
        true
    }

    fn record(&mut self, scene: &mut Scene, outcome: FetchOutcome, summary: &mut PollSummary) {
        if self.apply(scene, outcome) {
            summary.applied += 1;
        } else {
            summary.discarded += 1;
        }
    }

    fn begin_fetch(&mut self, satellite_id: &str) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.tracked
            .insert(satellite_id.to_string(), TrackState::Fetching { generation });
        self.worker.spawn(FetchRequest {
            id: satellite_id.to_string(),
            generation,
        });
    }

    fn drop_id(&mut self, scene: &mut Scene, satellite_id: &str) {
        if let Some(TrackState::Fetching { .. }) = self.tracked.remove(satellite_id) {
            log::debug!("Cancelled pending lookup for satellite {}", satellite_id);
        }
        self.cache.remove(satellite_id);
        if let Some(name) = self.displayed.remove(satellite_id) {
            scene.despawn(&name);
            log::info!("Removed satellite {} ({})", satellite_id, name);
        }
        self.desired.remove(satellite_id);
    }

    /// Returns false when the outcome was stale and ignored
    fn apply(&mut self, scene: &mut Scene, outcome: FetchOutcome) -> bool {
        let FetchOutcome {
            id,
            generation,
            result,
        } = outcome;

        match self.tracked.get(&id) {
            Some(TrackState::Fetching { generation: current }) if *current == generation => {}
            _ => {
                log::debug!("Discarding stale lookup result for satellite {}", id);
                return false;
            }
        }

        let state = match result.and_then(|data| self.display(scene, data)) {
            Ok(name) => {
                log::info!("Added satellite {} ({})", id, name);
                TrackState::Displayed
            }
            Err(e) => {
                log::warn!("Satellite {} not added: {}", id, e);
                TrackState::Failed {
                    reason: e.to_string(),
                }
            }
        };
        self.tracked.insert(id, state);
        true
    }

    fn display(&mut self, scene: &mut Scene, data: SatelliteData) -> Result<String, SyncError> {
        let id = data.id.clone();
        let name = data.name.clone();
        let (longitude, latitude) = (data.longitude, data.latitude);

        self.cache.insert(data);
        if let Err(e) = scene.spawn(&name, BodyKind::Satellite, longitude, latitude) {
            self.cache.remove(&id);
            return Err(e.into());
        }
        self.displayed.insert(id, name.clone());
        Ok(name)
    }
}
