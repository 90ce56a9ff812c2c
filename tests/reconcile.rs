//! End-to-end synchronisation against an in-memory TLE source

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use satglobe::data::{FetchError, TleRecord, TleSource};
use satglobe::geo::{to_cartesian, GeoPoint};
use satglobe::propagation::{SubpointError, SubpointLocator};
use satglobe::scene::{BodyKind, Scene, SceneError, EARTH_NAME};
use satglobe::sync::{EntryStatus, SatelliteSync, SyncError, TrackState};

const SETTLE: Duration = Duration::from_secs(5);

fn record(name: &str) -> TleRecord {
    TleRecord {
        satellite_id: None,
        name: name.to_string(),
        date: None,
        line1: String::new(),
        line2: String::new(),
    }
}

/// Serves fixed names by id and answers 404 for everything else
struct StaticSource {
    names: HashMap<&'static str, &'static str>,
}

impl StaticSource {
    fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            names: entries.iter().copied().collect(),
        }
    }
}

impl TleSource for StaticSource {
    fn fetch(&self, satellite_id: &str) -> Result<TleRecord, FetchError> {
        match self.names.get(satellite_id) {
            Some(name) => Ok(record(name)),
            None => Err(FetchError::Status {
                id: satellite_id.to_string(),
                status: 404,
            }),
        }
    }
}

/// Blocks every lookup until the gate is opened
struct GatedSource {
    inner: StaticSource,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl TleSource for GatedSource {
    fn fetch(&self, satellite_id: &str) -> Result<TleRecord, FetchError> {
        let (lock, cvar) = &*self.gate;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
        drop(open);
        self.inner.fetch(satellite_id)
    }
}

/// Puts each satellite at a fixed point chosen by name
struct FixedLocator {
    points: HashMap<&'static str, (f64, f64)>,
}

impl SubpointLocator for FixedLocator {
    fn locate(&self, record: &TleRecord) -> Result<GeoPoint, SubpointError> {
        let (longitude, latitude) = self.points.get(record.name.as_str()).copied().unwrap_or((0.0, 0.0));
        Ok(GeoPoint {
            longitude,
            latitude,
        })
    }
}

fn locator() -> Arc<FixedLocator> {
    Arc::new(FixedLocator {
        points: [
            ("ISS (ZARYA)", (10.0, 20.0)),
            ("HST", (-75.5, 28.5)),
            ("NOAA 19", (120.0, -45.0)),
        ]
        .into_iter()
        .collect(),
    })
}

fn catalogue() -> StaticSource {
    StaticSource::new(&[
        ("25544", "ISS (ZARYA)"),
        ("20580", "HST"),
        ("33591", "NOAA 19"),
    ])
}

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|id| id.to_string()).collect()
}

fn setup() -> (Scene, SatelliteSync) {
    let scene = Scene::with_earth().unwrap();
    let sync = SatelliteSync::new(Arc::new(catalogue()), locator());
    (scene, sync)
}

#[test]
fn test_added_satellite_sits_above_its_subpoint() {
    let (mut scene, mut sync) = setup();

    let report = sync.reconcile(&mut scene, ids(&["25544"]));
    assert_eq!(report.requested, vec!["25544"]);
    assert!(sync.settle(&mut scene, SETTLE));

    assert_eq!(sync.state("25544"), Some(&TrackState::Displayed));
    assert_eq!(sync.displayed_name("25544"), Some("ISS (ZARYA)"));

    let object = scene.object("ISS (ZARYA)").unwrap();
    assert_eq!(object.kind, BodyKind::Satellite);
    assert_eq!(object.location(), (10.0, 20.0));

    let renderable = scene.renderable(object.handle).unwrap();
    let expected = to_cartesian(10.0, 20.0, 6.1);
    assert!((renderable.position - expected).length() < 1e-9);
    assert!((renderable.position.length() - 6.1).abs() < 1e-9);
    assert_eq!(scene.resolve_by_renderable(object.handle), Some("ISS (ZARYA)"));

    let cached = sync.cache().get("25544").unwrap();
    assert_eq!(cached.name, "ISS (ZARYA)");
}

#[test]
fn test_unknown_id_stays_desired_but_is_not_shown() {
    let (mut scene, mut sync) = setup();

    sync.reconcile(&mut scene, ids(&["25544", "99999"]));
    assert!(sync.settle(&mut scene, SETTLE));

    assert!(sync.desired().contains("99999"));
    assert_eq!(sync.displayed_ids(), ids(&["25544"]));
    assert!(!sync.cache().contains("99999"));
    assert!(matches!(sync.state("99999"), Some(TrackState::Failed { .. })));
    assert_eq!(scene.renderable_count(), 2);

    let entries = sync.entries();
    let failed = entries.iter().find(|entry| entry.id == "99999").unwrap();
    match &failed.status {
        EntryStatus::Failed { reason } => assert!(reason.contains("404")),
        other => panic!("unexpected status {:?}", other),
    }

    // A reconcile pass does not refetch a failed id
    let report = sync.resync(&mut scene);
    assert!(report.is_empty());
    assert_eq!(sync.in_flight(), 0);
}

#[test]
fn test_retry_fetches_a_failed_id_again() {
    let (mut scene, mut sync) = setup();
    sync.reconcile(&mut scene, ids(&["99999"]));
    assert!(sync.settle(&mut scene, SETTLE));

    assert!(sync.retry("99999"));
    assert_eq!(sync.in_flight(), 1);
    assert!(sync.settle(&mut scene, SETTLE));
    assert!(matches!(sync.state("99999"), Some(TrackState::Failed { .. })));

    assert!(!sync.retry("25544"));
}

#[test]
fn test_converges_to_desired_set() {
    let (mut scene, mut sync) = setup();

    sync.reconcile(&mut scene, ids(&["25544", "20580"]));
    assert!(sync.settle(&mut scene, SETTLE));
    assert_eq!(sync.displayed_ids(), ids(&["25544", "20580"]));

    let report = sync.reconcile(&mut scene, ids(&["20580", "33591"]));
    assert_eq!(report.removed, vec!["25544"]);
    assert_eq!(report.requested, vec!["33591"]);
    assert!(sync.settle(&mut scene, SETTLE));

    assert_eq!(sync.displayed_ids(), ids(&["20580", "33591"]));
    assert!(scene.object("ISS (ZARYA)").is_none());
    assert!(scene.object("HST").is_some());
    assert!(scene.object("NOAA 19").is_some());
    assert_eq!(scene.renderable_count(), 3);

    let cached: BTreeSet<String> = sync.cache().ids().map(str::to_string).collect();
    assert_eq!(cached, sync.displayed_ids());
}

#[test]
fn test_reconcile_is_idempotent() {
    let (mut scene, mut sync) = setup();
    sync.reconcile(&mut scene, ids(&["25544", "20580"]));
    assert!(sync.settle(&mut scene, SETTLE));

    let revision = scene.revision();
    let report = sync.reconcile(&mut scene, ids(&["25544", "20580"]));

    assert!(report.is_empty());
    assert_eq!(sync.in_flight(), 0);
    assert_eq!(scene.revision(), revision);
}

#[test]
fn test_remove_clears_every_trace() {
    let (mut scene, mut sync) = setup();
    sync.reconcile(&mut scene, ids(&["25544"]));
    assert!(sync.settle(&mut scene, SETTLE));
    let handle = scene.object("ISS (ZARYA)").unwrap().handle;

    assert!(sync.remove(&mut scene, "25544"));

    assert!(sync.desired().is_empty());
    assert!(sync.displayed_ids().is_empty());
    assert!(sync.cache().is_empty());
    assert!(sync.state("25544").is_none());
    assert!(scene.object("ISS (ZARYA)").is_none());
    assert!(scene.renderable(handle).is_none());
    assert!(scene.resolve_by_renderable(handle).is_none());
    assert_eq!(scene.renderable_count(), 1);
    assert!(scene.object(EARTH_NAME).is_some());

    assert!(!sync.remove(&mut scene, "25544"));
}

#[test]
fn test_request_ignores_blank_and_duplicate_ids() {
    let (mut scene, mut sync) = setup();

    assert!(sync.request(&mut scene, " 25544 "));
    assert!(!sync.request(&mut scene, "25544"));
    assert!(!sync.request(&mut scene, "   "));
    assert_eq!(sync.desired(), &ids(&["25544"]));
    assert!(sync.settle(&mut scene, SETTLE));
    assert_eq!(sync.displayed_name("25544"), Some("ISS (ZARYA)"));
}

#[test]
fn test_result_for_removed_id_is_discarded() {
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let source = GatedSource {
        inner: catalogue(),
        gate: Arc::clone(&gate),
    };
    let mut scene = Scene::with_earth().unwrap();
    let mut sync = SatelliteSync::new(Arc::new(source), locator());

    // First lookup is parked behind the gate, then the id is removed and
    // asked for again before it returns
    sync.reconcile(&mut scene, ids(&["25544"]));
    sync.reconcile(&mut scene, BTreeSet::new());
    sync.reconcile(&mut scene, ids(&["25544"]));
    assert_eq!(sync.in_flight(), 1);

    {
        let (lock, cvar) = &*gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    let deadline = Instant::now() + SETTLE;
    let (mut applied, mut discarded) = (0, 0);
    while applied + discarded < 2 && Instant::now() < deadline {
        let summary = sync.poll(&mut scene);
        applied += summary.applied;
        discarded += summary.discarded;
        std::thread::sleep(Duration::from_millis(5));
    }

    // Whichever order the two lookups finish in, only the newer one counts
    assert_eq!((applied, discarded), (1, 1));
    assert_eq!(sync.state("25544"), Some(&TrackState::Displayed));
    assert_eq!(scene.renderable_count(), 2);
    assert_eq!(scene.registry().len(), 2);
}

#[test]
fn test_result_for_dropped_id_never_reaches_scene() {
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let source = GatedSource {
        inner: catalogue(),
        gate: Arc::clone(&gate),
    };
    let mut scene = Scene::with_earth().unwrap();
    let mut sync = SatelliteSync::new(Arc::new(source), locator());

    sync.reconcile(&mut scene, ids(&["20580"]));
    sync.reconcile(&mut scene, BTreeSet::new());
    assert_eq!(sync.in_flight(), 0);

    {
        let (lock, cvar) = &*gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    let deadline = Instant::now() + SETTLE;
    let mut discarded = 0;
    while discarded == 0 && Instant::now() < deadline {
        discarded += sync.poll(&mut scene).discarded;
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(discarded, 1);
    assert!(scene.object("HST").is_none());
    assert!(sync.cache().is_empty());
    assert_eq!(scene.renderable_count(), 1);
}

#[test]
fn test_second_satellite_with_same_name_is_rejected() {
    let source = StaticSource::new(&[("25544", "ISS (ZARYA)"), ("49044", "ISS (ZARYA)")]);
    let mut scene = Scene::with_earth().unwrap();
    let mut sync = SatelliteSync::new(Arc::new(source), locator());

    sync.reconcile(&mut scene, ids(&["25544"]));
    assert!(sync.settle(&mut scene, SETTLE));
    sync.reconcile(&mut scene, ids(&["25544", "49044"]));
    assert!(sync.settle(&mut scene, SETTLE));

    assert_eq!(sync.state("25544"), Some(&TrackState::Displayed));
    match sync.state("49044") {
        Some(TrackState::Failed { reason }) => {
            let expected = SyncError::from(SceneError::DuplicateName("ISS (ZARYA)".into()));
            assert_eq!(reason, &expected.to_string());
        }
        other => panic!("unexpected state {:?}", other),
    }
    assert!(!sync.cache().contains("49044"));
    assert_eq!(scene.renderable_count(), 2);
}
