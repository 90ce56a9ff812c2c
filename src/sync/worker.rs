//! Background TLE fetching
//!
//! Each request runs on its own short-lived thread so lookups for different
//! ids overlap. Results come back over a channel and are applied by the
//! owner on the UI thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::data::{SatelliteData, TleSource};
use crate::propagation::SubpointLocator;

use super::SyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: String,
    /// Token matched against the controller's state when the result lands
    pub generation: u64,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub id: String,
    pub generation: u64,
    pub result: Result<SatelliteData, SyncError>,
}

pub struct FetchWorker {
    source: Arc<dyn TleSource>,
    locator: Arc<dyn SubpointLocator>,
    sender: Sender<FetchOutcome>,
    receiver: Receiver<FetchOutcome>,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn TleSource>, locator: Arc<dyn SubpointLocator>) -> Self {
        let (sender, receiver) = mpsc::channel::<FetchOutcome>();
        Self {
            source,
            locator,
            sender,
            receiver,
        }
    }

    /// Start a lookup. Exactly one outcome is delivered per request.
    pub fn spawn(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let locator = Arc::clone(&self.locator);
        let sender = self.sender.clone();
        let FetchRequest { id, generation } = request;
        let thread_id = id.clone();

        let spawned = thread::Builder::new()
            .name(format!("tle-fetch-{}", id))
            .spawn(move || {
                let result = resolve(source.as_ref(), locator.as_ref(), &thread_id);
                // Receiver only goes away with the controller
                let _ = sender.send(FetchOutcome {
                    id: thread_id,
                    generation,
                    result,
                });
            });

        if let Err(e) = spawned {
            log::error!("Could not start fetch for satellite {}: {}", id, e);
            let _ = self.sender.send(FetchOutcome {
                id,
                generation,
                result: Err(SyncError::Spawn(e)),
            });
        }
    }

    pub fn try_recv(&self) -> Option<FetchOutcome> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next outcome
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn resolve(
    source: &dyn TleSource,
    locator: &dyn SubpointLocator,
    id: &str,
) -> Result<SatelliteData, SyncError> {
    let record = source.fetch(id)?;
    let point = locator.locate(&record)?;
    Ok(SatelliteData {
        id: id.to_string(),
        name: record.name,
        longitude: point.longitude,
        latitude: point.latitude,
    })
}
