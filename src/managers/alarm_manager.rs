//! Host scheduling facility for PageKeeper.
//!
//! `AlarmHost` is the narrow surface the scheduler and the deletion path use:
//! named one-shot alarms at absolute times, listed and cleared by name.
//! Creating an alarm under an existing name replaces it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::types::alarm::Alarm;

/// Trait defining the host scheduling facility.
pub trait AlarmHost: Send + Sync {
    fn create(&self, name: &str, fire_at_ms: i64);
    fn get_all(&self) -> Vec<Alarm>;
    /// Returns whether an alarm with that name existed.
    fn clear(&self, name: &str) -> bool;
}

/// Map-backed alarm host that never fires on its own.
///
/// Time is driven by the caller through [`MemoryAlarmHost::take_due`].
#[derive(Default)]
pub struct MemoryAlarmHost {
    alarms: Mutex<HashMap<String, i64>>,
}

impl MemoryAlarmHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the names due at or before `now_ms`, earliest first.
    pub fn take_due(&self, now_ms: i64) -> Vec<String> {
        let mut alarms = match self.alarms.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut due: Vec<(i64, String)> = alarms
            .iter()
            .filter(|(_, at)| **at <= now_ms)
            .map(|(name, at)| (*at, name.clone()))
            .collect();
        due.sort();
        for (_, name) in &due {
            alarms.remove(name);
        }
        due.into_iter().map(|(_, name)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.alarms.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlarmHost for MemoryAlarmHost {
    fn create(&self, name: &str, fire_at_ms: i64) {
        if let Ok(mut alarms) = self.alarms.lock() {
            alarms.insert(name.to_string(), fire_at_ms);
        }
    }

    fn get_all(&self) -> Vec<Alarm> {
        let alarms = match self.alarms.lock() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut all: Vec<Alarm> = alarms
            .iter()
            .map(|(name, at)| Alarm {
                name: name.clone(),
                fire_at: *at,
            })
            .collect();
        all.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.name.cmp(&b.name)));
        all
    }

    fn clear(&self, name: &str) -> bool {
        self.alarms
            .lock()
            .map(|mut a| a.remove(name).is_some())
            .unwrap_or(false)
    }
}

struct PendingAlarm {
    fire_at: i64,
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct TimerTable {
    pending: HashMap<String, PendingAlarm>,
    next_generation: u64,
}

/// Alarm host backed by tokio timers.
///
/// Each alarm is a sleeping task; on expiry it removes itself from the table
/// and sends its name on the channel returned by [`TokioAlarmHost::new`].
/// Alarms live only as long as the process.
pub struct TokioAlarmHost {
    runtime: Handle,
    table: Arc<Mutex<TimerTable>>,
    fired: mpsc::UnboundedSender<String>,
}

impl TokioAlarmHost {
    pub fn new(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (fired, rx) = mpsc::unbounded_channel();
        let host = Self {
            runtime,
            table: Arc::new(Mutex::new(TimerTable::default())),
            fired,
        };
        (host, rx)
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl AlarmHost for TokioAlarmHost {
    fn create(&self, name: &str, fire_at_ms: i64) {
        let mut table = match self.table.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("alarm table lock poisoned, dropping alarm {}: {}", name, e);
                return;
            }
        };
        table.next_generation += 1;
        let generation = table.next_generation;

        let delay = Duration::from_millis((fire_at_ms - Self::now_ms()).max(0) as u64);
        let owned_name = name.to_string();
        let shared = Arc::clone(&self.table);
        let fired = self.fired.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let still_current = match shared.lock() {
                Ok(mut table) => match table.pending.get(&owned_name) {
                    Some(p) if p.generation == generation => {
                        table.pending.remove(&owned_name);
                        true
                    }
                    _ => false,
                },
                Err(_) => false,
            };
            if still_current {
                debug!("alarm fired: {}", owned_name);
                let _ = fired.send(owned_name);
            }
        });

        if let Some(previous) = table.pending.insert(
            name.to_string(),
            PendingAlarm {
                fire_at: fire_at_ms,
                generation,
                task,
            },
        ) {
            previous.task.abort();
        }
    }

    fn get_all(&self) -> Vec<Alarm> {
        let table = match self.table.lock() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut all: Vec<Alarm> = table
            .pending
            .iter()
            .map(|(name, p)| Alarm {
                name: name.clone(),
                fire_at: p.fire_at,
            })
            .collect();
        all.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.name.cmp(&b.name)));
        all
    }

    fn clear(&self, name: &str) -> bool {
        let removed = match self.table.lock() {
            Ok(mut table) => table.pending.remove(name),
            Err(_) => None,
        };
        match removed {
            Some(p) => {
                p.task.abort();
                true
            }
            None => false,
        }
    }
}
