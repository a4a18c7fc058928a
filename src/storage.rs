use crate::types::{Activity, Coords, InvalidWorkout, Workout};
use crate::utils::{format_timestamp, parse_timestamp};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key the whole workout collection is stored under.
pub const WORKOUTS_KEY: &str = "workouts";

/// String-keyed persistent store with whole-value overwrite semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error("decoding stored workouts: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("workout {id}: bad date {date:?}: {source}")]
    Date {
        id: String,
        date: String,
        source: chrono::ParseError,
    },

    #[error("workout {id}: {source}")]
    Invalid { id: String, source: InvalidWorkout },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredWorkout {
    id: String,
    date: String,
    distance: f64,
    duration: f64,
    coordinates: [f64; 2],
    #[serde(flatten)]
    activity: StoredActivity,
}

// Derived fields are written for whoever reads the raw value and recomputed
// on restore.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoredActivity {
    Running {
        cadence: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pace: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Cycling {
        elevation_gain: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed: Option<f64>,
    },
}

impl From<&Workout> for StoredWorkout {
    fn from(w: &Workout) -> Self {
        let c = w.coords();
        let activity = match *w.activity() {
            Activity::Running { cadence, pace } => StoredActivity::Running {
                cadence,
                pace: Some(pace),
            },
            Activity::Cycling {
                elevation_gain,
                speed,
            } => StoredActivity::Cycling {
                elevation_gain,
                speed: Some(speed),
            },
        };
        Self {
            id: w.id().to_string(),
            date: format_timestamp(w.date()),
            distance: w.distance(),
            duration: w.duration(),
            coordinates: [c.lat, c.lng],
            activity,
        }
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = RestoreError;

    fn try_from(s: StoredWorkout) -> Result<Self, Self::Error> {
        let date = match parse_timestamp(&s.date) {
            Ok(d) => d,
            Err(source) => {
                return Err(RestoreError::Date {
                    id: s.id,
                    date: s.date,
                    source,
                });
            }
        };
        let coords = Coords::new(s.coordinates[0], s.coordinates[1]);
        let built = match s.activity {
            StoredActivity::Running { cadence, .. } => Self::running(
                s.id.clone(),
                date,
                s.distance,
                s.duration,
                coords,
                f64::from(cadence),
            ),
            StoredActivity::Cycling { elevation_gain, .. } => Self::cycling(
                s.id.clone(),
                date,
                s.distance,
                s.duration,
                coords,
                elevation_gain,
            ),
        };
        built.map_err(|source| RestoreError::Invalid { id: s.id, source })
    }
}

pub fn encode_workouts(workouts: &[Workout]) -> Result<String> {
    let stored: Vec<StoredWorkout> = workouts.iter().map(StoredWorkout::from).collect();
    serde_json::to_string(&stored).context("encoding workouts")
}

pub fn decode_workouts(json: &str) -> Result<Vec<Workout>, RestoreError> {
    let stored: Vec<StoredWorkout> = serde_json::from_str(json)?;
    stored.into_iter().map(Workout::try_from).collect()
}

/// Overwrite the stored collection with `workouts`.
pub fn save_workouts<S: KeyValueStore + ?Sized>(store: &mut S, workouts: &[Workout]) -> Result<()> {
    let json = encode_workouts(workouts)?;
    store
        .set(WORKOUTS_KEY, &json)
        .with_context(|| format!("writing key {WORKOUTS_KEY:?}"))?;
    crate::dlog!("saved workouts count={} bytes={}", workouts.len(), json.len());
    Ok(())
}

/// `Ok(None)` when nothing has been stored yet.
pub fn load_workouts<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<Vec<Workout>>, RestoreError> {
    let Some(json) = store.get(WORKOUTS_KEY)? else {
        return Ok(None);
    };
    decode_workouts(&json).map(Some)
}
