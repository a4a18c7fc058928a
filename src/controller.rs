//! The workout log controller.
//!
//! `WorkoutLog` is the single owner of the workout collection. Every user
//! event goes through it: map clicks open the entry form, submits build and
//! store workouts, list clicks pan the map or delete. After each change the
//! whole collection is written back to the key-value store.

use crate::dlog;
use crate::form::EntryForm;
use crate::map::{
    DEFAULT_ZOOM, Geolocation, GeolocationError, MapView, Popup, TILE_ATTRIBUTION, TILE_URL,
    ViewOptions,
};
use crate::render::{ListRow, ListView, marker_popup};
use crate::storage::{KeyValueStore, load_workouts, save_workouts};
use crate::types::{Coords, InvalidWorkout, Kind, Workout};
use crate::utils::truncate_to_millis;
use chrono::{DateTime, Utc};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("pick a spot on the map before submitting a workout")]
    NoPin,
    #[error(transparent)]
    Invalid(#[from] InvalidWorkout),
}

/// Mutable state behind the controller.
#[derive(Debug, Default, Clone)]
pub struct LogState {
    /// Insertion order, unique by id.
    pub workouts: Vec<Workout>,
    pub current_map_click: Option<Coords>,
    pub form: EntryForm,
    home: Option<Coords>,
    last_id: i64,
}

impl LogState {
    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Creation-timestamp id for a workout made at `now`; strictly greater
    /// than any id issued or restored so far.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis().max(self.last_id + 1)
    }

    /// Ids that cannot be creation timestamps are left out, so the counter
    /// never runs past the last representable millisecond.
    fn note_id(&mut self, id: &str) {
        let max_ms = DateTime::<Utc>::MAX_UTC.timestamp_millis();
        match id.parse::<i64>() {
            Ok(ms) if (0..=max_ms).contains(&ms) => self.last_id = self.last_id.max(ms),
            _ => {
                dlog!("stored id {id} is not a timestamp; not tracked");
            }
        }
    }
}

pub struct WorkoutLog<S, M, L> {
    state: LogState,
    store: S,
    map: Option<M>,
    list: L,
}

impl<S, M, L> WorkoutLog<S, M, L>
where
    S: KeyValueStore,
    M: MapView,
    L: ListView,
{
    /// Controller with no map yet; call [`Self::start`] or
    /// [`Self::on_position`] to bring the map up.
    pub fn new(store: S, list: L) -> Self {
        Self {
            state: LogState::default(),
            store,
            map: None,
            list,
        }
    }

    pub fn start(&mut self, geo: &impl Geolocation, map: M) -> Result<usize, GeolocationError> {
        self.on_position(geo.current_position(), map)
    }

    /// Geolocation callback. On success the map is centered on `position`,
    /// stored workouts are restored and their count returned. On failure the
    /// map stays unavailable for the rest of the session.
    pub fn on_position(
        &mut self,
        position: Result<Coords, GeolocationError>,
        map: M,
    ) -> Result<usize, GeolocationError> {
        let home = match position {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(err = %e, "geolocation failed; map unavailable");
                return Err(e);
            }
        };

        tracing::info!(home = %home, "map ready");
        self.state.home = Some(home);
        self.map = Some(map);
        Ok(self.reload())
    }

    pub const fn map_ready(&self) -> bool {
        self.map.is_some()
    }

    pub const fn state(&self) -> &LogState {
        &self.state
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.state.workouts
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub const fn list(&self) -> &L {
        &self.list
    }

    pub const fn form(&self) -> &EntryForm {
        &self.state.form
    }

    /// Text inputs of the entry form.
    pub const fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.state.form
    }

    /// Map click: remember where, show the form. Ignored without a map.
    pub fn open_form(&mut self, at: Coords) {
        if self.map.is_none() {
            return;
        }
        dlog!("map click at={at}");
        self.state.current_map_click = Some(at);
        self.state.form.open();
    }

    /// Whether the form surface accepts input yet after being hidden.
    pub fn form_interactable(&self, now: Instant) -> bool {
        self.state.form.is_interactable(now)
    }

    pub fn select_kind(&mut self, kind: Kind) {
        self.state.form.select_kind(kind);
    }

    /// Submit with the wall clock.
    pub fn submit_now(&mut self) -> Result<String, SubmitError> {
        self.submit(Utc::now())
    }

    /// Build a workout from the form at the last map click.
    ///
    /// A rejected submission changes nothing: the form stays open with its
    /// values and the error goes back to the caller.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<String, SubmitError> {
        let Some(at) = self
            .state
            .current_map_click
            .filter(|_| self.state.form.is_open())
        else {
            return Err(SubmitError::NoPin);
        };

        let v = self.state.form.values();
        let id_ms = self.state.next_id(now);
        let id = id_ms.to_string();
        let date = truncate_to_millis(now);
        let built = match v.kind {
            Kind::Running => {
                Workout::running(id.clone(), date, v.distance, v.duration, at, v.extra)
            }
            Kind::Cycling => {
                Workout::cycling(id.clone(), date, v.distance, v.duration, at, v.extra)
            }
        };
        let workout = built.map_err(|e| {
            dlog!("submission rejected kind={} err={e}", v.kind);
            SubmitError::from(e)
        })?;
        self.state.last_id = id_ms;

        if let Some(map) = self.map.as_mut() {
            map.add_marker(workout.coords(), marker_popup(&workout));
        }
        self.list.insert_after_form(ListRow::new(&workout));
        tracing::info!(id = %id, kind = %v.kind, at = %at, "workout added");

        self.state.workouts.push(workout);
        self.state.current_map_click = None;
        self.state.form.hide(Instant::now());
        self.persist();
        Ok(id)
    }

    /// List row click: pan to the workout. False when nothing matched.
    pub fn focus(&mut self, id: &str) -> bool {
        let Some(at) = self.state.find(id).map(Workout::coords) else {
            dlog!("focus on unknown workout id={id}");
            return false;
        };
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        map.set_view(at, DEFAULT_ZOOM, ViewOptions::PAN);
        true
    }

    /// Delete affordance: drop the workout, persist, reload the display.
    ///
    /// `Ok(false)` when no workout has that id. If the store write fails the
    /// workout stays removed in memory, the display is redrawn from memory
    /// and the error is returned.
    pub fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        let before = self.state.workouts.len();
        self.state.workouts.retain(|w| w.id() != id);
        if self.state.workouts.len() == before {
            dlog!("delete of unknown workout id={id}");
            return Ok(false);
        }

        tracing::info!(id = %id, remaining = self.state.workouts.len(), "workout deleted");
        if let Err(e) = save_workouts(&mut self.store, &self.state.workouts) {
            tracing::warn!(id = %id, "persisting deletion failed: {e:#}");
            self.redraw();
            return Err(e.context(format!("deleting workout {id}")));
        }
        self.reload();
        Ok(true)
    }

    /// Drop rendered state and rebuild it from the store. Returns how many
    /// workouts were restored.
    pub fn reload(&mut self) -> usize {
        if !self.reset_display() {
            return 0;
        }
        self.state.workouts.clear();
        self.restore()
    }

    /// Re-render the in-memory collection without touching the store.
    fn redraw(&mut self) {
        if !self.reset_display() {
            return;
        }
        for w in &self.state.workouts {
            if let Some(map) = self.map.as_mut() {
                map.add_marker(w.coords(), marker_popup(w));
            }
            self.list.insert_after_form(ListRow::new(w));
        }
    }

    /// Clear list, form and map back to the initial view. False before the
    /// map is up.
    fn reset_display(&mut self) -> bool {
        let Some(home) = self.state.home else {
            return false;
        };

        self.list.clear();
        self.state.current_map_click = None;
        self.state.form = EntryForm::default();

        if let Some(map) = self.map.as_mut() {
            map.clear();
            map.set_view(home, DEFAULT_ZOOM, ViewOptions::INSTANT);
            map.add_tile_layer(TILE_URL, TILE_ATTRIBUTION);
            map.add_marker(home, Popup::simple("You are here"));
        }
        true
    }

    fn restore(&mut self) -> usize {
        let restored = match load_workouts(&self.store) {
            Ok(Some(w)) => w,
            Ok(None) => {
                dlog!("no stored workouts");
                return 0;
            }
            Err(e) => {
                tracing::warn!("stored workouts unreadable, starting empty: {e}");
                return 0;
            }
        };

        for w in restored {
            if self.state.find(w.id()).is_some() {
                tracing::warn!(id = %w.id(), "skipping duplicate stored workout");
                continue;
            }
            self.state.note_id(w.id());
            if let Some(map) = self.map.as_mut() {
                map.add_marker(w.coords(), marker_popup(&w));
            }
            self.list.insert_after_form(ListRow::new(&w));
            self.state.workouts.push(w);
        }

        let n = self.state.workouts.len();
        tracing::info!(count = n, "restored workouts");
        n
    }

    fn persist(&mut self) {
        if let Err(e) = save_workouts(&mut self.store, &self.state.workouts) {
            tracing::warn!("persisting workouts failed: {e:#}");
        }
    }
}
