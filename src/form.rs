use crate::types::Kind;
use crate::utils::field_number;
use std::time::{Duration, Instant};

/// How long a freshly hidden form ignores input while its slide-out plays.
pub const HIDE_COOLDOWN: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Open,
}

/// Numbers read from the form at submit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormValues {
    pub kind: Kind,
    pub distance: f64,
    pub duration: f64,
    /// Cadence for running, elevation gain for cycling.
    pub extra: f64,
}

/// State of the entry form surface.
#[derive(Debug, Clone)]
pub struct EntryForm {
    visibility: Visibility,
    kind: Kind,
    focus: Option<Field>,
    hidden_at: Option<Instant>,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            visibility: Visibility::Hidden,
            kind: Kind::Running,
            focus: None,
            hidden_at: None,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
        }
    }
}

impl EntryForm {
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.visibility, Visibility::Open)
    }

    pub const fn kind(&self) -> Kind {
        self.kind
    }

    pub const fn focus(&self) -> Option<Field> {
        self.focus
    }

    /// The kind-specific field currently shown.
    pub const fn kind_field(&self) -> Field {
        match self.kind {
            Kind::Running => Field::Cadence,
            Kind::Cycling => Field::Elevation,
        }
    }

    pub const fn is_visible(&self, field: Field) -> bool {
        match field {
            Field::Distance | Field::Duration => true,
            Field::Cadence => matches!(self.kind, Kind::Running),
            Field::Elevation => matches!(self.kind, Kind::Cycling),
        }
    }

    /// False while the hide cooldown is still running. Read by the form
    /// surface through `WorkoutLog::form_interactable`.
    pub fn is_interactable(&self, now: Instant) -> bool {
        self.hidden_at
            .is_none_or(|t| now.saturating_duration_since(t) >= HIDE_COOLDOWN)
    }

    pub fn open(&mut self) {
        self.visibility = Visibility::Open;
        self.focus = Some(Field::Distance);
    }

    /// Switch the kind selector; swaps the cadence and elevation rows.
    pub fn select_kind(&mut self, kind: Kind) {
        if self.kind != kind {
            self.kind = kind;
            if matches!(self.focus, Some(Field::Cadence | Field::Elevation)) {
                self.focus = Some(self.kind_field());
            }
        }
    }

    pub fn values(&self) -> FormValues {
        let extra = match self.kind {
            Kind::Running => &self.cadence,
            Kind::Cycling => &self.elevation,
        };
        FormValues {
            kind: self.kind,
            distance: field_number(&self.distance),
            duration: field_number(&self.duration),
            extra: field_number(extra),
        }
    }

    /// Clear every input and hide. The kind selector keeps its value.
    pub fn hide(&mut self, now: Instant) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
        self.visibility = Visibility::Hidden;
        self.focus = None;
        self.hidden_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn opening_focuses_distance() {
        let mut form = EntryForm::default();
        assert_eq!(form.visibility(), Visibility::Hidden);
        form.open();
        assert!(form.is_open());
        assert_eq!(form.focus(), Some(Field::Distance));
    }

    #[rstest]
    fn toggling_kind_swaps_extra_field_only() {
        let mut form = EntryForm::default();
        form.open();
        assert!(form.is_visible(Field::Cadence));
        assert!(!form.is_visible(Field::Elevation));

        form.select_kind(Kind::Cycling);
        assert!(form.is_open());
        assert!(!form.is_visible(Field::Cadence));
        assert!(form.is_visible(Field::Elevation));
        assert_eq!(form.kind_field(), Field::Elevation);
    }

    #[rstest]
    fn values_read_the_visible_extra_field() {
        let mut form = EntryForm::default();
        form.distance = "12".into();
        form.duration = "40".into();
        form.cadence = "170".into();
        form.elevation = "55".into();
        assert_eq!(form.values().extra, 170.0);

        form.select_kind(Kind::Cycling);
        let v = form.values();
        assert_eq!(v.kind, Kind::Cycling);
        assert_eq!((v.distance, v.duration, v.extra), (12.0, 40.0, 55.0));
    }

    #[rstest]
    fn hide_clears_inputs_and_starts_cooldown() {
        let mut form = EntryForm::default();
        form.open();
        form.distance = "5".into();
        let t = Instant::now();
        assert!(form.is_interactable(t));

        form.hide(t);
        assert_eq!(form.visibility(), Visibility::Hidden);
        assert!(form.distance.is_empty());
        assert!(!form.is_interactable(t + Duration::from_millis(500)));
        assert!(form.is_interactable(t + HIDE_COOLDOWN));
    }
}
