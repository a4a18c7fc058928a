use chrono::{DateTime, Datelike, Utc};
use std::fmt;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Running,
    Cycling,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload. The derived metric is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Running { cadence: u32, pace: f64 },
    Cycling { elevation_gain: f64, speed: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidWorkout {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("cadence must be a whole number of steps per minute")]
    FractionalCadence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    date: DateTime<Utc>,
    distance: f64,
    duration: f64,
    coords: Coords,
    activity: Activity,
}

fn finite(field: &'static str, v: f64) -> Result<f64, InvalidWorkout> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(InvalidWorkout::NotFinite { field })
    }
}

fn positive(field: &'static str, v: f64) -> Result<f64, InvalidWorkout> {
    if finite(field, v)? > 0.0 {
        Ok(v)
    } else {
        Err(InvalidWorkout::NotPositive { field })
    }
}

impl Workout {
    /// Build a running workout. `cadence` arrives as read from input and must
    /// be a positive whole number.
    pub fn running(
        id: String,
        date: DateTime<Utc>,
        distance: f64,
        duration: f64,
        coords: Coords,
        cadence: f64,
    ) -> Result<Self, InvalidWorkout> {
        let distance = positive("distance", distance)?;
        let duration = positive("duration", duration)?;
        let cadence = positive("cadence", cadence)?;
        if cadence.fract() != 0.0 || cadence > f64::from(u32::MAX) {
            return Err(InvalidWorkout::FractionalCadence);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cadence = cadence as u32;

        Ok(Self {
            id,
            date,
            distance,
            duration,
            coords,
            activity: Activity::Running {
                cadence,
                pace: duration / distance,
            },
        })
    }

    /// Build a cycling workout. Elevation may be zero or negative.
    pub fn cycling(
        id: String,
        date: DateTime<Utc>,
        distance: f64,
        duration: f64,
        coords: Coords,
        elevation_gain: f64,
    ) -> Result<Self, InvalidWorkout> {
        let distance = positive("distance", distance)?;
        let duration = positive("duration", duration)?;
        let elevation_gain = finite("elevation", elevation_gain)?;

        Ok(Self {
            id,
            date,
            distance,
            duration,
            coords,
            activity: Activity::Cycling {
                elevation_gain,
                speed: distance / (duration / 60.0),
            },
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub const fn kind(&self) -> Kind {
        match self.activity {
            Activity::Running { .. } => Kind::Running,
            Activity::Cycling { .. } => Kind::Cycling,
        }
    }

    /// `Running on April 14`
    pub fn title(&self) -> String {
        let month = MONTHS[self.date.month0() as usize];
        format!("{} on {month} {}", self.kind().label(), self.date.day())
    }

    /// Pace (min/km) or speed (km/h) with its unit.
    pub const fn metric(&self) -> (f64, &'static str) {
        match self.activity {
            Activity::Running { pace, .. } => (pace, "min/km"),
            Activity::Cycling { speed, .. } => (speed, "km/h"),
        }
    }

    /// Cadence (spm) or elevation gain (m) with its unit.
    pub fn detail(&self) -> (f64, &'static str) {
        match self.activity {
            Activity::Running { cadence, .. } => (f64::from(cadence), "spm"),
            Activity::Cycling { elevation_gain, .. } => (elevation_gain, "m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 10, 0, 0).unwrap()
    }

    const LOC: Coords = Coords::new(10.0, 20.0);

    #[rstest]
    #[case(5.0, 25.0, 5.0)]
    #[case(10.0, 42.0, 4.2)]
    #[case(0.5, 3.0, 6.0)]
    fn running_pace_is_duration_over_distance(
        #[case] distance: f64,
        #[case] duration: f64,
        #[case] pace: f64,
    ) {
        let w = Workout::running("1".into(), at(), distance, duration, LOC, 170.0).unwrap();
        let (got, unit) = w.metric();
        assert!((got - pace).abs() < 1e-12);
        assert_eq!(unit, "min/km");
        assert_eq!(w.kind(), Kind::Running);
    }

    #[rstest]
    #[case(100.0)]
    #[case(0.0)]
    #[case(-35.5)]
    fn cycling_speed_ignores_elevation_sign(#[case] elevation: f64) {
        let w = Workout::cycling("1".into(), at(), 20.0, 60.0, LOC, elevation).unwrap();
        assert_eq!(w.metric(), (20.0, "km/h"));
        assert_eq!(w.detail(), (elevation, "m"));
    }

    #[rstest]
    #[case(5.0, 30.0, 0.0, InvalidWorkout::NotPositive { field: "cadence" })]
    #[case(0.0, 30.0, 150.0, InvalidWorkout::NotPositive { field: "distance" })]
    #[case(5.0, -1.0, 150.0, InvalidWorkout::NotPositive { field: "duration" })]
    #[case(f64::NAN, 30.0, 150.0, InvalidWorkout::NotFinite { field: "distance" })]
    #[case(5.0, f64::INFINITY, 150.0, InvalidWorkout::NotFinite { field: "duration" })]
    #[case(5.0, 30.0, 150.5, InvalidWorkout::FractionalCadence)]
    fn running_rejects_bad_input(
        #[case] distance: f64,
        #[case] duration: f64,
        #[case] cadence: f64,
        #[case] expected: InvalidWorkout,
    ) {
        let err = Workout::running("1".into(), at(), distance, duration, LOC, cadence).unwrap_err();
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(0.0, 30.0, 100.0, InvalidWorkout::NotPositive { field: "distance" })]
    #[case(10.0, 0.0, 100.0, InvalidWorkout::NotPositive { field: "duration" })]
    #[case(10.0, 30.0, f64::NAN, InvalidWorkout::NotFinite { field: "elevation" })]
    fn cycling_rejects_bad_input(
        #[case] distance: f64,
        #[case] duration: f64,
        #[case] elevation: f64,
        #[case] expected: InvalidWorkout,
    ) {
        let err =
            Workout::cycling("1".into(), at(), distance, duration, LOC, elevation).unwrap_err();
        assert_eq!(err, expected);
    }

    #[rstest]
    fn title_uses_month_name_and_day() {
        let w = Workout::cycling("1".into(), at(), 20.0, 60.0, LOC, 0.0).unwrap();
        assert_eq!(w.title(), "Cycling on April 14");

        let jan = Utc.with_ymd_and_hms(2025, 1, 3, 23, 59, 0).unwrap();
        let w = Workout::running("2".into(), jan, 5.0, 25.0, LOC, 150.0).unwrap();
        assert_eq!(w.title(), "Running on January 3");
    }
}
