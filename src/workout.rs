//! Workout records and their derived fields.
//!
//! A [`Workout`] is built once from validated input and never changes afterwards,
//! apart from its activation counter. The derived metric (pace for runs, speed for
//! rides) and the description label are computed at construction time.
//!
//! Persisted data goes through [`WorkoutSnapshot`], a plain serde shape. Turning a
//! snapshot back into a [`Workout`] runs the same validation and metric computation
//! as a fresh construction, so loaded and new records behave identically.

use crate::config::ID_DIGITS;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Month names indexed by zero-based month
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

/// The two supported activity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// A latitude/longitude pair, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

/// Numeric inputs of the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Distance => "Distance",
            Field::Duration => "Duration",
            Field::Cadence => "Cadence",
            Field::ElevationGain => "Elevation gain",
        }
    }
}

/// Rejected workout input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is NaN or infinite
    NotANumber(Field),
    /// Value must be strictly positive
    NotPositive(Field),
    UnknownType(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotANumber(field) => {
                write!(f, "{} must be a valid number", field.label())
            }
            ValidationError::NotPositive(field) => {
                write!(f, "{} must be greater than zero", field.label())
            }
            ValidationError::UnknownType(kind) => write!(f, "Unknown workout type '{}'", kind),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The type-specific value entered alongside distance and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityInput {
    /// Steps per minute
    Running { cadence: f64 },
    /// Meters, may be zero or negative
    Cycling { elevation_gain: f64 },
}

impl ActivityInput {
    pub fn kind(&self) -> WorkoutType {
        match self {
            ActivityInput::Running { .. } => WorkoutType::Running,
            ActivityInput::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// Input that passed validation and can be turned into a [`Workout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    distance: f64,
    duration: f64,
    activity: ActivityInput,
}

impl WorkoutInput {
    /// Validate raw numbers.
    ///
    /// All three values must be finite. Distance and duration must be positive;
    /// cadence must be positive too, elevation gain may take any finite value.
    pub fn new(distance: f64, duration: f64, activity: ActivityInput) -> Result<Self, ValidationError> {
        let (variant_field, variant_value) = match activity {
            ActivityInput::Running { cadence } => (Field::Cadence, cadence),
            ActivityInput::Cycling { elevation_gain } => (Field::ElevationGain, elevation_gain),
        };

        let values = [
            (Field::Distance, distance),
            (Field::Duration, duration),
            (variant_field, variant_value),
        ];
        if let Some((field, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NotANumber(*field));
        }

        let must_be_positive: &[(Field, f64)] = match activity {
            ActivityInput::Running { .. } => &values,
            ActivityInput::Cycling { .. } => &values[..2],
        };
        if let Some((field, _)) = must_be_positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ValidationError::NotPositive(*field));
        }

        Ok(Self {
            distance,
            duration,
            activity,
        })
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn activity(&self) -> ActivityInput {
        self.activity
    }
}

/// Variant payload of a workout, including its derived metric.
///
/// Serialized with a `type` tag so that the persisted shape reads
/// `{"type": "running", "cadence": .., "pace": ..}` or
/// `{"type": "cycling", "elevationGain": .., "speed": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    Running {
        cadence: f64,
        /// min/km
        #[serde(default)]
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        #[serde(default)]
        speed: f64,
    },
}

impl Activity {
    fn compute(input: ActivityInput, distance: f64, duration: f64) -> Self {
        match input {
            ActivityInput::Running { cadence } => Activity::Running {
                cadence,
                pace: duration / distance,
            },
            ActivityInput::Cycling { elevation_gain } => Activity::Cycling {
                elevation_gain,
                speed: distance / (duration / 60.0),
            },
        }
    }

    pub fn kind(&self) -> WorkoutType {
        match self {
            Activity::Running { .. } => WorkoutType::Running,
            Activity::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    fn input(&self) -> ActivityInput {
        match *self {
            Activity::Running { cadence, .. } => ActivityInput::Running { cadence },
            Activity::Cycling { elevation_gain, .. } => ActivityInput::Cycling { elevation_gain },
        }
    }
}

/// Build the `"<Type> on <Month> <day>"` label.
pub fn describe(kind: WorkoutType, date: NaiveDate) -> String {
    format!("{} on {} {}", kind.label(), MONTHS[date.month0() as usize], date.day())
}

/// Record id: the last ten digits of the epoch-millisecond timestamp.
pub fn workout_id(date: DateTime<Utc>) -> String {
    let millis = date.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(ID_DIGITS);
    millis[start..].to_string()
}

/// One logged activity.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    coords: Coords,
    /// km
    distance: f64,
    /// min
    duration: f64,
    date: DateTime<Utc>,
    description: String,
    number: u32,
    activity: Activity,
}

impl Workout {
    /// Construct a record at `coords`, created at `date`.
    ///
    /// The activation counter starts at one: construction counts as the first
    /// activation.
    pub fn new(coords: Coords, input: WorkoutInput, date: DateTime<Utc>) -> Self {
        let activity = Activity::compute(input.activity, input.distance, input.duration);
        let description = describe(activity.kind(), date.with_timezone(&Local).date_naive());
        let mut workout = Self {
            id: workout_id(date),
            coords,
            distance: input.distance,
            duration: input.duration,
            date,
            description,
            number: 0,
            activity,
        };
        workout.activate();
        workout
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> WorkoutType {
        self.activity.kind()
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Activation counter.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn pace(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { pace, .. } => Some(pace),
            Activity::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed, .. } => Some(speed),
            Activity::Running { .. } => None,
        }
    }

    /// Mark the record as selected.
    pub fn activate(&mut self) {
        self.number = self.number.saturating_add(1);
    }
}

/// Plain persisted form of a [`Workout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSnapshot {
    pub id: String,
    pub distance: f64,
    pub duration: f64,
    pub coords: Coords,
    #[serde(flatten)]
    pub activity: Activity,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub number: u32,
}

impl From<&Workout> for WorkoutSnapshot {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id.clone(),
            distance: workout.distance,
            duration: workout.duration,
            coords: workout.coords,
            activity: workout.activity.clone(),
            description: workout.description.clone(),
            date: workout.date,
            number: workout.number,
        }
    }
}

/// A persisted record that cannot be rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    MissingId,
    InvalidCoordinates { id: String },
    Invalid { id: String, source: ValidationError },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::MissingId => write!(f, "Stored workout has no id"),
            SnapshotError::InvalidCoordinates { id } => {
                write!(f, "Stored workout {} has invalid coordinates", id)
            }
            SnapshotError::Invalid { id, source } => {
                write!(f, "Stored workout {} is invalid: {}", id, source)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Invalid { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl TryFrom<WorkoutSnapshot> for Workout {
    type Error = SnapshotError;

    /// Rebuild a record from stored data.
    ///
    /// Inputs are validated like a form submission and the derived metric is
    /// recomputed; the stored metric is ignored. Id, timestamp, description and
    /// activation counter are kept as stored.
    fn try_from(snapshot: WorkoutSnapshot) -> Result<Self, Self::Error> {
        if snapshot.id.is_empty() {
            return Err(SnapshotError::MissingId);
        }
        if !snapshot.coords.is_finite() {
            return Err(SnapshotError::InvalidCoordinates { id: snapshot.id });
        }

        let input = match WorkoutInput::new(
            snapshot.distance,
            snapshot.duration,
            snapshot.activity.input(),
        ) {
            Ok(input) => input,
            Err(source) => {
                return Err(SnapshotError::Invalid {
                    id: snapshot.id,
                    source,
                })
            }
        };

        let activity = Activity::compute(input.activity, input.distance, input.duration);
        let description = if snapshot.description.is_empty() {
            describe(activity.kind(), snapshot.date.with_timezone(&Local).date_naive())
        } else {
            snapshot.description
        };

        Ok(Self {
            id: snapshot.id,
            coords: snapshot.coords,
            distance: input.distance,
            duration: input.duration,
            date: snapshot.date,
            description,
            number: snapshot.number,
            activity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap()
    }

    fn running(distance: f64, duration: f64, cadence: f64) -> WorkoutInput {
        WorkoutInput::new(distance, duration, ActivityInput::Running { cadence }).unwrap()
    }

    fn cycling(distance: f64, duration: f64, elevation_gain: f64) -> WorkoutInput {
        WorkoutInput::new(distance, duration, ActivityInput::Cycling { elevation_gain }).unwrap()
    }

    #[test]
    fn running_pace_is_minutes_per_km() {
        let workout = Workout::new(Coords::new(51.5, -0.12), running(5.0, 30.0, 150.0), date());
        assert_eq!(workout.kind(), WorkoutType::Running);
        assert_eq!(workout.pace(), Some(6.0));
        assert_eq!(workout.speed(), None);
        assert_eq!(workout.number(), 1);
        assert!(workout.description().starts_with("Running on "));
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let workout = Workout::new(Coords::new(0.0, 0.0), cycling(20.0, 60.0, 0.0), date());
        assert_eq!(workout.speed(), Some(20.0));
        assert_eq!(workout.pace(), None);

        let uphill = Workout::new(Coords::new(0.0, 0.0), cycling(27.0, 95.0, 523.0), date());
        assert_eq!(uphill.speed(), Some(27.0 / (95.0 / 60.0)));
    }

    #[test]
    fn describe_uses_month_table_and_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(describe(WorkoutType::Running, day), "Running on January 3");
        let day = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(describe(WorkoutType::Cycling, day), "Cycling on December 31");
    }

    #[test]
    fn id_keeps_last_ten_timestamp_digits() {
        // 1713096000000 ms
        assert_eq!(workout_id(date()), "3096000000");
        let early = Utc.timestamp_millis_opt(12345).unwrap();
        assert_eq!(workout_id(early), "12345");
    }

    #[test]
    fn activate_increments_counter() {
        let mut workout = Workout::new(Coords::new(1.0, 2.0), running(1.0, 5.0, 170.0), date());
        workout.activate();
        workout.activate();
        assert_eq!(workout.number(), 3);
    }

    #[test]
    fn activation_counter_saturates() {
        let workout = Workout::new(Coords::new(1.0, 2.0), running(1.0, 5.0, 170.0), date());
        let mut snapshot = WorkoutSnapshot::from(&workout);
        snapshot.number = u32::MAX;
        let mut restored = Workout::try_from(snapshot).unwrap();
        restored.activate();
        assert_eq!(restored.number(), u32::MAX);
    }

    #[test]
    fn validation_rejects_bad_running_input() {
        let run = |d, t, c| WorkoutInput::new(d, t, ActivityInput::Running { cadence: c });
        assert_eq!(
            run(0.0, 30.0, 150.0),
            Err(ValidationError::NotPositive(Field::Distance))
        );
        assert_eq!(
            run(5.0, -5.0, 150.0),
            Err(ValidationError::NotPositive(Field::Duration))
        );
        assert_eq!(
            run(5.0, 30.0, f64::NAN),
            Err(ValidationError::NotANumber(Field::Cadence))
        );
        assert_eq!(
            run(5.0, 30.0, 0.0),
            Err(ValidationError::NotPositive(Field::Cadence))
        );
        assert_eq!(
            run(f64::INFINITY, 30.0, 150.0),
            Err(ValidationError::NotANumber(Field::Distance))
        );
    }

    #[test]
    fn validation_allows_any_finite_elevation() {
        let ride = |d, t, e| WorkoutInput::new(d, t, ActivityInput::Cycling { elevation_gain: e });
        assert!(ride(20.0, 60.0, -3.0).is_ok());
        assert!(ride(20.0, 60.0, 0.0).is_ok());
        assert_eq!(
            ride(0.0, 60.0, 10.0),
            Err(ValidationError::NotPositive(Field::Distance))
        );
        assert_eq!(
            ride(20.0, 0.0, 10.0),
            Err(ValidationError::NotPositive(Field::Duration))
        );
        assert_eq!(
            ride(20.0, 60.0, f64::NAN),
            Err(ValidationError::NotANumber(Field::ElevationGain))
        );
    }

    #[test]
    fn workout_type_parses_form_values() {
        assert_eq!("running".parse::<WorkoutType>(), Ok(WorkoutType::Running));
        assert_eq!("cycling".parse::<WorkoutType>(), Ok(WorkoutType::Cycling));
        assert_eq!(
            "swimming".parse::<WorkoutType>(),
            Err(ValidationError::UnknownType("swimming".into()))
        );
    }

    #[test]
    fn snapshot_uses_stored_field_names() {
        let workout = Workout::new(Coords::new(51.5, -0.12), cycling(20.0, 60.0, -3.0), date());
        let json = serde_json::to_value(WorkoutSnapshot::from(&workout)).unwrap();

        assert_eq!(json["type"], "cycling");
        assert_eq!(json["id"], "3096000000");
        assert_eq!(json["coords"], serde_json::json!([51.5, -0.12]));
        assert_eq!(json["elevationGain"], -3.0);
        assert_eq!(json["speed"], 20.0);
        assert_eq!(json["number"], 1);
        assert!(json.get("cadence").is_none());
        assert!(json.get("pace").is_none());
    }

    #[test]
    fn rebuilt_workout_matches_original() {
        let original = Workout::new(Coords::new(51.5, -0.12), running(5.0, 30.0, 150.0), date());
        let rebuilt = Workout::try_from(WorkoutSnapshot::from(&original)).unwrap();
        assert_eq!(rebuilt, original);

        let mut rebuilt = rebuilt;
        rebuilt.activate();
        assert_eq!(rebuilt.number(), 2);
    }

    #[test]
    fn rebuilding_recomputes_metric() {
        let json = serde_json::json!({
            "type": "running",
            "id": "1234567890",
            "distance": 10,
            "duration": 50,
            "coords": [1.0, 2.0],
            "cadence": 160,
            "pace": 99.0,
            "description": "Running on May 1",
            "date": "2024-05-01T08:00:00.000Z",
            "number": 4
        });
        let snapshot: WorkoutSnapshot = serde_json::from_value(json).unwrap();
        let workout = Workout::try_from(snapshot).unwrap();
        assert_eq!(workout.pace(), Some(5.0));
        assert_eq!(workout.number(), 4);
        assert_eq!(workout.description(), "Running on May 1");
    }

    #[test]
    fn rebuilding_rejects_invalid_data() {
        let mut snapshot = WorkoutSnapshot::from(&Workout::new(
            Coords::new(1.0, 2.0),
            running(5.0, 30.0, 150.0),
            date(),
        ));
        snapshot.distance = 0.0;
        assert!(matches!(
            Workout::try_from(snapshot.clone()),
            Err(SnapshotError::Invalid { source: ValidationError::NotPositive(Field::Distance), .. })
        ));

        snapshot.distance = 5.0;
        snapshot.coords = Coords::new(f64::NAN, 0.0);
        assert!(matches!(
            Workout::try_from(snapshot.clone()),
            Err(SnapshotError::InvalidCoordinates { .. })
        ));

        snapshot.coords = Coords::new(1.0, 2.0);
        snapshot.id.clear();
        assert_eq!(Workout::try_from(snapshot), Err(SnapshotError::MissingId));
    }
}
