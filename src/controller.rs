//! Application controller
//!
//! Owns the workout store, the entry form and the persistence gateway, and turns
//! UI events into state transitions and render commands. Rendering is delegated
//! to a [`WorkoutView`] so the same state machine drives the browser shell and
//! the tests.
//!
//! ```text
//! AwaitingLocation --location--> Ready --map click--> FormOpen --submit--> Ready
//!        ^                                                                   |
//!        +------------------------------ reset ------------------------------+
//! ```

use crate::config::{GEOLOCATION_UNSUPPORTED_MESSAGE, INVALID_INPUT_MESSAGE, MAP_ZOOM_LEVEL};
use crate::form::WorkoutForm;
use crate::persistence::{KeyValueStore, PersistenceGateway};
use crate::store::WorkoutStore;
use crate::workout::{Coords, ValidationError, Workout};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::fmt;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AppState {
    /// Waiting for the first location fix; no map exists yet
    #[default]
    AwaitingLocation,
    /// Map is shown, form hidden
    Ready,
    /// Form is open for a workout at `pending`
    FormOpen { pending: Coords },
}

/// Why no location fix arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// No geolocation service available
    Unsupported,
    /// The provider reported an error
    Failed { code: u16, message: String },
    /// The request was dropped before answering
    Cancelled,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Unsupported => write!(f, "{}", GEOLOCATION_UNSUPPORTED_MESSAGE),
            LocationError::Failed { code, message } => write!(f, "ERROR({}): {}", code, message),
            LocationError::Cancelled => write!(f, "Location request was cancelled"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Rejected form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The form is not open for a map location
    NoPendingLocation,
    Invalid(ValidationError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NoPendingLocation => write!(f, "No map location selected"),
            SubmitError::Invalid(e) => write!(f, "Invalid workout: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Invalid(e) => Some(e),
            SubmitError::NoPendingLocation => None,
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Invalid(err)
    }
}

/// Popup shown on a workout marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPopup {
    pub content: String,
    pub class_name: String,
}

impl MarkerPopup {
    pub fn for_workout(workout: &Workout) -> Self {
        Self {
            content: format!("{} {}", workout.kind().icon(), workout.description()),
            class_name: format!("{}-popup", workout.kind()),
        }
    }
}

/// Render surface driven by the controller: map widget, workout list, entry
/// form, alerts and the location request.
pub trait WorkoutView {
    /// Ask for the current position. The answer comes back through
    /// [`Controller::location_acquired`] or [`Controller::location_failed`].
    fn request_location(&mut self);
    fn create_map(&mut self, center: Coords, zoom: f64);
    fn add_marker(&mut self, coords: Coords, popup: &MarkerPopup);
    fn pan_to(&mut self, coords: Coords, zoom: f64);
    /// Insert a list entry directly after the form.
    fn render_entry(&mut self, workout: &Workout);
    /// Reveal the form and focus the distance input.
    fn show_form(&mut self);
    /// Hide the form and restore its layout after a short delay.
    fn hide_form(&mut self);
    fn alert(&mut self, message: &str);
    /// Drop the map, the list entries and the form.
    fn reset(&mut self);
}

pub struct Controller<S: KeyValueStore, V: WorkoutView> {
    state: AppState,
    store: WorkoutStore,
    form: WorkoutForm,
    gateway: PersistenceGateway<S>,
    view: V,
}

impl<S: KeyValueStore, V: WorkoutView> Controller<S, V> {
    /// Create an idle controller. Call [`Controller::start`] to load data and
    /// request a location.
    pub fn new(gateway: PersistenceGateway<S>, view: V) -> Self {
        Self {
            state: AppState::AwaitingLocation,
            store: WorkoutStore::new(),
            form: WorkoutForm::new(),
            gateway,
            view,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn form(&self) -> &WorkoutForm {
        &self.form
    }

    /// Form edits (field text, type toggle) from the UI.
    pub fn form_mut(&mut self) -> &mut WorkoutForm {
        &mut self.form
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Load persisted workouts into the list and ask for the current location.
    ///
    /// Markers wait for the map, which only exists once a location arrives.
    pub fn start(&mut self) {
        if let Some(snapshots) = self.gateway.load() {
            self.store = WorkoutStore::from_snapshot(snapshots);
            for workout in &self.store {
                self.view.render_entry(workout);
            }
            info!("Loaded {} workouts", self.store.len());
        }
        self.view.request_location();
    }

    /// Show the map centered on `coords` with a marker per workout.
    pub fn location_acquired(&mut self, coords: Coords) {
        if self.state != AppState::AwaitingLocation {
            debug!("Ignoring location fix, map already shown");
            return;
        }

        self.view.create_map(coords, MAP_ZOOM_LEVEL);
        for workout in &self.store {
            self.view.add_marker(workout.coords(), &MarkerPopup::for_workout(workout));
        }
        self.state = AppState::Ready;
    }

    /// Report a failed location request. The controller keeps waiting.
    pub fn location_failed(&mut self, error: LocationError) {
        warn!("{}", error);
        if error == LocationError::Unsupported {
            self.view.alert(GEOLOCATION_UNSUPPORTED_MESSAGE);
        }
    }

    /// Open the form for a workout at the clicked position.
    pub fn map_clicked(&mut self, coords: Coords) {
        if self.state == AppState::AwaitingLocation {
            debug!("Ignoring map click before the map exists");
            return;
        }

        self.state = AppState::FormOpen { pending: coords };
        self.view.show_form();
    }

    /// Submit the form using the current time as creation time.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        self.submit_at(Utc::now())
    }

    /// Submit the form, creating the workout at `now`.
    ///
    /// On invalid input an alert is shown and the form stays open with its
    /// contents. On success the workout is stored, rendered and persisted and the
    /// form is cleared and hidden.
    pub fn submit_at(&mut self, now: DateTime<Utc>) -> Result<(), SubmitError> {
        let AppState::FormOpen { pending } = self.state else {
            return Err(SubmitError::NoPendingLocation);
        };

        let input = match self.form.validate() {
            Ok(input) => input,
            Err(e) => {
                debug!("Rejected form: {}", e);
                self.view.alert(INVALID_INPUT_MESSAGE);
                return Err(e.into());
            }
        };

        let workout = Workout::new(pending, input, now);
        info!("New workout {} ({})", workout.id(), workout.description());

        self.view.add_marker(workout.coords(), &MarkerPopup::for_workout(&workout));
        self.view.render_entry(&workout);
        self.store.append(workout);

        self.form.clear();
        self.view.hide_form();
        self.state = AppState::Ready;

        if let Err(e) = self.gateway.save(&self.store) {
            warn!("{}", e);
        }
        Ok(())
    }

    /// Activate the workout behind a clicked list entry.
    ///
    /// `id` is `None` when the click did not land on an entry. Unknown ids and
    /// clicks before the map exists are ignored.
    pub fn list_clicked(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };
        if self.state == AppState::AwaitingLocation {
            debug!("Ignoring list click before the map exists");
            return;
        }
        let Some(workout) = self.store.find_by_id_mut(id) else {
            debug!("No workout with id {}", id);
            return;
        };

        self.view.pan_to(workout.coords(), MAP_ZOOM_LEVEL);
        workout.activate();
    }

    /// Wipe persisted and in-memory workouts and start over.
    pub fn reset(&mut self) {
        if let Err(e) = self.gateway.clear() {
            warn!("{}", e);
        }
        self.store.clear();
        self.form = WorkoutForm::new();
        self.view.reset();
        self.state = AppState::AwaitingLocation;
        info!("Workouts reset");
        self.start();
    }
}
