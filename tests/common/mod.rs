//! Shared helpers for controller tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mapty::{
    Controller, Coords, Field, MarkerPopup, MemoryStore, PersistenceGateway, Workout, WorkoutType,
    WorkoutView,
};

/// One call made on the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    RequestLocation,
    CreateMap { center: Coords, zoom: f64 },
    AddMarker { coords: Coords, popup: MarkerPopup },
    PanTo { coords: Coords, zoom: f64 },
    RenderEntry { id: String },
    ShowForm,
    HideForm,
    Alert(String),
    Reset,
}

/// [`WorkoutView`] that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
}

impl RecordingView {
    pub fn take(&mut self) -> Vec<ViewCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ViewCall::Alert(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn markers(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ViewCall::AddMarker { .. }))
            .count()
    }
}

impl WorkoutView for RecordingView {
    fn request_location(&mut self) {
        self.calls.push(ViewCall::RequestLocation);
    }

    fn create_map(&mut self, center: Coords, zoom: f64) {
        self.calls.push(ViewCall::CreateMap { center, zoom });
    }

    fn add_marker(&mut self, coords: Coords, popup: &MarkerPopup) {
        self.calls.push(ViewCall::AddMarker {
            coords,
            popup: popup.clone(),
        });
    }

    fn pan_to(&mut self, coords: Coords, zoom: f64) {
        self.calls.push(ViewCall::PanTo { coords, zoom });
    }

    fn render_entry(&mut self, workout: &Workout) {
        self.calls.push(ViewCall::RenderEntry {
            id: workout.id().to_string(),
        });
    }

    fn show_form(&mut self) {
        self.calls.push(ViewCall::ShowForm);
    }

    fn hide_form(&mut self) {
        self.calls.push(ViewCall::HideForm);
    }

    fn alert(&mut self, message: &str) {
        self.calls.push(ViewCall::Alert(message.to_string()));
    }

    fn reset(&mut self) {
        self.calls.push(ViewCall::Reset);
    }
}

pub type TestController = Controller<MemoryStore, RecordingView>;

pub const LONDON: Coords = Coords {
    lat: 51.5,
    lng: -0.12,
};

pub fn controller_with(backend: MemoryStore) -> TestController {
    Controller::new(PersistenceGateway::new(backend), RecordingView::default())
}

/// Started controller with a map, view log cleared.
pub fn ready_controller() -> TestController {
    let mut controller = controller_with(MemoryStore::new());
    controller.start();
    controller.location_acquired(LONDON);
    controller.view_mut().take();
    controller
}

pub fn at(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).unwrap()
}

pub fn fill_form(
    controller: &mut TestController,
    kind: WorkoutType,
    distance: &str,
    duration: &str,
    variant: &str,
) {
    let form = controller.form_mut();
    form.set_kind(kind);
    form.set_field(Field::Distance, distance);
    form.set_field(Field::Duration, duration);
    let variant_field = form.variant_field();
    form.set_field(variant_field, variant);
}

/// Click the map at `coords`, fill the form and submit at `millis`.
pub fn log_workout(
    controller: &mut TestController,
    coords: Coords,
    kind: WorkoutType,
    values: (&str, &str, &str),
    millis: i64,
) {
    controller.map_clicked(coords);
    fill_form(controller, kind, values.0, values.1, values.2);
    controller.submit_at(at(millis)).unwrap();
}
