//! Mapty: log running and cycling workouts at places on a map.
//!
//! The library holds everything that does not touch the browser: workout
//! records, the in-memory store, persistence through a key-value seam, entry form
//! validation and the event-driven [`Controller`]. The `wasm32` binary wires it to
//! Yew, Leaflet and `localStorage`.

pub mod config;
pub mod controller;
pub mod form;
pub mod persistence;
pub mod store;
pub mod workout;

pub use controller::{AppState, Controller, LocationError, MarkerPopup, SubmitError, WorkoutView};
pub use form::{parse_number, WorkoutForm};
pub use persistence::{KeyValueStore, MemoryStore, PersistenceError, PersistenceGateway, StorageError};
pub use store::WorkoutStore;
pub use workout::{
    describe, Activity, ActivityInput, Coords, Field, SnapshotError, ValidationError, Workout,
    WorkoutInput, WorkoutSnapshot, WorkoutType,
};
