//! Application-level configuration constants.

// Persistence
pub const STORAGE_KEY: &str = "workouts";

// Map behavior
pub const MAP_ZOOM_LEVEL: f64 = 13.0;
pub const PAN_DURATION_SECS: f64 = 1.0;
pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_MAX_ZOOM: f64 = 19.0;
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>";

// Marker popups
pub const POPUP_MAX_WIDTH: f64 = 250.0;
pub const POPUP_MIN_WIDTH: f64 = 100.0;

// UI behavior
pub const FORM_RESTORE_DELAY_MS: u32 = 1000;
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

// User-facing messages
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";
pub const GEOLOCATION_UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by this browser.";

// Record ids are the trailing digits of the creation timestamp
pub const ID_DIGITS: usize = 10;
