//! Leaflet-backed render surface for the controller.
//!
//! The map lives in a detached container element that the root component mounts
//! with `Html::VRef`, so the Leaflet instance survives Yew re-renders. List
//! entries and form visibility are kept here as plain state and read by the root
//! component's `view`.

use gloo_timers::callback::Timeout;
use gloo_utils::{document, window};
use js_sys::{Object, Reflect};
use leaflet::{LatLng, Map, MapOptions, Marker, MouseEvent, Popup, PopupOptions, TileLayer, TileLayerOptions};
use log::{debug, warn};
use mapty::config::{
    FORM_RESTORE_DELAY_MS, PAN_DURATION_SECS, POPUP_MAX_WIDTH, POPUP_MIN_WIDTH, TILE_ATTRIBUTION,
    TILE_MAX_ZOOM, TILE_URL,
};
use mapty::{Coords, LocationError, MarkerPopup, Workout, WorkoutView};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;
use yew::Callback;

use crate::browser::current_position;

/// Callbacks into the root component.
#[derive(Clone)]
pub struct ViewCallbacks {
    pub located: Callback<Coords>,
    pub location_failed: Callback<LocationError>,
    pub map_clicked: Callback<Coords>,
    pub form_restored: Callback<()>,
}

pub struct LeafletView {
    container: HtmlElement,
    map: Option<Map>,
    entries: Vec<Workout>,
    form_hidden: bool,
    form_suppressed: bool,
    focus_pending: bool,
    restore_timer: Option<Timeout>,
    callbacks: ViewCallbacks,
}

fn map_container() -> HtmlElement {
    let container: HtmlElement = document()
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into().ok())
        .unwrap_throw();
    container.set_id("map");
    container
}

fn add_tile_layer(map: &Map) {
    let opts = TileLayerOptions::new();
    opts.set_max_zoom(TILE_MAX_ZOOM);
    opts.set_attribution(TILE_ATTRIBUTION.to_string());
    TileLayer::new_options(TILE_URL, &opts).add_to(map);
}

// {animate: true, pan: {duration: 1}}
fn pan_options() -> JsValue {
    let pan = Object::new();
    let _ = Reflect::set(&pan, &"duration".into(), &PAN_DURATION_SECS.into());
    let options = Object::new();
    let _ = Reflect::set(&options, &"animate".into(), &true.into());
    let _ = Reflect::set(&options, &"pan".into(), &pan);
    options.into()
}

impl LeafletView {
    pub fn new(callbacks: ViewCallbacks) -> Self {
        Self {
            container: map_container(),
            map: None,
            entries: Vec::new(),
            form_hidden: true,
            form_suppressed: false,
            focus_pending: false,
            restore_timer: None,
            callbacks,
        }
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// List entries, newest first.
    pub fn entries(&self) -> &[Workout] {
        &self.entries
    }

    pub fn form_hidden(&self) -> bool {
        self.form_hidden
    }

    pub fn form_suppressed(&self) -> bool {
        self.form_suppressed
    }

    /// Whether the distance input should receive focus after the next render.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_pending)
    }

    /// End of the hide transition: the form takes layout space again.
    pub fn restore_form(&mut self) {
        self.restore_timer = None;
        self.form_suppressed = false;
    }
}

impl WorkoutView for LeafletView {
    fn request_location(&mut self) {
        let located = self.callbacks.located.clone();
        let failed = self.callbacks.location_failed.clone();
        spawn_local(async move {
            match current_position().await {
                Ok(coords) => located.emit(coords),
                Err(e) => failed.emit(e),
            }
        });
    }

    fn create_map(&mut self, center: Coords, zoom: f64) {
        let map = Map::new_with_element(&self.container, &MapOptions::default());
        map.set_view(&LatLng::new(center.lat, center.lng), zoom);
        add_tile_layer(&map);

        let map_clicked = self.callbacks.map_clicked.clone();
        map.on_mouse_click(Box::new(move |event: MouseEvent| {
            let latlng = event.lat_lng();
            map_clicked.emit(Coords::new(latlng.lat(), latlng.lng()));
        }));
        map.invalidate_size(false);

        self.map = Some(map);
    }

    fn add_marker(&mut self, coords: Coords, popup: &MarkerPopup) {
        let Some(map) = &self.map else {
            warn!("Cannot place a marker before the map exists");
            return;
        };

        let opts = PopupOptions::default();
        opts.set_max_width(POPUP_MAX_WIDTH);
        opts.set_min_width(POPUP_MIN_WIDTH);
        opts.set_auto_close(false);
        opts.set_close_on_click(false);
        opts.set_class_name(popup.class_name.clone());
        let leaflet_popup = Popup::new(&opts, None);
        leaflet_popup.set_content(&popup.content.as_str().into());

        let marker = Marker::new(&LatLng::new(coords.lat, coords.lng));
        marker.add_to(map);
        marker.bind_popup(&leaflet_popup);
        marker.open_popup();
    }

    fn pan_to(&mut self, coords: Coords, zoom: f64) {
        if let Some(map) = &self.map {
            map.set_view_with_options(&LatLng::new(coords.lat, coords.lng), zoom, &pan_options());
        }
    }

    fn render_entry(&mut self, workout: &Workout) {
        self.entries.insert(0, workout.clone());
    }

    fn show_form(&mut self) {
        self.form_hidden = false;
        self.focus_pending = true;
    }

    fn hide_form(&mut self) {
        self.form_hidden = true;
        self.form_suppressed = true;
        let restored = self.callbacks.form_restored.clone();
        self.restore_timer = Some(Timeout::new(FORM_RESTORE_DELAY_MS, move || {
            restored.emit(());
        }));
    }

    fn alert(&mut self, message: &str) {
        if window().alert_with_message(message).is_err() {
            warn!("Could not show alert: {}", message);
        }
    }

    fn reset(&mut self) {
        debug!("Dropping map and {} list entries", self.entries.len());
        // Leaflet detaches its own listeners, including the click handler
        if let Some(map) = self.map.take() {
            map.remove();
        }
        self.container = map_container();
        self.entries.clear();
        self.form_hidden = true;
        self.form_suppressed = false;
        self.focus_pending = false;
        self.restore_timer = None;
    }
}
