//! Browser services: `localStorage` and the geolocation API.

use futures::channel::oneshot;
use gloo_utils::window;
use log::warn;
use mapty::{Coords, KeyValueStore, LocationError, StorageError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Position, PositionError, Storage};

fn storage_error(err: JsValue) -> StorageError {
    StorageError::new(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// [`KeyValueStore`] over `window.localStorage`.
///
/// When storage is unavailable (private mode, disabled cookies) reads find
/// nothing and writes fail.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = window().local_storage().ok().flatten();
        if storage.is_none() {
            warn!("localStorage is unavailable, workouts will not be kept");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::new("localStorage is unavailable"))
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.storage {
            Some(storage) => storage.get_item(key).map_err(storage_error),
            None => Ok(None),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(storage_error)
    }
}

type PositionSender = Rc<RefCell<Option<oneshot::Sender<Result<Coords, LocationError>>>>>;

fn answer(sender: &PositionSender, result: Result<Coords, LocationError>) {
    if let Some(tx) = sender.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

/// Single-shot request for the current position.
///
/// No retry and no timeout: the future resolves whenever the browser answers.
pub async fn current_position() -> Result<Coords, LocationError> {
    let geolocation = window()
        .navigator()
        .geolocation()
        .map_err(|_| LocationError::Unsupported)?;

    let (tx, rx) = oneshot::channel();
    let sender: PositionSender = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let sender = sender.clone();
        Closure::once_into_js(move |position: Position| {
            let coords = position.coords();
            answer(&sender, Ok(Coords::new(coords.latitude(), coords.longitude())));
        })
    };
    let on_error = Closure::once_into_js(move |error: PositionError| {
        answer(
            &sender,
            Err(LocationError::Failed {
                code: error.code(),
                message: error.message(),
            }),
        );
    });

    geolocation
        .get_current_position_with_error_callback(on_success.unchecked_ref(), Some(on_error.unchecked_ref()))
        .map_err(|_| LocationError::Unsupported)?;

    rx.await.unwrap_or(Err(LocationError::Cancelled))
}
