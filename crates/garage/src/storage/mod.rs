//! Storage layer for garage.
//!
//! Persistence is a flat key-value store holding strings. [`KeyValueStore`]
//! is the port the application talks to; [`SqliteStore`] keeps the items in
//! a database file and [`MemoryStore`] keeps them in a map for tests.
//!
//! [`GarageStorage`] sits on top and knows the two entries the application
//! uses: the JSON vehicle list under [`GARAGE_KEY`] and the operator name
//! under [`OPERATOR_KEY`]. Every write of the vehicle list replaces the whole
//! list.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::vehicle::Vehicle;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the JSON-serialized vehicle list.
pub const GARAGE_KEY: &str = "garage";

/// Key holding the remembered operator (owner field) name.
pub const OPERATOR_KEY: &str = "owner";

/// A string key-value store.
pub trait KeyValueStore {
    /// Get the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Typed access to the garage entries of a [`KeyValueStore`].
#[derive(Debug)]
pub struct GarageStorage<S> {
    store: S,
}

impl<S: KeyValueStore> GarageStorage<S> {
    /// Wrap a key-value store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load every vehicle record, parked and checked out.
    ///
    /// Returns an empty list if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStore`] if the stored list is not valid JSON of
    /// the expected shape, or a backend error if it cannot be read.
    pub fn load_vehicles(&self) -> Result<Vec<Vehicle>> {
        let Some(blob) = self.store.get_item(GARAGE_KEY)? else {
            trace!("No vehicle list stored yet");
            return Ok(Vec::new());
        };

        let vehicles: Vec<Vehicle> =
            serde_json::from_str(&blob).map_err(|e| Error::corrupt_store(GARAGE_KEY, e))?;
        debug!("Loaded {} vehicle records", vehicles.len());
        Ok(vehicles)
    }

    /// Replace the stored vehicle list with `vehicles`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<()> {
        let blob = serde_json::to_string(vehicles)?;
        self.store.set_item(GARAGE_KEY, &blob)?;
        debug!("Saved {} vehicle records", vehicles.len());
        Ok(())
    }

    /// Discard the stored vehicle list entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(GARAGE_KEY)
    }

    /// The remembered operator name, if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn operator_name(&self) -> Result<Option<String>> {
        self.store.get_item(OPERATOR_KEY)
    }

    /// Remember `name` as the operator name. An empty name forgets it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn set_operator_name(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            self.store.remove_item(OPERATOR_KEY)
        } else {
            self.store.set_item(OPERATOR_KEY, name)
        }
    }
}
