//! Observer roster storage trait.

use crate::StoreError;
use relay_types::{Address, LastObserverCount};

pub trait ObserverStore {
    /// The roster singleton. `None` until the roster is first written.
    fn get_observer_set(&self) -> Result<Option<Vec<Address>>, StoreError>;

    fn put_observer_set(&self, observers: &[Address]) -> Result<(), StoreError>;

    fn get_last_observer_count(&self) -> Result<Option<LastObserverCount>, StoreError>;

    fn put_last_observer_count(&self, count: &LastObserverCount) -> Result<(), StoreError>;
}
