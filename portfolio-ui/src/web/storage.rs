use web_sys::{Storage, Window};

use super::dom::js_error;
use crate::error::PortfolioError;
use crate::theme::PreferenceStore;

/// `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Fails when storage is disabled or blocked by privacy settings.
    pub fn open(window: &Window) -> Result<Self, PortfolioError> {
        let storage = window
            .local_storage()
            .map_err(|e| PortfolioError::Storage(js_error(e)))?
            .ok_or_else(|| PortfolioError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl PreferenceStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, PortfolioError> {
        self.storage
            .get_item(key)
            .map_err(|e| PortfolioError::Storage(js_error(e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PortfolioError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PortfolioError::Storage(js_error(e)))
    }
}
