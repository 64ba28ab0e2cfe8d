use std::sync::Arc;

use color_eyre::eyre::Result;
use tracing::debug;

/// Remembers the last provider client together with the key it was built for.
///
/// The client is reused only while requests keep coming with the same key; a new key
/// replaces it. A failed build leaves the cache empty.
pub struct ClientCache<C> {
    last_key: Option<String>,
    client: Option<Arc<C>>,
}

impl<C> Default for ClientCache<C> {
    fn default() -> Self {
        Self {
            last_key: None,
            client: None,
        }
    }
}

impl<C> ClientCache<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create<F>(&mut self, key: &str, create: F) -> Result<Arc<C>>
    where
        F: FnOnce(&str) -> Result<C>,
    {
        if let (Some(last_key), Some(client)) = (&self.last_key, &self.client) {
            if last_key == key {
                return Ok(client.clone());
            }
        }
        debug!("Creating provider client for new key");
        match create(key) {
            Ok(client) => {
                let client = Arc::new(client);
                self.last_key = Some(key.to_owned());
                self.client = Some(client.clone());
                Ok(client)
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    #[cfg(test)]
    pub fn last_key(&self) -> Option<&str> {
        self.last_key.as_deref()
    }

    pub fn clear(&mut self) {
        self.last_key = None;
        self.client = None;
    }
}
