use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::{ChatForwarder, ClientError, PokemonDirectory, PokemonRecord};

#[derive(Clone, Default)]
pub struct MemoryDirectory {
    records: Arc<RwLock<HashMap<String, PokemonRecord>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(self, identifier: &str, height: u32) -> Self {
        self.insert(PokemonRecord {
            id: None,
            name: Some(identifier.to_string()),
            height: f64::from(height),
            weight: None,
        });
        self
    }

    pub fn insert(&self, record: PokemonRecord) {
        if let Some(name) = record.name.clone() {
            self.records.write().insert(name, record);
        }
    }
}

impl PokemonDirectory for MemoryDirectory {
    async fn fetch(&self, identifier: &str) -> Result<PokemonRecord, ClientError> {
        self.records
            .read()
            .get(identifier)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(identifier.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct RecordingForwarder {
    posted: Arc<Mutex<Vec<String>>>,
    accept: bool,
}

impl Default for RecordingForwarder {
    fn default() -> Self {
        Self::accepting()
    }
}

impl RecordingForwarder {
    pub fn accepting() -> Self {
        Self {
            posted: Arc::new(Mutex::new(Vec::new())),
            accept: true,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::accepting()
        }
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().clone()
    }
}

impl ChatForwarder for RecordingForwarder {
    async fn post(&self, text: &str) -> Result<(), ClientError> {
        self.posted.lock().push(text.to_string());
        if self.accept {
            Ok(())
        } else {
            Err(ClientError::Rejected)
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}
