//! In-memory registry of named, compiled schemas.
//!
//! Schemas register under a caller-chosen name, compiling on the way in;
//! registered names are immutable. Schemas can also load from JSON files
//! on disk, one document per file: `{"name": ..., "schema": ...}`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::{Error, SchemaError, SchemaResult};
use crate::schema::normalize::Descriptor;
use crate::schema::types::Schema;
use crate::validate::{validate_compiled, Options};
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Registry {
    schemas: HashMap<String, Descriptor>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a schema and stores it under a name.
    ///
    /// Registered names are immutable; registering a name twice is refused.
    pub fn register(&mut self, name: impl Into<String>, schema: &Schema) -> SchemaResult<()> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::AlreadyRegistered(name));
        }
        let descriptor = schema.compile()?;
        debug!(name = %name, "schema registered");
        self.schemas.insert(name, descriptor);
        Ok(())
    }

    /// Parses a JSON schema document and registers it under a name.
    pub fn register_json(&mut self, name: impl Into<String>, text: &str) -> SchemaResult<()> {
        let schema = Schema::from_json(text)?;
        self.register(name, &schema)
    }

    /// Returns the compiled descriptor registered under a name.
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.schemas.get(name)
    }

    /// Checks whether a name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns all registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validates an input against the schema registered under a name.
    pub async fn validate(
        &self,
        name: &str,
        input: Option<Value>,
        options: &Options,
    ) -> Result<Option<Value>, Error> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))?;
        validate_compiled(input, descriptor, options)
            .await
            .map_err(Error::from)
    }

    /// Loads and registers one schema file, returning the registered name.
    ///
    /// The file holds a JSON document with a "name" string and a "schema"
    /// in any of the shorthand forms.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<String> {
        let shown = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|err| SchemaError::LoadFailed {
            path: shown.clone(),
            reason: err.to_string(),
        })?;
        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|err| SchemaError::LoadFailed {
                path: shown.clone(),
                reason: err.to_string(),
            })?;

        let name = document
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| SchemaError::LoadFailed {
                path: shown.clone(),
                reason: "document needs a \"name\" string".to_string(),
            })?;
        let schema_document = document.get("schema").ok_or_else(|| SchemaError::LoadFailed {
            path: shown.clone(),
            reason: "document needs a \"schema\" field".to_string(),
        })?;

        let schema = Schema::from_json_value(schema_document)?;
        self.register(name, &schema)?;
        Ok(name.to_string())
    }

    /// Loads every `*.json` file in a directory, returning how many schemas
    /// were registered. Files without the `.json` extension are skipped.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let shown = dir.display().to_string();
        let entries = fs::read_dir(dir).map_err(|err| SchemaError::LoadFailed {
            path: shown.clone(),
            reason: err.to_string(),
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed {
                path: shown.clone(),
                reason: err.to_string(),
            })?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            self.load_file(&path)?;
            loaded += 1;
        }
        debug!(dir = %shown, loaded, "schema directory loaded");
        Ok(loaded)
    }
}
