//! Name and renderable lookup tables for scene objects

use std::collections::HashMap;

use super::{CelestialObject, RenderHandle, SceneError};

/// Two-way index between object names and their renderables.
///
/// Every entry added by [`Registry::register`] lives in both tables and
/// [`Registry::unregister`] removes it from both.
#[derive(Debug, Default)]
pub struct Registry {
    objects: HashMap<String, CelestialObject>,
    names_by_handle: HashMap<RenderHandle, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object. A name that is already registered is rejected and
    /// leaves both tables untouched.
    pub fn register(&mut self, object: CelestialObject) -> Result<(), SceneError> {
        if self.objects.contains_key(&object.name) {
            return Err(SceneError::DuplicateName(object.name));
        }
        self.names_by_handle
            .insert(object.handle, object.name.clone());
        self.objects.insert(object.name.clone(), object);
        Ok(())
    }

    /// Name of the object drawn by `handle`, if it is tracked
    pub fn resolve_by_renderable(&self, handle: RenderHandle) -> Option<&str> {
        self.names_by_handle.get(&handle).map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&CelestialObject> {
        self.objects.get(name)
    }

    pub fn unregister(&mut self, name: &str) -> Option<CelestialObject> {
        let object = self.objects.remove(name)?;
        self.names_by_handle.remove(&object.handle);
        Some(object)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn handle_count(&self) -> usize {
        self.names_by_handle.len()
    }
}
