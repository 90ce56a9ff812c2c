//! Scene membership of renderables and object lifecycle

use std::collections::BTreeMap;

use glam::DVec3;

use super::{BodyKind, CelestialObject, Material, Registry, SceneError};

/// Name of the primary body created by [`Scene::with_earth`]
pub const EARTH_NAME: &str = "Earth";

/// Opaque id of a drawable sphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

/// A sphere attached to the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub handle: RenderHandle,
    pub position: DVec3,
    pub radius: f64,
    pub segments: u32,
    pub material: Material,
}

/// Owns every body in a view: the lookup tables plus the set of attached
/// renderables. Nothing here is global, so independent scenes can coexist.
#[derive(Debug, Default)]
pub struct Scene {
    registry: Registry,
    renderables: BTreeMap<RenderHandle, Renderable>,
    primary: Option<String>,
    next_handle: u64,
    /// Bumped on every attach and detach
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene holding only the Earth at the origin
    pub fn with_earth() -> Result<Self, SceneError> {
        let mut scene = Self::new();
        scene.spawn(EARTH_NAME, BodyKind::Primary, 0.0, 0.0)?;
        Ok(scene)
    }

    /// Create a body, register it and attach its renderable.
    ///
    /// On error the scene is left exactly as it was.
    pub fn spawn(
        &mut self,
        name: &str,
        kind: BodyKind,
        longitude: f64,
        latitude: f64,
    ) -> Result<RenderHandle, SceneError> {
        if kind == BodyKind::Primary {
            if let Some(existing) = &self.primary {
                return Err(SceneError::PrimaryExists(existing.clone()));
            }
        }
        if self.registry.contains(name) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }

        let handle = RenderHandle(self.next_handle);
        let object = CelestialObject {
            name: name.to_string(),
            kind,
            longitude,
            latitude,
            radius: kind.radius(),
            handle,
        };
        self.registry.register(object)?;
        self.next_handle += 1;

        self.attach(Renderable {
            handle,
            position: kind.place(longitude, latitude),
            radius: kind.radius(),
            segments: kind.segments(),
            material: kind.material(),
        });

        if kind == BodyKind::Primary {
            self.primary = Some(name.to_string());
        }

        log::debug!(
            "Spawned {:?} {:?} at ({:.3}, {:.3})",
            kind,
            name,
            longitude,
            latitude
        );
        Ok(handle)
    }

    /// Unregister a body and detach its renderable
    pub fn despawn(&mut self, name: &str) -> Option<CelestialObject> {
        let object = self.registry.unregister(name)?;
        self.detach(object.handle);
        if self.primary.as_deref() == Some(name) {
            self.primary = None;
        }
        log::debug!("Despawned {:?}", name);
        Some(object)
    }

    fn attach(&mut self, renderable: Renderable) {
        self.renderables.insert(renderable.handle, renderable);
        self.revision += 1;
    }

    fn detach(&mut self, handle: RenderHandle) {
        if self.renderables.remove(&handle).is_some() {
            self.revision += 1;
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn object(&self, name: &str) -> Option<&CelestialObject> {
        self.registry.get(name)
    }

    pub fn resolve_by_renderable(&self, handle: RenderHandle) -> Option<&str> {
        self.registry.resolve_by_renderable(handle)
    }

    pub fn renderable(&self, handle: RenderHandle) -> Option<&Renderable> {
        self.renderables.get(&handle)
    }

    /// Attached renderables in creation order
    pub fn renderables(&self) -> impl Iterator<Item = &Renderable> {
        self.renderables.values()
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    pub fn primary(&self) -> Option<&CelestialObject> {
        self.primary.as_deref().and_then(|name| self.registry.get(name))
    }

    /// Centre of the primary body, or the origin when there is none
    pub fn primary_position(&self) -> DVec3 {
        self.primary()
            .and_then(|object| self.renderables.get(&object.handle))
            .map(|renderable| renderable.position)
            .unwrap_or(DVec3::ZERO)
    }

    /// Number of attach/detach operations performed so far
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::to_cartesian;

    #[test]
    fn test_with_earth() {
        let scene = Scene::with_earth().unwrap();
        let earth = scene.primary().unwrap();
        assert_eq!(earth.name, EARTH_NAME);
        assert_eq!(earth.radius, 5.0);
        assert_eq!(scene.primary_position(), DVec3::ZERO);
        assert_eq!(scene.renderable_count(), 1);
        assert_eq!(scene.revision(), 1);
    }

    #[test]
    fn test_spawn_places_satellite() {
        let mut scene = Scene::with_earth().unwrap();
        let handle = scene.spawn("ISS", BodyKind::Satellite, 10.0, 20.0).unwrap();

        let renderable = scene.renderable(handle).unwrap();
        let expected = to_cartesian(10.0, 20.0, 6.1);
        assert!((renderable.position - expected).length() < 1e-12);
        assert_eq!(renderable.material, Material::Solid([255, 255, 255]));
        assert_eq!(scene.resolve_by_renderable(handle), Some("ISS"));
    }

    #[test]
    fn test_duplicate_spawn_leaves_scene_untouched() {
        let mut scene = Scene::with_earth().unwrap();
        scene.spawn("ISS", BodyKind::Satellite, 0.0, 0.0).unwrap();
        let revision = scene.revision();

        assert!(scene.spawn("ISS", BodyKind::Satellite, 5.0, 5.0).is_err());
        assert_eq!(scene.revision(), revision);
        assert_eq!(scene.renderable_count(), 2);
        assert_eq!(scene.object("ISS").unwrap().longitude, 0.0);
    }

    #[test]
    fn test_second_primary_is_rejected() {
        let mut scene = Scene::with_earth().unwrap();
        let err = scene.spawn("Mars", BodyKind::Primary, 0.0, 0.0).unwrap_err();
        assert_eq!(err, SceneError::PrimaryExists(EARTH_NAME.to_string()));
    }

    #[test]
    fn test_despawn_detaches_and_unregisters() {
        let mut scene = Scene::with_earth().unwrap();
        let handle = scene.spawn("ISS", BodyKind::Satellite, 0.0, 0.0).unwrap();

        let removed = scene.despawn("ISS").unwrap();
        assert_eq!(removed.handle, handle);
        assert!(scene.renderable(handle).is_none());
        assert!(scene.resolve_by_renderable(handle).is_none());
        assert!(scene.object("ISS").is_none());
        assert_eq!(scene.renderable_count(), 1);
        assert!(scene.despawn("ISS").is_none());
    }
}
