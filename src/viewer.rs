//! Pointer interaction and per-frame camera updates

use glam::DVec2;

use crate::geo::{format_readout, to_angle};
use crate::renderer::{pick, Camera, ROTATION_STEP_DEG, ZOOM_STEP};
use crate::scene::{BodyKind, Scene};

/// Name and location under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct HoverReadout {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl HoverReadout {
    pub fn lines(&self) -> [String; 2] {
        format_readout(self.longitude, self.latitude)
    }
}

/// Camera state plus everything the input handlers change
#[derive(Debug, Clone)]
pub struct Viewer {
    pub camera: Camera,
    auto_rotate: bool,
    hover: Option<HoverReadout>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Viewer {
    pub fn new(auto_rotate: bool) -> Self {
        Self {
            camera: Camera::default(),
            auto_rotate,
            hover: None,
        }
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Last thing the pointer was over; kept when the pointer moves off
    pub fn hover(&self) -> Option<&HoverReadout> {
        self.hover.as_ref()
    }

    /// Hit-test the pointer and refresh the readout. Returns whether the
    /// readout changed.
    pub fn pointer_moved(&mut self, scene: &Scene, ndc: DVec2, aspect_ratio: f64) -> bool {
        let ray = self.camera.ray_from_ndc(ndc, aspect_ratio);
        let Some(hit) = pick(scene, &ray) else {
            return false;
        };
        let Some(object) = scene
            .resolve_by_renderable(hit.handle)
            .and_then(|name| scene.object(name))
        else {
            return false;
        };

        let (longitude, latitude) = match object.kind {
            BodyKind::Primary => {
                let angle = to_angle(hit.point - scene.primary_position());
                (angle.longitude, angle.latitude)
            }
            BodyKind::Satellite => object.location(),
        };

        let readout = HoverReadout {
            name: object.name.clone(),
            longitude,
            latitude,
        };
        let changed = self.hover.as_ref() != Some(&readout);
        self.hover = Some(readout);
        changed
    }

    pub fn zoom_in(&mut self, scene: &Scene) {
        self.camera.step_zoom(-ZOOM_STEP, scene.primary_position());
    }

    pub fn zoom_out(&mut self, scene: &Scene) {
        self.camera.step_zoom(ZOOM_STEP, scene.primary_position());
    }

    /// Flip auto-rotation and return the new state
    pub fn toggle_rotation(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        log::debug!("Auto-rotate {}", if self.auto_rotate { "on" } else { "off" });
        self.auto_rotate
    }

    /// Label for the rotation switch
    pub fn rotation_label(&self) -> &'static str {
        if self.auto_rotate {
            "stop rotating"
        } else {
            "rotate"
        }
    }

    /// Clear the readout when the body it names has left the scene.
    /// Returns whether it was cleared.
    pub fn drop_stale_hover(&mut self, scene: &Scene) -> bool {
        match &self.hover {
            Some(readout) if scene.object(&readout.name).is_none() => {
                self.hover = None;
                true
            }
            _ => false,
        }
    }

    /// Per-frame update: advance the auto-rotation, keep the orbit target
    /// on the primary body and forget readouts of removed bodies
    pub fn tick(&mut self, scene: &Scene) {
        self.drop_stale_hover(scene);
        let primary = scene.primary_position();
        if self.auto_rotate {
            self.camera.rotate(ROTATION_STEP_DEG, primary);
        }
        self.camera.target = primary;
    }

    pub fn drag(&mut self, delta: DVec2) {
        self.camera.orbit(delta.x, delta.y);
    }

    pub fn scroll(&mut self, delta: f64) {
        self.camera.scroll_zoom(delta);
    }
}
