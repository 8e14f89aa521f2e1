//! Point lights placed on the map

use crate::foundation::collections::Shared;
use crate::foundation::math::Vec3;
use crate::scene::Attenuation;

/// A light placed in the map
#[derive(Debug, Clone)]
pub struct MapLight {
    /// Unique name
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Diffuse colour, RGB in 0..1
    pub diffuse: Vec3,
    /// Specular colour, RGB in 0..1
    pub specular: Vec3,
    /// Falloff
    pub attenuation: Attenuation,
    /// Show a draggable marker mesh (map editor)
    pub show_indicator: bool,
}

impl MapLight {
    /// Create a white light at `position`
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            diffuse: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(1.0, 1.0, 1.0),
            attenuation: Attenuation::default(),
            show_indicator: false,
        }
    }

    /// Scene light name
    pub fn light_name(&self) -> String {
        format!("MapLight_{}", self.name)
    }

    /// Base node carrying the marker and the flicker node
    pub fn node_name(&self) -> String {
        format!("{}_node", self.light_name())
    }

    /// Child node carrying the light itself
    pub fn flicker_node_name(&self) -> String {
        format!("{}_flicker_node", self.light_name())
    }

    /// Marker entity name
    pub fn indicator_name(&self) -> String {
        format!("MapLightIndicator_{}", self.name)
    }
}

/// Map light shared between simulation and render threads
pub type SharedMapLight = Shared<MapLight>;
