//! Scene graph trait and implementations
//!
//! The render dispatcher only ever talks to the scene through [`SceneGraph`]:
//! lookup by name, reparenting, visibility, transforms, entity (mesh)
//! management, and lights. [`SimpleSceneGraph`] is an arena-backed implementation used
//! by the engine's own render thread and by the tests.

use crate::foundation::math::{Quat, Vec3};
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Stable handle to a node in a scene graph
    pub struct NodeId;
}

/// Scene graph errors
///
/// These are recoverable: a request that hits one is dropped and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No node is registered under this name
    #[error("Scene node not found: {0}")]
    NodeNotFound(String),

    /// Handle refers to a node that has been destroyed
    #[error("Stale scene node handle")]
    StaleNode,

    /// A node with this name already exists
    #[error("Scene node already exists: {0}")]
    DuplicateNode(String),

    /// No light is registered under this name
    #[error("Scene light not found: {0}")]
    LightNotFound(String),

    /// A light with this name already exists
    #[error("Scene light already exists: {0}")]
    DuplicateLight(String),

    /// No entity is registered under this name
    #[error("Scene entity not found: {0}")]
    EntityNotFound(String),

    /// An entity with this name already exists
    #[error("Scene entity already exists: {0}")]
    DuplicateEntity(String),

    /// Reparenting would make a node its own ancestor
    #[error("Cannot parent {node} under its own descendant {parent}")]
    Cycle {
        /// Node being moved
        node: String,
        /// Requested new parent
        parent: String,
    },

    /// The node has no parent (or grandparent) to move up to
    #[error("Scene node {0} has no ancestor to detach to")]
    NoAncestor(String),

    /// The root node cannot be destroyed or moved
    #[error("The root scene node cannot be modified this way")]
    RootImmutable,
}

/// Animation playing on an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    /// Animation name in the mesh's skeleton
    pub name: String,
    /// Whether the animation loops
    pub looping: bool,
}

/// Node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Unique node name
    pub name: String,
    /// Parent node (None only for the root)
    pub parent: Option<NodeId>,
    /// Child nodes in insertion order
    pub children: Vec<NodeId>,
    /// Position relative to the parent
    pub position: Vec3,
    /// Scale relative to the parent
    pub scale: Vec3,
    /// Orientation relative to the parent
    pub orientation: Quat,
    /// Whether the node (and its subtree) is shown
    pub visible: bool,
    /// Names of entities attached to this node
    pub attached: Vec<String>,
}

impl SceneNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            orientation: Quat::identity(),
            visible: true,
            attached: Vec::new(),
        }
    }

    /// Roll around the view (z) axis, in degrees within `0..360`
    pub fn roll_degrees(&self) -> f32 {
        let (_, _, yaw) = self.orientation.euler_angles();
        yaw.to_degrees().rem_euclid(360.0)
    }
}

/// Renderable mesh instance
#[derive(Debug, Clone)]
pub struct SceneEntity {
    /// Unique entity name
    pub name: String,
    /// Mesh resource name
    pub mesh: String,
    /// Team colour index applied to the material (0 = uncoloured)
    pub color: u32,
    /// Whether the entity is drawn
    pub visible: bool,
    /// Node the entity is attached to
    pub node: Option<NodeId>,
    /// Currently enabled animation
    pub animation: Option<AnimationState>,
    /// Number of times the mesh was rebuilt
    pub refresh_count: u32,
}

/// Light falloff with distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// Distance beyond which the light has no effect
    pub range: f32,
    /// Constant factor
    pub constant: f32,
    /// Linear factor
    pub linear: f32,
    /// Quadratic factor
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            range: 20.0,
            constant: 0.5,
            linear: 0.1,
            quadratic: 0.01,
        }
    }
}

/// Point light attached to a node
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLight {
    /// Unique light name
    pub name: String,
    /// Diffuse colour, RGB in 0..1
    pub diffuse: Vec3,
    /// Specular colour, RGB in 0..1
    pub specular: Vec3,
    /// Falloff
    pub attenuation: Attenuation,
    /// Node carrying the light, None once that node is destroyed
    pub node: Option<NodeId>,
}

/// Scene collaborator used by the render dispatcher
///
/// Implementations are owned by exactly one thread (the render thread), so
/// `&mut self` methods need no internal locking.
pub trait SceneGraph: Send {
    /// Root of the hierarchy
    fn root(&self) -> NodeId;

    /// Look up a node by name
    fn find_node(&self, name: &str) -> Option<NodeId>;

    /// Read a node
    fn node(&self, node: NodeId) -> Option<&SceneNode>;

    /// Create a named child node
    fn create_node(&mut self, name: &str, parent: NodeId) -> Result<NodeId, SceneError>;

    /// Destroy a node and its subtree, detaching any entities on it
    fn destroy_node(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Move a node (with its subtree) under a new parent
    fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), SceneError>;

    /// Show or hide a node
    fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<(), SceneError>;

    /// Set a node's position relative to its parent
    fn set_position(&mut self, node: NodeId, position: Vec3) -> Result<(), SceneError>;

    /// Set a node's scale
    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> Result<(), SceneError>;

    /// Reset orientation and roll the node by `degrees`
    fn set_roll(&mut self, node: NodeId, degrees: f32) -> Result<(), SceneError>;

    /// Rotate a node by `rotation`, expressed in its parent's frame
    fn rotate(&mut self, node: NodeId, rotation: Quat) -> Result<(), SceneError>;

    /// Create an unattached entity
    fn create_entity(&mut self, name: &str, mesh: &str, color: u32) -> Result<(), SceneError>;

    /// Destroy an entity, detaching it first
    fn destroy_entity(&mut self, name: &str) -> Result<(), SceneError>;

    /// Read an entity
    fn entity(&self, name: &str) -> Option<&SceneEntity>;

    /// Attach an entity to a node
    fn attach_entity(&mut self, name: &str, node: NodeId) -> Result<(), SceneError>;

    /// Detach an entity from whatever node holds it
    fn detach_entity(&mut self, name: &str) -> Result<(), SceneError>;

    /// Show or hide an entity
    fn set_entity_visible(&mut self, name: &str, visible: bool) -> Result<(), SceneError>;

    /// Rebuild an entity's mesh and material colour in place
    fn refresh_mesh(&mut self, name: &str, mesh: &str, color: u32) -> Result<(), SceneError>;

    /// Disable all animations on an entity and enable one
    fn set_animation(&mut self, name: &str, animation: AnimationState) -> Result<(), SceneError>;

    /// Create a light on `light.node`
    fn create_light(&mut self, light: SceneLight) -> Result<(), SceneError>;

    /// Destroy a light
    fn destroy_light(&mut self, name: &str) -> Result<(), SceneError>;

    /// Read a light
    fn light(&self, name: &str) -> Option<&SceneLight>;

    /// Look up a node by name, failing with [`SceneError::NodeNotFound`]
    fn require_node(&self, name: &str) -> Result<NodeId, SceneError> {
        self.find_node(name).ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    /// Check whether a node exists
    fn has_node(&self, name: &str) -> bool {
        self.find_node(name).is_some()
    }

    /// Check whether an entity exists
    fn has_entity(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    /// Check whether a light exists
    fn has_light(&self, name: &str) -> bool {
        self.light(name).is_some()
    }

    /// Parent of a node
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }
}

/// Arena-backed scene graph
///
/// Nodes live in a slot map; names are indexed for the by-name lookups the
/// dispatcher relies on.
#[derive(Debug)]
pub struct SimpleSceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    names: HashMap<String, NodeId>,
    entities: HashMap<String, SceneEntity>,
    lights: HashMap<String, SceneLight>,
    root: NodeId,
}

impl SimpleSceneGraph {
    /// Name of the root node
    pub const ROOT_NAME: &'static str = "Root";

    /// Create a scene containing only the root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(Self::ROOT_NAME, None));
        let mut names = HashMap::new();
        names.insert(Self::ROOT_NAME.to_string(), root);

        Self {
            nodes,
            names,
            entities: HashMap::new(),
            lights: HashMap::new(),
            root,
        }
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of live lights
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Whether a node and all of its ancestors are visible
    pub fn is_effectively_visible(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            match self.nodes.get(id) {
                Some(n) if n.visible => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(node).ok_or(SceneError::StaleNode)
    }

    fn entity_mut(&mut self, name: &str) -> Result<&mut SceneEntity, SceneError> {
        self.entities
            .get_mut(name)
            .ok_or_else(|| SceneError::EntityNotFound(name.to_string()))
    }

    fn unlink_from_parent(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != node);
            }
        }
    }
}

impl Default for SimpleSceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for SimpleSceneGraph {
    fn root(&self) -> NodeId {
        self.root
    }

    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    fn create_node(&mut self, name: &str, parent: NodeId) -> Result<NodeId, SceneError> {
        if self.names.contains_key(name) {
            return Err(SceneError::DuplicateNode(name.to_string()));
        }
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::StaleNode);
        }

        let id = self.nodes.insert(SceneNode::new(name, Some(parent)));
        self.node_mut(parent)?.children.push(id);
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    fn destroy_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::RootImmutable);
        }
        if !self.nodes.contains_key(node) {
            return Err(SceneError::StaleNode);
        }

        self.unlink_from_parent(node);

        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.nodes.remove(id) {
                self.names.remove(&removed.name);
                for entity_name in &removed.attached {
                    if let Some(entity) = self.entities.get_mut(entity_name) {
                        entity.node = None;
                    }
                }
                pending.extend(removed.children);
            }
        }

        for light in self.lights.values_mut() {
            if light.node.is_some_and(|id| !self.nodes.contains_key(id)) {
                light.node = None;
            }
        }
        Ok(())
    }

    fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::RootImmutable);
        }
        if !self.nodes.contains_key(node) || !self.nodes.contains_key(new_parent) {
            return Err(SceneError::StaleNode);
        }
        if self.is_ancestor(node, new_parent) {
            return Err(SceneError::Cycle {
                node: self.nodes[node].name.clone(),
                parent: self.nodes[new_parent].name.clone(),
            });
        }

        self.unlink_from_parent(node);
        self.node_mut(new_parent)?.children.push(node);
        self.node_mut(node)?.parent = Some(new_parent);
        Ok(())
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<(), SceneError> {
        self.node_mut(node)?.visible = visible;
        Ok(())
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) -> Result<(), SceneError> {
        self.node_mut(node)?.position = position;
        Ok(())
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> Result<(), SceneError> {
        self.node_mut(node)?.scale = scale;
        Ok(())
    }

    fn set_roll(&mut self, node: NodeId, degrees: f32) -> Result<(), SceneError> {
        self.node_mut(node)?.orientation = Quat::from_axis_angle(&Vec3::z_axis(), degrees.to_radians());
        Ok(())
    }

    fn rotate(&mut self, node: NodeId, rotation: Quat) -> Result<(), SceneError> {
        let node = self.node_mut(node)?;
        node.orientation = rotation * node.orientation;
        Ok(())
    }

    fn create_entity(&mut self, name: &str, mesh: &str, color: u32) -> Result<(), SceneError> {
        if self.entities.contains_key(name) {
            return Err(SceneError::DuplicateEntity(name.to_string()));
        }
        self.entities.insert(
            name.to_string(),
            SceneEntity {
                name: name.to_string(),
                mesh: mesh.to_string(),
                color,
                visible: true,
                node: None,
                animation: None,
                refresh_count: 0,
            },
        );
        Ok(())
    }

    fn destroy_entity(&mut self, name: &str) -> Result<(), SceneError> {
        self.detach_entity(name)?;
        self.entities.remove(name);
        Ok(())
    }

    fn entity(&self, name: &str) -> Option<&SceneEntity> {
        self.entities.get(name)
    }

    fn attach_entity(&mut self, name: &str, node: NodeId) -> Result<(), SceneError> {
        self.detach_entity(name)?;
        self.node_mut(node)?.attached.push(name.to_string());
        self.entity_mut(name)?.node = Some(node);
        Ok(())
    }

    fn detach_entity(&mut self, name: &str) -> Result<(), SceneError> {
        let previous = self.entity_mut(name)?.node.take();
        if let Some(node) = previous.and_then(|id| self.nodes.get_mut(id)) {
            node.attached.retain(|attached| attached != name);
        }
        Ok(())
    }

    fn set_entity_visible(&mut self, name: &str, visible: bool) -> Result<(), SceneError> {
        self.entity_mut(name)?.visible = visible;
        Ok(())
    }

    fn refresh_mesh(&mut self, name: &str, mesh: &str, color: u32) -> Result<(), SceneError> {
        let entity = self.entity_mut(name)?;
        entity.mesh = mesh.to_string();
        entity.color = color;
        entity.refresh_count += 1;
        Ok(())
    }

    fn set_animation(&mut self, name: &str, animation: AnimationState) -> Result<(), SceneError> {
        self.entity_mut(name)?.animation = Some(animation);
        Ok(())
    }

    fn create_light(&mut self, light: SceneLight) -> Result<(), SceneError> {
        if self.lights.contains_key(&light.name) {
            return Err(SceneError::DuplicateLight(light.name));
        }
        if light.node.is_some_and(|id| !self.nodes.contains_key(id)) {
            return Err(SceneError::StaleNode);
        }
        self.lights.insert(light.name.clone(), light);
        Ok(())
    }

    fn destroy_light(&mut self, name: &str) -> Result<(), SceneError> {
        self.lights
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SceneError::LightNotFound(name.to_string()))
    }

    fn light(&self, name: &str) -> Option<&SceneLight> {
        self.lights.get(name)
    }
}
