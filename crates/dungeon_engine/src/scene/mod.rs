//! Scene management
//!
//! The scene graph is the render thread's private state. Simulation threads
//! never touch it; they describe mutations as render requests instead.
//!
//! ```text
//! Simulation threads ──RenderRequest──> Render queue ──> Dispatcher ──> SceneGraph
//! ```

mod scene_graph;

pub use scene_graph::{
    AnimationState, Attenuation, NodeId, SceneEntity, SceneError, SceneGraph, SceneLight, SceneNode,
    SimpleSceneGraph,
};
