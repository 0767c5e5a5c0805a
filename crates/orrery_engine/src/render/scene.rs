//! Flat scene container
//!
//! Nodes live in a slot map and are addressed by [`NodeId`]. There is no
//! parenting: each node's transform is already in world space. Nodes are
//! drawn in insertion order.

use slotmap::SlotMap;

use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::render::api::{MaterialHandle, MeshHandle};
use crate::render::lighting::{LightingEnvironment, PointLight};

slotmap::new_key_type! {
    /// Stable reference to a node in a [`Scene`]
    pub struct NodeId;
}

/// A drawable object: mesh, material and world transform
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Geometry
    pub mesh: MeshHandle,
    /// Material
    pub material: MaterialHandle,
    /// World transform
    pub transform: Transform,
    /// Hidden nodes stay in the scene but are not drawn
    pub visible: bool,
}

impl SceneNode {
    /// Create a visible node at the origin
    pub fn new(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            mesh,
            material,
            transform: Transform::default(),
            visible: true,
        }
    }

    /// Place the node at `position`
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Set the node's Euler rotation in radians
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Model-to-world matrix
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}

/// Scene: nodes plus lights
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
    order: Vec<NodeId>,
    lighting: LightingEnvironment,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = self.nodes.insert(node);
        self.order.push(id);
        log::trace!("Scene node {:?} added ({} total)", id, self.order.len());
        id
    }

    /// Remove a node, returning it if it existed
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(node)
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Borrow a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.order.iter().filter_map(|&id| self.nodes.get(id).map(|node| (id, node)))
    }

    /// Add a point light
    pub fn add_light(&mut self, light: PointLight) {
        self.lighting.lights.push(light);
    }

    /// Lights in the scene
    pub fn lighting(&self) -> &LightingEnvironment {
        &self.lighting
    }

    /// Lights in the scene, mutably
    pub fn lighting_mut(&mut self) -> &mut LightingEnvironment {
        &mut self.lighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::Key;

    fn node() -> SceneNode {
        SceneNode::new(MeshHandle::null(), MaterialHandle::null())
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add(node().with_position(Vec3::x()));
        let b = scene.add(node().with_position(Vec3::y()));
        let c = scene.add(node().with_position(Vec3::z()));

        scene.remove(b);

        let ids: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(scene.len(), 2);
        assert!(scene.node(b).is_none());
    }

    #[test]
    fn test_node_mut_updates_transform() {
        let mut scene = Scene::new();
        let id = scene.add(node());

        if let Some(n) = scene.node_mut(id) {
            n.transform.rotation.y += 0.015;
        }

        assert_eq!(scene.node(id).map(|n| n.transform.rotation.y), Some(0.015));
    }
}
