use crate::mesh::SurfaceGeometry;
use glam::DQuat;
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a geometry attached under the globe node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// The scene node the globe is drawn from. Highlights hang off it as children
/// and its orientation is what the rotation animation drives.
pub trait GlobeNode {
    /// Parent a geometry under the globe
    fn attach(&mut self, geometry: SurfaceGeometry) -> NodeId;

    /// Unparent a child, handing back its geometry. Dropping the returned value
    /// releases whatever the renderer allocated for it.
    fn detach(&mut self, id: NodeId) -> Option<SurfaceGeometry>;

    /// Undo any temporary zoom applied to the globe
    fn reset_scale(&mut self);

    fn orientation(&self) -> DQuat;

    fn set_orientation(&mut self, rotation: DQuat);
}

/// In-memory globe node used by the terminal renderer
#[derive(Debug, Clone)]
pub struct GlobeScene {
    children: BTreeMap<NodeId, SurfaceGeometry>,
    next_id: u64,
    pub scale: f64,
    rotation: DQuat,
}

impl GlobeScene {
    pub fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            next_id: 0,
            scale: 1.0,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Attached geometries in attach order
    pub fn children(&self) -> impl Iterator<Item = (NodeId, &SurfaceGeometry)> {
        self.children.iter().map(|(id, g)| (*id, g))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl Default for GlobeScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeNode for GlobeScene {
    fn attach(&mut self, geometry: SurfaceGeometry) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.children.insert(id, geometry);
        id
    }

    fn detach(&mut self, id: NodeId) -> Option<SurfaceGeometry> {
        self.children.remove(&id)
    }

    fn reset_scale(&mut self) {
        self.scale = 1.0;
    }

    fn orientation(&self) -> DQuat {
        self.rotation
    }

    fn set_orientation(&mut self, rotation: DQuat) {
        self.rotation = rotation;
    }
}
