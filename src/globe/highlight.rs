use super::scene::{GlobeNode, NodeId};
use crate::data::FeatureCollection;
use crate::mesh::{build_highlight, HighlightStyle};
use tracing::{debug, info, warn};

/// Identities of the geometries currently parented under the globe for one highlight
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HighlightSet {
    ids: Vec<NodeId>,
}

impl HighlightSet {
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Owns the live [`HighlightSet`] and swaps it wholesale on every install
#[derive(Debug, Default)]
pub struct RegionHighlighter {
    live: HighlightSet,
}

impl RegionHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> &HighlightSet {
        &self.live
    }

    /// Detach every geometry of the live set and drop it
    pub fn retire(&mut self, globe: &mut impl GlobeNode) {
        let set = std::mem::take(&mut self.live);
        for id in set.ids {
            match globe.detach(id) {
                Some(geometry) => debug!(%id, %geometry, "retired highlight geometry"),
                None => warn!(%id, "highlight geometry was already gone"),
            }
        }
    }

    /// Replace the live highlight with one built from `doc`.
    ///
    /// Tessellation runs to completion before anything is attached, so the globe
    /// only ever carries a whole highlight. `elevation` lifts geometry off the
    /// surface (`radius * elevation`).
    pub fn install(
        &mut self,
        doc: &FeatureCollection,
        globe: &mut impl GlobeNode,
        radius: f64,
        style: HighlightStyle,
        elevation: f64,
    ) -> &HighlightSet {
        self.retire(globe);
        globe.reset_scale();

        let geometries = build_highlight(doc, radius * elevation, style);
        if geometries.is_empty() {
            warn!(?style, features = doc.features.len(), "highlight produced no geometry");
        }

        let ids = geometries.into_iter().map(|g| globe.attach(g)).collect();
        self.live = HighlightSet { ids };
        info!(?style, geometries = self.live.len(), "installed highlight");
        &self.live
    }
}
