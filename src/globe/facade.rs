use super::highlight::RegionHighlighter;
use super::orientation::{CompletionHook, OrientationController, OrientationState, Tick};
use super::scene::GlobeNode;
use crate::config::GlobeConfig;
use crate::data::{CountrySource, FeatureCollection};
use crate::error::FetchError;
use crate::mesh::HighlightStyle;
use crate::sphere::LatLng;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Radius multiplier for highlights that sit directly on the surface
pub const SURFACE_ELEVATION: f64 = 1.0;

/// What happened during one [`Globe::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    Idle,
    Rotating { fraction: f64 },
    /// The globe finished turning to `focus`; `installed` geometries were added on this frame
    Settled { focus: LatLng, installed: usize },
}

#[derive(Debug, Clone)]
struct Highlight {
    doc: FeatureCollection,
    style: HighlightStyle,
}

/// Owns the globe node and sequences retire, rotate and install for every request
#[derive(Debug)]
pub struct Globe<N, S> {
    node: N,
    source: S,
    highlighter: RegionHighlighter,
    orientation: OrientationController,
    radius: f64,
    elevation: f64,
    config: GlobeConfig,
    /// Waiting for the rotation to settle
    pending: Option<Highlight>,
    /// Last installed highlight, rebuilt when the radius changes
    shown: Option<Highlight>,
}

impl<N: GlobeNode, S: CountrySource> Globe<N, S> {
    pub fn new(mut node: N, source: S, config: GlobeConfig) -> Self {
        let orientation = OrientationController::new(config.default_focus, config.rotation_duration());
        node.set_orientation(orientation.state().rotation);
        Self {
            node,
            source,
            highlighter: RegionHighlighter::new(),
            orientation,
            radius: config.max_radius,
            elevation: SURFACE_ELEVATION,
            config,
            pending: None,
            shown: None,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut N {
        &mut self.node
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn orientation(&self) -> OrientationState {
        self.orientation.state()
    }

    pub fn is_rotating(&self) -> bool {
        self.orientation.is_animating()
    }

    /// Number of geometries in the live highlight
    pub fn highlight_count(&self) -> usize {
        self.highlighter.live().len()
    }

    pub fn has_pending_highlight(&self) -> bool {
        self.pending.is_some()
    }

    /// Lift subsequent highlights to `radius * elevation`
    pub fn set_elevation(&mut self, elevation: f64) {
        self.elevation = elevation;
    }

    /// Fit the globe to a viewport `width` units wide. A live highlight is
    /// rebuilt at the new radius.
    pub fn set_viewport_width(&mut self, width: f64) {
        let radius = self.config.radius_for_width(width);
        if radius == self.radius {
            return;
        }
        if radius <= 0.0 {
            warn!(width, radius, "viewport too narrow for the globe");
        }
        self.radius = radius;
        if let Some(shown) = self.shown.clone() {
            self.install(shown);
        }
    }

    /// Fetch a country and highlight it. On failure nothing on the globe changes.
    pub fn show_country(&mut self, code: &str, style: HighlightStyle, now: Instant) -> Result<(), FetchError> {
        let doc = self.source.fetch(code).inspect_err(|err| {
            error!(code, %err, "could not load country");
        })?;
        info!(code, ?style, "showing country");
        self.highlight_region(doc, style, now);
        Ok(())
    }

    /// Retire the current highlight, turn toward the document's focus and
    /// install the new highlight once the globe settles (or straight away when
    /// `install_after_rotation` is off).
    pub fn highlight_region(&mut self, doc: FeatureCollection, style: HighlightStyle, now: Instant) {
        self.highlighter.retire(&mut self.node);
        self.shown = None;
        self.pending = None;

        match doc.focus() {
            Some(focus) => self.orientation.rotate_to(&self.node, focus, now, None),
            None => warn!("document has no usable feature, globe stays put"),
        }

        let highlight = Highlight { doc, style };
        if self.config.install_after_rotation && self.orientation.is_animating() {
            self.pending = Some(highlight);
        } else {
            self.install(highlight);
        }
    }

    /// Turn toward `target`. An installed highlight stays; one still waiting for
    /// its own rotation to settle is dropped, since that rotation no longer happens.
    pub fn rotate_to(&mut self, target: LatLng, now: Instant, on_complete: Option<CompletionHook>) {
        if let Some(dropped) = self.pending.take() {
            debug!(style = ?dropped.style, ?target, "dropping highlight queued for an abandoned rotation");
        }
        self.orientation.rotate_to(&self.node, target, now, on_complete);
    }

    /// Advance the rotation and install a waiting highlight when it settles
    pub fn tick(&mut self, now: Instant) -> FrameEvent {
        match self.orientation.tick(&mut self.node, now) {
            Tick::Idle => FrameEvent::Idle,
            Tick::Animating { fraction } => FrameEvent::Rotating { fraction },
            Tick::Settled(focus) => {
                let installed = match self.pending.take() {
                    Some(highlight) => self.install(highlight),
                    None => 0,
                };
                FrameEvent::Settled { focus, installed }
            }
        }
    }

    /// Back to the default focus with no highlight
    pub fn reset(&mut self) {
        self.pending = None;
        self.shown = None;
        self.highlighter.retire(&mut self.node);
        self.node.reset_scale();
        self.orientation.reset(&mut self.node);
    }

    fn install(&mut self, highlight: Highlight) -> usize {
        let count = self
            .highlighter
            .install(&highlight.doc, &mut self.node, self.radius, highlight.style, self.elevation)
            .len();
        self.shown = Some(highlight);
        count
    }
}
