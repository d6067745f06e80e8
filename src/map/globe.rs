use crate::globe::GlobeNode;
use crate::sphere::{unproject, LatLng};
use glam::{DQuat, DVec3};

/// Orthographic view of the globe node onto a dot canvas.
/// The viewer looks down -Z; +Y is up on screen.
#[derive(Debug, Clone, Copy)]
pub struct GlobeView {
    rotation: DQuat,
    scale: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl GlobeView {
    pub fn new(rotation: DQuat, scale: f64, width: usize, height: usize) -> Self {
        Self {
            rotation,
            scale,
            width,
            height,
        }
    }

    pub fn of(node: &impl GlobeNode, scale: f64, width: usize, height: usize) -> Self {
        Self::new(node.orientation(), scale, width, height)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Globe-local point to view space
    #[inline(always)]
    pub fn to_view(&self, local: DVec3) -> DVec3 {
        self.rotation * (local * self.scale)
    }

    /// Screen position of a globe-local point, or `None` on the far hemisphere
    #[inline]
    pub fn project(&self, local: DVec3) -> Option<(f64, f64)> {
        let p = self.to_view(local);
        (p.z >= 0.0).then(|| self.to_screen(p))
    }

    /// Screen position regardless of which side of the globe the point is on
    #[inline(always)]
    pub fn to_screen(&self, view: DVec3) -> (f64, f64) {
        let (cx, cy) = self.center();
        (cx + view.x, cy - view.y)
    }

    /// Geographic position under a screen pixel, if it hits a sphere of `radius`
    pub fn unproject(&self, px: f64, py: f64, radius: f64) -> Option<LatLng> {
        let (cx, cy) = self.center();
        let r = radius * self.scale;
        let sx = px - cx;
        let sy = cy - py;
        let r2 = sx * sx + sy * sy;
        if r <= 0.0 || r2 > r * r {
            return None;
        }
        let view = DVec3::new(sx, sy, (r * r - r2).sqrt());
        unproject(self.rotation.inverse() * view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::project;

    #[test]
    fn test_identity_faces_default_focus() {
        let view = GlobeView::new(DQuat::IDENTITY, 1.0, 200, 100);
        let (x, y) = view.project(project(0.0, -90.0, 40.0)).unwrap();
        assert!((x - 100.0).abs() < 1e-9 && (y - 50.0).abs() < 1e-9);
        // The opposite side is hidden
        assert!(view.project(project(0.0, 90.0, 40.0)).is_none());
        // North is up
        let (_, top) = view.project(project(60.0, -90.0, 40.0)).unwrap();
        assert!(top < 50.0);
    }

    #[test]
    fn test_unproject_centre() {
        let view = GlobeView::new(DQuat::IDENTITY, 1.0, 200, 100);
        let hit = view.unproject(100.0, 50.0, 40.0).unwrap();
        assert!(hit.lat.abs() < 1e-9 && (hit.lng + 90.0).abs() < 1e-9);
        assert!(view.unproject(0.0, 0.0, 40.0).is_none());
    }

    #[test]
    fn test_scale_grows_the_disk() {
        let view = GlobeView::new(DQuat::IDENTITY, 2.0, 200, 100);
        let (x, _) = view.project(project(0.0, 0.0, 40.0)).unwrap_or((0.0, 0.0));
        // (0, 0) sits on the limb at -X
        assert!((x - 20.0).abs() < 1e-6);
    }
}
