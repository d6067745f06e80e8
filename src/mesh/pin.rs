use glam::{DQuat, DVec3};

/// Stick height in globe units
pub const STICK_HEIGHT: f64 = 4.0;
pub const STICK_RADIUS: f64 = 0.1;
pub const BALL_RADIUS: f64 = 1.5;
pub const BASE_RADIUS: f64 = 0.5;
pub const BASE_HEIGHT: f64 = 0.2;

/// A stick with a ball on top and a flat base, standing on the globe surface.
///
/// In marker space the stick runs along +Y from the anchor; `rotation` turns
/// that axis onto the outward surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinMarker {
    pub anchor: DVec3,
    pub rotation: DQuat,
}

impl PinMarker {
    /// Stand a marker on the surface point `anchor` (globe-local, non-zero)
    pub fn standing_at(anchor: DVec3) -> Self {
        let normal = anchor.normalize_or_zero();
        let rotation = if normal == DVec3::ZERO {
            DQuat::IDENTITY
        } else {
            DQuat::from_rotation_arc(DVec3::Y, normal)
        };
        Self { anchor, rotation }
    }

    /// Outward direction the stick points along
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// Marker-space point to globe-local space
    pub fn to_globe(&self, local: DVec3) -> DVec3 {
        self.anchor + self.rotation * local
    }

    pub fn base_center(&self) -> DVec3 {
        self.to_globe(DVec3::new(0.0, -BASE_HEIGHT / 2.0, 0.0))
    }

    pub fn stick_top(&self) -> DVec3 {
        self.to_globe(DVec3::new(0.0, STICK_HEIGHT, 0.0))
    }

    pub fn ball_center(&self) -> DVec3 {
        self.to_globe(DVec3::new(0.0, STICK_HEIGHT + BALL_RADIUS, 0.0))
    }

    /// Base, stick top and ball centre, in that order
    pub fn key_points(&self) -> [DVec3; 3] {
        [self.base_center(), self.stick_top(), self.ball_center()]
    }
}
