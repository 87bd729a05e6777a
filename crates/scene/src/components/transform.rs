use foundation::math::Vec3;

/// Local transform relative to the parent entity.
///
/// Application order for points is scale, yaw about +Y, then translation.
/// `facing` orients only this entity's own drawable (its local +Z axis)
/// and is not inherited by children.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub yaw_rad: f64,
    pub facing: Option<Vec3>,
    pub scale: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw_rad: 0.0,
            facing: None,
            scale: Vec3::ONE,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Points the local +Z axis from `position` toward `target`.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.facing = Some((target - self.position).normalize_or_zero());
        self
    }

    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        p.mul_elem(self.scale).rotate_y(self.yaw_rad) + self.position
    }

    /// World transform of `child` placed under `self` (itself a world transform).
    ///
    /// Non-uniform ancestor scale is applied along the parent's axes only.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.apply_point(child.position),
            yaw_rad: self.yaw_rad + child.yaw_rad,
            facing: child.facing.map(|f| f.rotate_y(self.yaw_rad)),
            scale: self.scale.mul_elem(child.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
