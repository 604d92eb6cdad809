use glam::DVec3;

/// Stereographic projection of unit directions onto the plane tangent to a
/// center direction. The center maps to the origin and points 90 degrees away
/// land on the unit circle.
#[derive(Debug, Clone, Copy)]
pub struct StereographicProjection {
    center: DVec3,
}

impl StereographicProjection {
    pub fn new(center: DVec3) -> Self {
        let mut center = center.normalize_or_zero();
        // The formula divides by the center's distance from the pole axis.
        if center.x.hypot(center.y) < 1e-12 {
            center = DVec3::new(1e-9, 0.0, center.z.signum()).normalize();
        }
        Self { center }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Projects a direction (any length) to plane coordinates. The antipode of
    /// the center yields non-finite values.
    pub fn project(&self, direction: DVec3) -> (f64, f64) {
        let u = direction.normalize_or_zero();
        let (x, y, z) = (u.x, u.y, u.z);
        let (xc, yc, zc) = (self.center.x, self.center.y, self.center.z);

        let t0 = 1.0 / xc.hypot(yc);
        let t1 = x * xc;
        let t2 = (1.0 - zc * zc).max(0.0).sqrt();
        let t3 = t0 * t2;
        let t4 = y * yc;
        let t5 = 1.0 / (t1 * t3 + t4 * t3 + z * zc + 1.0);
        let t6 = t0 * zc;

        (
            t0 * t5 * (x * yc - xc * y),
            -t5 * (t1 * t6 - t2 * z + t4 * t6),
        )
    }
}
