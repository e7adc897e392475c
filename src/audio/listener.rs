use cgmath::{InnerSpace, Vector3};

/// The ears of the scene, following the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub position: Vector3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            forward: -Vector3::unit_z(),
            up: Vector3::unit_y(),
        }
    }
}

impl Listener {
    /// Degenerate orientations (zero or parallel vectors) leave the orientation as is.
    pub fn update(&mut self, position: Vector3<f32>, forward: Vector3<f32>, up: Vector3<f32>) {
        self.position = position;
        let right = forward.cross(up);
        if forward.magnitude2() > f32::EPSILON && right.magnitude2() > f32::EPSILON {
            self.forward = forward.normalize();
            self.up = right.cross(forward).normalize();
        }
    }

    /// Direction of `point` in listener space (x right, y up, -z ahead) and its
    /// distance. A point at the listener maps to straight ahead at distance zero.
    pub fn localize(&self, point: Vector3<f32>) -> (Vector3<f32>, f32) {
        let offset = point - self.position;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return (-Vector3::unit_z(), 0.0);
        }
        let right = self.forward.cross(self.up).normalize();
        let dir = offset / distance;
        (
            Vector3::new(dir.dot(right), dir.dot(self.up), -dir.dot(self.forward)),
            distance,
        )
    }
}
