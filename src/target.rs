use rand::Rng;

/// Width and height of the square play field, in logical units
pub const FIELD_SIZE: f64 = 400.0;
/// Width and height of a target's bounding box
pub const TARGET_SIZE: f64 = 40.0;
/// Exclusive upper bound for a target's top-left corner
pub const MAX_COORD: f64 = FIELD_SIZE - TARGET_SIZE;

/// Top-left corner of a target, in logical field units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
}

impl Target {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Places a target uniformly at random so its box stays inside the field.
    /// Successive targets are independent and may overlap.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..MAX_COORD),
            y: rng.gen_range(0.0..MAX_COORD),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + TARGET_SIZE && y >= self.y && y < self.y + TARGET_SIZE
    }
}
