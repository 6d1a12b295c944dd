/// A closed range of real values, used for accepted hit distances and for
/// clamping color channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Every distance strictly beyond `epsilon`.
    pub const fn beyond(epsilon: f64) -> Self {
        Self::new(epsilon, f64::INFINITY)
    }

    /// Returns true if x is within [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is within (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// The unit range used for color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
