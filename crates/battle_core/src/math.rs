//! Fixed-point math utilities for deterministic simulation.
//!
//! Every position, distance and AI score in the battle uses fixed-point
//! arithmetic so that a match replayed from the same seed and the same
//! deployments produces bit-identical results on every platform.

use fixed::types::I32F32;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer coordinates.
    #[must_use]
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Check whether both components are zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == Fixed::ZERO && self.y == Fixed::ZERO
    }

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        fixed_sqrt(self.distance_squared(other))
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> Fixed {
        fixed_sqrt(self.dot(self))
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> Fixed {
        self.x * other.x + self.y * other.y
    }

    /// Multiply both components by a scalar.
    #[must_use]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Linearly interpolate between two vectors.
    #[must_use]
    pub fn lerp(self, other: Self, t: Fixed) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Normalize vector using fixed-point math.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len_sq = self.dot(self);

        if len_sq == Fixed::ZERO {
            return Self::ZERO;
        }

        let len = fixed_sqrt(len_sq);
        if len == Fixed::ZERO {
            return Self::ZERO;
        }

        Self::new(self.x / len, self.y / len)
    }

    /// Step from `self` toward `target` by at most `max_step`.
    ///
    /// Returns the new point and whether the target was reached.
    #[must_use]
    pub fn step_toward(self, target: Self, max_step: Fixed) -> (Self, bool) {
        let remaining = self.distance(target);
        if remaining <= max_step {
            return (target, true);
        }
        let direction = (target - self).normalize();
        (self + direction.scale(max_step), false)
    }
}

/// Computes the square root of a fixed-point number using binary search.
fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let mut high = if value > Fixed::from_num(1) {
        value
    } else {
        Fixed::from_num(1)
    };

    for _ in 0..64 {
        let mid = (low + high) / Fixed::from_num(2);
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

/// Draw a fixed-point value uniformly from `[low, high]`.
pub fn random_fixed<R: Rng + ?Sized>(rng: &mut R, low: Fixed, high: Fixed) -> Fixed {
    let fraction = Fixed::from_bits(rng.gen_range(0..=Fixed::ONE.to_bits()));
    low + (high - low) * fraction
}

/// Draw a random unit-length direction.
///
/// Uses rejection sampling inside the unit disc so every heading is equally
/// likely without trigonometry.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2Fixed {
    let one = Fixed::ONE;
    loop {
        let candidate = Vec2Fixed::new(
            random_fixed(rng, -one, one),
            random_fixed(rng, -one, one),
        );
        let len_sq = candidate.dot(candidate);
        if len_sq > Fixed::ZERO && len_sq <= one {
            return candidate.normalize();
        }
    }
}

/// Axis-aligned rectangle in tank space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower-left corner.
    pub min: Vec2Fixed,
    /// Upper-right corner.
    pub max: Vec2Fixed,
}

impl Bounds {
    /// Bounds of a `width` × `height` tank centred on the origin.
    #[must_use]
    pub fn centered(width: u32, height: u32) -> Self {
        let half_w = Fixed::from_num(width) / Fixed::from_num(2);
        let half_h = Fixed::from_num(height) / Fixed::from_num(2);
        Self {
            min: Vec2Fixed::new(-half_w, -half_h),
            max: Vec2Fixed::new(half_w, half_h),
        }
    }

    /// Clamp a point into these bounds.
    #[must_use]
    pub fn clamp(&self, point: Vec2Fixed) -> Vec2Fixed {
        Vec2Fixed::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Check whether a point lies inside (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2Fixed) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2Fixed {
        self.min.lerp(self.max, Fixed::from_num(0.5))
    }

    /// Draw a uniformly random point inside the bounds.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2Fixed {
        Vec2Fixed::new(
            random_fixed(rng, self.min.x, self.max.x),
            random_fixed(rng, self.min.y, self.max.y),
        )
    }
}

/// Convert a whole percentage into a fixed-point fraction.
#[must_use]
pub fn percent(value: u32) -> Fixed {
    Fixed::from_num(value) / Fixed::from_num(100)
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::AddAssign for Vec2Fixed {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_vec2_distance_squared() {
        let a = Vec2Fixed::new(Fixed::from_num(3), Fixed::from_num(0));
        let b = Vec2Fixed::new(Fixed::from_num(0), Fixed::from_num(4));
        let dist_sq = a.distance_squared(b);
        // 3² + 4² = 25
        assert_eq!(dist_sq, Fixed::from_num(25));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2Fixed::from_ints(3, 0);
        let b = Vec2Fixed::from_ints(0, 4);
        let epsilon = Fixed::ONE / Fixed::from_num(10000);
        assert!((a.distance(b) - Fixed::from_num(5)).abs() < epsilon);
    }

    #[test]
    fn test_vec2_dot() {
        let a = Vec2Fixed::new(Fixed::from_num(2), Fixed::from_num(3));
        let b = Vec2Fixed::new(Fixed::from_num(4), Fixed::from_num(-1));
        let dot = a.dot(b);
        assert_eq!(dot, Fixed::from_num(5));
    }

    #[test]
    fn test_vec2_lerp() {
        let a = Vec2Fixed::new(Fixed::from_num(0), Fixed::from_num(0));
        let b = Vec2Fixed::new(Fixed::from_num(10), Fixed::from_num(20));
        let mid = a.lerp(b, Fixed::from_num(0.5));
        assert_eq!(mid, Vec2Fixed::new(Fixed::from_num(5), Fixed::from_num(10)));
    }

    #[test]
    fn test_vec2_normalize() {
        let v = Vec2Fixed::new(Fixed::from_num(3), Fixed::from_num(4));
        let norm = v.normalize();

        let len_sq = norm.dot(norm);
        let one = Fixed::from_num(1);
        let epsilon = one / Fixed::from_num(10000);
        assert!(
            (len_sq - one).abs() < epsilon,
            "normalized vector length² should be ~1, got {:?}",
            len_sq
        );

        // x/y ratio matches the input 3/4
        let ratio_diff = (norm.x * Fixed::from_num(4)) - (norm.y * Fixed::from_num(3));
        assert!(
            ratio_diff.abs() < epsilon,
            "direction not preserved: {:?}",
            ratio_diff
        );
    }

    #[test]
    fn test_step_toward_stops_at_target() {
        let start = Vec2Fixed::ZERO;
        let target = Vec2Fixed::from_ints(3, 0);

        let (pos, arrived) = start.step_toward(target, Fixed::from_num(2));
        assert!(!arrived);
        assert_eq!(pos.y, Fixed::ZERO);
        assert!(pos.x > Fixed::from_num(1) && pos.x <= Fixed::from_num(2));

        let (pos, arrived) = pos.step_toward(target, Fixed::from_num(2));
        assert!(arrived);
        assert_eq!(pos, target);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::centered(600, 400);
        let clamped = bounds.clamp(Vec2Fixed::from_ints(1000, -1000));
        assert_eq!(clamped, Vec2Fixed::from_ints(300, -200));
        assert!(bounds.contains(clamped));
        assert_eq!(bounds.center(), Vec2Fixed::ZERO);
    }

    #[test]
    fn test_random_fixed_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let low = Fixed::from_num(-3);
        let high = Fixed::from_num(5);
        for _ in 0..500 {
            let v = random_fixed(&mut rng, low, high);
            assert!(v >= low && v <= high);
        }
    }

    #[test]
    fn test_random_direction_is_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let epsilon = Fixed::ONE / Fixed::from_num(1000);
        for _ in 0..100 {
            let dir = random_direction(&mut rng);
            assert!((dir.length() - Fixed::ONE).abs() < epsilon);
        }
    }
}
