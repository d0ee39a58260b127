use super::Point;
use num_traits::Float;

/// Minimum and maximum of a set of scalars
///
/// An empty range (`min = +inf`, `max = -inf`) is the neutral element of
/// [`ValueRange::merge`], so blocks without values do not disturb a global range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const EMPTY: ValueRange = ValueRange {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// min / max over all values, ignoring NaN
    pub fn of<'a, I: IntoIterator<Item = &'a f32>>(values: I) -> Self {
        match min_max(values.into_iter().copied()) {
            Some((min, max)) => Self { min, max },
            None => Self::EMPTY,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    pub fn merge(self, other: ValueRange) -> ValueRange {
        ValueRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// linear interpolation between `min` and `max`
    pub fn mix(&self, ratio: f32) -> f32 {
        self.min * (1.0 - ratio) + self.max * ratio
    }

    pub fn midpoint(&self) -> f32 {
        self.mix(0.5)
    }

    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Axis aligned bounding box of a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: [f32::INFINITY; 3],
        max: [f32::NEG_INFINITY; 3],
    };

    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn of_points(points: &[Point]) -> Self {
        let mut bounds = Self::EMPTY;

        for axis in 0..3 {
            if let Some((min, max)) = min_max(points.iter().map(|p| p[axis])) {
                bounds.min[axis] = min;
                bounds.max[axis] = max;
            }
        }

        bounds
    }

    /// true if `max < min` along any axis
    pub fn is_inverted(&self) -> bool {
        (0..3).any(|axis| !(self.min[axis] <= self.max[axis]))
    }

    pub fn contains(&self, point: Point) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// NaN-skipping minimum and maximum of an iterator, `None` if there are no
/// comparable elements
pub(crate) fn min_max<T, I>(iter: I) -> Option<(T, T)>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    iter.into_iter()
        .filter(|x| !x.is_nan())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((min, max)) => Some((min.min(x), max.max(x))),
        })
}
