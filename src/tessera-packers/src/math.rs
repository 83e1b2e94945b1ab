use std::ops::Mul;

/// A two-dimensional vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self::splat(0.0);

    /// Creates a new vector from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a vector with all coordinates set to `v`.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }
}

/// A three-dimensional vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
    /// The Z coordinate.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::splat(0.0);

    /// The unit vector along the Z axis.
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new vector from its coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all coordinates set to `v`.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Computes the cross product of `self` and `rhs`.
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Computes the Euclidean length of the vector.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A quaternion representing an orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
    /// The Z coordinate.
    pub z: f32,
    /// The scalar part.
    pub w: f32,
}

impl Quaternion {
    /// The rotation which leaves every vector unchanged.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new quaternion from its raw components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `radians` around `axis`.
    ///
    /// `axis` is normalized first; a zero axis produces
    /// [`Quaternion::IDENTITY`].
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let length = axis.length();
        if length == 0.0 {
            return Self::IDENTITY;
        }

        let (sin, cos) = (radians * 0.5).sin_cos();
        let s = sin / length;
        Self::new(axis.x * s, axis.y * s, axis.z * s, cos)
    }

    /// Gets the components in `[x, y, z, w]` order.
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Builds a quaternion from components in `[x, y, z, w]` order.
    pub const fn from_array([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }

    /// Computes the squared length of the quaternion.
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Rotates `v` by this quaternion, which should be normalized.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v);
        let t = Vec3::new(2.0 * t.x, 2.0 * t.y, 2.0 * t.z);
        let c = u.cross(t);

        Vec3::new(
            v.x + self.w * t.x + c.x,
            v.y + self.w * t.y + c.y,
            v.z + self.w * t.z + c.z,
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Composes two rotations, applying `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}
