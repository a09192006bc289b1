//! Numeric tolerances shared by the contact tests
//!
//! Grouped by the scale of the quantity they are compared against. Changing a
//! value here changes every test that compares the same kind of quantity.

/// Thresholds compared against squared distances
pub mod squared {
    /// A point this close to a polygon vertex snaps onto it
    pub const VERTEX_SNAP: f32 = 1e-6;

    /// Below this two points are treated as coincident
    pub const COINCIDENT: f32 = 1e-12;
}

/// Thresholds compared against lengths, dot products and determinants
pub mod linear {
    /// Determinant magnitude under which two lines are parallel
    pub const PARALLEL_DET: f32 = 1e-6;

    /// Slack on the quadratic discriminant under which a line grazes a circle
    pub const TANGENT_DISCRIMINANT: f32 = 1e-4;

    /// How far in front of a supporting plane a point may sit and still count
    /// as behind it
    pub const PLANE: f32 = 1e-5;

    /// Vectors shorter than this have no usable direction
    pub const DEGENERATE_LENGTH: f32 = 1e-12;
}

/// Thresholds compared against areas
pub mod area {
    /// Regions smaller than this have no meaningful centroid
    pub const DEGENERATE: f32 = 1e-9;
}
