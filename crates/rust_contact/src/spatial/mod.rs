//! Spatial partitioning data structures
//!
//! Indexes triangle soups for fast point containment and ray casting.

mod skin_kd_tree;

pub use skin_kd_tree::{
    KdNode, KdTreeConfig, PackedKdNode, SkinKdTree, KD_MAX_DEPTH, KD_MAX_NODES, KD_MAX_TRIANGLES,
};
