use fxhash::{FxHashMap, FxHashSet};
use glam::UVec2;

/**
 * Hash map with a fast non-cryptographically secure hash function.
 */
pub type HashMap<K, V> = FxHashMap<K, V>;

/**
 * Hash set with a fast non-cryptographically secure hash function.
 */
pub type HashSet<V> = FxHashSet<V>;


/// Pixel rectangle inside an image.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct URect {
    pub origin: UVec2,
    pub size: UVec2,
}

impl URect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            origin: UVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }

    /// Exclusive bottom-right corner.
    pub fn end(&self) -> UVec2 {
        self.origin + self.size
    }
}
