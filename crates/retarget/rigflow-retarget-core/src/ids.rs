//! Identifiers and simple allocators for skeleton entities.

use serde::{Deserialize, Serialize};

/// Dense bone identifier. Stable for the lifetime of a skeleton; never reused
/// after removal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BoneId(pub u32);

/// Bone-collection identifier, allocated per skeleton.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CollectionId(pub u32);

/// Monotonic allocator for BoneId and CollectionId.
/// Dense indices improve cache locality; IDs are opaque externally.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_bone: u32,
    next_collection: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_bone(&mut self) -> BoneId {
        let id = BoneId(self.next_bone);
        self.next_bone = self.next_bone.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_collection(&mut self) -> CollectionId {
        let id = CollectionId(self.next_collection);
        self.next_collection = self.next_collection.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_bone(), BoneId(0));
        assert_eq!(alloc.alloc_bone(), BoneId(1));
        assert_eq!(alloc.alloc_collection(), CollectionId(0));
        assert_eq!(alloc.alloc_collection(), CollectionId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_bone(), BoneId(0));
    }
}
