// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the core entity identity type shared across the simulation core.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A unique identifier for an entity in the world.
///
/// It combines an index with a generation count to solve the "ABA problem".
/// When an entity is destroyed, its index can be recycled for a new entity,
/// but the generation is incremented. This ensures that old `Entity` handles
/// pointing to a recycled index become invalid and cannot accidentally affect
/// the new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// The index of the entity's slot in the entity manager.
    pub index: u32,
    /// A generation counter that is incremented each time the index is recycled.
    /// Generation 0 is reserved for the invalid entity.
    pub generation: u32,
}

/// The invalid entity constant. Never refers to a live entity.
pub const INVALID_ENTITY: Entity = Entity {
    index: 0,
    generation: 0,
};

impl Entity {
    /// Creates an entity handle from raw parts.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns `true` if this handle can ever refer to a live entity.
    ///
    /// Slots start at generation 1, so generation 0 marks the invalid handle.
    pub const fn is_valid(&self) -> bool {
        self.generation != 0
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.generation
            .cmp(&other.generation)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, gen {})", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_entity_is_invalid() {
        assert!(!INVALID_ENTITY.is_valid());
        assert_eq!(INVALID_ENTITY, Entity::new(0, 0));
    }

    #[test]
    fn test_equality_requires_both_fields() {
        let a = Entity::new(1, 1);
        let b = Entity::new(1, 1);
        let c = Entity::new(1, 2);
        let d = Entity::new(2, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_ordering_is_generation_then_index() {
        let older = Entity::new(9, 1);
        let newer = Entity::new(0, 2);
        assert!(older < newer);
        assert!(Entity::new(0, 2) < Entity::new(1, 2));
    }

    #[test]
    fn test_hash_is_consistent_for_invalid_entity() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        INVALID_ENTITY.hash(&mut h1);
        Entity::new(0, 0).hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }
}
