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

//! Multi-component joins over the sparse-set arrays.
//!
//! A query walks the dense entity list of its *primary* array (the first
//! component in the tuple) and checks membership in the remaining arrays,
//! so the cost is proportional to the primary array's population.
//!
//! Structural mutation (set/remove on any involved array) during iteration
//! is not allowed; collect entities first and mutate afterwards.

use crate::component::Component;
use crate::registry::ComponentRegistry;
use crate::storage::ComponentArray;
use proteus_core::Entity;
use std::any::TypeId;
use std::marker::PhantomData;

/// A tuple of component types usable in a [`Query`] or [`View`].
///
/// Implemented for tuples of arity 1 through 6. The borrow checker enforces
/// exclusivity at the world level; within one tuple, repeating a component
/// type is rejected at iteration time for mutable access.
pub trait QueryTuple: 'static {
    /// Shared references handed to read-only iteration.
    type Refs<'a>;
    /// Mutable references handed to mutable iteration.
    type Muts<'a>;
    /// Raw pointers to the component arrays backing this tuple.
    type Arrays: Copy;

    /// Resolves (and lazily registers) the arrays for this tuple.
    fn fetch(registry: &mut ComponentRegistry) -> Self::Arrays;

    /// Returns `true` if the tuple's component types are pairwise distinct.
    fn has_distinct_types() -> bool;

    /// Dense entity list of the primary array.
    ///
    /// # Safety
    ///
    /// `arrays` must originate from [`QueryTuple::fetch`] on a registry that
    /// outlives `'a` and receives no structural mutation while the slice is
    /// alive.
    unsafe fn primary_entities<'a>(arrays: Self::Arrays) -> &'a [Entity];

    /// Returns `true` if every non-primary array contains `entity`.
    ///
    /// # Safety
    ///
    /// Same contract as [`QueryTuple::primary_entities`].
    unsafe fn matches_rest(arrays: Self::Arrays, entity: Entity) -> bool;

    /// Builds the shared-reference tuple for `entity`.
    ///
    /// # Safety
    ///
    /// Same contract as [`QueryTuple::primary_entities`]; `entity` must be
    /// present in every array of the tuple.
    unsafe fn refs<'a>(arrays: Self::Arrays, entity: Entity) -> Self::Refs<'a>;

    /// Builds the mutable-reference tuple for `entity`.
    ///
    /// # Safety
    ///
    /// Same contract as [`QueryTuple::refs`], and the tuple's component
    /// types must be pairwise distinct so the references are disjoint.
    unsafe fn muts<'a>(arrays: Self::Arrays, entity: Entity) -> Self::Muts<'a>;
}

macro_rules! impl_query_tuple {
    ($first:ident $(, $rest:ident)*) => {
        #[allow(non_snake_case)]
        impl<$first: Component $(, $rest: Component)*> QueryTuple for ($first, $($rest,)*) {
            type Refs<'a> = (&'a $first, $(&'a $rest,)*);
            type Muts<'a> = (&'a mut $first, $(&'a mut $rest,)*);
            type Arrays = (*mut ComponentArray<$first>, $(*mut ComponentArray<$rest>,)*);

            fn fetch(registry: &mut ComponentRegistry) -> Self::Arrays {
                let $first: *mut ComponentArray<$first> = registry.array_mut::<$first>();
                $(let $rest: *mut ComponentArray<$rest> = registry.array_mut::<$rest>();)*
                ($first, $($rest,)*)
            }

            fn has_distinct_types() -> bool {
                let ids = [TypeId::of::<$first>() $(, TypeId::of::<$rest>())*];
                for i in 0..ids.len() {
                    for j in (i + 1)..ids.len() {
                        if ids[i] == ids[j] {
                            return false;
                        }
                    }
                }
                true
            }

            unsafe fn primary_entities<'a>(arrays: Self::Arrays) -> &'a [Entity] {
                let ($first, $($rest,)*) = arrays;
                $(let _ = $rest;)*
                (*$first).entities()
            }

            unsafe fn matches_rest(arrays: Self::Arrays, entity: Entity) -> bool {
                let ($first, $($rest,)*) = arrays;
                let _ = ($first, entity);
                true $(&& (*$rest).has(entity))*
            }

            unsafe fn refs<'a>(arrays: Self::Arrays, entity: Entity) -> Self::Refs<'a> {
                let ($first, $($rest,)*) = arrays;
                (
                    (*$first)
                        .get(entity)
                        .expect("query entity lost its primary component"),
                    $((*$rest)
                        .get(entity)
                        .expect("query entity lost a joined component"),)*
                )
            }

            unsafe fn muts<'a>(arrays: Self::Arrays, entity: Entity) -> Self::Muts<'a> {
                let ($first, $($rest,)*) = arrays;
                (
                    (*$first)
                        .get_mut(entity)
                        .expect("query entity lost its primary component"),
                    $((*$rest)
                        .get_mut(entity)
                        .expect("query entity lost a joined component"),)*
                )
            }
        }
    };
}

impl_query_tuple!(A);
impl_query_tuple!(A, B);
impl_query_tuple!(A, B, C);
impl_query_tuple!(A, B, C, D);
impl_query_tuple!(A, B, C, D, E);
impl_query_tuple!(A, B, C, D, E, F);

/// A streaming join over the entities holding every component in `Q`.
///
/// Construction borrows the world exclusively, so the arrays cannot be
/// structurally mutated while the query is alive.
pub struct Query<'w, Q: QueryTuple> {
    arrays: Q::Arrays,
    _registry: PhantomData<&'w mut ComponentRegistry>,
}

impl<'w, Q: QueryTuple> Query<'w, Q> {
    pub(crate) fn new(registry: &'w mut ComponentRegistry) -> Self {
        Self {
            arrays: Q::fetch(registry),
            _registry: PhantomData,
        }
    }

    /// Calls `func` with shared component references for every matching
    /// entity. Streaming; allocates nothing.
    pub fn for_each(&self, mut func: impl FnMut(Entity, Q::Refs<'_>)) {
        unsafe {
            for &entity in Q::primary_entities(self.arrays) {
                if Q::matches_rest(self.arrays, entity) {
                    func(entity, Q::refs(self.arrays, entity));
                }
            }
        }
    }

    /// Calls `func` with mutable component references for every matching
    /// entity. Streaming; allocates nothing.
    ///
    /// # Panics
    ///
    /// Panics if the tuple repeats a component type; mutable references
    /// must be disjoint.
    pub fn for_each_mut(&mut self, mut func: impl FnMut(Entity, Q::Muts<'_>)) {
        assert!(
            Q::has_distinct_types(),
            "query repeats a component type with mutable access"
        );

        unsafe {
            for &entity in Q::primary_entities(self.arrays) {
                if Q::matches_rest(self.arrays, entity) {
                    func(entity, Q::muts(self.arrays, entity));
                }
            }
        }
    }

    /// Materializes the matching entities. Allocates.
    pub fn entities(&self) -> Vec<Entity> {
        let primary = unsafe { Q::primary_entities(self.arrays) };
        primary
            .iter()
            .copied()
            .filter(|&entity| unsafe { Q::matches_rest(self.arrays, entity) })
            .collect()
    }

    /// Number of matching entities.
    pub fn count(&self) -> usize {
        let primary = unsafe { Q::primary_entities(self.arrays) };
        primary
            .iter()
            .filter(|&&entity| unsafe { Q::matches_rest(self.arrays, entity) })
            .count()
    }

    /// Returns `true` if at least one entity matches.
    pub fn any(&self) -> bool {
        let primary = unsafe { Q::primary_entities(self.arrays) };
        primary
            .iter()
            .any(|&entity| unsafe { Q::matches_rest(self.arrays, entity) })
    }
}

/// An iterator over `(Entity, components)` for read-only traversal.
///
/// Unlike [`Query::for_each`] this yields items, which composes with
/// iterator adapters at the cost of handing out references tied to the
/// view's whole lifetime.
pub struct View<'w, Q: QueryTuple> {
    arrays: Q::Arrays,
    index: usize,
    _registry: PhantomData<&'w mut ComponentRegistry>,
}

impl<'w, Q: QueryTuple> View<'w, Q> {
    pub(crate) fn new(registry: &'w mut ComponentRegistry) -> Self {
        Self {
            arrays: Q::fetch(registry),
            index: 0,
            _registry: PhantomData,
        }
    }
}

impl<'w, Q: QueryTuple> Iterator for View<'w, Q> {
    type Item = (Entity, Q::Refs<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        unsafe {
            let entities: &'w [Entity] = Q::primary_entities(self.arrays);
            while self.index < entities.len() {
                let entity = entities[self.index];
                self.index += 1;
                if Q::matches_rest(self.arrays, entity) {
                    return Some((entity, Q::refs(self.arrays, entity)));
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Speed {
        vx: f32,
    }
    impl Component for Speed {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tag;
    impl Component for Tag {}

    fn entity(index: u32) -> Entity {
        Entity::new(index, 1)
    }

    fn sample_registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        // e0: Position + Speed, e1: Position + Speed + Tag, e2: Position only.
        registry
            .array_mut::<Position>()
            .set(entity(0), Position { x: 1.0 });
        registry
            .array_mut::<Position>()
            .set(entity(1), Position { x: 2.0 });
        registry
            .array_mut::<Position>()
            .set(entity(2), Position { x: 3.0 });
        registry
            .array_mut::<Speed>()
            .set(entity(0), Speed { vx: 0.1 });
        registry
            .array_mut::<Speed>()
            .set(entity(1), Speed { vx: 0.2 });
        registry.array_mut::<Tag>().set(entity(1), Tag);
        registry
    }

    #[test]
    fn test_join_visits_exactly_the_intersection() {
        let mut registry = sample_registry();
        let query: Query<'_, (Position, Speed)> = Query::new(&mut registry);

        assert_eq!(query.count(), 2);
        assert!(query.any());

        let mut visited = query.entities();
        visited.sort();
        assert_eq!(visited, vec![entity(0), entity(1)]);
    }

    #[test]
    fn test_for_each_mut_integrates_components() {
        let mut registry = sample_registry();
        let mut query: Query<'_, (Position, Speed)> = Query::new(&mut registry);

        let dt = 1.0;
        query.for_each_mut(|_, (position, speed)| {
            position.x += speed.vx * dt;
        });
        drop(query);

        let positions = registry.array::<Position>().unwrap();
        assert!((positions.get(entity(0)).unwrap().x - 1.1).abs() < 1e-6);
        assert!((positions.get(entity(1)).unwrap().x - 2.2).abs() < 1e-6);
        // Not part of the join: untouched.
        assert!((positions.get(entity(2)).unwrap().x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_three_way_join() {
        let mut registry = sample_registry();
        let query: Query<'_, (Position, Speed, Tag)> = Query::new(&mut registry);
        assert_eq!(query.entities(), vec![entity(1)]);
    }

    #[test]
    fn test_empty_join() {
        let mut registry = ComponentRegistry::new();
        let query: Query<'_, (Position, Speed)> = Query::new(&mut registry);
        assert_eq!(query.count(), 0);
        assert!(!query.any());
        assert!(query.entities().is_empty());
    }

    #[test]
    fn test_single_component_query() {
        let mut registry = sample_registry();
        let query: Query<'_, (Position,)> = Query::new(&mut registry);
        assert_eq!(query.count(), 3);
    }

    #[test]
    #[should_panic(expected = "repeats a component type")]
    fn test_duplicate_component_type_is_rejected() {
        let mut registry = sample_registry();
        let mut query: Query<'_, (Position, Position)> = Query::new(&mut registry);
        query.for_each_mut(|_, _| {});
    }

    #[test]
    fn test_view_iteration() {
        let mut registry = sample_registry();
        let view: View<'_, (Position, Speed)> = View::new(&mut registry);

        let total: f32 = view.map(|(_, (position, _))| position.x).sum();
        assert!((total - 3.0).abs() < 1e-6);
    }
}
