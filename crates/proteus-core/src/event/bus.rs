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

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Marker trait for event payloads transported by the [`EventBus`].
///
/// Any plain `'static + Send + Sync` type qualifies; events are passed to
/// listeners by reference.
pub trait Event: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Event for T {}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later.
pub type ListenerId = u64;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Per-event-type listener list. Stored type-erased in the bus and recovered
/// by downcasting; the downcast is sound because the entry is keyed and
/// created by the same generic.
struct Dispatcher<E: Event> {
    listeners: Vec<(ListenerId, Callback<E>)>,
}

struct BusState {
    dispatchers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    next_listener_id: ListenerId,
}

/// A thread-safe, type-keyed publish/subscribe bus.
///
/// Listeners are invoked synchronously and in insertion order. `publish`
/// snapshots the listener list under the internal lock and releases it before
/// invoking any callback, so listeners may freely subscribe or unsubscribe
/// during a dispatch: the in-flight publish is isolated by the snapshot.
pub struct EventBus {
    state: Mutex<BusState>,
}

impl EventBus {
    /// Creates an empty bus. Listener ids start at 1 and never repeat.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BusState {
                dispatchers: HashMap::new(),
                next_listener_id: 1,
            }),
        }
    }

    /// Subscribes `callback` to events of type `E`.
    ///
    /// Returns a fresh, monotonically increasing [`ListenerId`] for
    /// unsubscription.
    pub fn subscribe<E: Event>(
        &self,
        callback: impl Fn(&E) + Send + Sync + 'static,
    ) -> ListenerId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_listener_id;
        state.next_listener_id += 1;

        let entry = state
            .dispatchers
            .entry(TypeId::of::<E>())
            .or_insert_with(|| {
                Box::new(Dispatcher::<E> {
                    listeners: Vec::new(),
                })
            });
        let dispatcher = entry
            .downcast_mut::<Dispatcher<E>>()
            .expect("dispatcher stored under mismatched event type");
        dispatcher.listeners.push((id, Arc::new(callback)));

        log::trace!("EventBus: listener {id} subscribed.");
        id
    }

    /// Removes the listener with the given id from events of type `E`.
    ///
    /// A no-op if the id is absent (already removed, or registered for a
    /// different event type).
    pub fn unsubscribe<E: Event>(&self, id: ListenerId) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.dispatchers.get_mut(&TypeId::of::<E>()) {
            if let Some(dispatcher) = entry.downcast_mut::<Dispatcher<E>>() {
                dispatcher.listeners.retain(|(lid, _)| *lid != id);
            }
        }
    }

    /// Publishes `event` to every listener subscribed for `E`.
    ///
    /// Callbacks run outside the bus lock, in insertion order. Listeners
    /// added during the dispatch do not observe the in-flight event.
    pub fn publish<E: Event>(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = {
            let state = self.state.lock().unwrap();
            match state.dispatchers.get(&TypeId::of::<E>()) {
                Some(entry) => entry
                    .downcast_ref::<Dispatcher<E>>()
                    .map(|d| d.listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                    .unwrap_or_default(),
                None => return,
            }
        };

        for callback in callbacks {
            callback(event);
        }
    }

    /// Returns the number of listeners currently subscribed for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .dispatchers
            .get(&TypeId::of::<E>())
            .and_then(|entry| entry.downcast_ref::<Dispatcher<E>>())
            .map(|d| d.listeners.len())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct EntitySpawned {
        index: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct FrameEnded {
        frame: u64,
    }

    #[test]
    fn test_publish_reaches_subscriber_once_per_publish() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_cb = Arc::clone(&hits);
        let id = bus.subscribe::<EntitySpawned>(move |_| {
            hits_cb.fetch_add(1, Ordering::Relaxed);
        });

        bus.publish(&EntitySpawned { index: 1 });
        bus.publish(&EntitySpawned { index: 2 });
        assert_eq!(hits.load(Ordering::Relaxed), 2);

        bus.unsubscribe::<EntitySpawned>(id);
        bus.publish(&EntitySpawned { index: 3 });
        assert_eq!(hits.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_listener_ids_are_fresh_and_monotonic() {
        let bus = EventBus::new();
        let a = bus.subscribe::<EntitySpawned>(|_| {});
        let b = bus.subscribe::<FrameEnded>(|_| {});
        assert!(b > a);
        assert!(a >= 1);
    }

    #[test]
    fn test_events_are_routed_by_type() {
        let bus = EventBus::new();
        let spawned = Arc::new(AtomicUsize::new(0));
        let ended = Arc::new(AtomicUsize::new(0));

        let s = Arc::clone(&spawned);
        bus.subscribe::<EntitySpawned>(move |_| {
            s.fetch_add(1, Ordering::Relaxed);
        });
        let e = Arc::clone(&ended);
        bus.subscribe::<FrameEnded>(move |_| {
            e.fetch_add(1, Ordering::Relaxed);
        });

        bus.publish(&FrameEnded { frame: 7 });
        assert_eq!(spawned.load(Ordering::Relaxed), 0);
        assert_eq!(ended.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let bus = EventBus::new();
        bus.unsubscribe::<EntitySpawned>(42);
        assert_eq!(bus.listener_count::<EntitySpawned>(), 0);
    }

    #[test]
    fn test_subscribe_during_publish_misses_inflight_event() {
        let bus = Arc::new(EventBus::new());
        let late_hits = Arc::new(AtomicUsize::new(0));

        let bus_inner = Arc::clone(&bus);
        let late_inner = Arc::clone(&late_hits);
        bus.subscribe::<EntitySpawned>(move |_| {
            let late = Arc::clone(&late_inner);
            bus_inner.subscribe::<EntitySpawned>(move |_| {
                late.fetch_add(1, Ordering::Relaxed);
            });
        });

        bus.publish(&EntitySpawned { index: 0 });
        // The listener registered mid-dispatch must not see the event that
        // triggered its registration.
        assert_eq!(late_hits.load(Ordering::Relaxed), 0);
        assert_eq!(bus.listener_count::<EntitySpawned>(), 2);

        bus.publish(&EntitySpawned { index: 1 });
        assert_eq!(late_hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unsubscribe_during_publish_is_safe() {
        let bus = Arc::new(EventBus::new());
        let second_hits = Arc::new(AtomicUsize::new(0));

        // First listener removes the second one mid-dispatch; the snapshot
        // still delivers the in-flight event to it.
        let bus_inner = Arc::clone(&bus);
        let victim_id = Arc::new(Mutex::new(0u64));
        let victim_handle = Arc::clone(&victim_id);
        bus.subscribe::<EntitySpawned>(move |_| {
            bus_inner.unsubscribe::<EntitySpawned>(*victim_handle.lock().unwrap());
        });

        let s = Arc::clone(&second_hits);
        let id = bus.subscribe::<EntitySpawned>(move |_| {
            s.fetch_add(1, Ordering::Relaxed);
        });
        *victim_id.lock().unwrap() = id;

        bus.publish(&EntitySpawned { index: 0 });
        assert_eq!(second_hits.load(Ordering::Relaxed), 1);

        bus.publish(&EntitySpawned { index: 1 });
        assert_eq!(second_hits.load(Ordering::Relaxed), 1);
    }
}
