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

//! In-place system replacement: ordering, lifecycle hooks, and the
//! generated-function hot-swap boundary.

use proteus_ecs::systems::FunctionSystem;
use proteus_ecs::{System, SystemBase, Transform, Vec3, World};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

type CallLog = Rc<RefCell<Vec<String>>>;

macro_rules! recorder_system {
    ($name:ident, $label:expr) => {
        struct $name {
            base: SystemBase,
            log: CallLog,
        }

        impl $name {
            fn new(log: CallLog) -> Self {
                Self {
                    base: SystemBase::new($label),
                    log,
                }
            }

            fn record(&self, event: &str) {
                self.log.borrow_mut().push(format!("{}:{event}", $label));
            }
        }

        impl System for $name {
            fn name(&self) -> &str {
                self.base.name()
            }

            fn is_enabled(&self) -> bool {
                self.base.is_enabled()
            }

            fn set_enabled(&mut self, enabled: bool) {
                self.base.set_enabled(enabled);
            }

            fn init(&mut self, _world: &mut World) {
                self.record("init");
            }

            fn update(&mut self, _world: &mut World, _dt: f32) {
                self.record("update");
            }

            fn shutdown(&mut self, _world: &mut World) {
                self.record("shutdown");
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

recorder_system!(SystemA, "A");
recorder_system!(SystemB, "B");
recorder_system!(SystemB2, "B2");
recorder_system!(SystemC, "C");

fn take_log(log: &CallLog) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

#[test]
fn test_replacement_preserves_registration_order() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(SystemA::new(Rc::clone(&log)));
    world.register_system(SystemB::new(Rc::clone(&log)));
    world.register_system(SystemC::new(Rc::clone(&log)));

    world.init();
    assert_eq!(take_log(&log), vec!["A:init", "B:init", "C:init"]);

    world.replace_system::<SystemB, SystemB2>(SystemB2::new(Rc::clone(&log)));
    // The old system shuts down before the new one initializes; A and C
    // are neither re-initialized nor shut down.
    assert_eq!(take_log(&log), vec!["B:shutdown", "B2:init"]);

    world.tick(0.016);
    assert_eq!(take_log(&log), vec!["A:update", "B2:update", "C:update"]);
    assert!(world.get_system::<SystemB>().is_none());
    assert!(world.get_system::<SystemB2>().is_some());
}

#[test]
fn test_replacing_missing_type_appends_and_initializes() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(SystemA::new(Rc::clone(&log)));

    world.replace_system::<SystemB, SystemB2>(SystemB2::new(Rc::clone(&log)));
    assert_eq!(take_log(&log), vec!["B2:init"]);
    assert_eq!(world.system_count(), 2);

    world.update(0.016);
    assert_eq!(take_log(&log), vec!["A:update", "B2:update"]);
}

#[test]
fn test_replace_by_name() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(SystemA::new(Rc::clone(&log)));
    world.register_system(SystemB::new(Rc::clone(&log)));

    world.replace_system_by_name("B", SystemB2::new(Rc::clone(&log)));
    assert_eq!(take_log(&log), vec!["B:shutdown", "B2:init"]);
    assert_eq!(world.system_count(), 2);

    world.update(0.016);
    assert_eq!(take_log(&log), vec!["A:update", "B2:update"]);
}

#[test]
fn test_disabled_systems_are_skipped_not_dropped() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(SystemA::new(Rc::clone(&log)));
    world.register_system(SystemB::new(Rc::clone(&log)));
    world.register_system(SystemC::new(Rc::clone(&log)));

    world.get_system_mut::<SystemB>().unwrap().set_enabled(false);
    world.update(0.016);
    // B is skipped, but C still runs in the same pass.
    assert_eq!(take_log(&log), vec!["A:update", "C:update"]);
}

#[test]
fn test_shutdown_runs_in_reverse_order() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(SystemA::new(Rc::clone(&log)));
    world.register_system(SystemB::new(Rc::clone(&log)));
    world.register_system(SystemC::new(Rc::clone(&log)));

    world.shutdown();
    assert_eq!(
        take_log(&log),
        vec!["C:shutdown", "B:shutdown", "A:shutdown"]
    );
}

fn generated_drift(world: &mut World, dt: f32) {
    world
        .query::<(Transform,)>()
        .for_each_mut(|_, (transform,)| {
            transform.position += Vec3::UP * dt;
        });
}

#[test]
fn test_install_generated_function_by_name() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(SystemA::new(Rc::clone(&log)));
    world.register_system(SystemB::new(Rc::clone(&log)));

    let e = world.create_entity();
    world.add_component(e, Transform::default());

    // The proxy takes over B's slot under the same display name.
    world.install_system_fn("B", generated_drift);
    assert_eq!(take_log(&log), vec!["B:shutdown"]);
    assert_eq!(world.system_count(), 2);

    world.tick(2.0);
    assert_eq!(take_log(&log), vec!["A:update"]);
    let t = world.get_component::<Transform>(e).unwrap();
    assert!((t.position.y - 2.0).abs() < 1e-6);

    let proxy = world.get_system::<FunctionSystem>().unwrap();
    assert_eq!(proxy.name(), "B");
}
