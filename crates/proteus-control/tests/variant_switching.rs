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

//! The controller driving a variant-capable system across workload
//! thresholds.

use proteus_control::{AdaptiveController, ControllerConfig};
use proteus_ecs::systems::VelocitySystem;
use proteus_ecs::{
    Entity, SystemVariant, Transform, Vec3, VariantSystem, Velocity, World,
};

fn spawn_movers(world: &mut World, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            world
                .build_entity()
                .with(Transform::default())
                .with(Velocity::from_linear(Vec3::RIGHT))
                .entity()
        })
        .collect()
}

fn per_tick_controller() -> AdaptiveController {
    AdaptiveController::new(ControllerConfig {
        cadence: 1,
        ..ControllerConfig::default()
    })
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_controller_promotes_and_demotes_across_thresholds() {
    let mut world = World::new();
    world.register_system(VelocitySystem::new());
    let movers = spawn_movers(&mut world, 600);

    let mut controller = per_tick_controller();
    controller.update(&mut world);

    let system = world.get_system::<VelocitySystem>().unwrap();
    assert_eq!(system.current_variant(), SystemVariant::SIMD);

    // The switch is observable on the next frame's update.
    world.tick(0.016);

    for &entity in movers.iter().skip(50) {
        world.destroy_entity(entity);
    }
    assert_eq!(world.entity_count(), 50);

    controller.update(&mut world);
    let system = world.get_system::<VelocitySystem>().unwrap();
    assert_eq!(system.current_variant(), SystemVariant::Scalar);
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_mid_band_entity_counts_change_nothing() {
    let mut world = World::new();
    world.register_system(VelocitySystem::new());
    spawn_movers(&mut world, 300);

    let mut controller = per_tick_controller();
    controller.update(&mut world);

    // 100 <= 300 <= 500: neither rule fires.
    let system = world.get_system::<VelocitySystem>().unwrap();
    assert_eq!(system.current_variant(), SystemVariant::Scalar);
}

#[test]
fn test_exact_thresholds_are_exclusive() {
    let mut world = World::new();
    world.register_system(VelocitySystem::new());
    spawn_movers(&mut world, 500);

    // Exactly 500 entities: the promotion rule requires strictly greater.
    let mut controller = per_tick_controller();
    controller.update(&mut world);
    let system = world.get_system::<VelocitySystem>().unwrap();
    assert_eq!(system.current_variant(), SystemVariant::Scalar);
}

#[test]
fn test_cadence_skips_intermediate_calls() {
    let mut world = World::new();
    world.register_system(VelocitySystem::new());
    spawn_movers(&mut world, 600);

    let mut controller = AdaptiveController::new(ControllerConfig {
        cadence: 4,
        ..ControllerConfig::default()
    });

    // First call evaluates; put the system back to Scalar by hand and
    // verify the next three calls are gated.
    controller.update(&mut world);
    let system = world.get_system_mut::<VelocitySystem>().unwrap();
    system.switch_variant(SystemVariant::Scalar);

    for _ in 0..3 {
        controller.update(&mut world);
        let system = world.get_system::<VelocitySystem>().unwrap();
        assert_eq!(system.current_variant(), SystemVariant::Scalar);
    }

    // The fourth call lands on the cadence point again.
    controller.update(&mut world);
    if cfg!(target_arch = "x86_64") {
        let system = world.get_system::<VelocitySystem>().unwrap();
        assert_eq!(system.current_variant(), SystemVariant::SIMD);
    }
}
