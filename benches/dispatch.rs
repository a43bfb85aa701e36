#![allow(clippy::unwrap_used)]
//! Benchmarks for registry event dispatch and wake-up resync
//!
//! Measures the cost of fanning platform events out to the stock module set
//! and of the wake-up broadcast that follows a display-off period.

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use indicator::icon::IconBoard;
use indicator::modules::{ModuleContext, Registry, default_modules};
use indicator::platform::{
    AdapterState, MemoryPlatform, PlatformEvent, StateKey, StateValue, bt_device,
};
use std::hint::black_box;
use std::sync::Arc;

fn booted_registry() -> (Registry, ModuleContext, Arc<MemoryPlatform>) {
    let (platform, _events) = MemoryPlatform::new();
    platform.set_bluetooth_adapter(AdapterState::Enabled);
    let platform = Arc::new(platform);
    let ctx = ModuleContext::new(platform.clone(), Arc::new(IconBoard::new("/res")));
    let mut registry = Registry::new(default_modules());
    registry.init(&ctx);
    (registry, ctx, platform)
}

fn bench_dispatch(c: &mut Criterion) {
    let (mut registry, ctx, platform) = booted_registry();
    let mut group = c.benchmark_group("registry_dispatch");

    for capacity in [10, 55, 95] {
        platform.set_int(StateKey::BatteryCapacity, capacity);
        let event = PlatformEvent::KeyChanged {
            key: StateKey::BatteryCapacity,
            value: StateValue::Int(capacity),
        };
        group.bench_with_input(BenchmarkId::new("battery", capacity), &event, |b, event| {
            b.iter(|| registry.dispatch(black_box(event), &ctx));
        });
    }

    platform.set_int(StateKey::BtDevice, bt_device::HEADSET_CONNECTED);
    let event = PlatformEvent::KeyChanged {
        key: StateKey::BtDevice,
        value: StateValue::Int(bt_device::HEADSET_CONNECTED),
    };
    group.bench_function("bluetooth", |b| {
        b.iter(|| registry.dispatch(black_box(&event), &ctx));
    });

    group.finish();
}

fn bench_wake_up(c: &mut Criterion) {
    let (mut registry, ctx, platform) = booted_registry();
    let event = PlatformEvent::KeyChanged {
        key: StateKey::BatteryCapacity,
        value: StateValue::Int(30),
    };

    c.bench_function("registry_wake_up_resync", |b| {
        b.iter(|| {
            ctx.update_gate().close();
            platform.set_int(StateKey::BatteryCapacity, 30);
            registry.dispatch(&event, &ctx);
            ctx.update_gate().open();
            registry.wake_up(&ctx);
            platform.set_int(StateKey::BatteryCapacity, 80);
            black_box(registry.initialized_count());
        });
    });
}

criterion_group!(benches, bench_dispatch, bench_wake_up);
criterion_main!(benches);
