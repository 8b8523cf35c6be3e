use criterion::{black_box, criterion_group, criterion_main, Criterion};
use goap_core::{ActionDescriptor, ActionId, ConditionSet, Memory, MemoryKey};
use goap_planner::GoapPlanner;

const IDS: [&str; 12] = [
    "set_0", "set_1", "set_2", "set_3", "set_4", "set_5", "set_6", "set_7", "set_8", "set_9",
    "set_10", "set_11",
];

fn toy_library(keys: u16) -> (Vec<ActionDescriptor>, ConditionSet) {
    let actions = (0..keys)
        .map(|i| {
            ActionDescriptor::new(ActionId(IDS[i as usize]), 1)
                .with_effects(ConditionSet::single(MemoryKey::Custom(i), true))
        })
        .collect();
    let goal = ConditionSet::new((0..keys).map(|i| (MemoryKey::Custom(i), true)));
    (actions, goal)
}

fn chain_library(len: u16) -> (Vec<ActionDescriptor>, ConditionSet) {
    let actions = (0..len)
        .map(|i| {
            let pre = if i == 0 {
                ConditionSet::empty()
            } else {
                ConditionSet::single(MemoryKey::Custom(i - 1), true)
            };
            ActionDescriptor::new(ActionId(IDS[i as usize]), 1)
                .with_preconditions(pre)
                .with_effects(ConditionSet::single(MemoryKey::Custom(i), true))
        })
        .collect();
    let goal = ConditionSet::single(MemoryKey::Custom(len - 1), true);
    (actions, goal)
}

fn bench_goap_planner(c: &mut Criterion) {
    let planner = GoapPlanner::default();
    let memory = Memory::new();

    let (actions, goal) = toy_library(8);
    c.bench_function("goap-planner/plan(independent=8)", |b| {
        b.iter(|| {
            let plan = planner.plan(&memory, &goal, &actions).expect("plan");
            black_box(plan.len());
        })
    });

    let (actions, goal) = chain_library(12);
    c.bench_function("goap-planner/plan(chain=12)", |b| {
        b.iter(|| {
            let plan = planner.plan(&memory, &goal, &actions).expect("plan");
            black_box(plan.len());
        })
    });
}

criterion_group!(benches, bench_goap_planner);
criterion_main!(benches);
