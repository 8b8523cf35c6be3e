use goap_core::{ActionDescriptor, ActionId, ConditionSet, Memory, MemoryKey};
use goap_planner::{GoapPlanner, PlannerConfig, PlanningFailed};

const FIND: ActionId = ActionId("find_resource");
const PICKUP: ActionId = ActionId("pickup_item");
const GATHER: ActionId = ActionId("gather_resource");

fn gather_library() -> Vec<ActionDescriptor> {
    vec![
        ActionDescriptor::new(FIND, 1)
            .with_effects(ConditionSet::single(MemoryKey::ItemLocated, true)),
        ActionDescriptor::new(PICKUP, 1)
            .with_preconditions(ConditionSet::single(MemoryKey::ItemLocated, true))
            .with_effects(ConditionSet::single(MemoryKey::IsHoldingItem, true)),
        ActionDescriptor::new(GATHER, 1)
            .with_preconditions(ConditionSet::single(MemoryKey::IsHoldingItem, true))
            .with_effects(ConditionSet::single(MemoryKey::HasGatheredResource, true)),
    ]
}

fn gather_goal() -> ConditionSet {
    ConditionSet::single(MemoryKey::HasGatheredResource, true)
}

#[test]
fn plans_full_gather_chain_from_empty_memory() {
    let planner = GoapPlanner::default();
    let plan = planner
        .plan(&Memory::new(), &gather_goal(), &gather_library())
        .expect("plan");

    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![FIND, PICKUP, GATHER]);
    assert_eq!(plan.total_cost(), 3);
    assert_eq!(plan.target(), &gather_goal());
}

#[test]
fn skips_steps_already_true_in_memory() {
    let mut memory = Memory::new();
    memory.set(MemoryKey::ItemLocated, true);

    let plan = GoapPlanner::default()
        .plan(&memory, &gather_goal(), &gather_library())
        .expect("plan");

    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![PICKUP, GATHER]);
}

#[test]
fn satisfied_goal_yields_empty_plan() {
    let mut memory = Memory::new();
    memory.set(MemoryKey::HasGatheredResource, true);

    let plan = GoapPlanner::default()
        .plan(&memory, &gather_goal(), &gather_library())
        .expect("plan");
    assert!(plan.is_empty());
    assert_eq!(plan.total_cost(), 0);
}

#[test]
fn missing_producer_reports_planning_failed() {
    let library: Vec<ActionDescriptor> = gather_library()
        .into_iter()
        .filter(|a| a.id != GATHER)
        .collect();

    let result = GoapPlanner::default().plan(&Memory::new(), &gather_goal(), &library);
    assert_eq!(result, Err(PlanningFailed::Exhausted));
}

#[test]
fn prefers_cheaper_chain_over_shorter_one() {
    let buy = ActionId("buy_resource");
    let mut library = gather_library();
    library.push(
        ActionDescriptor::new(buy, 5)
            .with_effects(ConditionSet::single(MemoryKey::HasGatheredResource, true)),
    );

    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &gather_goal(), &library)
        .expect("plan");
    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![FIND, PICKUP, GATHER]);

    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &gather_goal(), &library[3..])
        .expect("plan");
    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![buy]);
}

#[test]
fn equal_cost_ties_follow_registration_order() {
    let a = ActionId("gather_a");
    let b = ActionId("gather_b");
    let library = vec![
        ActionDescriptor::new(a, 2)
            .with_effects(ConditionSet::single(MemoryKey::HasGatheredResource, true)),
        ActionDescriptor::new(b, 2)
            .with_effects(ConditionSet::single(MemoryKey::HasGatheredResource, true)),
    ];
    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &gather_goal(), &library)
        .expect("plan");
    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![a]);

    let reversed: Vec<_> = library.into_iter().rev().collect();
    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &gather_goal(), &reversed)
        .expect("plan");
    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![b]);
}

#[test]
fn rejects_actions_whose_effects_undo_required_conditions() {
    // `dump` reaches the goal but clears `is_holding_item`, which the goal also needs.
    let dump = ActionId("dump");
    let keep = ActionId("stash");
    let library = vec![
        ActionDescriptor::new(dump, 1).with_effects(ConditionSet::new([
            (MemoryKey::HasGatheredResource, true),
            (MemoryKey::IsHoldingItem, false),
        ])),
        ActionDescriptor::new(keep, 3)
            .with_effects(ConditionSet::single(MemoryKey::HasGatheredResource, true)),
    ];
    let mut memory = Memory::new();
    memory.set(MemoryKey::IsHoldingItem, true);
    let goal = ConditionSet::new([
        (MemoryKey::HasGatheredResource, true),
        (MemoryKey::IsHoldingItem, true),
    ]);

    let plan = GoapPlanner::default()
        .plan(&memory, &goal, &library)
        .expect("plan");
    assert_eq!(plan.action_ids().collect::<Vec<_>>(), vec![keep]);
    let end = plan.simulate(&memory, &library).expect("sound");
    assert!(end.satisfies(&goal));
}

#[test]
fn cyclic_library_terminates() {
    let a = ActionId("a");
    let b = ActionId("b");
    let library = vec![
        ActionDescriptor::new(a, 1)
            .with_preconditions(ConditionSet::single(MemoryKey::Custom(2), true))
            .with_effects(ConditionSet::single(MemoryKey::Custom(1), true)),
        ActionDescriptor::new(b, 1)
            .with_preconditions(ConditionSet::single(MemoryKey::Custom(1), true))
            .with_effects(ConditionSet::single(MemoryKey::Custom(2), true)),
    ];
    let goal = ConditionSet::single(MemoryKey::Custom(1), true);

    let result = GoapPlanner::default().plan(&Memory::new(), &goal, &library);
    assert_eq!(result, Err(PlanningFailed::Exhausted));
}

#[test]
fn expansion_bound_yields_planning_failed() {
    // A long chain needs one expansion per link.
    let library: Vec<ActionDescriptor> = (0..10u16)
        .map(|i| {
            let id: &'static str = Box::leak(format!("link_{i}").into_boxed_str());
            let pre = if i == 0 {
                ConditionSet::empty()
            } else {
                ConditionSet::single(MemoryKey::Custom(i - 1), true)
            };
            ActionDescriptor::new(ActionId(id), 1)
                .with_preconditions(pre)
                .with_effects(ConditionSet::single(MemoryKey::Custom(i), true))
        })
        .collect();
    let goal = ConditionSet::single(MemoryKey::Custom(9), true);

    let tight = GoapPlanner::new(PlannerConfig {
        max_expansions: 4,
        expansions_per_tick: None,
    });
    assert_eq!(
        tight.plan(&Memory::new(), &goal, &library),
        Err(PlanningFailed::ExpansionLimit { limit: 4 })
    );

    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &goal, &library)
        .expect("plan");
    assert_eq!(plan.len(), 10);
    assert_eq!(plan.steps()[0].action, ActionId("link_0"));
}

#[test]
fn time_sliced_search_matches_one_shot_plan() {
    let planner = GoapPlanner::default();
    let mut search = planner.search(Memory::new(), gather_goal(), gather_library());

    let mut slices = 0;
    let result = loop {
        slices += 1;
        if let Some(result) = search.step(1) {
            break result;
        }
        assert!(!search.is_finished());
    };

    assert!(slices > 1);
    assert!(search.is_finished());
    let sliced = result.expect("plan");
    let one_shot = planner
        .plan(&Memory::new(), &gather_goal(), &gather_library())
        .expect("plan");
    assert_eq!(sliced, one_shot);
    assert_eq!(search.step(1), Some(Ok(one_shot)));
}

#[test]
fn multi_condition_goal_combines_branches() {
    let refuel = ActionId("refuel");
    let mut library = gather_library();
    library.push(
        ActionDescriptor::new(refuel, 2)
            .with_effects(ConditionSet::single(MemoryKey::LowFuel, false)),
    );
    let goal = ConditionSet::new([
        (MemoryKey::HasGatheredResource, true),
        (MemoryKey::LowFuel, false),
    ]);

    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &goal, &library)
        .expect("plan");
    assert_eq!(plan.len(), 4);
    assert_eq!(plan.total_cost(), 5);
    assert!(plan.contains(refuel));
    let end = plan.simulate(&Memory::new(), &library).expect("sound");
    assert!(end.satisfies(&goal));
}

#[test]
fn restores_a_condition_an_earlier_step_breaks() {
    let mut memory = Memory::new();
    memory.set(MemoryKey::IsHoldingItem, true);

    let drop_and_gather = ActionId("drop_and_gather");
    let pickup_again = ActionId("pickup_again");
    let library = vec![
        ActionDescriptor::new(drop_and_gather, 1).with_effects(ConditionSet::new([
            (MemoryKey::HasGatheredResource, true),
            (MemoryKey::IsHoldingItem, false),
        ])),
        ActionDescriptor::new(pickup_again, 1)
            .with_effects(ConditionSet::single(MemoryKey::IsHoldingItem, true)),
    ];
    let goal = ConditionSet::new([
        (MemoryKey::HasGatheredResource, true),
        (MemoryKey::IsHoldingItem, true),
    ]);

    let plan = GoapPlanner::default()
        .plan(&memory, &goal, &library)
        .expect("plan");
    assert_eq!(
        plan.action_ids().collect::<Vec<_>>(),
        vec![drop_and_gather, pickup_again]
    );

    let end = plan.simulate(&memory, &library).expect("applicable");
    assert!(end.satisfies(&goal));
}

#[test]
fn repeats_an_action_when_the_chain_needs_it_twice() {
    let locate = ActionId("locate");
    let consume = ActionId("consume");
    let library = vec![
        ActionDescriptor::new(locate, 1)
            .with_effects(ConditionSet::single(MemoryKey::ItemLocated, true)),
        ActionDescriptor::new(consume, 2)
            .with_preconditions(ConditionSet::single(MemoryKey::ItemLocated, true))
            .with_effects(ConditionSet::new([
                (MemoryKey::HasGatheredResource, true),
                (MemoryKey::ItemLocated, false),
            ])),
    ];
    let goal = ConditionSet::new([
        (MemoryKey::HasGatheredResource, true),
        (MemoryKey::ItemLocated, true),
    ]);

    let plan = GoapPlanner::default()
        .plan(&Memory::new(), &goal, &library)
        .expect("plan");
    assert_eq!(
        plan.action_ids().collect::<Vec<_>>(),
        vec![locate, consume, locate]
    );
    assert_eq!(plan.total_cost(), 4);
}
