use std::error::Error;

use goap_regress::{
    ActionList, BasicAction, Condition, ConditionType, Effect, EffectType, Fact, LogContext,
    Operation, Phase, Planner, WorldState,
};

/// `pkg_at` value meaning "inside the truck".
const IN_TRUCK: i64 = 0;

/// Builds the delivery domain. Locations are the object pool.
fn delivery_actions() -> goap_regress::Result<ActionList<BasicAction>> {
    let truck_at = Fact::new("truck_at");
    let pkg_at = Fact::new("pkg_at");

    // drive(from, to)
    let drive = BasicAction::new("drive", 1.0)?
        .with_params(2)
        .with_special_condition(|params| params[0] != params[1])
        .clause(
            truck_at.clone(),
            Operation::new()
                .with_condition(Condition::from_param(ConditionType::Equals, 0))
                .with_effect(Effect::from_param(EffectType::Set, 1)),
        );
    drive.validate()?;

    // load(here)
    let load = BasicAction::new("load", 1.0)?
        .with_params(1)
        .condition(truck_at.clone(), Condition::from_param(ConditionType::Equals, 0))
        .clause(
            pkg_at.clone(),
            Operation::new()
                .with_condition(Condition::from_param(ConditionType::Equals, 0))
                .with_effect(Effect::new(EffectType::Set, IN_TRUCK)),
        );
    load.validate()?;

    // unload(here)
    let unload = BasicAction::new("unload", 1.0)?
        .with_params(1)
        .condition(truck_at, Condition::from_param(ConditionType::Equals, 0))
        .clause(
            pkg_at,
            Operation::new()
                .with_condition(Condition::new(ConditionType::Equals, IN_TRUCK))
                .with_effect(Effect::from_param(EffectType::Set, 0)),
        );
    unload.validate()?;

    Ok(vec![drive, load, unload].into_iter().collect())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let actions = delivery_actions()?;

    let mut start = WorldState::new();
    start.set(Fact::new("truck_at"), 1);
    start.set(Fact::new("pkg_at"), 2);

    let mut goal = WorldState::new();
    goal.set(Fact::new("pkg_at"), 3);

    let mut planner = Planner::new();
    planner.set_start(&start);
    planner.set_goal(&goal);
    planner.set_actions(&actions);
    planner.set_objects(vec![1, 2, 3]);

    // Spread the search over game ticks, one expansion each
    let mut ctx = LogContext::new();
    planner.init(Some(&mut ctx))?;
    let mut tick = 0;
    while planner.update(Some(&mut ctx))? {
        tick += 1;
        println!("tick {}: {} open nodes", tick, planner.open_len());
    }
    let found = planner.phase() == Phase::Succeeded;
    planner.finalize(Some(&mut ctx))?;

    if !found {
        println!("No plan after {} expansions", planner.expansions());
        return Ok(());
    }

    println!(
        "Plan found in {} expansions ({} planner events):",
        planner.expansions(),
        ctx.events()
    );
    let mut world = start.clone();
    for step in planner.get_plan() {
        world.apply_forward(step.action, &step.params);
        println!("  {:<12} -> {}", step.to_string(), world);
    }

    Ok(())
}
