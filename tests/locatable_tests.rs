#![allow(missing_docs)]

use botevo::simulation::agent::Agent;
use botevo::simulation::food::Food;
use botevo::simulation::locatable::Locatable;
use botevo::simulation::params::Params;
use ndarray::array;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;

fn create_agent(id: usize, x: f32, y: f32) -> Agent {
    let mut rng = StdRng::seed_from_u64(id as u64);
    let mut agent = Agent::new_random(id, &Params::default(), &mut rng);
    agent.pos = array![x, y];
    agent
}

#[test]
fn test_food_locatable() {
    let params = Params::default();
    let mut food = Food::at(0, 10.0, 20.0);

    // Test pos accessor
    assert_eq!(food.pos()[0], 10.0);
    assert_eq!(food.pos()[1], 20.0);

    // Test pos_mut accessor
    food.pos_mut()[0] = 15.0;
    assert_eq!(food.pos()[0], 15.0);

    assert_eq!(food.hitbox_radius(&params), params.food_hitbox_radius);
}

#[test]
fn test_agent_locatable() {
    let params = Params::default();
    let mut agent = create_agent(0, 0.0, 0.0);

    agent.pos_mut()[1] = 4.0;
    assert_eq!(agent.pos()[1], 4.0);
    assert_eq!(agent.hitbox_radius(&params), params.agent_hitbox_radius);
}

#[test]
fn test_distance_between_entities() {
    let agent = create_agent(0, 0.0, 0.0);
    let food = Food::at(1, 3.0, 4.0);

    assert!((agent.distance_to(&food) - 5.0).abs() < 1e-6);
    assert!((food.distance_to(&agent) - 5.0).abs() < 1e-6);
}

#[test]
fn test_touches_uses_both_radii() {
    let params = Params::default();
    let agent = create_agent(0, 100.0, 100.0);
    let reach = params.agent_hitbox_radius + params.food_hitbox_radius;

    assert!(Food::at(1, 100.0 + reach, 100.0).touches(&agent, &params));
    assert!(!Food::at(1, 100.0 + reach + 0.5, 100.0).touches(&agent, &params));
}

#[test]
fn test_first_collision_in_collection_order() {
    let params = Params::default();
    let agents = vec![
        create_agent(0, 300.0, 300.0),
        create_agent(1, 101.0, 100.0),
        create_agent(2, 100.0, 100.0),
    ];
    let food = Food::at(3, 100.0, 100.0);

    assert_eq!(food.first_collision(&agents, &params), Some(1));
    assert_eq!(food.first_collision(&agents[..1], &params), None);
}
