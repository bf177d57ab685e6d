use dash_algorithms::{vehicle_routing, SolverLimits, SolverTrait};
use dash_challenges::vehicle_routing::{Challenge, Difficulty, Scenario, Solution};
use dash_challenges::{Method, Node, Optimum};

fn square(capacity: f64) -> Scenario {
    Scenario {
        nodes: vec![
            Node::new("S", 0.0, 0.0),
            Node::new("A", 1.0, 0.0),
            Node::new("B", 1.0, 1.0),
            Node::new("C", 0.0, 1.0),
        ],
        depot: "S".to_string(),
        capacity,
    }
}

fn assert_sound(challenge: &Challenge, optimum: &Optimum<Solution>) {
    let eval = challenge.evaluate_solution(&optimum.solution);
    assert!(eval.violations.is_empty(), "{:?}", eval.violations);
    assert!((eval.cost - optimum.cost).abs() <= 1e-6 * optimum.cost.max(1.0));
    for route in optimum.solution.routes(challenge.nodes.id(challenge.depot)) {
        let load: f64 = route
            .iter()
            .filter_map(|id| challenge.nodes.index_of(id))
            .map(|i| challenge.demands[i])
            .sum();
        assert!(load <= challenge.capacity + 1e-9);
    }
}

#[test]
fn test_single_vehicle_is_the_tour() {
    let challenge = Challenge::new(&square(10.0)).unwrap();
    let optimum = vehicle_routing::solve(&challenge, &SolverLimits::default()).unwrap();
    assert_eq!(optimum.method, Method::Exact);
    assert!((optimum.cost - 4.0).abs() < 1e-9);
    assert_eq!(optimum.solution.routes("S").len(), 1);
    assert_sound(&challenge, &optimum);
}

#[test]
fn test_capacity_forces_split() {
    // each customer needs its own vehicle
    let challenge = Challenge::new(&square(1.0)).unwrap();
    let optimum = vehicle_routing::set_partition::solve_challenge(&challenge).unwrap();
    assert!((optimum.cost - (4.0 + 2.0 * 2f64.sqrt())).abs() < 1e-9);
    assert_eq!(optimum.solution.routes("S").len(), 3);
    assert_eq!(optimum.solution.route.first().map(String::as_str), Some("S"));
    assert_eq!(
        optimum.solution.route.iter().filter(|id| *id == "S").count(),
        4
    );
    assert_sound(&challenge, &optimum);

    // two per vehicle: S-A-B-S and S-C-S, or the mirror image
    let challenge = Challenge::new(&square(2.0)).unwrap();
    let optimum = vehicle_routing::set_partition::solve_challenge(&challenge).unwrap();
    assert!((optimum.cost - (4.0 + 2f64.sqrt())).abs() < 1e-9);
    assert_sound(&challenge, &optimum);
}

#[test]
fn test_oversized_customer_is_infeasible() {
    let mut scenario = square(3.0);
    scenario.nodes[2].demand = Some(5.0);
    let challenge = Challenge::new(&scenario).unwrap();
    for optimum in [
        vehicle_routing::set_partition::solve_challenge(&challenge).unwrap(),
        vehicle_routing::sweep::solve_challenge(&challenge).unwrap(),
    ] {
        assert!(optimum.cost.is_infinite());
        assert_eq!(
            optimum.infeasible_reason.as_deref(),
            Some("Customer B demands 5 which exceeds vehicle capacity 3")
        );
    }
}

#[test]
fn test_depot_only() {
    let scenario = Scenario {
        nodes: vec![Node::new("S", 0.0, 0.0)],
        depot: "S".to_string(),
        capacity: 4.0,
    };
    let challenge = Challenge::new(&scenario).unwrap();
    let optimum = vehicle_routing::solve(&challenge, &SolverLimits::default()).unwrap();
    assert_eq!(optimum.cost, 0.0);
    assert_eq!(optimum.solution.route, vec!["S"]);
}

#[test]
fn test_sweep_runs_respect_capacity() {
    let challenge = Challenge::new(&square(2.0)).unwrap();
    let routes = vehicle_routing::sweep::sweep_routes(&challenge);
    // angles from the depot: A at 0, B at 45 and C at 90 degrees
    assert_eq!(routes, vec![vec![0, 1, 2, 0], vec![0, 3, 0]]);
}

#[test]
fn test_exact_dominates_sweep() {
    for i in 0..12u8 {
        let scenario = Scenario::generate_instance(
            &[i; 32],
            &Difficulty {
                num_customers: 3 + (i as usize % 6),
                capacity: 8.0,
            },
        );
        let challenge = Challenge::new(&scenario).unwrap();
        let exact = vehicle_routing::set_partition::solve_challenge(&challenge).unwrap();
        let sweep = vehicle_routing::sweep::solve_challenge(&challenge).unwrap();
        assert_eq!(exact.method, Method::Exact);
        assert_eq!(sweep.method, Method::Heuristic);
        assert!(exact.cost <= sweep.cost + 1e-9);
        assert_sound(&challenge, &exact);
        assert_sound(&challenge, &sweep);
    }
}

#[test]
fn test_many_customers_hand_off_to_sweep() {
    let scenario = Scenario::generate_instance(
        &[3u8; 32],
        &Difficulty {
            num_customers: 18,
            capacity: 8.0,
        },
    );
    let challenge = Challenge::new(&scenario).unwrap();
    let limits = SolverLimits::default();
    assert!(!vehicle_routing::uses_exact(&challenge, &limits));
    let optimum = vehicle_routing::solve(&challenge, &limits).unwrap();
    assert_eq!(optimum.method, vehicle_routing::sweep::Solver::METHOD);
    assert_sound(&challenge, &optimum);
}

#[test]
fn test_loose_limits_are_clamped() {
    let scenario = Scenario::generate_instance(
        &[5u8; 32],
        &Difficulty {
            num_customers: 24,
            capacity: 8.0,
        },
    );
    let challenge = Challenge::new(&scenario).unwrap();
    let loose = SolverLimits {
        exact_tour_max_nodes: 12,
        exact_routing_max_customers: 64,
    };
    assert!(!vehicle_routing::uses_exact(&challenge, &loose));
    let optimum = vehicle_routing::solve(&challenge, &loose).unwrap();
    assert_eq!(optimum.method, Method::Heuristic);
    assert_sound(&challenge, &optimum);

    let err = vehicle_routing::set_partition::Solver::solve_challenge(&challenge).unwrap_err();
    assert!(err.to_string().contains("Cannot partition 24 customers exactly"));
}
