use dash_challenges::vehicle_routing::*;
use dash_challenges::{Node, ScenarioError};

fn corners() -> Scenario {
    Scenario {
        nodes: vec![
            Node::new("S", 0.0, 0.0),
            Node::new("A", 1.0, 0.0).with_demand(2.0),
            Node::new("B", 1.0, 1.0).with_demand(3.0),
            Node::new("C", 0.0, 1.0),
        ],
        depot: "S".to_string(),
        capacity: 6.0,
    }
}

fn route(ids: &[&str]) -> Solution {
    Solution::new(ids.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_demands_default_to_one() {
    let challenge = Challenge::new(&corners()).unwrap();
    assert_eq!(challenge.num_customers(), 3);
    assert_eq!(challenge.customers, vec![1, 2, 3]);
    assert_eq!(challenge.demands, vec![0.0, 2.0, 3.0, DEFAULT_DEMAND]);
    assert_eq!(challenge.load(&[1, 2, 3]), 6.0);
}

#[test]
fn test_rejects_malformed_scenarios() {
    let mut scenario = corners();
    scenario.capacity = 0.0;
    assert_eq!(
        Challenge::new(&scenario).unwrap_err(),
        ScenarioError::InvalidCapacity { capacity: 0.0 }
    );

    let mut scenario = corners();
    scenario.depot = "X".to_string();
    assert!(matches!(
        Challenge::new(&scenario),
        Err(ScenarioError::MissingStart { .. })
    ));

    let mut scenario = corners();
    scenario.nodes[2].demand = Some(-1.0);
    assert_eq!(
        Challenge::new(&scenario).unwrap_err(),
        ScenarioError::InvalidDemand {
            id: "B".to_string(),
            demand: -1.0
        }
    );
}

#[test]
fn test_single_route_perimeter() {
    let challenge = Challenge::new(&corners()).unwrap();
    let eval = challenge.evaluate_solution(&route(&["S", "A", "B", "C", "S"]));
    assert!(eval.is_feasible());
    assert_eq!(eval.cost, 4.0);
}

#[test]
fn test_capacity_and_coverage_violations() {
    let mut scenario = corners();
    scenario.capacity = 4.0;
    let challenge = Challenge::new(&scenario).unwrap();

    let eval = challenge.evaluate_solution(&route(&["S", "A", "B", "S", "A", "S"]));
    assert_eq!(
        eval.violations,
        vec![
            "Customer A is served 2 times".to_string(),
            "Customer C is not served".to_string(),
            "Route 1 carries 5 which exceeds capacity 4".to_string(),
        ]
    );

    let eval = challenge.evaluate_solution(&route(&["A", "S", "B", "S", "C", "Q"]));
    assert_eq!(
        eval.violations,
        vec![
            "Routes must start and end at depot S".to_string(),
            "Unknown node Q".to_string(),
        ]
    );
}

#[test]
fn test_routes_split_at_depot() {
    let solution = route(&["S", "A", "B", "S", "S", "C", "S"]);
    assert_eq!(
        solution.routes("S"),
        vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["C".to_string()],
        ]
    );
}

#[test]
fn test_to_solution_elides_repeated_depot() {
    let challenge = Challenge::new(&corners()).unwrap();
    let solution = challenge.to_solution(&[vec![0, 1, 2, 0], vec![0, 3, 0]]);
    assert_eq!(solution, route(&["S", "A", "B", "S", "C", "S"]));
    assert_eq!(challenge.to_solution(&[]), route(&["S"]));
}

#[test]
fn test_legs_track_load() {
    let challenge = Challenge::new(&corners()).unwrap();
    let legs = challenge.legs(&route(&["S", "A", "B", "S", "C", "S"]));
    assert_eq!(legs.len(), 5);
    let loads: Vec<f64> = legs.iter().map(|l| l.load_after).collect();
    assert_eq!(loads, vec![2.0, 5.0, 0.0, 1.0, 0.0]);
    assert_eq!(legs[0].from, "S");
    assert_eq!(legs[0].to, "A");
    assert_eq!(legs[0].distance, 1.0);
    assert!((legs[2].distance - 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_generate_instance() {
    let seed = [11u8; 32];
    let difficulty = Difficulty {
        num_customers: 8,
        capacity: 8.0,
    };
    let a = Scenario::generate_instance(&seed, &difficulty);
    assert_eq!(a, Scenario::generate_instance(&seed, &difficulty));
    assert_eq!(a.nodes.len(), 9);
    assert_eq!(a.capacity, 8.0);
    for node in &a.nodes[1..] {
        let demand = node.demand.unwrap();
        assert!((1.0..=4.0).contains(&demand));
    }
    assert!(Challenge::new(&a).is_ok());
}
