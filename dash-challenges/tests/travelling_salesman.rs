use dash_challenges::travelling_salesman::*;
use dash_challenges::{Node, ScenarioError};
use dash_utils::DistanceMetric;

fn square() -> Scenario {
    Scenario {
        nodes: vec![
            Node::new("S", 0.0, 0.0),
            Node::new("A", 1.0, 0.0),
            Node::new("B", 1.0, 1.0),
            Node::new("C", 0.0, 1.0),
        ],
        start: "S".to_string(),
        metric: DistanceMetric::Euclidean,
    }
}

fn tour(ids: &[&str]) -> Solution {
    Solution::new(ids.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_missing_start() {
    let mut scenario = square();
    scenario.start = "depot".to_string();
    assert_eq!(
        Challenge::new(&scenario).unwrap_err(),
        ScenarioError::MissingStart {
            id: "depot".to_string()
        }
    );
}

#[test]
fn test_route_length_and_solution() {
    let challenge = Challenge::new(&square()).unwrap();
    assert_eq!(challenge.num_nodes(), 4);
    assert_eq!(challenge.route_length(&[0, 1, 2, 3, 0]), 4.0);
    let solution = challenge.to_solution(&[0, 1, 2, 3, 0]);
    assert_eq!(solution, tour(&["S", "A", "B", "C", "S"]));
    assert_eq!(challenge.evaluate_solution(&solution).cost, 4.0);
}

#[test]
fn test_evaluate_crossing_tour() {
    let challenge = Challenge::new(&square()).unwrap();
    let eval = challenge.evaluate_solution(&tour(&["S", "B", "A", "C", "S"]));
    assert!(eval.is_feasible());
    assert!((eval.cost - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-9);
}

#[test]
fn test_evaluate_reports_every_violation() {
    let challenge = Challenge::new(&square()).unwrap();

    let eval = challenge.evaluate_solution(&tour(&["S"]));
    assert_eq!(eval.violations, vec!["Tour must start and end at S".to_string()]);

    let eval = challenge.evaluate_solution(&tour(&["A", "A", "S", "Q", "B"]));
    assert_eq!(
        eval.violations,
        vec![
            "Tour must start and end at S".to_string(),
            "Node A is visited more than once".to_string(),
            "Unknown node Q".to_string(),
            "Tour returns to S before visiting every node".to_string(),
            "Node C is not visited".to_string(),
        ]
    );
}

#[test]
fn test_manhattan_metric() {
    let mut scenario = square();
    scenario.metric = DistanceMetric::Manhattan;
    let challenge = Challenge::new(&scenario).unwrap();
    assert_eq!(challenge.distance(0, 2), 2.0);
    let eval = challenge.evaluate_solution(&tour(&["S", "B", "A", "C", "S"]));
    assert_eq!(eval.cost, 6.0);
}

#[test]
fn test_generate_instance() {
    let seed = [3u8; 32];
    let difficulty = Difficulty { num_nodes: 9 };
    let a = Scenario::generate_instance(&seed, &difficulty);
    assert_eq!(a, Scenario::generate_instance(&seed, &difficulty));
    assert_eq!(a.nodes.len(), 9);
    assert_eq!(a.start, "S");
    assert_eq!(a.metric, DistanceMetric::Euclidean);
    assert!(Challenge::new(&a).is_ok());

    let clamped = Scenario::generate_instance(&seed, &Difficulty { num_nodes: 100 });
    assert_eq!(clamped.nodes.len(), 18);
}

#[test]
fn test_generate_picking_instance() {
    let seed = [5u8; 32];
    let difficulty = PickingDifficulty {
        rows: 4,
        cols: 6,
        picks: 7,
    };
    let a = Scenario::generate_picking_instance(&seed, &difficulty);
    assert_eq!(a, Scenario::generate_picking_instance(&seed, &difficulty));
    assert_eq!(a.metric, DistanceMetric::Manhattan);
    assert_eq!(a.nodes.len(), 8);
    assert_eq!(a.nodes[0].display_name(), "Dock");
    assert!(Challenge::new(&a).is_ok());

    let capped = Scenario::generate_picking_instance(
        &seed,
        &PickingDifficulty {
            rows: 3,
            cols: 4,
            picks: 50,
        },
    );
    assert_eq!(capped.nodes.len(), 13);
}
