use dash_challenges::transportation::*;
use dash_challenges::ScenarioError;
use std::collections::BTreeMap;

fn two_by_two() -> FlowInstance {
    let costs: BTreeMap<String, f64> = [("S1>D1", 4.0), ("S1>D2", 6.0), ("S2>D1", 5.0), ("S2>D2", 3.0)]
        .into_iter()
        .map(|(k, c)| (k.to_string(), c))
        .collect();
    FlowInstance::transportation(
        vec![Terminal::new("S1", 60.0), Terminal::new("S2", 40.0)],
        vec![Terminal::new("D1", 50.0), Terminal::new("D2", 50.0)],
        &costs,
    )
}

fn via_hub(cap: Option<f64>) -> FlowInstance {
    FlowInstance {
        supplies: vec![Terminal::new("P", 30.0)],
        demands: vec![Terminal::new("M", 30.0)],
        hubs: vec![Hub {
            id: "H".to_string(),
            capacity: cap,
        }],
        arcs: vec![
            FlowArc::new("P", "H", 1.0),
            FlowArc::new("H", "M", 2.0),
            FlowArc::new("P", "M", 5.0).with_capacity(10.0),
        ],
    }
}

fn plan(entries: &[(&str, f64)]) -> Solution {
    Solution::new(entries.iter().map(|&(k, q)| (k.to_string(), q)).collect())
}

#[test]
fn test_transportation_builder() {
    let instance = two_by_two();
    assert_eq!(instance.arcs.len(), 4);
    assert_eq!(instance.arcs[1].key(), "S1>D2");
    assert!(instance.arcs.iter().all(|a| a.capacity.is_none()));
    assert_eq!(instance.total_supply(), 100.0);
    assert!(instance.is_balanced());
    assert!(!instance.is_transshipment());
    assert!(via_hub(None).is_transshipment());
}

#[test]
fn test_rejects_malformed_instances() {
    let mut instance = two_by_two();
    instance.supplies[0].quantity = -5.0;
    assert_eq!(
        Challenge::new(&instance).unwrap_err(),
        ScenarioError::InvalidQuantity {
            id: "S1".to_string(),
            quantity: -5.0
        }
    );

    let mut instance = two_by_two();
    instance.demands[0].id = "S2".to_string();
    assert!(matches!(
        Challenge::new(&instance),
        Err(ScenarioError::DuplicateNode { .. })
    ));

    let mut instance = two_by_two();
    instance.arcs.push(FlowArc::new("S1", "D9", 1.0));
    assert_eq!(
        Challenge::new(&instance).unwrap_err(),
        ScenarioError::UnknownNode {
            id: "D9".to_string(),
            context: "arc S1>D9".to_string()
        }
    );

    let mut instance = two_by_two();
    instance.arcs.push(FlowArc::new("S1", "D1", 2.0));
    assert_eq!(
        Challenge::new(&instance).unwrap_err(),
        ScenarioError::DuplicateArc {
            key: "S1>D1".to_string()
        }
    );

    let mut instance = two_by_two();
    instance.arcs[0].cost = f64::NAN;
    assert!(matches!(
        Challenge::new(&instance),
        Err(ScenarioError::InvalidArc { .. })
    ));
}

#[test]
fn test_evaluate_balanced_plan() {
    let challenge = Challenge::new(&two_by_two()).unwrap();
    let eval = challenge.evaluate_solution(&plan(&[
        ("S1>D1", 50.0),
        ("S1>D2", 10.0),
        ("S2>D2", 40.0),
    ]));
    assert!(eval.is_feasible());
    assert_eq!(eval.cost, 380.0);
}

#[test]
fn test_evaluate_reports_every_violation() {
    let challenge = Challenge::new(&two_by_two()).unwrap();
    let eval = challenge.evaluate_solution(&plan(&[
        ("S1>D1", 50.0),
        ("S2>D2", 40.0),
        ("D1>S1", 0.0),
        ("S2>S1", 3.0),
    ]));
    assert_eq!(
        eval.violations,
        vec![
            "Arc S2>S1 not allowed.".to_string(),
            "Supply S1: sent 50 != 60".to_string(),
            "Demand D2: received 40 != 50".to_string(),
        ]
    );
    assert_eq!(eval.cost, 320.0);
}

#[test]
fn test_hub_conservation_and_caps() {
    let challenge = Challenge::new(&via_hub(Some(15.0))).unwrap();
    assert_eq!(challenge.role("H"), Some(Role::Hub));
    assert_eq!(challenge.arc("P>M").unwrap().capacity, Some(10.0));

    let short = challenge.evaluate_solution(&plan(&[("P>H", 15.0), ("H>M", 15.0), ("P>M", 10.0)]));
    // only 25 of the 30 units reach the market
    assert_eq!(
        short.violations,
        vec![
            "Supply P: sent 25 != 30".to_string(),
            "Demand M: received 25 != 30".to_string(),
        ]
    );

    let eval = challenge.evaluate_solution(&plan(&[("P>H", 20.0), ("H>M", 18.0), ("P>M", 12.0)]));
    assert_eq!(
        eval.violations,
        vec![
            "Arc P>M: flow 12 exceeds capacity 10".to_string(),
            "Supply P: sent 32 != 30".to_string(),
            "Hub H: received 20 but sent 18".to_string(),
            "Hub H: throughput 20 exceeds cap 15".to_string(),
        ]
    );
}

#[test]
fn test_solution_totals() {
    let solution = plan(&[("P>H", 20.0), ("H>M", 18.0), ("P>M", 12.0)]);
    assert_eq!(solution.flow_out_of("P"), 32.0);
    assert_eq!(solution.flow_into("M"), 30.0);
    assert_eq!(solution.flow_into("P"), 0.0);
}

#[test]
fn test_generate_instance_is_balanced() {
    let seed = [2u8; 32];
    let difficulty = Difficulty {
        num_supplies: 3,
        num_demands: 4,
    };
    let a = FlowInstance::generate_instance(&seed, &difficulty);
    assert_eq!(a, FlowInstance::generate_instance(&seed, &difficulty));
    assert!(a.is_balanced());
    assert_eq!(a.demands.len(), 4);
    assert!(a.supplies.iter().all(|s| s.quantity > 0.0));
    assert_eq!(a.arcs.len(), a.supplies.len() * a.demands.len());
    assert!(Challenge::new(&a).is_ok());
}

#[test]
fn test_generate_instance_keeps_every_supply() {
    // one small demand split across the most supplies
    let difficulty = Difficulty {
        num_supplies: 8,
        num_demands: 1,
    };
    for i in 0..50u8 {
        let instance = FlowInstance::generate_instance(&[i; 32], &difficulty);
        assert_eq!(instance.supplies.len(), 8);
        assert!(instance.supplies.iter().all(|s| s.quantity >= 1.0));
        assert!(instance.is_balanced());
    }
}

#[test]
fn test_flows_serialize_by_arc_key() {
    let solution = plan(&[("S1>D1", 5.0)]);
    let json = serde_json::to_string(&solution).unwrap();
    assert_eq!(json, r#"{"flows":{"S1>D1":5.0}}"#);
}
