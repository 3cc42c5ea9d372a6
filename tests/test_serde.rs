#![cfg(feature = "serde")]

use fjsp_evo::{
    evolution::{GenerationSummary, NsgaOptions, ReefOptions},
    instance::{parser, DEFAULT_DATASET},
    Objectives,
};

#[test]
fn test_instance_json() {
    let instance = parser::parse_dataset(DEFAULT_DATASET).unwrap();
    let json = serde_json::to_string(&instance).unwrap();
    let restored: fjsp_evo::Instance = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, instance);
}

#[test]
fn test_options_json() {
    let options = NsgaOptions::new(30, 40);
    let value = serde_json::to_value(&options).unwrap();
    assert_eq!(value["population_size"], 30);
    assert_eq!(value["mutation_mode"], "Distinct");

    let json = serde_json::to_string(&ReefOptions::default()).unwrap();
    let reef: ReefOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(reef, ReefOptions::default());
}

#[test]
fn test_summary_json() {
    let summary = GenerationSummary {
        generation: 2,
        population_size: 10,
        non_dominated: 3,
        best: Objectives::new(40, 210),
    };
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["best"]["makespan"], 40);
    assert_eq!(value["best"]["total_load"], 210);
}
