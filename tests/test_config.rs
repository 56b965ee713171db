use swarm_pso::*;

#[test]
fn test_yaml_config_round_trip() {
    let yaml = r#"
dimension: 3
population_size: 24
bounds:
  lower: [-1.0, -2.0, -3.0]
  upper: [1.0, 2.0, 3.0]
speed:
  personal_best_bias: 1.49
  global_best_bias: 1.49
number_of_particle_sets: 4
policy:
  kind: inertia
  inertia_max: 0.9
  inertia_min: 0.4
  inertia_max_time: 250
max_velocity: 0.5
seed: 3
parallel: true
"#;
    let config: SwarmConfig = serde_yaml::from_str(yaml).unwrap();
    config.verify_values().unwrap();
    assert_eq!(config.bounds.upper[2], 3.0);
    assert_eq!(config.comparator, Comparator::Minimize);
    assert!(matches!(config.policy, VelocityPolicy::Inertia(s) if s.inertia_max_time == 250));

    let swarm = Swarm::from_fn(config.clone(), |x: &ndarray::Array1<f64>, _: &()| x.sum(), ()).unwrap();
    assert_eq!(swarm.particles().len(), 24);
    assert_eq!(swarm.neighborhoods().len(), 4);

    let json = serde_json::to_string(&config).unwrap();
    let back: SwarmConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_yaml_with_bad_bias_rejected() {
    let yaml = r#"
dimension: 2
population_size: 5
bounds: { lower: [0.0, 0.0], upper: [1.0, 1.0] }
speed: { personal_best_bias: -1.0, global_best_bias: 2.0 }
"#;
    let config: SwarmConfig = serde_yaml::from_str(yaml).unwrap();
    let err = Swarm::from_fn(config, |x: &ndarray::Array1<f64>, _: &()| x.sum(), ()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Personal best bias must be finite and non-negative, got -1"
    );
}
