use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use swarm_pso::benchmarks::Benchmark;
use swarm_pso::*;

fn sphere(x: &Array1<f64>, _: &()) -> f64 {
    x.dot(x)
}

#[test]
fn test_classic_sphere() {
    let config = SwarmConfig::new(2, 30, -10.0, 10.0)
        .with_speed(1.5, 1.5)
        .with_max_velocity(2.0)
        .with_seed(2024);
    let mut swarm = Swarm::new(config, sphere, ()).unwrap();
    let result = run(&mut swarm, &StopCriteria::iterations(300)).unwrap();

    assert!(result.best_fitness < 0.1, "Classic PSO failed to minimize Sphere function: fitness {}", result.best_fitness);
}

#[test]
fn test_inertia_sphere() {
    let config = SwarmConfig::new(2, 30, -10.0, 10.0)
        .with_inertia(InertiaSchedule {
            inertia_max: 0.9,
            inertia_min: 0.4,
            inertia_max_time: 200,
        })
        .with_speed(2.0, 2.0)
        .with_max_velocity(4.0)
        .with_seed(7);
    let mut swarm = Swarm::new(config, sphere, ()).unwrap();
    let result = run(&mut swarm, &StopCriteria::iterations(300)).unwrap();

    assert!(result.best_fitness < 0.01, "Inertia PSO failed to minimize Sphere function: fitness {}", result.best_fitness);
}

#[test]
fn test_inertia_rastrigin_improves() {
    let benchmark = Benchmark::Rastrigin;
    let config = SwarmConfig::new(3, 40, -5.12, 5.12)
        .with_bounds(benchmark.bounds(3))
        .with_inertia(InertiaSchedule {
            inertia_max: 0.9,
            inertia_min: 0.4,
            inertia_max_time: 150,
        })
        .with_particle_sets(4)
        .with_seed(99);
    let mut swarm = Swarm::from_fn(config, move |x: &Array1<f64>, _: &()| benchmark.evaluate(x), ()).unwrap();
    let initial = swarm.global_best().fitness;
    let result = run(&mut swarm, &StopCriteria::iterations(200)).unwrap();

    assert!(result.best_fitness <= initial);
    assert!(result.best_fitness < 10.0, "Rastrigin fitness {}", result.best_fitness);
}

#[test]
fn test_maximize_with_aux_data() {
    // Maximize a downward paraboloid centered on the aux point
    let center = array![1.5, -2.5];
    let config = SwarmConfig::new(2, 25, -5.0, 5.0)
        .with_comparator(Comparator::Maximize)
        .with_inertia(InertiaSchedule {
            inertia_max: 0.9,
            inertia_min: 0.4,
            inertia_max_time: 150,
        })
        .with_max_velocity(2.0)
        .with_seed(31);
    let mut swarm = Swarm::from_fn(
        config,
        |x: &Array1<f64>, c: &Array1<f64>| {
            let d = x - c;
            -d.dot(&d)
        },
        center.clone(),
    )
    .unwrap();
    let result = run(&mut swarm, &StopCriteria::iterations(200)).unwrap();

    assert!(result.best_fitness > -0.01, "fitness {}", result.best_fitness);
    for pair in result.history.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    assert!((result.best_variables[0] - 1.5).abs() < 0.1);
    assert!((result.best_variables[1] + 2.5).abs() < 0.1);
}

#[test]
fn test_positions_stay_clamped_every_iteration() {
    // Oversized velocities push particles into the walls
    let config = SwarmConfig::new(3, 12, -1.0, 1.0)
        .with_initial_velocity(Bounds::uniform(3, -50.0, 50.0))
        .with_speed(3.0, 3.0)
        .with_particle_sets(3)
        .with_seed(5);
    let bounds = config.bounds.clone();
    let mut swarm = Swarm::new(config, sphere, ()).unwrap();
    for _ in 0..40 {
        swarm.run_iteration().unwrap();
        for p in swarm.particles() {
            assert!(bounds.contains(&p.solution().parameters), "{:?}", p.solution().parameters);
        }
    }
}

#[test]
fn test_initial_velocity_sub_range() {
    let config = SwarmConfig::new(2, 50, -10.0, 10.0)
        .with_initial_velocity(Bounds::uniform(2, -0.5, 0.5))
        .with_seed(17);
    let swarm = Swarm::new(config, sphere, ()).unwrap();
    for p in swarm.particles() {
        assert!(p.velocity().iter().all(|v| (-0.5..=0.5).contains(v)));
    }
}

#[test]
fn test_global_best_monotonic_over_iterations() {
    let config = SwarmConfig::new(4, 20, -3.0, 3.0)
        .with_inertia(InertiaSchedule::default())
        .with_particle_sets(5)
        .with_seed(123);
    let mut swarm = Swarm::from_fn(config, |x: &Array1<f64>, _: &()| Benchmark::Ackley.evaluate(x), ()).unwrap();
    let mut previous = swarm.global_best().fitness;
    for _ in 0..100 {
        let improved = swarm.run_iteration().unwrap();
        let current = swarm.global_best().fitness;
        assert!(current <= previous);
        assert_eq!(improved, current < previous);
        previous = current;
    }
}

#[test]
fn test_single_particle_zero_bias_scenario() {
    let config = SwarmConfig::new(2, 1, -10.0, 10.0)
        .with_speed(0.0, 0.0)
        .with_seed(55);
    let mut swarm = Swarm::new(config, sphere, ()).unwrap();

    let before = swarm.particles()[0].solution().parameters.clone();
    let velocity = swarm.particles()[0].velocity().clone();
    swarm.run_iteration().unwrap();

    let after = &swarm.particles()[0];
    assert_eq!(after.velocity(), &velocity);
    for d in 0..2 {
        let expected = (before[d] + velocity[d]).clamp(-10.0, 10.0);
        assert_eq!(after.solution().parameters[d], expected);
    }
}

#[test]
fn test_inverted_inertia_creates_nothing() {
    let evaluations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evaluations);
    let config = SwarmConfig::new(2, 10, -1.0, 1.0).with_inertia(InertiaSchedule {
        inertia_max: 0.2,
        inertia_min: 0.6,
        inertia_max_time: 10,
    });
    let result = Swarm::from_fn(
        config,
        move |x: &Array1<f64>, _: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            x.sum()
        },
        (),
    );

    assert!(matches!(result, Err(PsoError::Config(ConfigError::InvertedInertia { .. }))));
    assert_eq!(evaluations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_objective_called_once_per_particle_per_iteration() {
    let evaluations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evaluations);
    let config = SwarmConfig::new(3, 9, -2.0, 2.0).with_particle_sets(3).with_seed(8);
    let mut swarm = Swarm::from_fn(
        config,
        move |x: &Array1<f64>, _: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            x.dot(x)
        },
        (),
    )
    .unwrap();
    assert_eq!(evaluations.load(Ordering::SeqCst), 9);

    for i in 1..=5 {
        swarm.run_iteration().unwrap();
        assert_eq!(evaluations.load(Ordering::SeqCst), 9 + 9 * i);
    }
}

#[test]
fn test_neighborhood_best_used_as_attractor() {
    // Only the social term is active, and it points at each neighborhood's own best
    let config = SwarmConfig::new(1, 6, -10.0, 10.0)
        .with_initial_velocity(Bounds::uniform(1, -1e-9, 1e-9))
        .with_speed(0.0, 1.0)
        .with_particle_sets(2)
        .with_seed(10);
    let mut swarm = Swarm::new(config, sphere, ()).unwrap();
    let targets: Vec<f64> = swarm
        .neighborhoods()
        .iter()
        .map(|r| swarm.neighborhood_best(r.clone()).parameters[0])
        .collect();
    let starts: Vec<f64> = swarm.particles().iter().map(|p| p.solution().parameters[0]).collect();

    swarm.run_iteration().unwrap();

    for (i, p) in swarm.particles().iter().enumerate() {
        let target = targets[swarm.neighborhood_of(i).unwrap()];
        let start = starts[i];
        let moved = p.solution().parameters[0];
        // New position lies between the start and the neighborhood best
        let (lo, hi) = if start <= target { (start, target) } else { (target, start) };
        assert!(moved >= lo - 1e-6 && moved <= hi + 1e-6, "particle {} moved to {} outside [{}, {}]", i, moved, lo, hi);
    }
}

#[test]
fn test_particle_standalone_construction() {
    let problem = Arc::new(Problem::from_fn(sphere, (), Bounds::uniform(2, -1.0, 1.0)));
    let solution = Solution::evaluated(Arc::clone(&problem), array![0.5, 0.5]).unwrap();
    let mut particle = Particle::new(
        ParticleCreationParameters {
            solution,
            velocity: array![-0.25, -0.25],
        },
        StdRng::seed_from_u64(1),
    )
    .unwrap();

    let anchor = Solution::evaluated(problem, array![0.0, 0.0]).unwrap();
    let rules = StepRules {
        policy: VelocityPolicy::Inertia(InertiaSchedule {
            inertia_max: 1.0,
            inertia_min: 0.0,
            inertia_max_time: 4,
        }),
        speed: SpeedParameters {
            personal_best_bias: 0.0,
            global_best_bias: 0.0,
        },
        ..StepRules::default()
    };

    // ω = 1, 0.75, 0.5, 0.25, 0, 0 ...
    let mut expected_velocity = -0.25;
    for t in 0..6u32 {
        let weight = (1.0 - t.min(4) as f64 / 4.0).max(0.0);
        expected_velocity *= weight;
        particle.step_once(&anchor, &rules).unwrap();
        assert!((particle.velocity()[0] - expected_velocity).abs() < 1e-12);
    }
    assert_eq!(particle.elapsed(), 6);
}
