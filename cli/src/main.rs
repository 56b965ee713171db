//! swarm-pso CLI — runs the particle swarm engine on standard benchmark functions
//!
//! Acts as the external driver: builds a swarm from flags or a config file,
//! iterates until the stop criteria hold, and prints the outcome.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use ndarray::Array1;
use std::path::{Path, PathBuf};
use swarm_pso::benchmarks::Benchmark;
use swarm_pso::{
    run, Comparator, InertiaSchedule, OptimizationResult, StopCriteria, Swarm, SwarmConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swarm-pso", version, about = "Particle swarm optimization driver")]
struct Cli {
    /// Log filter, e.g. "info" or "swarm_pso=debug"
    #[arg(long, default_value = "warn", global = true, env = "SWARM_PSO_LOG")]
    log: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Function {
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
}

impl From<Function> for Benchmark {
    fn from(f: Function) -> Self {
        match f {
            Function::Sphere => Benchmark::Sphere,
            Function::Rastrigin => Benchmark::Rastrigin,
            Function::Rosenbrock => Benchmark::Rosenbrock,
            Function::Ackley => Benchmark::Ackley,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Variant {
    Classic,
    Inertia,
}

#[derive(clap::Args)]
struct InertiaArgs {
    #[arg(long, default_value_t = 0.9)]
    inertia_max: f64,

    #[arg(long, default_value_t = 0.4)]
    inertia_min: f64,

    /// Iteration at which inertia reaches its minimum
    #[arg(long, default_value_t = 1000)]
    inertia_max_time: u32,
}

impl InertiaArgs {
    fn schedule(&self) -> InertiaSchedule {
        InertiaSchedule {
            inertia_max: self.inertia_max,
            inertia_min: self.inertia_min,
            inertia_max_time: self.inertia_max_time,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a benchmark function
    Run {
        #[arg(long, value_enum, default_value = "sphere")]
        function: Function,

        /// Swarm config file (JSON or YAML); overrides the swarm flags below
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of parameters
        #[arg(long, default_value_t = 2)]
        dim: usize,

        /// Number of particles
        #[arg(long, default_value_t = 30)]
        population: usize,

        /// Number of contiguous neighborhoods
        #[arg(long, default_value_t = 1)]
        sets: usize,

        #[arg(long, value_enum, default_value = "inertia")]
        variant: Variant,

        #[command(flatten)]
        inertia: InertiaArgs,

        #[arg(long, default_value_t = 2.0)]
        personal_bias: f64,

        #[arg(long, default_value_t = 2.0)]
        global_bias: f64,

        /// Per-component velocity cap
        #[arg(long)]
        max_velocity: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,

        /// Step particles in parallel
        #[arg(long)]
        parallel: bool,

        /// Maximize instead of minimize
        #[arg(long)]
        maximize: bool,

        #[arg(long, default_value_t = 1000)]
        iterations: usize,

        /// Stop once this fitness is reached
        #[arg(long)]
        target: Option<f64>,

        /// Stop after this many iterations without improvement
        #[arg(long)]
        stagnation: Option<usize>,
    },
    /// Print the inertia weight schedule
    Schedule {
        #[command(flatten)]
        inertia: InertiaArgs,

        /// Number of iterations to print
        #[arg(long, default_value_t = 20)]
        steps: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            function,
            config,
            dim,
            population,
            sets,
            variant,
            inertia,
            personal_bias,
            global_bias,
            max_velocity,
            seed,
            parallel,
            maximize,
            iterations,
            target,
            stagnation,
        } => {
            let benchmark = Benchmark::from(function);
            let swarm_config = match config {
                Some(path) => load_config(&path),
                None => {
                    let mut c = SwarmConfig::new(dim, population, 0.0, 1.0)
                        .with_bounds(benchmark.bounds(dim))
                        .with_particle_sets(sets)
                        .with_speed(personal_bias, global_bias)
                        .with_parallel(parallel);
                    if let Variant::Inertia = variant {
                        c = c.with_inertia(inertia.schedule());
                    }
                    if let Some(vmax) = max_velocity {
                        c = c.with_max_velocity(vmax);
                    }
                    if let Some(seed) = seed {
                        c = c.with_seed(seed);
                    }
                    if maximize {
                        c = c.with_comparator(Comparator::Maximize);
                    }
                    Ok(c)
                }
            };
            let criteria = StopCriteria {
                max_iterations: iterations,
                target_fitness: target,
                stagnation_limit: stagnation,
            };
            swarm_config.and_then(|c| run_benchmark(benchmark, c, &criteria, &cli.format))
        }
        Commands::Schedule { inertia, steps } => print_schedule(&inertia, steps, &cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> anyhow::Result<SwarmConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text).context("parsing JSON config")?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text).context("parsing YAML config")?,
        other => bail!("unsupported config extension {:?}, expected json, yaml or yml", other),
    };
    tracing::info!("Loaded swarm config from {}", path.display());
    Ok(config)
}

fn run_benchmark(
    benchmark: Benchmark,
    config: SwarmConfig,
    criteria: &StopCriteria,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    tracing::info!(
        "Running {:?}: dimension {}, {} particles, {} policy, up to {} iterations",
        benchmark,
        config.dimension,
        config.population_size,
        config.policy.name(),
        criteria.max_iterations
    );
    let mut swarm = Swarm::from_fn(config, move |x: &Array1<f64>, _: &()| benchmark.evaluate(x), ())
        .context("creating swarm")?;
    let result = run(&mut swarm, criteria).context("running swarm")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_result(benchmark, &result),
    }
    Ok(())
}

fn print_result(benchmark: Benchmark, result: &OptimizationResult) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Function".to_string(), format!("{:?}", benchmark)]);
    table.add_row(vec!["Best fitness".to_string(), format!("{:.6e}", result.best_fitness)]);
    table.add_row(vec!["Iterations".to_string(), result.iterations.to_string()]);
    table.add_row(vec!["Stop reason".to_string(), format!("{:?}", result.stop_reason)]);
    let variables: Vec<String> = result.best_variables.iter().map(|v| format!("{:.6}", v)).collect();
    table.add_row(vec!["Best variables".to_string(), format!("[{}]", variables.join(", "))]);
    println!("{table}");
}

fn print_schedule(inertia: &InertiaArgs, steps: u32, format: &OutputFormat) -> anyhow::Result<()> {
    let schedule = inertia.schedule();
    schedule.verify_values().context("invalid inertia schedule")?;
    let weights: Vec<(u32, f64)> = (0..=steps).map(|t| (t, schedule.weight(t))).collect();

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = weights
                .iter()
                .map(|(t, w)| serde_json::json!({ "iteration": t, "weight": w }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["Iteration", "Inertia"]);
            for (t, w) in &weights {
                table.add_row(vec![t.to_string(), format!("{:.4}", w)]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "dimension: 4\npopulation_size: 12\nseed: 9").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.dimension, 4);
        assert_eq!(config.bounds.dim(), 4);
        assert_eq!(config.seed, Some(9));
        assert!(config.verify_values().is_ok());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension"));
    }
}
