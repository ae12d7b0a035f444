use std::path::PathBuf;
use std::time::Instant;

use botevo::{Environment, Params, SimulationError};
use clap::Parser;

/// Headless driver: runs the simulation one reference frame per tick.
#[derive(Parser)]
#[command(name = "botevo", about = "Neuroevolution of food-seeking agents")]
struct Args {
    /// JSON parameter file; command line values override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resume from a saved snapshot instead of creating a population
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Population size (at least 5)
    #[arg(short, long)]
    population: Option<usize>,

    /// Mutation rate in (0, 1)
    #[arg(short, long)]
    mutation_rate: Option<f32>,

    /// Time multiplier (at least 1)
    #[arg(short, long)]
    time_multiplier: Option<f32>,

    /// Reference frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Arena width
    #[arg(long)]
    width: Option<u32>,

    /// Arena height
    #[arg(long)]
    height: Option<u32>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(long, default_value = "36000")]
    ticks: u64,

    /// Snapshot file written at the end of the run
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Also save every N ticks (requires --save)
    #[arg(long)]
    save_every: Option<u64>,
}

impl Args {
    fn params(&self) -> Result<Params, SimulationError> {
        let mut params = match &self.config {
            Some(path) => Params::from_file(path)?,
            None => Params::default(),
        };
        if let Some(population) = self.population {
            params.population_size = population;
        }
        if let Some(rate) = self.mutation_rate {
            params.mutation_rate = rate;
        }
        if let Some(multiplier) = self.time_multiplier {
            params.time_multiplier = multiplier;
        }
        if let Some(fps) = self.fps {
            params.fps = fps;
        }
        if let Some(width) = self.width {
            params.arena_width = width;
        }
        if let Some(height) = self.height {
            params.arena_height = height;
        }
        if self.seed.is_some() {
            params.seed = self.seed;
        }
        Ok(params)
    }
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let mut environment = match &args.load {
        Some(path) => {
            let mut environment = Environment::load_from_file(path)?;
            if let Some(seed) = args.seed {
                environment.reseed(seed);
            }
            environment
        }
        None => Environment::new(args.params()?)?,
    };

    let start = Instant::now();
    let report_every = u64::from(environment.params.fps);

    for tick in 1..=args.ticks {
        let multiplier = environment.params.time_multiplier;
        botevo::advance(&mut environment, 1.0, multiplier);

        if tick % report_every == 0 {
            let best = environment
                .agents
                .iter()
                .map(|agent| agent.score)
                .fold(f32::NEG_INFINITY, f32::max);
            log::info!(
                "t={:.0}s feeds={} starved={} out={} best score={:.2} ({:.0} ticks/s)",
                environment.time,
                environment.stats.feed_events,
                environment.stats.starvations,
                environment.stats.out_of_bounds,
                best,
                tick as f64 / start.elapsed().as_secs_f64()
            );
        }

        if let (Some(path), Some(every)) = (&args.save, args.save_every) {
            if every > 0 && tick % every == 0 {
                environment.save_to_file(path)?;
            }
        }
    }

    if let Some(path) = &args.save {
        environment.save_to_file(path)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
