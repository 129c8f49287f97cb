//! Harvest Demo
//!
//! Runs a simulated colony with three jobs under one manager: a forager
//! keeping food stocked, a logging job keeping wood stocked, and a clearing
//! job cutting back a yard and the wind turbine's cells. Workers harvest a
//! few designations per step while the colony consumes stock.
//!
//! ```text
//! RUST_LOG=harvest_scheduler=debug cargo run -p harvest_demo -- --steps 60
//! ```

use clap::Parser;
use harvest_core::{
    AreaId, Cell, Clock, LifecycleStage, ProductId, ResourceInfo, ResourceType, Tick, WorldView,
};
use harvest_scheduler::{
    ForagerJob, ForestryJob, ForestryMode, HarvestJob, JobId, JobManager, SchedulerConfig,
};
use harvest_sim::SimWorld;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "harvest_demo")]
#[command(about = "Simulated colony session driven by harvest jobs")]
struct Args {
    /// Scheduler config (RON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation steps to run
    #[arg(long, default_value_t = 40)]
    steps: u32,

    /// Ticks per step
    #[arg(long, default_value_t = 250)]
    step_ticks: Tick,

    /// Designations executed per step
    #[arg(long, default_value_t = 2)]
    workers: usize,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

const FOOD: [&str; 2] = ["Berries", "Agave"];
const WOOD: &str = "WoodLog";

fn main() -> harvest_scheduler::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::default(),
    };
    info!(?config, "Loaded scheduler config");

    let (mut world, yard) = build_world();
    let mut manager: JobManager<SimWorld> = JobManager::from_config(&config);
    let jobs = add_jobs(&mut manager, &world, &config, yard);

    let mut clock = Clock::new();
    for step in 0..args.steps {
        clock.advance_by(args.step_ticks);
        let now = clock.tick;

        manager.tick(&mut world, now);
        work(&mut world, args.workers);
        consume(&mut world);
        if step % 8 == 7 {
            grow(&mut world);
            refresh(&mut manager, &world, &jobs);
        }
    }

    report(&manager, &world, &jobs);
    Ok(())
}

/// A small map: two tree kinds, two food plants, grass, a fenced yard,
/// a farm plot and one wind turbine
fn build_world() -> (SimWorld, AreaId) {
    let mut world = SimWorld::with_base_center(Cell::new(0, 0));
    for (kind, label, product, tag, harvest_yield) in [
        ("oak", "oak tree", Some(WOOD), "Wood", 25.0),
        ("pine", "pine tree", Some(WOOD), "Wood", 20.0),
        ("berry", "berry bush", Some(FOOD[0]), "Standard", 10.0),
        ("agave", "agave", Some(FOOD[1]), "Standard", 6.0),
        ("grass", "grass", None, "Standard", 0.0),
    ] {
        world.define_resource(ResourceInfo {
            kind: ResourceType::new(kind),
            label: label.to_string(),
            harvest_yield,
            product: product.map(ProductId::new),
            harvest_tag: Some(tag.to_string()),
        });
        world.add_regional(kind);
    }

    let kinds = ["oak", "pine", "berry", "agave", "grass"];
    for x in -12i32..=12 {
        for z in -12..=12 {
            let roll = (x * 7 + z * 13).rem_euclid(11);
            let Some(kind) = kinds.get(roll as usize) else {
                continue;
            };
            let (stage, yield_now) = if (x + z) % 3 == 0 {
                (LifecycleStage::Immature, 2)
            } else {
                (LifecycleStage::Mature, 4 + (roll as u32 * 5))
            };
            world.spawn_plant(*kind, Cell::new(x, z), stage, yield_now);
        }
    }

    let farm: Vec<Cell> = (-2..=2)
        .flat_map(|x| (-2..=2).map(move |z| Cell::new(x, z)))
        .collect();
    for cell in &farm {
        world.mark_cultivated(*cell);
    }
    world.add_area("farm", farm, false);

    let yard = world.add_area(
        "yard",
        (3..=6).flat_map(|x| (3..=6).map(move |z| Cell::new(x, z))),
        true,
    );
    world.add_area("north grove", (-12..=12).map(|x| Cell::new(x, 12)), true);
    world.add_turbine(Cell::new(-8, -8));

    (world, yard)
}

fn add_jobs(
    manager: &mut JobManager<SimWorld>,
    world: &SimWorld,
    config: &SchedulerConfig,
    yard: AreaId,
) -> Vec<JobId> {
    let mut forager = ForagerJob::new(world, 60, config);
    for kind in ["berry", "agave"] {
        forager.set_allowed(&ResourceType::new(kind), true);
    }

    let mut logging = ForestryJob::new(world, 150, config);
    for kind in ["oak", "pine"] {
        logging.set_allowed(&ResourceType::new(kind), true);
    }
    logging.set_allow_saplings(true);

    let mut clearing = ForestryJob::new(world, 0, config);
    clearing.set_mode(world, ForestryMode::ClearArea);
    clearing.engine_mut().allow_list.set_all(true);
    clearing.set_clear_area(yard, true);
    clearing.set_clear_wind_cells(true);

    vec![
        manager.add(Box::new(clearing)),
        manager.add(Box::new(logging)),
        manager.add(Box::new(forager)),
    ]
}

/// Workers execute the oldest designations
fn work(world: &mut SimWorld, workers: usize) {
    let targets: Vec<_> = world
        .registry()
        .iter()
        .take(workers)
        .map(|d| d.target)
        .collect();
    for target in targets {
        if let Err(err) = world.harvest(target) {
            warn!(%err, "Worker found nothing to harvest");
        }
    }
}

fn consume(world: &mut SimWorld) {
    for product in FOOD {
        world.consume_stock(&ProductId::new(product), 2);
    }
    world.consume_stock(&ProductId::new(WOOD), 4);
}

/// Immature plants mature and put on yield
fn grow(world: &mut SimWorld) {
    let growing: Vec<_> = world
        .live_plants()
        .into_iter()
        .filter(|plant| !plant.is_mature())
        .map(|plant| plant.handle)
        .collect();
    for handle in growing {
        let grown = world
            .set_stage(handle, LifecycleStage::Mature)
            .and_then(|()| world.set_yield(handle, 15));
        if let Err(err) = grown {
            warn!(%err, "Plant vanished while growing");
        }
    }
}

/// Resync allow-lists and clear areas with the host
fn refresh(manager: &mut JobManager<SimWorld>, world: &SimWorld, jobs: &[JobId]) {
    for id in jobs {
        if let Some(job) = manager.get_mut(*id) {
            job.refresh_allow_list(world, false);
        }
    }
}

fn report(manager: &JobManager<SimWorld>, world: &SimWorld, jobs: &[JobId]) {
    for id in jobs {
        let Some(job) = manager.get(*id) else {
            continue;
        };
        info!(
            job = %id,
            label = job.label(),
            completed = job.completed(world),
            targets = %job.targets(world).join(", "),
            last_action = ?manager.last_action(*id),
            "Job summary"
        );
    }

    let food: u32 = FOOD
        .iter()
        .map(|product| world.stock_of(&ProductId::new(*product)))
        .sum();
    info!(
        food,
        wood = world.stock_of(&ProductId::new(WOOD)),
        plants = world.plant_count(),
        pending = world.registry().len(),
        "Session finished"
    );
}
