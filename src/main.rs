mod config;
mod geom;
mod help;
mod material;
mod scene;
mod settings;
mod terminal;
mod viz;

use clap::Parser;
use config::SceneConfig;
use material::Material;
use rand::prelude::*;
use settings::Settings;
use std::io::{self, stdout, IsTerminal};
use terminal::Terminal;

#[derive(Parser)]
#[command(name = "netsphere")]
#[command(version)]
#[command(about = "Terminal network globe: rotating sphere of pulsing nodes and arcs", long_about = None)]
struct Cli {
    /// Surface node count
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Maximum short links per node
    #[arg(long, default_value = "3")]
    links_per_node: usize,

    /// Long-distance arc count
    #[arg(long, default_value = "24")]
    long_arcs: usize,

    /// Background star count
    #[arg(long, default_value = "2400")]
    stars: usize,

    /// Orbital ring count
    #[arg(long, default_value = "2")]
    rings: usize,

    /// Animation step delay in seconds
    #[arg(short, long, default_value = "0.03")]
    time: f32,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial tilt in radians
    #[arg(long, default_value = "0.35", allow_hyphen_values = true)]
    tilt: f32,

    /// Remote palette JSON URL (overrides the settings file)
    #[arg(long)]
    palette_url: Option<String>,

    /// Skip the palette fetch and use the flat colors
    #[arg(long)]
    offline: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if !stdout().is_terminal() {
        eprintln!("netsphere: stdout is not a terminal, skipping visualization");
        return Ok(());
    }

    let settings = Settings::load();

    let config = SceneConfig {
        nodes: cli
            .nodes
            .or(settings.globe.nodes)
            .unwrap_or(SceneConfig::default().nodes)
            .clamp(4, 2000),
        links_per_node: cli.links_per_node.min(16),
        long_arcs: cli.long_arcs.min(128),
        stars: cli.stars.min(10_000),
        rings: cli.rings.min(6),
        time_step: cli.time.clamp(0.001, 0.5),
        ..SceneConfig::default()
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let material = if cli.offline {
        Material::flat()
    } else {
        let url = cli.palette_url.or(settings.globe.palette_url);
        Material::load(url.as_deref())
    };

    let scheme = settings.globe.color_scheme.unwrap_or(0);

    let mut term = Terminal::new()?;
    viz::globe::run(&mut term, &config, &material, scheme, cli.tilt, &mut rng)
}
