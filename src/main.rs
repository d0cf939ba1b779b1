use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use capacity_block_manager::domain::slurm::node_inventory::SinfoNodeInventory;
use capacity_block_manager::generate_capacity_block_manager;
use capacity_block_manager::loader::parser::load_manager_config;
use capacity_block_manager::logger;

/// Keeps nodes of not yet active Capacity Blocks in Slurm reservations.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path of the manager config (JSON).
    #[arg(short, long)]
    config: String,

    /// Run a single update and exit.
    #[arg(long)]
    once: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_manager_config(&cli.config).with_context(|| format!("Unable to load manager config '{}'", cli.config))?;

    logger::init(&config.log_dir);
    log::info!("Logger initialized. Starting CapacityBlockManager for region {}.", config.region);

    let mut manager = generate_capacity_block_manager(&config).context("Unable to initialize the CapacityBlockManager")?;
    let node_inventory = SinfoNodeInventory::new(config.sinfo_path.as_str());

    loop {
        let result = node_inventory.list_nodes().and_then(|nodes| manager.get_reserved_nodenames(&nodes));

        match result {
            Ok(reserved_nodenames) if cli.once => {
                log::info!("Nodes reserved for Capacity Blocks: {}", reserved_nodenames.join(","));
                let unobserved: Vec<&str> = manager.unobserved_capacity_blocks().into_iter().map(|id| id.as_str()).collect();
                if !unobserved.is_empty() {
                    log::warn!("Capacity Blocks without EC2 info: {}", unobserved.join(","));
                }
                return Ok(());
            }
            Ok(reserved_nodenames) => log::debug!("Nodes reserved for Capacity Blocks: {}", reserved_nodenames.join(",")),
            Err(e) if cli.once => return Err(e).context("Capacity Block update failed"),
            Err(e) => log::error!("Capacity Block update failed, retrying on next iteration: {}", e),
        }

        thread::sleep(Duration::from_secs(config.poll_interval_seconds));
    }
}
