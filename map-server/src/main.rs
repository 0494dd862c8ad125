#![deny(clippy::unwrap_used)]

use clap::Parser;
use driftline_map_server::catalog::{self, CatalogError};
use driftline_map_server::configuration::{Configuration, ConfigurationLoadError, ConfigurationValueError, Settings};
use driftline_map_server::{server::Server, world::World};
use env_logger::Env;
use log::{info, warn};
use std::{io, path::PathBuf, sync::Arc, time::Instant};
use thiserror::Error;
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(version)]
struct ClArgs {
	/// Path to the server's INI configuration
	#[arg(long, default_value = "server.ini")]
	config: PathBuf,
}

fn main() -> Result<(), MapServerError> {
	let start_time = Instant::now();

	let cl_args = ClArgs::parse();

	env_logger::init_from_env(Env::default().default_filter_or(if cfg!(debug_assertions) { "debug" } else { "info" }));

	info!("Driftline (Map Server) v{}", env!("CARGO_PKG_VERSION"));

	let configuration = Configuration::load(&cl_args.config)?;
	let settings = Settings::from_configuration(&configuration)?;

	let world = Arc::new(World::new(settings.tick_rate));
	let mut rng = rand::thread_rng();

	for mut map in catalog::load(&settings.catalog)? {
		let report = catalog::load_deferred(&mut map, &mut rng);

		info!(
			"Map {} ({}): {} NPCs, {} collectables, {} stations, {} portals",
			map.name(),
			map.id(),
			report.npcs,
			report.collectables,
			report.stations,
			map.portal_count()
		);

		if report.skipped > 0 {
			warn!("Map {} ({}): skipped {} invalid definitions", map.name(), map.id(), report.skipped);
		}

		world.insert(map)?;
	}

	if world.starter().is_none() {
		warn!("No starter map configured, connections will be closed immediately");
	}

	let runtime = Runtime::new()?;

	info!("Ready! {:.0?}", Instant::now() - start_time);

	let result = runtime.block_on(Server::run(world.clone(), settings.address));

	world.shutdown();

	Ok(result?)
}

#[derive(Debug, Error)]
#[error(transparent)]
pub enum MapServerError {
	Catalog(#[from] CatalogError),
	Configuration(#[from] ConfigurationLoadError),
	ConfigurationValue(#[from] ConfigurationValueError),
	Io(#[from] io::Error),
}
