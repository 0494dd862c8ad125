//! Builds [`Map`]s from the catalog file.
//!
//! Loading happens in two steps. The catalog itself only yields maps with their static information and portals,
//! NPC, station and collectable definitions are left on the map untouched. [`load_deferred`] then turns those into
//! entities and registers them.

use driftline_shared::data::entity::{Collectable, Npc, Station};
use driftline_shared::data::{FactionId, InvalidFaction, MapId};
use driftline_shared::map::{Deferred, Map, MapInfo};
use log::{info, warn};
use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashSet, fs, io, path::Path};
use thiserror::Error;

pub mod config {
	use driftline_shared::data::entity::Portal;
	use driftline_shared::data::{CollectableKind, MapId, NpcTemplateId};
	use nalgebra::Vector2;
	use serde::Deserialize;
	use serde_json::Value;

	#[derive(Deserialize)]
	pub struct Map {
		pub id: MapId,
		pub name: Box<str>,

		#[serde(default = "unowned")]
		pub faction: i32,
		#[serde(default)]
		pub pvp: bool,
		#[serde(default)]
		pub starter: bool,

		pub limits: Vector2<u32>,

		#[serde(default)]
		pub portals: Vec<Portal>,

		#[serde(default)]
		pub npcs: Vec<Value>,
		#[serde(default)]
		pub stations: Vec<Value>,
		#[serde(default)]
		pub collectables: Vec<Value>,
	}

	#[derive(Deserialize)]
	pub struct Npc {
		pub template: NpcTemplateId,
		#[serde(default = "one")]
		pub amount: u32,
	}

	#[derive(Deserialize)]
	pub struct Collectable {
		pub kind: CollectableKind,
		#[serde(default = "one")]
		pub amount: u32,
	}

	fn unowned() -> i32 {
		-1
	}

	fn one() -> u32 {
		1
	}
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<Map>, CatalogError> {
	parse(&fs::read_to_string(path)?)
}

pub fn parse(source: &str) -> Result<Vec<Map>, CatalogError> {
	let entries: Vec<config::Map> = serde_json::from_str(source)?;

	let mut ids = HashSet::new();
	let mut maps = Vec::with_capacity(entries.len());

	for entry in entries {
		if !ids.insert(entry.id) {
			return Err(CatalogError::DuplicateMap(entry.id));
		}

		maps.push(build(entry)?);
	}

	info!(
		"Loaded {} Maps: {:?}",
		maps.len(),
		maps.iter().map(|map| map.name()).collect::<Vec<_>>()
	);

	Ok(maps)
}

fn build(entry: config::Map) -> Result<Map, CatalogError> {
	let config::Map {
		id,
		name,
		faction,
		pvp,
		starter,
		limits,
		portals,
		npcs,
		stations,
		collectables,
	} = entry;

	let info = MapInfo {
		id,
		name,
		limits,
		pvp,
		starter,
		faction: FactionId::from_raw(faction).map_err(|error| CatalogError::InvalidFaction(id, error))?,
	};

	let mut map = Map::new(
		info,
		Deferred {
			npcs,
			stations,
			collectables,
		},
	);

	for portal in portals {
		map.add_portal(portal);
	}

	Ok(map)
}

#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
	pub npcs: usize,
	pub collectables: usize,
	pub stations: usize,
	pub skipped: usize,
}

/// Registers the entities described by the map's deferred definitions. NPCs and collectables are scattered at random
/// inside the map's limits. Definitions that don't parse are skipped and counted in the report.
pub fn load_deferred(map: &mut Map, rng: &mut impl Rng) -> LoadReport {
	let mut report = LoadReport::default();

	let Some(Deferred {
		npcs,
		stations,
		collectables,
	}) = map.take_deferred()
	else {
		return report;
	};

	let limits = map.limits();

	for definition in definitions::<config::Npc>(map.id(), "npc", npcs, &mut report.skipped) {
		for _ in 0..definition.amount {
			map.add_npc(Npc {
				template: definition.template,
				position: random_position(limits, rng),
			});
			report.npcs += 1;
		}
	}

	for definition in definitions::<config::Collectable>(map.id(), "collectable", collectables, &mut report.skipped) {
		for _ in 0..definition.amount {
			map.add_collectable(Collectable {
				kind: definition.kind,
				position: random_position(limits, rng),
			});
			report.collectables += 1;
		}
	}

	for station in definitions::<Station>(map.id(), "station", stations, &mut report.skipped) {
		map.add_station(station);
		report.stations += 1;
	}

	report
}

fn definitions<T: DeserializeOwned>(
	map: MapId,
	kind: &'static str,
	values: Vec<Value>,
	skipped: &mut usize,
) -> Vec<T> {
	values
		.into_iter()
		.filter_map(|value| match serde_json::from_value(value) {
			Ok(definition) => Some(definition),
			Err(error) => {
				warn!("Skipping invalid {kind} definition on map {map}: {error}");
				*skipped += 1;
				None
			}
		})
		.collect()
}

fn random_position(limits: Vector2<u32>, rng: &mut impl Rng) -> Point2<i32> {
	Point2::from(limits.map(|limit| rng.gen_range(0..limit.clamp(1, i32::MAX as u32)) as i32))
}

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("map {0} is defined more than once")]
	DuplicateMap(MapId),

	#[error("map {0}: {1}")]
	InvalidFaction(MapId, InvalidFaction),

	#[error(transparent)]
	Io(#[from] io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;
	use driftline_shared::data::{CollectableKind, NpcTemplateId, PortalId};
	use nalgebra::vector;
	use rand::{rngs::StdRng, SeedableRng};

	const CATALOG: &str = r#"[
		{
			"id": 1,
			"name": "Home",
			"starter": true,
			"limits": [800, 600],
			"portals": [
				{ "id": 5, "position": [10, 10], "target_map": 2, "target_position": [20, 20] }
			],
			"npcs": [
				{ "template": 3, "amount": 4 },
				{ "template": 7 },
				{ "amount": 2 }
			],
			"stations": [
				{ "faction": 1, "position": [100, 100] },
				{ "position": "nowhere" }
			],
			"collectables": [
				{ "kind": 2, "amount": 3 }
			]
		},
		{
			"id": 2,
			"name": "Frontier",
			"faction": 3,
			"pvp": true,
			"limits": [1000, 1000]
		}
	]"#;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(7)
	}

	#[test]
	fn parses_static_information() {
		let maps = parse(CATALOG).unwrap();

		assert_eq!(maps.len(), 2);

		let home = &maps[0];
		assert_eq!(home.id(), MapId(1));
		assert_eq!(home.name(), "Home");
		assert_eq!(home.limits(), vector![800, 600]);
		assert!(home.is_starter());
		assert!(!home.is_pvp());
		assert_eq!(home.faction(), None);
		assert_eq!(home.portal(PortalId(5)).map(|portal| portal.target_map), Some(MapId(2)));
		assert_eq!(home.npc_count(), 0);

		let frontier = &maps[1];
		assert_eq!(frontier.faction(), Some(FactionId(3)));
		assert!(frontier.is_pvp());
		assert!(!frontier.is_starter());
	}

	#[test]
	fn deferred_definitions_become_entities() {
		let mut maps = parse(CATALOG).unwrap();
		let home = &mut maps[0];

		let report = load_deferred(home, &mut rng());

		assert_eq!(
			report,
			LoadReport {
				npcs: 5,
				collectables: 3,
				stations: 1,
				skipped: 2,
			}
		);
		assert_eq!(home.npc_count(), 5);
		assert_eq!(home.collectable_count(), 3);
		assert_eq!(home.stations()[0].faction, Some(FactionId(1)));
		assert_eq!(home.npcs().filter(|(_, npc)| npc.template == NpcTemplateId(3)).count(), 4);
		assert!(home.collectables().all(|(_, collectable)| collectable.kind == CollectableKind(2)));

		for (_, npc) in home.npcs() {
			assert!((0..800).contains(&npc.position.x));
			assert!((0..600).contains(&npc.position.y));
		}
	}

	#[test]
	fn deferred_definitions_load_once() {
		let mut maps = parse(CATALOG).unwrap();

		load_deferred(&mut maps[0], &mut rng());

		assert_eq!(load_deferred(&mut maps[0], &mut rng()), LoadReport::default());
		assert_eq!(maps[0].npc_count(), 5);
	}

	#[test]
	fn zero_sized_maps_place_at_origin() {
		let position = random_position(vector![0, 0], &mut rng());

		assert_eq!(position, Point2::origin());
	}

	#[test]
	fn duplicate_maps_are_rejected() {
		let result = parse(r#"[{ "id": 1, "name": "A", "limits": [1, 1] }, { "id": 1, "name": "B", "limits": [1, 1] }]"#);

		assert!(matches!(result, Err(CatalogError::DuplicateMap(MapId(1)))));
	}

	#[test]
	fn invalid_factions_are_rejected() {
		let result = parse(r#"[{ "id": 4, "name": "A", "faction": -3, "limits": [1, 1] }]"#);

		assert!(matches!(result, Err(CatalogError::InvalidFaction(MapId(4), InvalidFaction(-3)))));
	}

	#[test]
	fn negative_portal_ids_are_rejected() {
		let result = parse(
			r#"[{ "id": 4, "name": "A", "limits": [1, 1],
				"portals": [{ "id": -1, "position": [0, 0], "target_map": 1, "target_position": [0, 0] }] }]"#,
		);

		assert!(matches!(result, Err(CatalogError::Json(_))));
	}
}
