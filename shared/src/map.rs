//! The per-map entity registry.
//!
//! NPCs and collectables are spawned at runtime and get [`SyntheticId`]s from a counter owned by their category,
//! portals keep the id they were defined with, and stations are only addressable by their position in insertion
//! order.

use crate::data::entity::{Collectable, Npc, Portal, Station};
use crate::data::{FactionId, MapId, PortalId, SyntheticId, SYNTHETIC_ID_LIMIT};
use crate::message::clientbound::SyncMap;
use log::{debug, warn};
use nalgebra::Vector2;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::collections::hash_map::Entry;

/// Static information about a map, none of this changes once the map has been constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct MapInfo {
	pub id: MapId,
	pub name: Box<str>,
	pub limits: Vector2<u32>,
	pub pvp: bool,
	pub starter: bool,
	pub faction: Option<FactionId>,
}

/// Entity definitions in whatever shape the data source stores them. The map only holds on to these until a loader
/// takes them and registers the concrete entities.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deferred {
	pub npcs: Vec<Value>,
	pub stations: Vec<Value>,
	pub collectables: Vec<Value>,
}

/// Hands out [`SyntheticId`]s counting down from zero.
///
/// The counter is independent of how many entities currently exist, so removing an entity never causes its id to
/// be handed out again until the counter wraps. Once the next id would reach [`SYNTHETIC_ID_LIMIT`] the counter
/// starts over at zero.
#[derive(Clone, Debug)]
pub struct SyntheticIdAllocator {
	next: i32,
}

impl SyntheticIdAllocator {
	pub const fn new() -> Self {
		Self { next: 0 }
	}

	/// Peeks at the id the next call to [`allocate`](Self::allocate) will return.
	pub fn peek(&self) -> SyntheticId {
		match SyntheticId::new(self.next) {
			Some(id) if self.next > SYNTHETIC_ID_LIMIT => id,
			_ => SyntheticId::ZERO,
		}
	}

	pub fn allocate(&mut self) -> SyntheticId {
		if self.next <= SYNTHETIC_ID_LIMIT {
			warn!("Synthetic id counter exhausted, wrapping around to 0");
			self.next = 0;
		}

		let id = self.peek();
		self.next -= 1;
		id
	}
}

impl Default for SyntheticIdAllocator {
	fn default() -> Self {
		Self::new()
	}
}

pub struct Map {
	info: MapInfo,

	portals: FxHashMap<PortalId, Portal>,

	npcs: FxHashMap<SyntheticId, Npc>,
	npc_ids: SyntheticIdAllocator,

	collectables: FxHashMap<SyntheticId, Collectable>,
	collectable_ids: SyntheticIdAllocator,

	stations: Vec<Station>,

	deferred: Option<Deferred>,
}

impl Map {
	pub fn new(info: MapInfo, deferred: Deferred) -> Self {
		Self {
			info,

			portals: FxHashMap::default(),

			npcs: FxHashMap::default(),
			npc_ids: SyntheticIdAllocator::new(),

			collectables: FxHashMap::default(),
			collectable_ids: SyntheticIdAllocator::new(),

			stations: vec![],

			deferred: Some(deferred),
		}
	}

	pub fn info(&self) -> &MapInfo {
		&self.info
	}

	pub fn id(&self) -> MapId {
		self.info.id
	}

	pub fn name(&self) -> &str {
		&self.info.name
	}

	pub fn limits(&self) -> Vector2<u32> {
		self.info.limits
	}

	pub fn is_pvp(&self) -> bool {
		self.info.pvp
	}

	pub fn is_starter(&self) -> bool {
		self.info.starter
	}

	/// `None` if the map is neutral.
	pub fn faction(&self) -> Option<FactionId> {
		self.info.faction
	}

	/// Takes the deferred entity definitions, only the first call returns them.
	pub fn take_deferred(&mut self) -> Option<Deferred> {
		self.deferred.take()
	}

	pub fn add_npc(&mut self, npc: Npc) -> SyntheticId {
		insert_synthetic(&mut self.npcs, &mut self.npc_ids, npc)
	}

	pub fn add_collectable(&mut self, collectable: Collectable) -> SyntheticId {
		insert_synthetic(&mut self.collectables, &mut self.collectable_ids, collectable)
	}

	/// Registers a portal under its own id, replacing and returning any portal previously registered with that id.
	pub fn add_portal(&mut self, portal: Portal) -> Option<Portal> {
		let replaced = self.portals.insert(portal.id, portal);

		if let Some(replaced) = &replaced {
			debug!("Portal {} on map {} replaced", replaced.id, self.info.id);
		}

		replaced
	}

	pub fn add_station(&mut self, station: Station) {
		self.stations.push(station);
	}

	pub fn remove_npc(&mut self, id: SyntheticId) -> Option<Npc> {
		self.npcs.remove(&id)
	}

	pub fn remove_collectable(&mut self, id: SyntheticId) -> Option<Collectable> {
		self.collectables.remove(&id)
	}

	pub fn npc(&self, id: SyntheticId) -> Option<&Npc> {
		self.npcs.get(&id)
	}

	pub fn npc_mut(&mut self, id: SyntheticId) -> Option<&mut Npc> {
		self.npcs.get_mut(&id)
	}

	pub fn collectable(&self, id: SyntheticId) -> Option<&Collectable> {
		self.collectables.get(&id)
	}

	pub fn portal(&self, id: PortalId) -> Option<&Portal> {
		self.portals.get(&id)
	}

	pub fn npcs(&self) -> impl Iterator<Item = (SyntheticId, &Npc)> {
		self.npcs.iter().map(|(id, npc)| (*id, npc))
	}

	pub fn collectables(&self) -> impl Iterator<Item = (SyntheticId, &Collectable)> {
		self.collectables.iter().map(|(id, collectable)| (*id, collectable))
	}

	pub fn portals(&self) -> impl Iterator<Item = &Portal> {
		self.portals.values()
	}

	pub fn stations(&self) -> &[Station] {
		&self.stations
	}

	pub fn npc_count(&self) -> usize {
		self.npcs.len()
	}

	pub fn collectable_count(&self) -> usize {
		self.collectables.len()
	}

	pub fn portal_count(&self) -> usize {
		self.portals.len()
	}

	pub fn snapshot(&self) -> SyncMap {
		let MapInfo {
			id,
			name,
			limits,
			pvp,
			starter,
			faction,
		} = self.info.clone();

		SyncMap {
			id,
			name,
			limits,
			pvp,
			starter,
			faction,

			npcs: self.npcs().map(|(id, npc)| (id, npc.clone())).collect(),
			collectables: self
				.collectables()
				.map(|(id, collectable)| (id, collectable.clone()))
				.collect(),
			portals: self.portals().cloned().collect(),
			stations: self.stations.clone(),
		}
	}
}

// After the counter wraps an id may still be in use, those are skipped rather than overwritten.
fn insert_synthetic<T>(
	entries: &mut FxHashMap<SyntheticId, T>,
	ids: &mut SyntheticIdAllocator,
	entity: T,
) -> SyntheticId {
	loop {
		if let Entry::Vacant(entry) = entries.entry(ids.allocate()) {
			let id = *entry.key();
			entry.insert(entity);
			return id;
		}
	}
}
