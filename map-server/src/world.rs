use crate::instance::{Event, MapInstance, SharedMap};
use dashmap::DashMap;
use driftline_shared::data::MapId;
use driftline_shared::map::Map;
use log::warn;
use std::{io, num::NonZeroU32, sync::Arc, thread};

/// Every map currently live on this server.
pub struct World {
	tick_rate: NonZeroU32,
	maps: DashMap<MapId, Arc<SharedMap>>,
}

impl World {
	pub fn new(tick_rate: NonZeroU32) -> Self {
		Self {
			tick_rate,
			maps: DashMap::new(),
		}
	}

	/// Starts running `map` on its own thread. A map already live under the same id is shut down and replaced.
	pub fn insert(&self, map: Map) -> io::Result<Arc<SharedMap>> {
		let (instance, shared) = MapInstance::new(map, self.tick_rate);

		thread::Builder::new()
			.name(format!("map-{}", shared.id))
			.spawn(|| instance.run())?;

		if let Some(replaced) = self.maps.insert(shared.id, shared.clone()) {
			warn!("Map {} was already running, replacing it", replaced.id);
			let _ = replaced.send(Event::Shutdown);
		}

		Ok(shared)
	}

	/// Takes a map out of the world and stops it. Sessions still holding on to it will find it no longer running.
	pub fn remove(&self, id: MapId) -> Option<Arc<SharedMap>> {
		let (_, shared) = self.maps.remove(&id)?;
		let _ = shared.send(Event::Shutdown);
		Some(shared)
	}

	pub fn get(&self, id: MapId) -> Option<Arc<SharedMap>> {
		self.maps.get(&id).as_deref().cloned()
	}

	/// The starter map new sessions are placed on, the lowest id wins if there are several.
	pub fn starter(&self) -> Option<Arc<SharedMap>> {
		self.maps
			.iter()
			.filter(|map| map.starter)
			.min_by_key(|map| map.id)
			.map(|map| map.value().clone())
	}

	pub fn len(&self) -> usize {
		self.maps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}

	pub fn shutdown(&self) {
		for map in self.maps.iter() {
			let _ = map.send(Event::Shutdown);
		}

		self.maps.clear();
	}
}
