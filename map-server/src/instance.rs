use driftline_shared::data::entity::{Collectable, Npc, Portal, Station};
use driftline_shared::data::SyntheticId;
use driftline_shared::map::{Map, MapInfo};
use driftline_shared::message::clientbound::SyncMap;
use log::{debug, info, warn};
use std::{num::NonZeroU32, ops::Deref, sync::Arc, thread, time::Duration, time::Instant};
use tokio::sync::mpsc::{error::TryRecvError, unbounded_channel as channel};
use tokio::sync::mpsc::{UnboundedReceiver as Receiver, UnboundedSender as Sender};
use tokio::sync::oneshot;

pub type Reply<T> = Option<oneshot::Sender<T>>;

/// A running [`Map`]. Only the thread running the instance ever touches the map's entities, everything else goes
/// through the [`SharedMap`] handed out alongside it.
pub struct MapInstance {
	events: Receiver<Event>,
	tick_rate: NonZeroU32,

	map: Map,
}

/// A [`SharedMap`] allows reading a [`Map`]'s static information, as well as sending events to be processed at the
/// start of the next tick. It does not allow directly accessing the map's entities however.
pub struct SharedMap {
	pub info: MapInfo,

	sender: Sender<Event>,
}

/// [`Event`]s are sent to [`MapInstance`]s and are processed at the start of the next tick.
pub enum Event {
	SpawnNpc(Npc, Reply<SyntheticId>),
	DespawnNpc(SyntheticId),
	SpawnCollectable(Collectable, Reply<SyntheticId>),
	Collect(SyntheticId, Reply<Option<Collectable>>),
	AddPortal(Portal),
	AddStation(Station),
	Snapshot(oneshot::Sender<SyncMap>),
	Shutdown,
}

impl MapInstance {
	pub fn new(map: Map, tick_rate: NonZeroU32) -> (Self, Arc<SharedMap>) {
		let (sender, events) = channel();

		let shared = Arc::new(SharedMap {
			info: map.info().clone(),
			sender,
		});

		let instance = Self {
			events,
			tick_rate,

			map,
		};

		(instance, shared)
	}

	/// Ticks until told to shut down or every [`SharedMap`] has been dropped, then hands the map back.
	pub fn run(mut self) -> Map {
		let target_tick_time = Duration::from_secs(1) / self.tick_rate.get();

		info!("Map {} ({}) running", self.map.name(), self.map.id());

		loop {
			let tick_start = Instant::now();

			if !self.tick() {
				break;
			}

			let tick_duration = Instant::now() - tick_start;

			match target_tick_time.checked_sub(tick_duration) {
				Some(time_until_next_tick) => thread::sleep(time_until_next_tick),
				None => warn!("Tick took {tick_duration:.0?}, exceeding {target_tick_time:.0?} target"),
			}
		}

		info!("Map {} ({}) stopped", self.map.name(), self.map.id());

		self.map
	}

	/// Returns `false` once the instance should stop.
	fn tick(&mut self) -> bool {
		loop {
			let event = match self.events.try_recv() {
				Ok(event) => event,
				Err(TryRecvError::Empty) => return true,
				Err(TryRecvError::Disconnected) => return false,
			};

			if !self.handle_event(event) {
				return false;
			}
		}
	}

	fn handle_event(&mut self, event: Event) -> bool {
		match event {
			Event::SpawnNpc(npc, reply) => {
				let id = self.map.add_npc(npc);
				debug!("Spawned NPC {id} on map {}", self.map.id());
				respond(reply, id);
			}
			Event::DespawnNpc(id) => {
				if self.map.remove_npc(id).is_none() {
					debug!("Tried to despawn unknown NPC {id} on map {}", self.map.id());
				}
			}
			Event::SpawnCollectable(collectable, reply) => {
				let id = self.map.add_collectable(collectable);
				respond(reply, id);
			}
			Event::Collect(id, reply) => respond(reply, self.map.remove_collectable(id)),
			Event::AddPortal(portal) => {
				self.map.add_portal(portal);
			}
			Event::AddStation(station) => self.map.add_station(station),
			Event::Snapshot(reply) => respond(Some(reply), self.map.snapshot()),
			Event::Shutdown => return false,
		}

		true
	}
}

// The requester may have given up waiting, that's fine
fn respond<T>(reply: Reply<T>, value: T) {
	if let Some(reply) = reply {
		let _ = reply.send(value);
	}
}

impl SharedMap {
	/// Sends an event to the [`MapInstance`] to be processed at the start of the next tick. The event is returned if
	/// the instance has stopped.
	pub fn send(&self, event: Event) -> Result<(), Event> {
		self.sender.send(event).map_err(|error| error.0)
	}

	/// Requests a snapshot of the map's current entities, `None` if the instance has stopped.
	pub async fn snapshot(&self) -> Option<SyncMap> {
		let (reply, response) = oneshot::channel();
		self.send(Event::Snapshot(reply)).ok()?;
		response.await.ok()
	}

	pub async fn spawn_npc(&self, npc: Npc) -> Option<SyntheticId> {
		let (reply, response) = oneshot::channel();
		self.send(Event::SpawnNpc(npc, Some(reply))).ok()?;
		response.await.ok()
	}

	pub async fn spawn_collectable(&self, collectable: Collectable) -> Option<SyntheticId> {
		let (reply, response) = oneshot::channel();
		self.send(Event::SpawnCollectable(collectable, Some(reply))).ok()?;
		response.await.ok()
	}

	pub fn is_running(&self) -> bool {
		!self.sender.is_closed()
	}
}

impl Deref for SharedMap {
	type Target = MapInfo;

	fn deref(&self) -> &Self::Target {
		&self.info
	}
}
