use crate::data::entity::{Collectable, Npc, Portal, Station};
use crate::data::{FactionId, MapId, SyntheticId};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Clientbound {
	SyncMap(SyncMap),
}

/// Full state of a map as seen by a client entering it. Entity order within each list is unspecified, except for
/// `stations` which keeps insertion order.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SyncMap {
	pub id: MapId,
	pub name: Box<str>,
	pub limits: Vector2<u32>,
	pub pvp: bool,
	pub starter: bool,
	pub faction: Option<FactionId>,

	pub npcs: Vec<(SyntheticId, Npc)>,
	pub collectables: Vec<(SyntheticId, Collectable)>,
	pub portals: Vec<Portal>,
	pub stations: Vec<Station>,
}

impl From<SyncMap> for Clientbound {
	fn from(value: SyncMap) -> Self {
		Self::SyncMap(value)
	}
}
