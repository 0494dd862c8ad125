use crate::data::{CollectableKind, FactionId, MapId, NpcTemplateId, PortalId};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Npc {
	pub template: NpcTemplateId,
	pub position: Point2<i32>,
}

/// Something lying around a map that players can pick up, bonus boxes, cargo and the like.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Collectable {
	pub kind: CollectableKind,
	pub position: Point2<i32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Portal {
	pub id: PortalId,
	pub position: Point2<i32>,

	pub target_map: MapId,
	pub target_position: Point2<i32>,
}

/// Stations carry no identity of their own, two stations with equal fields are still two stations.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Station {
	#[serde(default)]
	pub faction: Option<FactionId>,
	pub position: Point2<i32>,
}
