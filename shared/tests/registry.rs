//! Registry behaviour as seen from outside the crate: id sequences, portal replacement, station ordering and
//! lookups of ids that were never handed out.

use driftline_shared::data::entity::{Collectable, Npc, Portal, Station};
use driftline_shared::data::{CollectableKind, FactionId, MapId, NpcTemplateId, PortalId, SyntheticId};
use driftline_shared::map::{Deferred, Map, MapInfo};
use nalgebra::{point, vector};
use proptest::prelude::*;

fn home() -> Map {
	Map::new(
		MapInfo {
			id: MapId(1),
			name: "Home".into(),
			limits: vector![800, 600],
			pvp: false,
			starter: true,
			faction: None,
		},
		Deferred::default(),
	)
}

fn npc(template: u32) -> Npc {
	Npc {
		template: NpcTemplateId(template),
		position: point![100, 100],
	}
}

fn collectable(kind: u16) -> Collectable {
	Collectable {
		kind: CollectableKind(kind),
		position: point![50, 50],
	}
}

fn portal(id: u32, target: u32) -> Portal {
	Portal {
		id: PortalId(id),
		position: point![0, 0],
		target_map: MapId(target),
		target_position: point![10, 10],
	}
}

fn synthetic(value: i32) -> SyntheticId {
	SyntheticId::new(value).expect("test ids are in range")
}

#[derive(Clone, Debug)]
enum Spawn {
	Npc(u32),
	Collectable(u16),
}

fn spawn_strategy() -> impl Strategy<Value = Spawn> {
	prop_oneof![
		any::<u32>().prop_map(Spawn::Npc),
		any::<u16>().prop_map(Spawn::Collectable),
	]
}

proptest! {
	#[test]
	fn npc_ids_count_down_in_call_order(templates in prop::collection::vec(any::<u32>(), 0..200)) {
		let mut map = home();

		for (index, template) in templates.iter().enumerate() {
			prop_assert_eq!(map.add_npc(npc(*template)), synthetic(-(index as i32)));
		}

		prop_assert_eq!(map.npc_count(), templates.len());

		for (index, template) in templates.iter().enumerate() {
			prop_assert_eq!(map.npc(synthetic(-(index as i32))), Some(&npc(*template)));
		}
	}

	#[test]
	fn interleaved_categories_allocate_independently(spawns in prop::collection::vec(spawn_strategy(), 0..200)) {
		let mut map = home();
		let mut npc_ids = vec![];
		let mut collectable_ids = vec![];

		for spawn in &spawns {
			match spawn {
				Spawn::Npc(template) => npc_ids.push(map.add_npc(npc(*template))),
				Spawn::Collectable(kind) => collectable_ids.push(map.add_collectable(collectable(*kind))),
			}
		}

		let expected = |count: usize| (0..count).map(|index| synthetic(-(index as i32))).collect::<Vec<_>>();

		prop_assert_eq!(&npc_ids, &expected(npc_ids.len()));
		prop_assert_eq!(&collectable_ids, &expected(collectable_ids.len()));
	}

	#[test]
	fn ids_stay_unique_across_removals(removals in prop::collection::vec(any::<bool>(), 1..100)) {
		let mut map = home();
		let mut seen = std::collections::HashSet::new();

		for (index, remove) in removals.into_iter().enumerate() {
			let id = map.add_npc(npc(index as u32));
			prop_assert!(seen.insert(id));

			if remove {
				prop_assert!(map.remove_npc(id).is_some());
			}
		}
	}
}

#[test]
fn two_npcs_on_a_fresh_map() {
	let mut map = home();

	map.add_npc(npc(1));
	map.add_npc(npc(2));

	let mut npcs = map.npcs().map(|(id, npc)| (id.get(), npc.clone())).collect::<Vec<_>>();
	npcs.sort_by_key(|(id, _)| -id);

	assert_eq!(npcs, vec![(0, npc(1)), (-1, npc(2))]);
}

#[test]
fn portal_with_same_id_is_replaced() {
	let mut map = home();

	assert_eq!(map.add_portal(portal(5, 2)), None);
	assert_eq!(map.add_portal(portal(5, 3)), Some(portal(5, 2)));

	assert_eq!(map.portal_count(), 1);
	assert_eq!(map.portal(PortalId(5)), Some(&portal(5, 3)));
}

#[test]
fn stations_keep_order_and_duplicates() {
	let mut map = home();
	let first = Station {
		faction: Some(FactionId(1)),
		position: point![1, 2],
	};
	let second = Station {
		faction: None,
		position: point![3, 4],
	};

	map.add_station(first.clone());
	map.add_station(second.clone());
	map.add_station(first.clone());

	assert_eq!(map.stations(), &[first.clone(), second, first]);
}

#[test]
fn unknown_ids_are_not_found() {
	let mut map = home();
	map.add_npc(npc(1));
	map.add_collectable(collectable(1));
	map.add_portal(portal(1, 2));

	assert_eq!(map.npc(synthetic(-1)), None);
	assert_eq!(map.collectable(synthetic(-5)), None);
	assert_eq!(map.portal(PortalId(2)), None);
	assert_eq!(map.remove_npc(synthetic(-3)), None);
}

#[test]
fn static_metadata() {
	let map = home();

	assert_eq!(map.id(), MapId(1));
	assert_eq!(map.name(), "Home");
	assert_eq!(map.limits(), vector![800, 600]);
	assert!(!map.is_pvp());
	assert!(map.is_starter());
	assert_eq!(map.faction(), None);
	assert_eq!(map.npc_count(), 0);
	assert!(map.stations().is_empty());
}
