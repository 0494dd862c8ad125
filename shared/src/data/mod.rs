pub mod entity;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Largest magnitude a [`SyntheticId`] may reach, `i32::MIN` is excluded so negation can never overflow.
pub const SYNTHETIC_ID_LIMIT: i32 = -i32::MAX;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MapId(pub u32);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PortalId(pub u32);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FactionId(pub u32);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NpcTemplateId(pub u32);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CollectableKind(pub u16);

/// Identifier handed out by a map to entities spawned at runtime. These live in the non-positive half of the `i32`
/// range so they can never collide with ids loaded from persistent data.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SyntheticId(i32);

impl SyntheticId {
	pub const ZERO: Self = Self(0);

	/// Returns `None` if `value` is positive or below [`SYNTHETIC_ID_LIMIT`].
	pub const fn new(value: i32) -> Option<Self> {
		match value {
			SYNTHETIC_ID_LIMIT..=0 => Some(Self(value)),
			_ => None,
		}
	}

	pub const fn get(self) -> i32 {
		self.0
	}
}

impl<'d> Deserialize<'d> for SyntheticId {
	fn deserialize<D: serde::Deserializer<'d>>(deserializer: D) -> Result<Self, D::Error> {
		let value = i32::deserialize(deserializer)?;
		Self::new(value).ok_or_else(|| serde::de::Error::custom(format!("synthetic id out of range: {value}")))
	}
}

impl FactionId {
	/// Converts the raw owner reference used by map data, where `-1` means the map is unowned.
	pub fn from_raw(raw: i32) -> Result<Option<Self>, InvalidFaction> {
		match raw {
			-1 => Ok(None),
			0.. => Ok(Some(Self(raw as u32))),
			_ => Err(InvalidFaction(raw)),
		}
	}
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid faction reference {0}, expected -1 or a non-negative id")]
pub struct InvalidFaction(pub i32);

macro_rules! display {
	($($name:ident),*) => {
		$(
			impl Display for $name {
				fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
					write!(f, "{}", self.0)
				}
			}
		)*
	};
}

display!(MapId, PortalId, FactionId, NpcTemplateId, CollectableKind, SyntheticId);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn synthetic_id_range() {
		assert_eq!(SyntheticId::new(0), Some(SyntheticId::ZERO));
		assert_eq!(SyntheticId::new(-i32::MAX).map(SyntheticId::get), Some(-i32::MAX));
		assert_eq!(SyntheticId::new(1), None);
		assert_eq!(SyntheticId::new(i32::MIN), None);
	}

	#[test]
	fn faction_from_raw() {
		assert_eq!(FactionId::from_raw(-1), Ok(None));
		assert_eq!(FactionId::from_raw(0), Ok(Some(FactionId(0))));
		assert_eq!(FactionId::from_raw(3), Ok(Some(FactionId(3))));
		assert_eq!(FactionId::from_raw(-2), Err(InvalidFaction(-2)));
	}
}
