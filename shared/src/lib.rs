pub mod data;
pub mod map;

pub mod message {
	pub mod clientbound;

	pub use clientbound::Clientbound;
}
