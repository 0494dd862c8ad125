use crate::{instance::SharedMap, world::World};
use log::{debug, info, warn};
use std::{net::SocketAddr, sync::Arc};
use tokio::{io::AsyncReadExt, net::TcpStream};

/// A connected client and the map it is on.
pub struct Session {
	pub address: SocketAddr,
	pub map: Arc<SharedMap>,
}

impl Session {
	/// Places a freshly accepted connection on the starter map and holds it open until the peer goes away.
	pub async fn accept(world: Arc<World>, stream: TcpStream, address: SocketAddr) {
		info!("Received connection from {}", address.ip());

		let Some(map) = world.starter() else {
			warn!("No starter map for {address}, closing connection");
			return;
		};

		let Some(snapshot) = map.snapshot().await else {
			warn!("Map {} stopped before {address} could enter it", map.id);
			return;
		};

		debug!(
			"{address} entered {} ({} NPCs, {} collectables, {} portals, {} stations)",
			snapshot.name,
			snapshot.npcs.len(),
			snapshot.collectables.len(),
			snapshot.portals.len(),
			snapshot.stations.len()
		);

		Session { address, map }.run(stream).await
	}

	async fn run(self, mut stream: TcpStream) {
		let mut buffer = [0; 1024];

		loop {
			match stream.read(&mut buffer).await {
				Ok(0) => break,
				// Nothing is spoken over the socket yet, whatever the client sends is dropped
				Ok(_) => {}
				Err(error) => {
					warn!("Error occurred in connection from {}: {error}", self.address);
					break;
				}
			}
		}

		info!("{} disconnected from map {}", self.address, self.map.id);
	}
}
