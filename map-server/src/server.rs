use crate::{session::Session, world::World};
use log::{error, info, warn};
use std::{future::Future, io, io::ErrorKind, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, pin, select, signal};

pub struct Server;

impl Server {
	/// Accepts connections on `address` until interrupted with ctrl-c.
	pub async fn run(world: Arc<World>, address: SocketAddr) -> io::Result<()> {
		let listener = TcpListener::bind(address).await?;
		info!("Listening on {}", listener.local_addr()?);

		let shutdown = async {
			if let Err(error) = signal::ctrl_c().await {
				error!("Unable to listen for ctrl-c, the server can only be stopped externally: {error}");
				std::future::pending::<()>().await;
			}
		};

		Self::serve(world, listener, shutdown).await
	}

	/// Accepts connections until `shutdown` completes. Errors that only affect a single connection attempt are logged
	/// and skipped, anything else stops the loop and is returned.
	pub async fn serve(world: Arc<World>, listener: TcpListener, shutdown: impl Future<Output = ()>) -> io::Result<()> {
		pin!(shutdown);

		loop {
			select! {
				_ = &mut shutdown => {
					info!("Stopped accepting connections");
					return Ok(());
				},

				connection = listener.accept() => match connection {
					Ok((stream, address)) => {
						tokio::spawn(Session::accept(world.clone(), stream, address));
					}
					Err(error) if is_transient(&error) => warn!("Failed to accept connection, continuing: {error}"),
					Err(error) => {
						error!("Unable to accept further connections due to error: {error}");
						return Err(error);
					}
				},
			}
		}
	}
}

fn is_transient(error: &io::Error) -> bool {
	matches!(
		error.kind(),
		ErrorKind::ConnectionAborted
			| ErrorKind::ConnectionReset
			| ErrorKind::Interrupted
			| ErrorKind::WouldBlock
			| ErrorKind::TimedOut
	)
}
