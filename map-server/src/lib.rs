pub mod catalog;
pub mod configuration;
pub mod instance;
pub mod server;
pub mod session;
pub mod world;
