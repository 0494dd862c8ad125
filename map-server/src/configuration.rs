//! INI configuration used to bootstrap the server.
//!
//! Values are stored as strings and only converted when requested, so a malformed value is reported by the getter
//! that asked for it rather than when the file is loaded. Keys are addressed as `section.key`.

use std::{collections::HashMap, fmt::Display, fs, io, net::IpAddr, net::SocketAddr, path::Path, path::PathBuf};
use std::{num::NonZeroU32, str::FromStr};
use thiserror::Error;

#[derive(Debug, Default)]
pub struct Configuration {
	sections: HashMap<Box<str>, HashMap<Box<str>, Box<str>>>,
}

impl Configuration {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationLoadError> {
		let path = path.as_ref();

		let metadata = match fs::metadata(path) {
			Ok(metadata) => metadata,
			Err(error) if error.kind() == io::ErrorKind::NotFound => {
				return Err(ConfigurationLoadError::NotFound(path.into()))
			}
			Err(error) => return Err(error.into()),
		};

		if metadata.is_dir() {
			return Err(ConfigurationLoadError::IsDirectory(path.into()));
		}

		Ok(Self::parse(&fs::read_to_string(path)?))
	}

	pub fn parse(source: &str) -> Self {
		let mut configuration = Self::default();
		let mut section = None;

		for line in source.lines() {
			let line = line.trim();

			if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
				continue;
			}

			if let Some(name) = line.strip_prefix('[').and_then(|line| line.strip_suffix(']')) {
				section = Some(Box::<str>::from(name.trim()));
				continue;
			}

			// Anything before the first section header has nowhere to go
			let (Some(section), Some((key, value))) = (&section, line.split_once('=')) else {
				continue;
			};

			configuration
				.sections
				.entry(section.clone())
				.or_default()
				.insert(key.trim().into(), value.trim().into());
		}

		configuration
	}

	/// Returns the raw value of `name`, or an empty string if there is no such key.
	pub fn get_string(&self, name: &str) -> &str {
		let Some((section, key)) = name.split_once('.') else {
			return "";
		};

		self.sections
			.get(section)
			.and_then(|section| section.get(key))
			.map_or("", |value| &**value)
	}

	pub fn get<T>(&self, name: &str) -> Result<T, ConfigurationValueError>
	where
		T: FromStr,
		T::Err: Display,
	{
		let value = self.get_string(name);

		value.parse().map_err(|error: T::Err| ConfigurationValueError {
			key: name.into(),
			value: value.into(),
			reason: error.to_string(),
		})
	}

	/// Like [`get`](Self::get), but `default` is used when the key is missing. A value that is present but malformed
	/// is still an error.
	pub fn get_or<T>(&self, name: &str, default: T) -> Result<T, ConfigurationValueError>
	where
		T: FromStr,
		T::Err: Display,
	{
		match self.get_string(name).is_empty() {
			true => Ok(default),
			false => self.get(name),
		}
	}

	pub fn get_i8(&self, name: &str) -> Result<i8, ConfigurationValueError> {
		self.get(name)
	}

	pub fn get_i16(&self, name: &str) -> Result<i16, ConfigurationValueError> {
		self.get(name)
	}

	pub fn get_i32(&self, name: &str) -> Result<i32, ConfigurationValueError> {
		self.get(name)
	}

	pub fn get_i64(&self, name: &str) -> Result<i64, ConfigurationValueError> {
		self.get(name)
	}

	pub fn get_f32(&self, name: &str) -> Result<f32, ConfigurationValueError> {
		self.get(name)
	}

	pub fn get_f64(&self, name: &str) -> Result<f64, ConfigurationValueError> {
		self.get(name)
	}

	pub fn get_bool(&self, name: &str) -> Result<bool, ConfigurationValueError> {
		self.get(name)
	}
}

/// Server parameters pulled out of a [`Configuration`].
#[derive(Debug, PartialEq)]
pub struct Settings {
	pub address: SocketAddr,
	pub catalog: PathBuf,
	pub tick_rate: NonZeroU32,
}

impl Settings {
	pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigurationValueError> {
		let host: IpAddr = configuration.get_or("server.host", IpAddr::from([0u16; 8]))?;
		let port: u16 = configuration.get_or("server.port", 843)?;

		Ok(Self {
			address: SocketAddr::new(host, port),
			catalog: configuration.get_or("maps.catalog", PathBuf::from("maps.json"))?,
			tick_rate: configuration.get_or("maps.tick_rate", NonZeroU32::new(30).unwrap_or(NonZeroU32::MIN))?,
		})
	}
}

#[derive(Debug, Error)]
pub enum ConfigurationLoadError {
	#[error("configuration file {} does not exist", .0.display())]
	NotFound(PathBuf),

	#[error("configuration path {} is a directory", .0.display())]
	IsDirectory(PathBuf),

	#[error(transparent)]
	Io(#[from] io::Error),
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigurationValueError {
	pub key: Box<str>,
	pub value: Box<str>,
	pub reason: String,
}
