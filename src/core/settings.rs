use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    net::{Ipv4Addr, SocketAddr},
};

use crate::error::Result;

pub const SETTINGS_PATH: &str = "core/settings.json";

/// Server configuration. Each entry keeps a display name next to its value.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    pub ipv4_addr: Ipv4Setting,
    pub port: U16Setting,
    pub document_source: StrSetting,
    pub admin_password_hash: StrSetting,
    pub site_base_url: StrSetting,
    pub site_name: StrSetting,
    pub twitter_site: StrSetting,
    pub default_language: StrSetting,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StrSetting {
    pub name: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct U16Setting {
    pub name: String,
    pub value: u16,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Ipv4Setting {
    pub name: String,
    pub value: Ipv4Addr,
}

impl StrSetting {
    fn new(name: &str, value: &str) -> Self {
        StrSetting {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl Settings {
    /// Reads `core/settings.json`, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(SETTINGS_PATH)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        match File::open(path) {
            Ok(file) => {
                let mut buffer = Vec::new();
                let mut reader = BufReader::new(file);
                reader.read_to_end(&mut buffer)?;
                let settings = serde_json::from_slice::<Settings>(&buffer).map_err(|error| {
                    warn!("Settings file {} is malformed: {}", path, error);
                    error
                })?;
                info!("Loaded settings from {}", path);
                Ok(settings)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", path);
                Ok(Settings::new())
            }
            Err(error) => {
                warn!("Settings load error: {}", error);
                Err(error.into())
            }
        }
    }

    pub fn new() -> Self {
        Settings {
            ipv4_addr: Ipv4Setting {
                name: "Ipv4 Address".to_string(),
                value: Ipv4Addr::new(127, 0, 0, 1),
            },
            port: U16Setting {
                name: "Port".to_string(),
                value: 4010,
            },
            document_source: StrSetting::new("Document Source", "data/portfolio.json"),
            // sha256("password")
            admin_password_hash: StrSetting::new(
                "Admin Password Hash",
                "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8",
            ),
            site_base_url: StrSetting::new("Site Base URL", "https://pixelachestudio.github.io"),
            site_name: StrSetting::new("Site Name", "Pixel Ache Studio"),
            twitter_site: StrSetting::new("Twitter Site", "@PixelAcheStudio"),
            default_language: StrSetting::new("Default Language", "ko"),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.ipv4_addr.value.into(), self.port.value)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}
