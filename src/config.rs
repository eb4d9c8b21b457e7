//! Runtime configuration.
//!
//! The library never reads the environment by itself. A host program builds
//! a [`Config`] (usually with [`Config::from_env`]) and decides whether to
//! [`apply`](Config::apply) it.

use std::env;
use std::ffi::OsString;

use crate::error::{config_error, Result};
use crate::simd::{self, CapabilityLevel};

/// Environment variable holding a capability level override.
pub const SIMD_LEVEL_ENV: &str = "LINMATH_SIMD_LEVEL";

/// Settings a host can apply to the dispatch registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Level to force instead of the detected one.
    pub level_override: Option<CapabilityLevel>,
}

impl Config {
    /// Reads [`SIMD_LEVEL_ENV`]. Unset or blank means no override.
    pub fn from_env() -> Result<Self> {
        Self::from_value(env::var_os(SIMD_LEVEL_ENV))
    }

    fn from_value(value: Option<OsString>) -> Result<Self> {
        let Some(raw) = value else {
            return Ok(Self::default());
        };

        let text = raw
            .into_string()
            .map_err(|_| config_error(SIMD_LEVEL_ENV, "value is not valid UTF-8"))?;

        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(Self {
            level_override: Some(text.parse()?),
        })
    }

    /// Applies the override, if any, and returns the level now active.
    pub fn apply(&self) -> CapabilityLevel {
        if let Some(level) = self.level_override {
            tracing::info!(%level, source = SIMD_LEVEL_ENV, "applying capability level override");
            simd::set_level(level);
        }
        simd::current_level()
    }
}
