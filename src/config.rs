//! JSON configuration for the demo binary.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Window scale factor over the 240x240 framebuffer.
    pub scale: u32,
    pub vsync: bool,
    /// Number of bouncing balls in the demo scene.
    pub balls: usize,
    /// RNG seed so a run is reproducible.
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            vsync: true,
            balls: 64,
            seed: 0x5eed,
        }
    }
}

impl DemoConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| e.to_string())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cfg = DemoConfig {
            scale: 2,
            vsync: false,
            balls: 10,
            seed: 42,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DemoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scale, 2);
        assert!(!back.vsync);
        assert_eq!(back.balls, 10);
        assert_eq!(back.seed, 42);
    }

    #[test]
    fn test_load_missing_file_is_err() {
        assert!(DemoConfig::load("/nonexistent/demo.json").is_err());
    }
}
