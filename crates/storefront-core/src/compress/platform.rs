//! Hardware ceilings for the platform-aware compressor.
//!
//! Mobile browsers cap canvas and decode buffers well below what desktop
//! browsers allow; iOS Safari refuses surfaces above roughly 16.7 megapixels.
//! Starting the loop inside these ceilings avoids encode failures that would
//! otherwise surface only after an expensive full-size render.

use serde::{Deserialize, Serialize};

use crate::decode::{calculate_fit_dimensions, clamp_to_max_pixels};

/// Device memory (GB) at or below which a device gets the low profile.
const LOW_MEMORY_GB: f64 = 4.0;

/// User agent fragments identifying phones and tablets.
const MOBILE_UA_MARKERS: &[&str] = &["iphone", "ipad", "ipod", "android", "mobile", "silk"];

/// Conservative vs generous hardware ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformProfile {
    Low,
    #[default]
    High,
}

impl PlatformProfile {
    /// Longest edge a render surface may have.
    pub fn max_edge(self) -> u32 {
        match self {
            PlatformProfile::Low => 4096,
            PlatformProfile::High => 8192,
        }
    }

    /// Largest pixel count a render surface may have.
    pub fn max_pixels(self) -> u64 {
        match self {
            PlatformProfile::Low => 16_777_216,
            PlatformProfile::High => 33_554_432,
        }
    }

    /// Pick a profile from what the browser reports about itself.
    ///
    /// `device_memory_gb` is `navigator.deviceMemory`, which only Chromium
    /// exposes; when absent the decision rests on the user agent alone.
    pub fn detect(user_agent: &str, device_memory_gb: Option<f64>) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let mobile_ua = MOBILE_UA_MARKERS.iter().any(|marker| ua.contains(marker));
        let low_memory = device_memory_gb.is_some_and(|gb| gb > 0.0 && gb <= LOW_MEMORY_GB);

        if mobile_ua || low_memory {
            PlatformProfile::Low
        } else {
            PlatformProfile::High
        }
    }

    /// Shrink `width x height` to fit this profile's edge and pixel ceilings.
    pub fn clamp(self, width: u32, height: u32) -> (u32, u32) {
        let edge = self.max_edge();
        let (w, h) = calculate_fit_dimensions(width, height, edge, edge);
        clamp_to_max_pixels(w, h, self.max_pixels())
    }
}
