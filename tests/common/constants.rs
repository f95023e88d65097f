//! Shared constants for end-to-end tests
//!
//! When the device identity or timing of the fakes changes, update only
//! this file.

#![allow(dead_code)]

// ============================================================================
// Fake Device
// ============================================================================

/// API key the fake device provider expects in the `Govee-API-Key` header
pub const DEVICE_API_KEY: &str = "test-govee-key";

/// Device model sent in every control payload
pub const DEVICE_SKU: &str = "H6008";

/// Device id sent in every control payload
pub const DEVICE_ID: &str = "AA:BB:CC:DD:EE:FF:00:11";

// ============================================================================
// Fake LLM
// ============================================================================

pub const OPENAI_API_KEY: &str = "sk-test";

pub const OPENAI_MODEL: &str = "gpt-4";

pub const CLAUDE_API_KEY: &str = "sk-ant-test";

pub const CLAUDE_MODEL: &str = "claude-3-5-haiku-latest";

// ============================================================================
// Seeded Scenes
// ============================================================================

pub const CALM_SCENE: &str = "CalmBlue";
pub const STRESSED_SCENE: &str = "StressedRed";
pub const UPBEAT_SCENE: &str = "UpbeatTeal";
pub const LOW_SCENE: &str = "LowPurple";

/// (200, 60, 60) packed as 0xC83C3C
pub const STRESSED_PACKED_COLOR: u64 = 13122620;
pub const STRESSED_BRIGHTNESS: u64 = 65;

// ============================================================================
// Timing
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// HTTP request timeout for test client (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Device request timeout used by the server under test (seconds)
pub const DEVICE_TIMEOUT_SECS: u64 = 2;
