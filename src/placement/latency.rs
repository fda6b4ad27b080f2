//! Player latency extraction.
//!
//! Queue placements can be biased towards regions that are close to the
//! players. Latencies are carried in the caller's opaque session data:
//!
//! ```json
//! {
//!   "gamelift_latencies": {
//!     "player_id_1": { "us-west-2": 42.5, "us-east-2": 88.23 }
//!   }
//! }
//! ```
//!
//! Any other keys in the session data are ignored.

use crate::backend::PlayerLatency;
use serde::Deserialize;
use std::collections::HashMap;

/// Latency from one player to one region, in milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencySample {
    pub player_id: String,
    pub region: String,
    pub latency_ms: f32,
}

impl From<LatencySample> for PlayerLatency {
    fn from(sample: LatencySample) -> Self {
        PlayerLatency {
            player_id: sample.player_id,
            region_identifier: sample.region,
            latency_in_milliseconds: sample.latency_ms,
        }
    }
}

/// Outcome of reading latencies from session data.
#[derive(Clone, Debug, PartialEq)]
pub enum LatencyExtraction {
    /// At least one sample was found
    Samples(Vec<LatencySample>),
    /// The data parsed but held no samples
    Empty,
    /// The data did not match the expected shape
    Malformed(String),
}

impl LatencyExtraction {
    /// Samples found, empty for the other outcomes.
    pub fn into_samples(self) -> Vec<LatencySample> {
        match self {
            LatencyExtraction::Samples(samples) => samples,
            LatencyExtraction::Empty | LatencyExtraction::Malformed(_) => Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct MatchLatencyData {
    // Player ID -> region -> latency
    #[serde(default)]
    gamelift_latencies: HashMap<String, HashMap<String, f32>>,
}

/// Read per-player, per-region latencies from session data.
///
/// Never fails: malformed input is reported as [`LatencyExtraction::Malformed`].
pub fn extract_latencies(session_data: &str) -> LatencyExtraction {
    let data: MatchLatencyData = match serde_json::from_str(session_data) {
        Ok(data) => data,
        Err(err) => return LatencyExtraction::Malformed(err.to_string()),
    };

    let samples: Vec<LatencySample> = data
        .gamelift_latencies
        .into_iter()
        .flat_map(|(player_id, regions)| {
            regions.into_iter().map(move |(region, latency_ms)| LatencySample {
                player_id: player_id.clone(),
                region,
                latency_ms,
            })
        })
        .collect();

    if samples.is_empty() {
        LatencyExtraction::Empty
    } else {
        LatencyExtraction::Samples(samples)
    }
}
