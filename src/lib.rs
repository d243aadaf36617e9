//! # groundtrack
//!
//! Per-frame orbital state pipeline for a single orbiting body: choose the authoritative state
//! vector, turn it into osculating elements, propagate it, rotate it into the Earth-fixed frame,
//! project it on the WGS84 ellipsoid and sample the orbit into a line list for rendering.
//!
//! The entry point is [`ground_track::GroundTrack::update`], driven by a
//! [`config::FrameConfig`].
pub mod celestial;
pub mod config;
pub mod constants;
pub mod earth_orientation;
pub mod geodesy;
pub mod ground_track;
pub mod groundtrack_errors;
pub mod kepler;
pub mod keplerian_element;
pub mod orbit_path;
pub mod ref_system;
pub mod state_source;
pub mod state_vector;
pub mod time;

pub use ground_track::{FrameOutput, FrameWarning, GroundTrack};
pub use groundtrack_errors::GroundTrackError;
