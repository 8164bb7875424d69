// Guardia: personal-safety SOS assistant with explainable danger scoring.
//
// This is the library root. Each module corresponds to a major subsystem
// of the SOS flow.

pub mod clock;
pub mod config;
pub mod contacts;
pub mod db;
pub mod helplines;
pub mod location;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod status;
