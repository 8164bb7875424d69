// Pipelines: the ordered flows that tie location, storage, scoring, and
// alerting together.

pub mod assess;
pub mod sos;
