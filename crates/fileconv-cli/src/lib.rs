//! CLI library components for fileconv.

pub mod logging;
pub mod pipeline;
pub mod render;
