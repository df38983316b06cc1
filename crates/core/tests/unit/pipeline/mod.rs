//! End-to-end pipeline behavior, driven through the port surface.

mod hazards;
mod retire;
