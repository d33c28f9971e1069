// Adapters layer: concrete implementations of the domain ports.

pub mod nerdgraph;

pub use nerdgraph::NerdGraphClient;
