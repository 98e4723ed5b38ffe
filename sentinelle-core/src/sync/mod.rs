pub mod simulated_remote;

pub use simulated_remote::{RemoteLatency, SimulatedRemote};
