// Domain layer: request payloads, cache keys and the configuration port.

pub mod model;
pub mod ports;
