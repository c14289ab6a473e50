// Domain layer: request records, labels and the ports the service depends on.

pub mod model;
pub mod ports;
pub mod schema;
