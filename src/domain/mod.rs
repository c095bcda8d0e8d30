// Domain layer: entities, capability ports and classification rules.

pub mod model;
pub mod policy;
pub mod ports;
