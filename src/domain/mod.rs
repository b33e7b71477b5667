// Domain layer: core models and ports (interfaces). No external service clients here.

pub mod model;
pub mod ports;
