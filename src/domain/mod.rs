// Domain layer: request/response models and the two seams (ApiCall, Transport).

pub mod model;
pub mod ports;
