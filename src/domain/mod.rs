// Domain layer: payload models and the client port. No HTTP library types leak in here.

pub mod dict_object;
pub mod model;
pub mod ports;
