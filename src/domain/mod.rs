// Domain layer: content records, cart items, money and the ports the adapters implement.

pub mod model;
pub mod money;
pub mod ports;
