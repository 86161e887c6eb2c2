//! Application layer: the service core, its port traits, and outbound
//! events.

pub mod events;
pub mod ports;
pub mod service;

pub use events::AppEvent;
pub use ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, Gate, InputPort, SensorPort};
pub use service::AppService;
