//! Domain events and their distribution mechanics.
//!
//! Domain crates implement [`Event`] for their typed events; infrastructure
//! wraps them in an [`EventEnvelope`] and fans them out on an [`EventBus`].

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
