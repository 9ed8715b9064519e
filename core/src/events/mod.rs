pub mod router;
pub mod signal;
pub mod tasks;

pub use router::{EquipRequest, EquipVerdict, EventRouter};
pub use signal::HostEvent;
pub use tasks::{DeferredTask, TaskQueue};
