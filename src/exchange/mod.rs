pub mod buffer;
pub mod roles;
pub mod slots;

pub use buffer::SampleBuffer;
pub use roles::{RoleTable, Roles, SlotId};
pub use slots::BufferExchange;
