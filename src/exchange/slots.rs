use std::sync::{Mutex, MutexGuard, PoisonError};

use super::buffer::SampleBuffer;
use super::roles::{RoleTable, Roles, SlotId};
use crate::constants::SLOT_COUNT;

/// Triple buffer: three sample slots rotated through the write, read and
/// copy roles
///
/// Swaps only exchange slot handles; sample data is never copied here.
/// Each slot sits behind its own guard. The role table never binds one slot
/// to both the producer (write) and the consumer (copy), so those guards are
/// uncontended as long as each side only touches its own role.
pub struct BufferExchange {
    slots: [Mutex<SampleBuffer>; SLOT_COUNT],
    roles: RoleTable,
}

impl BufferExchange {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Mutex::new(SampleBuffer::new())),
            roles: RoleTable::new(),
        }
    }

    /// Current role bindings
    pub fn roles(&self) -> Roles {
        self.roles.load()
    }

    /// Hand the finished write slot over as the read slot
    ///
    /// Producer side. Returns the slot the producer must write to next.
    pub fn swap_write_read(&self) -> SlotId {
        let (_, roles) = self.roles.swap_write_read();
        log::trace!("write<->read: {:?}", roles);
        roles.write
    }

    /// Take the latest finished frame as the copy slot
    ///
    /// Consumer side. Returns the new copy slot, or `None` if no frame was
    /// finished since the last call; the copy slot is then left unchanged.
    pub fn swap_read_copy(&self) -> Option<SlotId> {
        let (before, after) = self.roles.swap_read_copy();
        log::trace!("read<->copy: {:?}", after);
        before.fresh.then_some(after.copy)
    }

    /// Access a slot by handle
    pub fn slot(&self, id: SlotId) -> MutexGuard<'_, SampleBuffer> {
        // A panic while holding a slot leaves plain sample data behind.
        self.slots[id.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BufferExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_roles() {
        let exchange = BufferExchange::new();
        assert_eq!(exchange.roles(), Roles::INITIAL);
        for id in SlotId::ALL {
            assert_eq!(exchange.slot(id).size(), 0);
        }
    }

    #[test]
    fn test_finished_write_slot_becomes_read() {
        let exchange = BufferExchange::new();
        let first_write = exchange.roles().write;
        {
            let mut slot = exchange.slot(first_write);
            slot.set(0, 42.0);
            slot.set_size(1);
        }

        let next_write = exchange.swap_write_read();
        assert_ne!(next_write, first_write);
        assert_eq!(exchange.roles().read, first_write);
        assert_eq!(exchange.slot(exchange.roles().read).valid(), &[42.0]);
    }

    #[test]
    fn test_vacated_copy_becomes_next_write() {
        let exchange = BufferExchange::new();
        exchange.swap_write_read();
        let vacated_copy = exchange.roles().copy;

        // consumer picks up read; its old copy moves to read
        let copy = exchange.swap_read_copy();
        assert!(copy.is_some());
        assert_eq!(exchange.roles().read, vacated_copy);

        // producer closes a frame and receives that slot
        let next_write = exchange.swap_write_read();
        assert_eq!(next_write, vacated_copy);
    }

    #[test]
    fn test_read_copy_without_new_frame_keeps_copy() {
        let exchange = BufferExchange::new();
        assert_eq!(exchange.swap_read_copy(), None);
        assert_eq!(exchange.roles(), Roles::INITIAL);

        let published = exchange.roles().write;
        exchange.swap_write_read();
        assert_eq!(exchange.swap_read_copy(), Some(published));
        assert_eq!(exchange.swap_read_copy(), None);
        assert_eq!(exchange.roles().copy, published);
    }

    #[test]
    fn test_swap_moves_no_data() {
        let exchange = BufferExchange::new();
        for (n, id) in SlotId::ALL.into_iter().enumerate() {
            let mut slot = exchange.slot(id);
            slot.set(0, n as f64);
            slot.set_size(1);
        }

        exchange.swap_write_read();
        exchange.swap_read_copy();

        for (n, id) in SlotId::ALL.into_iter().enumerate() {
            assert_eq!(exchange.slot(id).data()[0], n as f64);
        }
    }
}
