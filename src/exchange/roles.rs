use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Handle of one of the three buffer slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u8);

impl SlotId {
    pub const ALL: [SlotId; 3] = [SlotId(0), SlotId(1), SlotId(2)];

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot{}", self.0)
    }
}

const FRESH_BIT: u8 = 1 << 6;

/// Binding of the write, read and copy roles to slots
///
/// Every value produced by this module is a permutation of the three slots.
/// The only transitions are exchanges of two bindings, which preserve that.
/// `fresh` is set while the read slot holds a frame the consumer has not
/// taken yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    pub write: SlotId,
    pub read: SlotId,
    pub copy: SlotId,
    pub fresh: bool,
}

impl Roles {
    pub const INITIAL: Roles = Roles {
        write: SlotId(0),
        read: SlotId(1),
        copy: SlotId(2),
        fresh: false,
    };

    /// Publish the write slot as the newest frame
    pub fn swap_write_read(self) -> Self {
        Self {
            write: self.read,
            read: self.write,
            copy: self.copy,
            fresh: true,
        }
    }

    /// Take the newest frame into the copy slot
    ///
    /// Without a fresh frame the bindings stay as they are; exchanging
    /// anyway would hand the consumer an older frame than it already has.
    pub fn swap_read_copy(self) -> Self {
        if !self.fresh {
            return self;
        }
        Self {
            write: self.write,
            read: self.copy,
            copy: self.read,
            fresh: false,
        }
    }

    pub fn is_permutation(&self) -> bool {
        self.write != self.read && self.read != self.copy && self.write != self.copy
    }

    // Two bits per role: write in 0..2, read in 2..4, copy in 4..6; bit 6 is
    // the fresh flag.
    fn pack(self) -> u8 {
        let fresh = if self.fresh { FRESH_BIT } else { 0 };
        self.write.0 | (self.read.0 << 2) | (self.copy.0 << 4) | fresh
    }

    fn unpack(packed: u8) -> Self {
        Self {
            write: SlotId(packed & 0b11),
            read: SlotId((packed >> 2) & 0b11),
            copy: SlotId((packed >> 4) & 0b11),
            fresh: packed & FRESH_BIT != 0,
        }
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Lock-free role table shared by the producer and the consumer
///
/// The bindings live in a single byte, so each swap is one
/// compare-and-exchange and no half-updated table is ever observable.
pub struct RoleTable(AtomicU8);

impl RoleTable {
    pub fn new() -> Self {
        Self(AtomicU8::new(Roles::INITIAL.pack()))
    }

    pub fn load(&self) -> Roles {
        Roles::unpack(self.0.load(Ordering::Acquire))
    }

    /// Exchange write and read; returns `(before, after)`
    pub fn swap_write_read(&self) -> (Roles, Roles) {
        self.update(Roles::swap_write_read)
    }

    /// Exchange read and copy if a fresh frame is waiting; returns
    /// `(before, after)`
    pub fn swap_read_copy(&self) -> (Roles, Roles) {
        self.update(Roles::swap_read_copy)
    }

    fn update(&self, transition: fn(Roles) -> Roles) -> (Roles, Roles) {
        let previous = match self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                Some(transition(Roles::unpack(packed)).pack())
            }) {
            Ok(packed) | Err(packed) => Roles::unpack(packed),
        };
        (previous, transition(previous))
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new()
    }
}
