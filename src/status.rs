const DELETED: u8 = 1 << 0;

/// Status flags of a mesh element.
///
/// Deleting an element only sets a flag, the storage of the element is never
/// reclaimed. This keeps the handles of all other elements stable across
/// deletions.
#[derive(Clone, Copy, Default, Debug)]
pub struct Status {
    flags: u8,
}

impl Status {
    fn check(&self, i: u8) -> bool {
        self.flags & i > 0
    }

    fn set(&mut self, i: u8, flag: bool) {
        if flag {
            self.flags |= i;
        } else {
            self.flags &= !i;
        }
    }

    pub fn deleted(&self) -> bool {
        self.check(DELETED)
    }

    pub fn set_deleted(&mut self, flag: bool) {
        self.set(DELETED, flag);
    }
}
