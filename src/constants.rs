pub const PAGE_BITS: u32 = 8;
pub const OFFSET_BITS: u32 = 8;

pub const PAGE_SIZE: usize = 1 << OFFSET_BITS;
pub const FRAME_SIZE: usize = PAGE_SIZE;
pub const PAGE_TABLE_ENTRIES: usize = 1 << PAGE_BITS;

pub const NUM_FRAMES: usize = 256;

pub const TLB_CAPACITY: usize = 16;

pub const OFFSET_MASK: u32 = (1 << OFFSET_BITS) - 1;
pub const PAGE_MASK: u32 = (1 << PAGE_BITS) - 1;
pub const ADDRESS_MASK: u32 = (1 << (PAGE_BITS + OFFSET_BITS)) - 1;

pub const PAGE_SHIFT: u32 = OFFSET_BITS;
