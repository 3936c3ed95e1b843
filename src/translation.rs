use std::collections::VecDeque;
use std::io::{Read, Seek};

use crate::constants::*;
use crate::error::{Result, VmError};
use crate::memory::{BackingStore, PageTable, PhysicalMemory};
use crate::tlb::Tlb;

/// Represents the decomposed components of a logical address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalAddress {
    pub raw: u32,
    pub page: u32,
    pub offset: u32,
}

impl LogicalAddress {
    /// Decompose a raw address into page number and offset.
    ///
    /// Only the low 16 bits are significant: bits [15:8] are the page
    /// number, bits [7:0] the offset. Higher bits are ignored.
    pub fn from_raw(raw: u32) -> Self {
        let page = (raw >> PAGE_SHIFT) & PAGE_MASK;
        let offset = raw & OFFSET_MASK;

        LogicalAddress { raw, page, offset }
    }
}

impl std::fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LA({}) = (page={}, offset={})",
            self.raw, self.page, self.offset
        )
    }
}

/// What to do when a fault finds no free physical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Fail the fault with `CapacityExhausted`
    #[default]
    Fail,
    /// Reclaim the frame of the longest-resident page (FIFO over frames,
    /// mirroring the TLB policy)
    Fifo,
}

/// Run-time sizing of the simulated memory system
#[derive(Debug, Clone, Copy)]
pub struct VmConfig {
    pub tlb_capacity: usize,
    pub num_frames: usize,
    pub eviction: EvictionPolicy,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            tlb_capacity: TLB_CAPACITY,
            num_frames: NUM_FRAMES,
            eviction: EvictionPolicy::Fail,
        }
    }
}

/// Aggregate counters for a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub translated: usize,
    pub page_faults: usize,
    pub tlb_hits: usize,
}

impl Statistics {
    pub fn page_fault_rate(&self) -> f64 {
        if self.translated == 0 {
            0.0
        } else {
            self.page_faults as f64 / self.translated as f64
        }
    }

    pub fn tlb_hit_rate(&self) -> f64 {
        if self.translated == 0 {
            0.0
        } else {
            self.tlb_hits as f64 / self.translated as f64
        }
    }
}

/// A page currently holding a physical frame, in load order
#[derive(Debug, Clone, Copy)]
struct ResidentPage {
    page: u32,
    frame: u32,
}

/// Mutable state of one simulation run: TLB, page table, physical memory,
/// residency order, and counters. Owned by the caller and passed by
/// reference into `translate`, so each test gets fresh state.
pub struct VmContext {
    tlb: Tlb,
    page_table: PageTable,
    memory: PhysicalMemory,
    resident: VecDeque<ResidentPage>,
    eviction: EvictionPolicy,
    stats: Statistics,
}

impl VmContext {
    pub fn new(config: &VmConfig) -> Self {
        VmContext {
            tlb: Tlb::new(config.tlb_capacity),
            page_table: PageTable::new(),
            memory: PhysicalMemory::new(config.num_frames),
            resident: VecDeque::with_capacity(config.num_frames),
            eviction: config.eviction,
            stats: Statistics::default(),
        }
    }

    #[inline]
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
}

impl Default for VmContext {
    fn default() -> Self {
        Self::new(&VmConfig::default())
    }
}

/// Outcome of translating one logical address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub logical: u32,
    pub page: u32,
    pub offset: u32,
    pub physical: u32,
    pub value: i8,
    pub tlb_hit: bool,
    pub page_fault: bool,
}

/// Translate one logical address to a physical address and read its byte.
///
/// Lookup chain: TLB first, then the page table; an invalid page-table entry
/// triggers the fault path (backing store -> physical memory -> page table).
/// The TLB is refreshed on every TLB miss, faulting or not. Counters update
/// only when the whole step succeeds.
pub fn translate<R: Read + Seek>(
    raw: u32,
    ctx: &mut VmContext,
    store: &mut BackingStore<R>,
) -> Result<Translation> {
    let addr = LogicalAddress::from_raw(raw);

    let mut tlb_hit = false;
    let mut page_fault = false;

    let frame = match ctx.tlb.lookup(addr.page) {
        Some(frame) => {
            tlb_hit = true;
            frame
        }
        None => {
            let frame = match ctx.page_table.lookup(addr.page) {
                Some(frame) => frame,
                None => {
                    page_fault = true;
                    swap_in(addr.page, ctx, store)?
                }
            };
            ctx.tlb.insert(addr.page, frame);
            frame
        }
    };

    let value = ctx.memory.read_byte(frame, addr.offset as usize)? as i8;

    ctx.stats.translated += 1;
    if tlb_hit {
        ctx.stats.tlb_hits += 1;
    }
    if page_fault {
        ctx.stats.page_faults += 1;
    }

    Ok(Translation {
        logical: addr.raw,
        page: addr.page,
        offset: addr.offset,
        physical: PhysicalMemory::frame_to_address(frame, addr.offset),
        value,
        tlb_hit,
        page_fault,
    })
}

/// Translate a trace of logical addresses in order, stopping at the first
/// error
pub fn translate_batch<R: Read + Seek>(
    addrs: &[u32],
    ctx: &mut VmContext,
    store: &mut BackingStore<R>,
) -> Result<Vec<Translation>> {
    addrs
        .iter()
        .map(|&raw| translate(raw, ctx, store))
        .collect()
}

/// Service a page fault: fetch the page from the backing store, place it in
/// a physical frame, and mark it loaded. Returns the frame.
///
/// The page is read before a frame is allocated, so a failed read aborts the
/// fault without consuming a frame or touching the page table.
fn swap_in<R: Read + Seek>(
    page: u32,
    ctx: &mut VmContext,
    store: &mut BackingStore<R>,
) -> Result<u32> {
    let mut buf = [0u8; FRAME_SIZE];
    store.read_page(page, &mut buf)?;

    let frame = match ctx.memory.allocate() {
        Some(frame) => frame,
        None => reclaim_frame(ctx)?,
    };

    ctx.memory.load_frame(frame, &buf);
    ctx.page_table.mark_loaded(page, frame);
    ctx.resident.push_back(ResidentPage { page, frame });

    Ok(frame)
}

/// Free a frame when the allocator is out, according to the configured
/// policy. A FIFO reclaim invalidates the victim's page-table entry and
/// purges its TLB entry so no stale mapping survives.
fn reclaim_frame(ctx: &mut VmContext) -> Result<u32> {
    match ctx.eviction {
        EvictionPolicy::Fail => Err(VmError::CapacityExhausted {
            frames: ctx.memory.num_frames(),
        }),
        EvictionPolicy::Fifo => {
            let Some(victim) = ctx.resident.pop_front() else {
                return Err(VmError::CapacityExhausted {
                    frames: ctx.memory.num_frames(),
                });
            };
            ctx.page_table.invalidate(victim.page);
            ctx.tlb.purge(victim.page);
            Ok(victim.frame)
        }
    }
}
