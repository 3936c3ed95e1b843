use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::constants::*;
use crate::error::{Result, VmError};

/// Demand-paged mapping from page number to physical frame.
///
/// One slot per page number; `None` means the page has not been loaded.
/// Slots only go `None -> Some` during normal operation; `invalidate` exists
/// for the optional frame-eviction policy.
pub struct PageTable {
    frames: [Option<u32>; PAGE_TABLE_ENTRIES],
}

impl PageTable {
    pub fn new() -> Self {
        PageTable {
            frames: [None; PAGE_TABLE_ENTRIES],
        }
    }

    /// Frame holding `page`, or `None` if the page is not resident
    #[inline]
    pub fn lookup(&self, page: u32) -> Option<u32> {
        self.frames[page as usize]
    }

    /// Record that `page` now lives in `frame`. Called at the end of a
    /// successful fault.
    pub fn mark_loaded(&mut self, page: u32, frame: u32) {
        self.frames[page as usize] = Some(frame);
    }

    /// Clear the mapping for `page` after its frame is reclaimed
    pub fn invalidate(&mut self, page: u32) {
        self.frames[page as usize] = None;
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame-addressable byte store with a monotonic free-frame allocator.
///
/// The allocator hands out frames 0, 1, 2, ... and stops at `num_frames`:
/// once every frame has been handed out, `allocate` returns `None` and the
/// caller decides whether that is a hard failure or a reclaim (see the
/// eviction policy in `translation`).
pub struct PhysicalMemory {
    data: Box<[u8]>,
    num_frames: usize,
    next_frame: usize,
}

impl PhysicalMemory {
    /// Create a zeroed physical memory of `num_frames` frames
    pub fn new(num_frames: usize) -> Self {
        PhysicalMemory {
            data: vec![0u8; num_frames * FRAME_SIZE].into_boxed_slice(),
            num_frames,
            next_frame: 0,
        }
    }

    /// Hand out the next free frame, or `None` when memory is full
    pub fn allocate(&mut self) -> Option<u32> {
        if self.next_frame == self.num_frames {
            return None;
        }
        let frame = self.next_frame as u32;
        self.next_frame += 1;
        Some(frame)
    }

    /// Copy one page worth of bytes into `frame`
    pub fn load_frame(&mut self, frame: u32, bytes: &[u8; FRAME_SIZE]) {
        let start = frame as usize * FRAME_SIZE;
        self.data[start..start + FRAME_SIZE].copy_from_slice(bytes);
    }

    /// Byte at `frame * FRAME_SIZE + offset`.
    ///
    /// The decoder keeps offsets in range and the allocator keeps frames in
    /// range, but both are rejected explicitly rather than trusted.
    pub fn read_byte(&self, frame: u32, offset: usize) -> Result<u8> {
        if frame as usize >= self.num_frames {
            return Err(VmError::InvalidFrame {
                frame,
                num_frames: self.num_frames,
            });
        }
        if offset >= FRAME_SIZE {
            return Err(VmError::InvalidAddress {
                offset,
                frame_size: FRAME_SIZE,
            });
        }
        Ok(self.data[frame as usize * FRAME_SIZE + offset])
    }

    /// Physical address of `offset` within `frame`
    #[inline]
    pub fn frame_to_address(frame: u32, offset: u32) -> u32 {
        frame * FRAME_SIZE as u32 + offset
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Frames handed out so far by the monotonic allocator
    #[inline]
    pub fn frames_used(&self) -> usize {
        self.next_frame
    }
}

/// Read-only page store backing the simulated memory.
///
/// Pages are addressed by `page * FRAME_SIZE` offsets of `FRAME_SIZE` bytes.
/// `File`-backed in the binary; tests use the `Cursor`-backed constructor.
#[derive(Debug)]
pub struct BackingStore<R = File> {
    source: R,
}

impl BackingStore<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = File::open(path).map_err(|source| VmError::BackingStoreOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(BackingStore { source })
    }
}

impl BackingStore<Cursor<Vec<u8>>> {
    /// In-memory store over a raw byte image
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        BackingStore {
            source: Cursor::new(bytes),
        }
    }
}

impl<R: Read + Seek> BackingStore<R> {
    /// Read the full content of `page` into `buf`.
    ///
    /// A short read (truncated store) fails the same way an unreadable store
    /// does; the caller must not treat a partial page as loaded.
    pub fn read_page(&mut self, page: u32, buf: &mut [u8; FRAME_SIZE]) -> Result<()> {
        self.source
            .seek(SeekFrom::Start(page as u64 * FRAME_SIZE as u64))
            .and_then(|_| self.source.read_exact(buf))
            .map_err(|source| VmError::Io { page, source })
    }
}
