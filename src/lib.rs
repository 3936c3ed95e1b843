pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod tlb;
pub mod translation;

// Re-export commonly used items for convenience
pub use error::{Result, VmError};
pub use translation::{
    EvictionPolicy, LogicalAddress, Statistics, Translation, VmConfig, VmContext,
};
