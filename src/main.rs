//! vmsim - Demand-Paged Address Translation Simulator
//!
//! Reads a trace of logical addresses, translates each one through a FIFO
//! TLB and a demand-populated page table, services page faults from a
//! backing store image, and reports the byte values plus hit/fault
//! statistics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use vmsim::constants::{NUM_FRAMES, TLB_CAPACITY};
use vmsim::io::{read_logical_addresses, write_report, write_translation};
use vmsim::memory::BackingStore;
use vmsim::translation::{EvictionPolicy, VmConfig, VmContext, translate};

/// Simulate the address-translation path of a demand-paged virtual memory
/// manager
#[derive(Parser)]
#[command(name = "vmsim", version, about, long_about = None)]
struct Cli {
    /// File containing logical addresses, one per line
    addresses: PathBuf,

    /// Backing store image, read-only, indexed by page number
    #[arg(long, default_value = "BACKING_STORE.bin")]
    backing_store: PathBuf,

    /// Write per-address records and the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of TLB entries
    #[arg(long, default_value_t = TLB_CAPACITY)]
    tlb_capacity: usize,

    /// Number of physical frames
    #[arg(long, default_value_t = NUM_FRAMES)]
    frames: usize,

    /// Reclaim the oldest resident frame when physical memory fills,
    /// instead of failing the fault
    #[arg(long)]
    evict_frames: bool,

    /// Print per-address hit/fault detail on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = VmConfig {
        tlb_capacity: cli.tlb_capacity,
        num_frames: cli.frames,
        eviction: if cli.evict_frames {
            EvictionPolicy::Fifo
        } else {
            EvictionPolicy::Fail
        },
    };

    let addresses = read_logical_addresses(&cli.addresses)?;
    let mut store = BackingStore::open(&cli.backing_store)?;
    let mut ctx = VmContext::new(&config);

    if cli.verbose {
        eprintln!("=== vmsim ===");
        eprintln!("Address trace:   {}", cli.addresses.display());
        eprintln!("Backing store:   {}", cli.backing_store.display());
        eprintln!("TLB capacity:    {}", config.tlb_capacity);
        eprintln!("Physical frames: {}", config.num_frames);
        eprintln!(
            "Capacity policy: {}",
            match config.eviction {
                EvictionPolicy::Fail => "fail when full",
                EvictionPolicy::Fifo => "FIFO frame eviction",
            }
        );
        eprintln!("Addresses to translate: {}", addresses.len());
        eprintln!();
    }

    let mut out: BufWriter<Box<dyn Write>> = match &cli.output {
        Some(path) => BufWriter::new(Box::new(File::create(path)?)),
        None => BufWriter::new(Box::new(io::stdout())),
    };

    for &raw in &addresses {
        let t = translate(raw, &mut ctx, &mut store)?;

        if cli.verbose {
            let marker = if t.tlb_hit {
                " [TLB hit]"
            } else if t.page_fault {
                " [page fault]"
            } else {
                ""
            };
            eprintln!(
                "LA({}) = (page={}, offset={}) -> PA {}{}",
                t.logical, t.page, t.offset, t.physical, marker
            );
        }

        write_translation(&mut out, &t)?;
    }

    write_report(&mut out, ctx.stats())?;
    out.flush()?;

    if cli.verbose {
        eprintln!();
        eprintln!("=== Summary ===");
        eprintln!("Translated: {}", ctx.stats().translated);
        eprintln!("Page faults: {}", ctx.stats().page_faults);
        eprintln!("TLB hits: {}", ctx.stats().tlb_hits);
    }

    Ok(())
}
