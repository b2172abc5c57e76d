//! Console rendering of the menu, status listing and leak report.

use std::io::{self, Write};

use memsim_core::{Block, BlockSource, LeakReport, Registry};

pub fn write_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- Memory Management Simulator ---")?;
    writeln!(out, "1. Allocate memory")?;
    writeln!(out, "2. Free memory")?;
    writeln!(out, "3. Display memory status")?;
    writeln!(out, "4. Exit")
}

fn write_block<W: Write>(out: &mut W, index: usize, block: &Block) -> io::Result<()> {
    writeln!(
        out,
        "Block {} -> Address: {}, Size: {} bytes",
        index, block.handle, block.size
    )
}

pub fn write_status<W: Write, S: BlockSource>(
    out: &mut W,
    registry: &Registry<S>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- Memory Status ---")?;
    writeln!(
        out,
        "Total allocated memory: {} bytes",
        registry.total_allocated()
    )?;
    writeln!(out, "Number of active blocks: {}", registry.len())?;
    for (index, block) in registry.list() {
        write_block(out, index, block)?;
    }
    writeln!(out, "---------------------")
}

pub fn write_leak_report<W: Write>(out: &mut W, report: &LeakReport) -> io::Result<()> {
    writeln!(out)?;
    if report.is_clean() {
        return writeln!(
            out,
            "No memory leaks detected. All memory was freed successfully."
        );
    }

    writeln!(out, "--- Memory Leaks Detected ---")?;
    writeln!(out, "Unfreed blocks: {}", report.blocks.len())?;
    for (index, block) in report.blocks.iter().enumerate() {
        write_block(out, index, block)?;
    }
    writeln!(out, "---------------------------")
}
