//! RISC-V machine emulator CLI.
//!
//! Loads a firmware image and a device-tree blob into the machine and drives
//! the execution loop against the controlling terminal. It performs:
//! 1. **Startup:** Argument parsing, logging init, and image loading — all
//!    fallible work happens before the terminal is touched.
//! 2. **Terminal:** Acquires raw mode for the primary UART bridge; the mode
//!    is restored on every exit path.
//! 3. **Run:** Steps the machine until the optional instruction bound is
//!    reached, then exits with success.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rvmach_core::console::{Console, RawTerminal};
use rvmach_core::sim::{load_image, Runner};
use rvmach_core::soc::devices::NullChannel;
use rvmach_core::{Hart, Machine, MachineConfig};

#[derive(Parser, Debug)]
#[command(
    name = "rvmach",
    version,
    about = "Small RISC-V machine emulator",
    long_about = "Runs a firmware image against an emulated RISC-V machine \
                  (RAM, CLINT, PLIC, two UARTs) with the primary UART bridged \
                  to this terminal.\n\nExample:\n  rvmach fw.bin machine.dtb\n  \
                  rvmach fw.bin machine.dtb 1000000"
)]
struct Cli {
    /// Firmware image, copied verbatim to the start of RAM.
    firmware: PathBuf,

    /// Device-tree blob, copied to the fixed offset within RAM.
    device_tree: PathBuf,

    /// Number of instructions to execute before exiting (runs forever when
    /// omitted; useful for reproducible runs with terminal input).
    instruction_count: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let firmware = load_image(&cli.firmware).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let dtb = load_image(&cli.device_tree).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let terminal = RawTerminal::new().unwrap_or_else(|e| {
        eprintln!("unable to configure the terminal: {e}");
        process::exit(1);
    });

    let config = MachineConfig::default();
    let mut machine = Machine::new(
        &config,
        Box::new(Console::new(terminal)),
        Box::new(NullChannel),
    );
    let _ = machine.load_firmware(&firmware);
    let _ = machine.load_dtb(&dtb);

    let mut runner = Runner::new(Hart::new(), machine, cli.instruction_count);
    runner.run();

    let executed = runner.executed();
    // Dropping the runner drops the console bridge and restores the
    // terminal before anything else is printed.
    drop(runner);
    info!(executed, "run finished");
}
