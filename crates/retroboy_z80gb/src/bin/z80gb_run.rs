use std::path::PathBuf;

use anyhow::{bail, Context};
use retroboy_z80gb::{Cpu, FlatBus, Reg, CYCLES_PER_FRAME};

const USAGE: &str = "Usage: z80gb_run <rom_path> [cycles] [--serial]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut rom_path: Option<PathBuf> = None;
    let mut budget: u64 = 60 * CYCLES_PER_FRAME as u64;
    let mut show_serial = false;
    let mut budget_seen = false;

    for arg in std::env::args().skip(1) {
        if arg == "--serial" {
            show_serial = true;
        } else if rom_path.is_none() {
            rom_path = Some(PathBuf::from(arg));
        } else if !budget_seen {
            budget = arg
                .parse()
                .with_context(|| format!("Invalid cycle count '{arg}'"))?;
            budget_seen = true;
        } else {
            bail!("{USAGE}");
        }
    }
    let Some(rom_path) = rom_path else {
        bail!("{USAGE}");
    };

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("Failed to read ROM '{}'", rom_path.display()))?;

    let mut bus = FlatBus::new();
    bus.load_rom(&rom);
    let mut cpu = Cpu::new();

    let mut consumed: u64 = 0;
    while consumed < budget {
        let slice = (budget - consumed).min(CYCLES_PER_FRAME as u64) as u32;
        consumed += cpu.run(&mut bus, slice);
    }
    log::info!("Ran {consumed} cycles ({budget} requested)");

    for reg in Reg::ALL {
        println!("{reg:>3} = 0x{:04X}", cpu.get_register(reg));
    }
    println!("cycles = {}", cpu.total_cycles());

    if show_serial {
        println!("{}", String::from_utf8_lossy(bus.serial_output()));
    }
    Ok(())
}
