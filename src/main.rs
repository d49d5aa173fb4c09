//! catnes - step the 6502 core through an iNES ROM from the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use catnes::cpu::disassemble;
use catnes::{Bus, Cartridge, Cpu, CpuConfig, Error, IllegalOpcodePolicy, Nrom};

/// CatNES 6502 core runner
#[derive(Parser, Debug)]
#[command(name = "catnes", version)]
#[command(about = "Load an iNES ROM and step the 6502 CPU core", long_about = None)]
struct Args {
    /// Path to the iNES ROM file (a built-in demo cartridge runs when omitted)
    rom: Option<PathBuf>,

    /// Number of CPU steps to run
    #[arg(short, long, default_value_t = 16)]
    steps: usize,

    /// What to do on undocumented opcodes: fault or nop
    #[arg(long, default_value_t = IllegalOpcodePolicy::Fault)]
    illegal: IllegalOpcodePolicy,

    /// Honour the D flag in ADC/SBC (NMOS BCD arithmetic)
    #[arg(long)]
    decimal: bool,

    /// Log a trace line before every instruction
    #[arg(short, long)]
    trace: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.trace {
        logger.filter_level(LevelFilter::Trace);
    }
    logger.init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.kind());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let (name, cartridge) = match &args.rom {
        Some(path) => (display_name(path), Cartridge::from_ines_file(path)?),
        None => (
            "demo cartridge".to_string(),
            Cartridge::from_ines_bytes(&demo_ines())?,
        ),
    };

    println!("Loaded: {name}");
    println!("PRG: {} KB", cartridge.prg_rom().len() / 1024);
    let first: Vec<String> = cartridge
        .prg_rom()
        .iter()
        .take(16)
        .map(|b| format!("${b:02X}"))
        .collect();
    println!("First 16 PRG bytes:");
    println!("{}", first.join(" "));

    let config = CpuConfig::default()
        .with_illegal_opcodes(args.illegal)
        .with_decimal_mode(args.decimal);
    let mut bus = Bus::with_cartridge(Box::new(Nrom::new(cartridge)?));
    let mut cpu = Cpu::with_config(config);
    cpu.reset(&mut bus);

    for _ in 0..args.steps {
        let pc = cpu.pc();
        let opcode = bus.peek(pc);
        let (text, _) = disassemble(&bus, pc);
        let state = cpu.step(&mut bus)?;
        println!(
            "Stepped CPU! PC=${:04X} OPCODE=${opcode:02X} | Cycles={}",
            state.pc, state.cycles
        );
        println!("    ${pc:04X}  {text}");
    }

    println!("{}", cpu.state());
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Small NROM-128 image: count X up to zero, store the sum, then BRK into
/// an IRQ handler that loops forever.
fn demo_ines() -> Vec<u8> {
    let mut rom = Vec::with_capacity(16 + 16 * 1024 + 8 * 1024);
    rom.extend_from_slice(b"NES\x1A");
    rom.push(1); // 1 x 16KB PRG
    rom.push(1); // 1 x 8KB CHR
    rom.push(0); // flags6
    rom.push(0); // flags7
    rom.extend_from_slice(&[0u8; 8]);

    let mut prg = vec![0xEAu8; 16 * 1024];
    let program: &[u8] = &[
        0xA9, 0x10, // LDA #$10
        0x69, 0x05, // ADC #$05 => A = 0x15
        0x8D, 0x00, 0x02, // STA $0200
        0xA2, 0xFC, // LDX #$FC
        0xE8, // INX
        0xD0, 0xFD, // BNE -3
        0x00, 0xEA, // BRK (padding byte)
    ];
    prg[..program.len()].copy_from_slice(program);
    // IRQ/BRK handler at $8100: JMP $8100
    prg[0x100..0x103].copy_from_slice(&[0x4C, 0x00, 0x81]);

    // NMI, RESET, IRQ/BRK vectors
    prg[0x3FFA..0x4000].copy_from_slice(&[0x00, 0x81, 0x00, 0x80, 0x00, 0x81]);

    rom.extend_from_slice(&prg);
    rom.extend(std::iter::repeat_n(0u8, 8 * 1024));
    rom
}
