use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;

use chp8::display::TermDisplay;
use chp8::input::KeyState;
use chp8::sound::{Buzzer, Mute, Sound};
use chp8::{Machine, NoKeys, Quirks};

/// frames per second of the interactive loop, and the default step rate
const FRAME_RATE: u32 = 60;

/// Terminal CHIP-8 emulator
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// ROM to load at 0x200
    rom: PathBuf,

    /// instruction steps per second
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// run N steps headless, dump machine state and exit
    #[arg(long, value_name = "N")]
    steps: Option<u64>,

    /// seed the random source for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// 8XY6/8XYE shift Vy into Vx, as on the COSMAC VIP
    #[arg(long)]
    quirk_shift: bool,

    /// BNNN jumps to nnn + Vx instead of nnn + V0
    #[arg(long)]
    quirk_jump: bool,

    /// FX55/FX65 leave I pointing past the last byte copied
    #[arg(long)]
    quirk_memory: bool,

    /// drive the PC speaker while the sound timer runs
    #[arg(long)]
    sound: bool,
}

fn main() {
    let args = Args::parse();
    let result = match args.steps {
        Some(steps) => run_headless(&args, steps),
        None => run_interactive(&args),
    };
    if let Err(err) = result {
        eprintln!("chp8: {}", err);
        process::exit(1);
    }
}

fn build_machine(args: &Args) -> Result<Machine, Box<dyn Error>> {
    let mut machine = Machine::with_quirks(Quirks {
        shift_reads_vy: args.quirk_shift,
        jump_reads_vx: args.quirk_jump,
        load_store_bumps_i: args.quirk_memory,
    });
    if let Some(seed) = args.seed {
        machine.seed(seed);
    }
    let mut rom = File::open(&args.rom).map_err(|e| format!("{}: {}", args.rom.display(), e))?;
    machine.load_rom(&mut rom)?;
    Ok(machine)
}

/// step without a terminal, then dump state for scripted inspection
fn run_headless(args: &Args, steps: u64) -> Result<(), Box<dyn Error>> {
    let mut machine = build_machine(args)?;
    for _ in 0..steps {
        machine.step(&NoKeys)?;
    }
    print_state(&machine);
    Ok(())
}

fn print_state(machine: &Machine) {
    println!(
        "PC {:#06X}  I {:#06X}  SP {}  DT {}  ST {}",
        machine.program_counter(),
        machine.i_register(),
        machine.stack().len(),
        machine.delay_timer(),
        machine.sound_timer(),
    );
    for (n, value) in machine.v_registers().iter().enumerate() {
        println!("V{:X} {:#04X}", n, value);
    }
}

/// the interactive loop: pump input, step, redraw, sleep out the frame
fn run_interactive(args: &Args) -> Result<(), Box<dyn Error>> {
    // the ROM is read before the terminal changes state, so load errors
    // print on a sane screen
    let mut machine = build_machine(args)?;
    let steps_per_frame = (args.hz / FRAME_RATE).max(1);
    let frame = Duration::from_secs(1) / FRAME_RATE;

    let mut display = TermDisplay::new()?;
    let mut input = KeyState::new();
    let mut sound: Box<dyn Sound> = if args.sound {
        Box::new(Buzzer::new())
    } else {
        Box::new(Mute)
    };

    loop {
        let frame_start = Instant::now();
        if input.pump()? {
            break;
        }
        for _ in 0..steps_per_frame {
            machine.step(&input)?;
        }
        display.draw(machine.framebuffer())?;
        sound.update(machine.sound_timer() > 0)?;
        let spent = frame_start.elapsed();
        if spent < frame {
            spin_sleep::sleep(frame - spent);
        }
    }
    Ok(())
}
