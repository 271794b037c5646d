use color_eyre::eyre::Result;

use ls8::machine::Machine;
use ls8::memory::StdMem;
use ls8::output::Stdout;
use ls8::write_instructions;
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init()?; // logging

    let mut mem = StdMem::default();

    use ls8::processor::Instruction::*;
    write_instructions!(mem : 0x00 =>
        LDI,
        0,
        8,
        PRN,
        0,
        HLT
    )?;

    let mut machine = Machine::new(Stdout);
    machine.load(&mem)?;
    machine.run()?;

    Ok(())
}
