use color_eyre::eyre::Result;

use ls8::machine::Machine;
use ls8::memory::parse::parse_program;
use ls8::output::Stdout;
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().with_level(LevelFilter::Trace).init()?; // logging

    let program = parse_program(include_str!("programs/mult.ls8"))?;

    let mut machine = Machine::new(Stdout);
    machine.load(&program)?;
    machine.run()?;

    Ok(())
}
