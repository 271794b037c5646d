use color_eyre::eyre::Result;

use ls8::fault::Fault;
use ls8::machine::{Machine, State};
use ls8::memory::parse::parse_program;
use ls8::output::Emitted;

fn run(source: &str) -> Result<Machine<Vec<Emitted>>> {
    let program = parse_program(source)?;
    let mut machine = Machine::new(Vec::new());
    machine.load(&program)?;
    machine.run_limited(1_000)?;
    Ok(machine)
}

#[test]
fn test_print8() -> Result<()> {
    let machine = run(include_str!("../demos/programs/print8.ls8"))?;

    assert_eq!(machine.state(), &State::Halted);
    assert_eq!(machine.output(), &vec![Emitted::Decimal(8)]);

    Ok(())
}

#[test]
fn test_mult() -> Result<()> {
    let machine = run(include_str!("../demos/programs/mult.ls8"))?;

    assert_eq!(machine.state(), &State::Halted);
    assert_eq!(machine.output(), &vec![Emitted::Decimal(72)]);

    Ok(())
}

#[test]
fn test_hello() -> Result<()> {
    let machine = run(include_str!("../demos/programs/hello.ls8"))?;

    let text: String = machine.output().iter().map(|e| e.to_string()).collect();
    assert_eq!(text, "Hi!");
    assert_eq!(machine.memory()[0xF0..0xF3], *b"Hi!");

    Ok(())
}

#[test]
fn test_divzero() -> Result<()> {
    let program = parse_program(include_str!("../demos/programs/divzero.ls8"))?;
    let mut machine = Machine::new(Vec::<Emitted>::new());
    machine.load(&program)?;

    assert_eq!(machine.run(), Err(Fault::DivisionByZero));
    assert!(machine.output().is_empty());
    assert_eq!(machine.processor().registers.get(0)?, 10);

    Ok(())
}
