use std::fs;
use std::path::PathBuf;

use argh::FromArgs;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ls8::machine::Machine;
use ls8::memory::parse::parse_program;
use ls8::output::{Output, Stdout};

/// Runs an LS8 program.
#[derive(FromArgs)]
struct Arguments {
    /// the `.ls8` program to run
    #[argh(positional)]
    program: PathBuf,

    /// log the CPU state before every instruction
    #[argh(switch, short = 't')]
    trace: bool,

    /// stop after this many instructions and fail
    /// if not specified, the program runs until it halts
    #[argh(option, short = 'n')]
    max_steps: Option<u64>,

    /// print the memory contents once the program stopped
    #[argh(switch, short = 'd')]
    dump: bool,
}

/// Parses and runs `source`. The machine is handed back even when the run
/// failed so the caller can still inspect it.
fn run_source<O: Output>(
    args: &Arguments,
    source: &str,
    output: O,
) -> Result<(Machine<O>, Result<()>)> {
    let program = parse_program(source)
        .wrap_err_with(|| format!("Failed to parse `{}`", args.program.display()))?;

    let mut machine = Machine::new(output);
    machine.load(&program)?;

    let result = match args.max_steps {
        Some(max_steps) => match machine.run_limited(max_steps) {
            Ok(true) => Ok(()),
            Ok(false) => Err(eyre!("Program did not halt within {} steps", max_steps)),
            Err(fault) => Err(fault.into()),
        },
        None => machine.run().map_err(Into::into),
    };
    let steps = machine.steps();

    Ok((
        machine,
        result.wrap_err_with(|| format!("Program stopped after {} steps", steps)),
    ))
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling

    let args: Arguments = argh::from_env();

    let level = if args.trace {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .wrap_err("Failed to initialize logging")?;

    let source = fs::read_to_string(&args.program)
        .wrap_err_with(|| format!("Failed to read `{}`", args.program.display()))?;

    let (machine, result) = run_source(&args, &source, Stdout)?;

    if args.dump {
        eprint!("{}", machine.memory().dump());
    }

    result
}

#[cfg(test)]
mod tests {
    use ls8::fault::Fault;
    use ls8::machine::State;
    use ls8::output::Emitted;

    use super::*;

    fn arguments(args: &[&str]) -> Arguments {
        match Arguments::from_args(&["ls8"], args) {
            Ok(args) => args,
            Err(exit) => panic!("bad arguments: {}", exit.output),
        }
    }

    #[test]
    fn test_parse_arguments() {
        let args = arguments(&["prog.ls8", "-t", "--max-steps", "5", "-d"]);

        assert_eq!(args.program, PathBuf::from("prog.ls8"));
        assert!(args.trace);
        assert_eq!(args.max_steps, Some(5));
        assert!(args.dump);

        let args = arguments(&["prog.ls8"]);
        assert!(!args.trace);
        assert_eq!(args.max_steps, None);
    }

    #[test]
    fn test_run_until_halt() -> Result<()> {
        let args = arguments(&["print8.ls8"]);
        let (machine, result) = run_source(
            &args,
            include_str!("../demos/programs/print8.ls8"),
            Vec::<Emitted>::new(),
        )?;

        result?;
        assert_eq!(machine.output(), &vec![Emitted::Decimal(8)]);

        Ok(())
    }

    #[test]
    fn test_step_budget_exhausted_fails() -> Result<()> {
        let args = arguments(&["slide.ls8", "--max-steps", "5"]);
        let (machine, result) = run_source(
            &args,
            "NOP NOP NOP NOP NOP NOP HLT",
            Vec::<Emitted>::new(),
        )?;

        let err = result.unwrap_err();
        assert!(err
            .chain()
            .any(|cause| cause.to_string() == "Program did not halt within 5 steps"));
        assert_eq!(machine.state(), &State::Running);
        assert_eq!(machine.steps(), 5);

        Ok(())
    }

    #[test]
    fn test_step_budget_large_enough() -> Result<()> {
        let args = arguments(&["slide.ls8", "-n", "7"]);
        let (machine, result) = run_source(
            &args,
            "NOP NOP NOP NOP NOP NOP HLT",
            Vec::<Emitted>::new(),
        )?;

        result?;
        assert_eq!(machine.state(), &State::Halted);

        Ok(())
    }

    #[test]
    fn test_fault_is_reported() -> Result<()> {
        let args = arguments(&["divzero.ls8"]);
        let (_, result) = run_source(
            &args,
            include_str!("../demos/programs/divzero.ls8"),
            Vec::<Emitted>::new(),
        )?;

        let err = result.unwrap_err();
        assert!(err
            .chain()
            .any(|cause| cause.downcast_ref::<Fault>() == Some(&Fault::DivisionByZero)));

        Ok(())
    }

    #[test]
    fn test_parse_error_is_reported() {
        let args = arguments(&["bad.ls8"]);
        let err = run_source(&args, "LDI R9", Vec::<Emitted>::new())
            .err()
            .expect("parse should fail");

        assert_eq!(err.to_string(), "Failed to parse `bad.ls8`");
    }
}
