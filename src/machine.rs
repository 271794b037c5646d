use crate::fault::Fault;
use crate::memory::{Byte, StdMem};
use crate::output::Output;
use crate::processor::{Processor, Step};
use log::*;

/// Lifecycle of a [`Machine`]. `Halted` and `Faulted` are terminal until the
/// next [`Machine::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No program loaded yet
    Idle,
    Running,
    Halted,
    Faulted(Fault),
}

/// A complete LS8: CPU, memory and the sink its output goes to
#[derive(Debug)]
pub struct Machine<O: Output> {
    processor: Processor,
    memory: StdMem,
    state: State,
    output: O,
    steps: u64,
}

impl<O: Output> Machine<O> {
    pub fn new(output: O) -> Self {
        Self {
            processor: Processor::default(),
            memory: StdMem::default(),
            state: State::Idle,
            output,
            steps: 0,
        }
    }

    /// Resets the machine and copies `program` to address 0
    pub fn load(&mut self, program: &[Byte]) -> Result<(), Fault> {
        self.processor = Processor::default();
        self.memory = StdMem::default();
        self.steps = 0;

        if program.len() > self.memory.capacity() {
            return Err(self.fault(Fault::ProgramTooLarge {
                size: program.len(),
                capacity: self.memory.capacity(),
            }));
        }

        if let Err(fault) = self.memory.write_array(0x00, program) {
            return Err(self.fault(fault));
        }

        debug!("Loaded program of {} bytes", program.len());
        self.state = State::Running;

        Ok(())
    }

    /// Executes one instruction. Does nothing unless the machine is running.
    pub fn step(&mut self) -> &State {
        if self.state != State::Running {
            return &self.state;
        }

        if log_enabled!(Level::Trace) {
            trace!("{}", self.processor.trace(&self.memory));
        }

        let pc = self.processor.pc;
        self.steps += 1;

        match self
            .processor
            .execute(&mut self.memory, &mut self.output)
        {
            Ok(Step::Continue) => {}
            Ok(Step::Halt) => {
                info!("Program halted after {} steps", self.steps);
                self.state = State::Halted;
            }
            Err(fault) => {
                warn!("Fault at 0x{:02X}: {}", pc, fault);
                self.state = State::Faulted(fault);
            }
        }

        &self.state
    }

    /// Runs the program until it halts or faults
    pub fn run(&mut self) -> Result<(), Fault> {
        if self.state == State::Idle {
            warn!("Nothing to run, no program loaded");
        }

        while self.state == State::Running {
            self.step();
        }

        self.result()
    }

    /// Runs at most `max_steps` instructions. Returns whether the program
    /// halted within that budget.
    pub fn run_limited(&mut self, max_steps: u64) -> Result<bool, Fault> {
        for _ in 0..max_steps {
            if self.state != State::Running {
                break;
            }
            self.step();
        }

        self.result()?;

        if self.state == State::Running {
            warn!("Step limit of {} reached", max_steps);
        }

        Ok(self.state == State::Halted)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    pub fn memory(&self) -> &StdMem {
        &self.memory
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Number of instructions executed since the last load
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn fault(&mut self, fault: Fault) -> Fault {
        warn!("{}", fault);
        self.state = State::Faulted(fault);
        fault
    }

    fn result(&self) -> Result<(), Fault> {
        match self.state {
            State::Faulted(fault) => Err(fault),
            _ => Ok(()),
        }
    }
}
