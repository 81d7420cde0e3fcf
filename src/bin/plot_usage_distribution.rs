use std::process::ExitCode;

use gc_plots::{run_program, Program};

fn main() -> ExitCode {
    run_program(Program::UsageDistribution)
}
