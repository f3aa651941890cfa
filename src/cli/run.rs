//! Run command implementation.

use serde::Serialize;

use progbreed::corpus::CorpusProgram;
use progbreed::{Interpreter, InterpreterConfig};

use super::{CliError, OutputFormat, ProgramArg};

#[derive(Serialize)]
struct RunOutput<'a> {
    program: CorpusProgram,
    inputs: &'a [i32],
    output: i32,
    steps: u64,
    out_of_fuel: bool,
}

/// Execute the run command.
pub(crate) fn execute(
    program: ProgramArg,
    inputs: &[i32],
    format: OutputFormat,
) -> Result<(), CliError> {
    let which = CorpusProgram::from(program);
    let built = which.build()?;

    let mut interpreter = Interpreter::new(InterpreterConfig::default());
    interpreter.set_inputs(inputs);
    let report = built.execute(&mut interpreter);
    let output = interpreter.output(0);

    match format {
        OutputFormat::Text => {
            println!("{built}");
            println!();
            println!("output[0] = {output}");
            println!(
                "{} directives executed{}",
                report.steps,
                if report.out_of_fuel { " (out of fuel)" } else { "" }
            );
        }
        OutputFormat::Json => {
            let out = RunOutput {
                program: which,
                inputs,
                output,
                steps: report.steps,
                out_of_fuel: report.out_of_fuel,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
