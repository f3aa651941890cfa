//! Profile command implementation.

use progbreed::corpus;
use progbreed::gp::{FrequencyProfile, MIN_CORPUS_PROGRAMS, RelativizedProfile};
use progbreed::TypeTable;

use super::CliError;

/// Execute the profile command.
pub(crate) fn execute(relativized: bool) -> Result<(), CliError> {
    let table = TypeTable::new();
    let programs = corpus::programs()?;
    println!(
        "Corpus: {} programs (small-corpus smoothing below {MIN_CORPUS_PROGRAMS})",
        programs.len()
    );
    println!();

    if relativized {
        println!("{}", RelativizedProfile::from_programs(&table, &programs));
    } else {
        println!("{}", FrequencyProfile::from_programs(&table, &programs, true));
    }

    Ok(())
}
