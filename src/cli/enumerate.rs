//! Enumerate command implementation.

use progbreed::gp::{TreeEnumerator, count_trees};
use progbreed::{NodeClass, TypeTable};

use super::CliError;

/// Execute the enumerate command.
pub(crate) fn execute(class: NodeClass, depth: usize, limit: usize) -> Result<(), CliError> {
    let table = TypeTable::new();
    let total = count_trees(&table, class, depth);
    println!("{total} {class} trees of depth {depth}");
    if total == u64::MAX {
        println!("(count saturated)");
    }
    println!();

    for (index, subtree) in TreeEnumerator::new(&table, class, depth)
        .take(limit)
        .enumerate()
    {
        let source = subtree.tree.render(subtree.root);
        if class == NodeClass::Directive {
            println!("--- #{index}");
            println!("{source}");
        } else {
            println!("{index:>6}  {source}");
        }
    }

    Ok(())
}
