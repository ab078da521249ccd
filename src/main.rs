use std::io::{self, BufRead};

use schemin::Interpreter;

// Evaluates the expression given on the command line, or each line read
// from stdin when no arguments are given.
fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let interpreter = Interpreter::new();

    if !args.is_empty() {
        let input = args.join(" ");
        match interpreter.run(&input) {
            Ok(result) => println!("{}", result),
            Err(error) => {
                error.pretty_print(&input);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match interpreter.run(input) {
            Ok(result) => println!("{}", result),
            Err(error) => error.pretty_print(input),
        }
    }
    Ok(())
}
