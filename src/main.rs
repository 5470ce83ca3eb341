use clap::Parser;
use std::{
	fs::File,
	io::{self, BufReader},
	path::PathBuf,
	process,
};
use thompson::{Interpreter, InterpreterError};

/// Builds finite automata from postfix commands and answers queries about them.
#[derive(Debug, Parser)]
#[command(version)]
struct Opts {
	/// Command file. Standard input is read when omitted.
	file: Option<PathBuf>,
}

fn run(opts: Opts) -> Result<(), InterpreterError> {
	let stdout = io::stdout();
	let mut out = stdout.lock();
	let mut interpreter = Interpreter::new();
	match opts.file {
		Some(path) => {
			let file = File::open(&path).map_err(|source| InterpreterError::Open {
				path: path.clone(),
				source,
			})?;
			interpreter.run(BufReader::new(file), &mut out)
		}
		None => interpreter.run(io::stdin().lock(), &mut out),
	}
}

fn main() {
	if let Err(err) = run(Opts::parse()) {
		eprintln!("{}", err);
		process::exit(1);
	}
}
