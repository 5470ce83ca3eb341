//! Postfix stack machine driving the automaton operators from text input.

use crate::{Automaton, DFA, NFA, StateAllocator, Stats, EPSILON};
use std::{
	fmt,
	io::{self, BufRead, Write},
	path::PathBuf,
};
use thiserror::Error;

/// Enum representing an interpreter error.
#[derive(Debug, Error)]
pub enum InterpreterError {
	#[error("\"{word}\" needs {needed} automata on the stack")]
	StackUnderflow { word: String, needed: usize },
	#[error("Failed to open \"{}\": {source}", .path.display())]
	Open { path: PathBuf, source: io::Error },
	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Whether interpretation continues after a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Done,
}

/// An automaton on the interpreter stack.
#[derive(Debug)]
pub enum Machine {
	NFA(NFA),
	DFA(DFA),
}

impl Machine {
	fn into_nfa(self) -> NFA {
		match self {
			Self::NFA(nfa) => nfa,
			Self::DFA(dfa) => dfa.into_nfa(),
		}
	}

	fn into_dfa(self) -> DFA {
		match self {
			Self::NFA(nfa) => nfa.to_dfa(),
			Self::DFA(dfa) => dfa,
		}
	}

	/// Runs `f` on the DFA of this machine, determinizing an NFA on the fly.
	/// The temporary DFA takes its states from a private allocator.
	fn with_dfa<T, F: FnOnce(&DFA) -> T>(&self, f: F) -> T {
		match self {
			Self::NFA(nfa) => f(&nfa.to_dfa_with(&StateAllocator::new())),
			Self::DFA(dfa) => f(dfa),
		}
	}

	pub fn num_states(&self) -> usize {
		match self {
			Self::NFA(nfa) => nfa.num_states(),
			Self::DFA(dfa) => dfa.num_states(),
		}
	}

	pub fn stats(&self) -> Stats {
		match self {
			Self::NFA(nfa) => nfa.stats(),
			Self::DFA(dfa) => dfa.stats(),
		}
	}

	/// Checks whether the machine accepts `input`.
	pub fn accept(&self, input: &str) -> bool {
		self.with_dfa(|dfa| dfa.accept(input))
	}
}

impl fmt::Display for Machine {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::NFA(nfa) => fmt::Display::fmt(nfa, f),
			Self::DFA(dfa) => fmt::Display::fmt(dfa, f),
		}
	}
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
	Done,
	Size,
	Print,
	Stat,
	DFA,
	Complement,
	GenStr(usize),
	Test(&'a str),
	Symbol(char),
	Closure,
	Union,
	Concat,
	Unknown,
}

impl<'a> Command<'a> {
	/// Classifies a word. The flag reports a multi-character word that was
	/// read as the single operator or symbol it contains.
	fn parse(word: &'a str) -> (Self, bool) {
		let command = match word {
			"DONE" => Self::Done,
			"SIZE" => Self::Size,
			"PRINT" => Self::Print,
			"STAT" => Self::Stat,
			"DFA" => Self::DFA,
			"COMPLEMENT" => Self::Complement,
			_ => Self::Unknown,
		};
		if command != Self::Unknown {
			return (command, false);
		}

		if let Some(Ok(len)) = word.strip_prefix("GENSTR").map(str::parse::<usize>) {
			return (Self::GenStr(len), false);
		}
		if let Some(test) = quoted(word) {
			return (Self::Test(test), false);
		}

		let single = word.chars().count() == 1;
		if let Some(c) = word.chars().find(|&c| c.is_ascii_lowercase() || c == 'E') {
			return (Self::Symbol(c), !single);
		}
		for (op, command) in [('*', Self::Closure), ('|', Self::Union), ('.', Self::Concat)] {
			if word.contains(op) {
				return (command, !single);
			}
		}
		(Self::Unknown, false)
	}
}

/// Finds the first run of lowercase letters enclosed in double quotes.
fn quoted(word: &str) -> Option<&str> {
	word.match_indices('"').find_map(|(i, _)| {
		let rest = &word[i + 1..];
		let end = rest.find(|c: char| !c.is_ascii_lowercase())?;
		if rest[end..].starts_with('"') {
			Some(&rest[..end])
		} else {
			None
		}
	})
}

/// Stack machine interpreting postfix automaton commands.
#[derive(Debug, Default)]
pub struct Interpreter {
	ids: StateAllocator,
	stack: Vec<Machine>,
}

impl Interpreter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Current stack, bottom first.
	pub fn stack(&self) -> &[Machine] {
		&self.stack
	}

	/// Interprets every word of `input` until it is exhausted or `DONE` is read.
	pub fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), InterpreterError>
	where
		R: BufRead,
		W: Write,
	{
		for line in input.lines() {
			for word in line?.split_whitespace() {
				if self.execute(word, out)? == Flow::Done {
					return Ok(());
				}
			}
		}
		Ok(())
	}

	/// Interprets a single word.
	pub fn execute<W: Write>(&mut self, word: &str, out: &mut W) -> Result<Flow, InterpreterError> {
		let (command, illegal) = Command::parse(word);
		if illegal {
			writeln!(out, "Illegal syntax for: {}", word)?;
		}

		match command {
			Command::Done => return Ok(Flow::Done),
			Command::Size => writeln!(out, "{}", self.top(word)?.num_states())?,
			Command::Print => writeln!(out, "{}", self.top(word)?)?,
			Command::Stat => writeln!(out, "{}", self.top(word)?.stats())?,
			Command::DFA => {
				let dfa = self.pop(word, 1)?.into_dfa();
				self.stack.push(Machine::DFA(dfa));
			}
			Command::Complement => {
				let dfa = self.pop(word, 1)?.into_dfa();
				self.stack.push(Machine::DFA(dfa.complement()));
			}
			Command::GenStr(len) => {
				let words = self.top(word)?.with_dfa(|dfa| dfa.words(len));
				for accepted in words {
					write!(out, "\"{}\" ", accepted)?;
				}
				writeln!(out)?;
			}
			Command::Test(input) => {
				let verdict = if self.top(word)?.accept(input) {
					"Accept"
				} else {
					"Reject"
				};
				writeln!(out, "{} {}", verdict, input)?;
			}
			Command::Symbol(c) => {
				let nfa = if c == 'E' {
					NFA::literal(&self.ids, EPSILON)
				} else {
					NFA::literal(&self.ids, c)
				};
				self.stack.push(Machine::NFA(nfa));
			}
			Command::Closure => {
				let mut nfa = self.pop(word, 1)?.into_nfa();
				nfa.closure();
				self.stack.push(Machine::NFA(nfa));
			}
			Command::Union => {
				let (mut first, second) = self.pop_pair(word)?;
				first.union(second);
				self.stack.push(Machine::NFA(first));
			}
			Command::Concat => {
				let (mut first, second) = self.pop_pair(word)?;
				first.concat(second);
				self.stack.push(Machine::NFA(first));
			}
			Command::Unknown => writeln!(out, "Ignoring {}", word)?,
		}
		Ok(Flow::Continue)
	}

	fn top(&self, word: &str) -> Result<&Machine, InterpreterError> {
		self.stack.last().ok_or_else(|| underflow(word, 1))
	}

	fn pop(&mut self, word: &str, needed: usize) -> Result<Machine, InterpreterError> {
		self.stack.pop().ok_or_else(|| underflow(word, needed))
	}

	/// Pops the two topmost automata, returning the lower one first.
	fn pop_pair(&mut self, word: &str) -> Result<(NFA, NFA), InterpreterError> {
		if self.stack.len() < 2 {
			return Err(underflow(word, 2));
		}
		let second = self.pop(word, 2)?.into_nfa();
		let first = self.pop(word, 2)?.into_nfa();
		Ok((first, second))
	}
}

fn underflow(word: &str, needed: usize) -> InterpreterError {
	InterpreterError::StackUnderflow {
		word: word.to_owned(),
		needed,
	}
}
