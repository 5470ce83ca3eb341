mod automaton;
mod dfa;
mod interpreter;
mod label;
mod nfa;
mod state;
mod words;


pub use automaton::{Automaton, AutomatonError, Stats};
pub use dfa::DFA;
pub use interpreter::{Flow, Interpreter, InterpreterError, Machine};
pub use label::{Label, EPSILON};
pub use nfa::NFA;
pub use state::{State, StateAllocator};
