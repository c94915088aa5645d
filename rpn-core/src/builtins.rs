use crate::compat::Vec;
use crate::primitives::{BinaryOp, Constant, UnaryOp};
use serde::Serialize;

// Commands that act on the session (stack, pending input, undo log)
// rather than computing an arithmetic result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackCommand {
    Clear,
    Swap,
    Undo,
    Backspace,
    ToggleSign,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Constant(Constant),
    Command(StackCommand),
}

// Dictionary entry: canonical name, accepted aliases and help text
#[derive(Debug, Clone, Copy)]
pub struct DictEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub word: Word,
    pub doc: &'static str,
}

impl DictEntry {
    fn matches(&self, token: &str) -> bool {
        if self.name == token || self.aliases.iter().any(|alias| *alias == token) {
            return true;
        }
        // Constants are recognized in any case ("PI", "E")
        matches!(self.word, Word::Constant(_)) && self.name.eq_ignore_ascii_case(token)
    }
}

const fn entry(
    name: &'static str,
    aliases: &'static [&'static str],
    word: Word,
    doc: &'static str,
) -> DictEntry {
    DictEntry {
        name,
        aliases,
        word,
        doc,
    }
}

// RUST CONCEPT: A static table instead of a runtime dictionary
// The word set is fixed, so classification is a lookup in this array and
// never needs an interpreter instance
pub static DICTIONARY: [DictEntry; 21] = [
    // Binary operators
    entry("+", &[], Word::Binary(BinaryOp::Add),
        "Add two numbers.\nUsage: a b + => a+b\nExample: 3 4 + => 7"),
    entry("-", &[], Word::Binary(BinaryOp::Sub),
        "Subtract the top value from the one below it.\nUsage: a b - => a-b\nExample: 10 3 - => 7"),
    entry("*", &[], Word::Binary(BinaryOp::Mul),
        "Multiply two numbers.\nUsage: a b * => a*b\nExample: 6 7 * => 42"),
    entry("/", &[], Word::Binary(BinaryOp::Div),
        "Divide two numbers. Fails on a zero divisor.\nUsage: a b / => a/b\nExample: 8 2 / => 4"),
    entry("pow", &["^"], Word::Binary(BinaryOp::Pow),
        "Raise a to the power b.\nUsage: a b pow => a^b\nExample: 2 3 pow => 8"),
    entry("%", &[], Word::Binary(BinaryOp::Mod),
        "Remainder; the sign follows the dividend. Fails on a zero divisor.\nUsage: a b % => remainder\nExample: 13 5 % => 3"),

    // Unary functions
    entry("sqrt", &[], Word::Unary(UnaryOp::Sqrt),
        "Square root. Fails on negative input.\nUsage: n sqrt\nExample: 9 sqrt => 3"),
    entry("sin", &[], Word::Unary(UnaryOp::Sin),
        "Sine of an angle in degrees.\nUsage: deg sin\nExample: 90 sin => 1"),
    entry("cos", &[], Word::Unary(UnaryOp::Cos),
        "Cosine of an angle in degrees.\nUsage: deg cos\nExample: 0 cos => 1"),
    entry("tan", &[], Word::Unary(UnaryOp::Tan),
        "Tangent of an angle in degrees.\nUsage: deg tan\nExample: 45 tan => 1"),
    entry("log", &[], Word::Unary(UnaryOp::Log),
        "Base 10 logarithm. Fails on zero or negative input.\nUsage: n log\nExample: 1000 log => 3"),
    entry("ln", &[], Word::Unary(UnaryOp::Ln),
        "Natural logarithm. Fails on zero or negative input.\nUsage: n ln\nExample: e ln => 1"),
    entry("!", &[], Word::Unary(UnaryOp::Factorial),
        "Factorial of an integer from 0 to 170.\nUsage: n !\nExample: 5 ! => 120"),

    // Constants
    entry("pi", &[], Word::Constant(Constant::Pi),
        "Push pi.\nUsage: pi\nExample: pi 2 * => 6.283185307179586"),
    entry("e", &[], Word::Constant(Constant::E),
        "Push Euler's number.\nUsage: e\nExample: e 1 + => 3.718281828459045"),

    // Stack commands
    entry("clear", &[], Word::Command(StackCommand::Clear),
        "Empty the stack and the pending input. Undoable.\nUsage: clear"),
    entry("swap", &[], Word::Command(StackCommand::Swap),
        "Exchange the top two stack values.\nUsage: a b swap => b a"),
    entry("undo", &[], Word::Command(StackCommand::Undo),
        "Restore the stack as it was before the last change.\nUsage: undo"),
    entry("backspace", &[], Word::Command(StackCommand::Backspace),
        "Delete the last character of the pending input.\nUsage: backspace"),
    entry("toggle-sign", &["+/-"], Word::Command(StackCommand::ToggleSign),
        "Negate the pending input, or the top of the stack when nothing is pending.\nUsage: toggle-sign"),
    entry("enter", &[], Word::Command(StackCommand::Enter),
        "Push the pending input onto the stack.\nUsage: 42 enter"),
];

pub fn lookup(token: &str) -> Option<&'static DictEntry> {
    DICTIONARY.iter().find(|entry| entry.matches(token))
}

pub fn words() -> impl Iterator<Item = &'static DictEntry> {
    DICTIONARY.iter()
}

/// The three catalogs of arithmetic words, as reported to front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub basic_operators: Vec<&'static str>,
    pub functions: Vec<&'static str>,
    pub constants: Vec<&'static str>,
}

pub fn supported_operations() -> Capabilities {
    let mut caps = Capabilities {
        basic_operators: Vec::new(),
        functions: Vec::new(),
        constants: Vec::new(),
    };

    for entry in words() {
        match entry.word {
            Word::Binary(_) => caps.basic_operators.push(entry.name),
            Word::Unary(_) => caps.functions.push(entry.name),
            Word::Constant(_) => caps.constants.push(entry.name),
            Word::Command(_) => {}
        }
    }

    caps
}
