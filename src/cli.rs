use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use funj::{samples, AstError, Module};

#[derive(Debug, Parser)]
#[command(version, about = None, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Built-in sample module to compile
    #[arg(value_enum)]
    pub sample: Sample,

    /// Execution mode
    #[arg(value_enum)]
    #[arg(short, long)]
    #[arg(default_value_t = Mode::Emit)]
    pub mode: Mode,

    /// Directory the emitted units are written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Emit the Jasmin units
    Emit,

    /// Inspect the constructed tree
    Ast,

    /// Report the declarations' effective types
    Types,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sample {
    Answer,
    Inlined,
    Arithmetic,
    Doubles,
    Booleans,
    Characters,
    Triples,
    Curried,
    Partial,
    Colors,
    Matching,
    Listing,
}

impl Sample {
    /// Build the sample's tree
    pub fn build(self) -> Result<Module, AstError> {
        match self {
            Sample::Answer => samples::answer(),
            Sample::Inlined => samples::inlined(),
            Sample::Arithmetic => samples::arithmetic(),
            Sample::Doubles => samples::doubles(),
            Sample::Booleans => samples::booleans(),
            Sample::Characters => samples::characters(),
            Sample::Triples => samples::triples(),
            Sample::Curried => samples::curried(),
            Sample::Partial => samples::partial(),
            Sample::Colors => samples::colors(),
            Sample::Matching => samples::matching(),
            Sample::Listing => samples::listing(),
        }
    }
}
