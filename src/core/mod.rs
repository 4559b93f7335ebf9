//! Core functionality for script generation
//!
//! Contains command line parsing, form handling, job-mode inference and the
//! PL/SQL templates.

pub mod command;
pub mod form;
pub mod generator;
pub mod monitor;
pub mod naming;
pub mod output;
pub mod params;

pub use command::{CommandParser, ParsedCommand};
pub use form::FormInput;
pub use generator::{GeneratedScripts, GenerationRequest, ScriptGenerator};
pub use output::ScriptWriter;
pub use params::{JobMode, Operation, ParameterMap};
