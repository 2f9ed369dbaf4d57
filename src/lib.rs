//! Declarative command-line arguments on top of `clap`.
//!
//! Arguments are declared as immutable [`Argument`] descriptors collected in
//! an ordered [`ArgSpec`]. The spec compiles into a [`ParserPlan`], which is
//! realised as a `clap::Command`; the engine's matches are then coerced and
//! validated into a [`ParsedArgs`].

pub mod argument;
pub mod args;
pub mod bind;
pub mod commands;
pub mod compile;
pub mod config;
pub mod error;
pub mod options;
pub mod spec;
pub mod types;
pub mod validator;
pub mod visuals;

pub use argument::{ArgKind, Argument};
pub use bind::{AccessError, ParsedArgs, Slot, bind};
pub use commands::{CommandSet, Invocation};
pub use compile::{CompileError, ParserPlan, compile};
pub use config::{ConfigError, Defaults, SchemaFile};
pub use error::ArgError;
pub use options::Options;
pub use spec::ArgSpec;
pub use types::{Caster, CoercionError, FromValue, ScalarKind, TupleShape, Value, ValueType};
pub use validator::{ValidationError, Validator};
