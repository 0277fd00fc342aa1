//! Deterministic in-memory harness hosting interactive language-quirk
//! demonstrations: comparison coercion, arithmetic coercion, mutable state,
//! async error recovery, context binding, scope pollution, and sequencing
//! styles. Demos run against an owned element store and a virtual-time timer
//! scheduler, so every interaction is synchronous and replayable.

use std::error::Error as StdError;
use std::fmt;

pub mod app;
pub mod demo;
pub mod demos;
pub mod markup;
pub mod page;
pub mod progress;
pub mod scheduler;
pub mod value;

pub use app::App;
pub use demo::Demo;
pub use markup::Markup;
pub use page::{Element, Handle, Page};
pub use progress::ProgressTracker;
pub use scheduler::{PendingTimer, Scheduler, TimerEvent};
pub use value::{Literal, Value};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Required markup absent; fatal to the owning unit's construction.
    MissingElement(String),
    /// Malformed user input; rendered in the unit's result region.
    Validation(String),
    /// Computation rejected its inputs (e.g. an unknown operator).
    Computation(String),
    /// Injected failure from the async demo's simulated remote call.
    SimulatedRemote(String),
    /// Harness misuse: negative time advance, timer step-limit breach.
    Lifecycle(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(id) => write!(f, "element with id \"{id}\" not found"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Computation(msg) => write!(f, "{msg}"),
            Self::SimulatedRemote(msg) => write!(f, "{msg}"),
            Self::Lifecycle(msg) => write!(f, "lifecycle error: {msg}"),
        }
    }
}

impl StdError for Error {}
