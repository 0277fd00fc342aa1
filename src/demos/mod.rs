//! The seven demo units. Each pairs a pure computation with a rendering
//! step and implements the [`crate::Demo`] lifecycle contract.

pub mod arithmetic;
pub mod async_error;
pub mod callback_timing;
pub mod comparison;
pub mod mutable_state;
pub mod scope_pollution;
pub mod this_binding;

pub use arithmetic::{ArithmeticDemo, Calculation, Operator, calculate};
pub use async_error::AsyncErrorDemo;
pub use callback_timing::CallbackTimingDemo;
pub use comparison::{Comparison, ComparisonDemo, compare};
pub use mutable_state::{MutableStateDemo, MutationReport, demonstrate_mutation};
pub use scope_pollution::{ScopePollutionDemo, ScopeReport, demonstrate_scoping};
pub use this_binding::{BindingReport, ThisBindingDemo, demonstrate_binding};
