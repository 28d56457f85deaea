//! Evaluation layer: the generic fallback-chaining interpreter abstraction
//! and the domain evaluator that resolves composed trees against bindings.

pub mod evaluator;
pub mod interpreter;

pub use evaluator::{evaluate, var_interpreter, Evaluation, RuleEvaluator};
pub use interpreter::{eval_boolean, EvalError, EvalResult, Fallback, Interpreter};
