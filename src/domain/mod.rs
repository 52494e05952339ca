// Domain layer: the call-graph core, written only against `ports::FrontEnd`.

pub mod ast;
pub mod callgraph;
pub mod diagnostics;
pub mod error;
pub mod project;
pub mod resolver;
pub mod symbol;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;
