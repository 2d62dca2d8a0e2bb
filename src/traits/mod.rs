pub mod solver_backend;

// Re-export traits
pub use solver_backend::{ SolverBackend, SolverResponse };
