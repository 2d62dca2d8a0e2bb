pub mod support;

mod config_tests;
mod z3_backend_tests;
