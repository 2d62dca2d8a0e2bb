pub mod config;
pub mod model_parser;
pub mod portfolio;
pub mod scenario_builder;
pub mod smtlib;
pub mod verifier;
pub mod z3_backend;
