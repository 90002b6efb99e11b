pub mod errors;
pub mod payload;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;

pub use startup::run;
