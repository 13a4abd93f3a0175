pub mod lead;
pub mod location;
pub mod pricing;
pub mod season;
pub mod service;
