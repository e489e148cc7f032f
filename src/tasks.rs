// List the different tasks here
pub mod plot;
