pub mod alerts;
pub mod signals;
