// Text-generation provider layer

pub mod itzam;

pub use itzam::{ItzamClient, ItzamError};
