pub mod patches;
pub mod webhook;
