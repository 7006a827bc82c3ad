// Shared helpers

pub mod encoding;
pub mod io;
