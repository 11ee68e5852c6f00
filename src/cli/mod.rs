mod root;
mod snapshot;

pub use root::Cli;
