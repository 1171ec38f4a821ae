//! Building blocks shared by every hardware model in the crate
mod module;
mod port;

pub use module::Module;
pub use port::Wire;
