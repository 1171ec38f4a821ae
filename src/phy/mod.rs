pub mod scratchpad;

pub use scratchpad::ScratchpadPhy;
