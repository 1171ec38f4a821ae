/// A clocked hardware block.
///
/// `run` advances the block by exactly one clock cycle: it reads the block's
/// input ports, drives its output ports and commits its registers on the
/// clock edge. Parents run their children and then copy outputs onto the
/// inputs of the next stage.
pub trait Module {
  fn run(&mut self);

  /// System reset. Registers declared reset-less keep their value.
  fn reset(&mut self);

  fn name(&self) -> &str;
}
