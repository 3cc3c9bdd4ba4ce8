use std::fmt::Debug;
use std::hash::Hash;

/// Initial value of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResetValue {
    #[default]
    Zero,
    One,
    Nondeterministic,
}

/// Capability contract of a logic network the reader can build into.
///
/// The five methods without defaults are required. The remaining ones are
/// optional: each group is switched on by an associated constant, and the
/// reader only calls into a group whose constant is `true`. The defaults are
/// no-ops so a network opts in by overriding both the constant and the
/// methods.
pub trait Network {
    type Signal: Copy + Eq + Hash + Debug;

    /// `create_ro` / `create_ri` are implemented.
    const HAS_REGISTERS: bool = false;
    /// `set_name` / `has_name` are implemented.
    const HAS_SIGNAL_NAMES: bool = false;
    /// `set_output_name` / `has_output_name` are implemented.
    const HAS_OUTPUT_NAMES: bool = false;

    fn get_constant(&mut self, value: bool) -> Self::Signal;
    fn create_pi(&mut self) -> Self::Signal;
    fn create_po(&mut self, signal: Self::Signal);
    fn create_not(&mut self, signal: Self::Signal) -> Self::Signal;
    fn create_and(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    /// Creates the output side of a register.
    fn create_ro(&mut self) -> Self::Signal {
        self.get_constant(false)
    }

    /// Binds the next-state function of the oldest register that has none.
    fn create_ri(&mut self, _next: Self::Signal, _reset: ResetValue) {}

    fn set_name(&mut self, _signal: Self::Signal, _name: &str) {}

    fn has_name(&self, _signal: Self::Signal) -> bool {
        false
    }

    /// Names output slot `index`; register inputs follow the primary outputs.
    fn set_output_name(&mut self, _index: usize, _name: &str) {}

    fn has_output_name(&self, _index: usize) -> bool {
        false
    }
}
