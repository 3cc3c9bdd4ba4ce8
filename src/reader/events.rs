use crate::network::ResetValue;

/// Counts declared by an AIGER header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub max_var: u32,
    pub num_inputs: usize,
    pub num_latches: usize,
    pub num_outputs: usize,
    pub num_ands: usize,
}

/// Structural events pushed by an AIGER event source, in file order.
///
/// Every handler has an empty default so a consumer only overrides what it
/// cares about.
pub trait AigerEvents {
    fn on_header(&mut self, _header: Header) {}

    /// Names primary input `index` (0-based).
    fn on_input_name(&mut self, _index: usize, _name: &str) {}

    /// Names output slot `index`; latch slots follow the primary outputs.
    fn on_output_name(&mut self, _index: usize, _name: &str) {}

    /// Names the output of latch `index` (0-based).
    fn on_latch_name(&mut self, _index: usize, _name: &str) {}

    /// AND gate with node index `index`, operands given as literals.
    fn on_and(&mut self, _index: u32, _left: u32, _right: u32) {}

    fn on_latch(&mut self, _index: usize, _next: u32, _reset: ResetValue) {}

    fn on_output(&mut self, _index: usize, _lit: u32) {}
}
