use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::network::{Network, ResetValue};

/// Node reference with polarity. Ordered by node, then plain before negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AigLit {
    pub id: u32,
    pub neg: bool,
}

impl AigLit {
    pub const FALSE: Self = Self { id: 0, neg: false };
    pub const TRUE: Self = Self { id: 0, neg: true };

    pub fn new(id: u32, neg: bool) -> Self {
        Self { id, neg }
    }

    /// Decodes an AIGER literal, `2 * id + neg`.
    pub fn from_raw(lit: u32) -> Self {
        Self {
            id: lit >> 1,
            neg: lit & 1 == 1,
        }
    }

    pub fn to_raw(self) -> u32 {
        (self.id << 1) | self.neg as u32
    }

    pub fn not(self) -> Self {
        Self {
            id: self.id,
            neg: !self.neg,
        }
    }

    pub fn is_const(self) -> bool {
        self.id == 0
    }

    /// Value under `values`, indexed by node; node 0 is always false.
    fn value(self, values: &[bool]) -> bool {
        let base = !self.is_const() && values[self.id as usize];
        base != self.neg
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndGate {
    pub id: u32,
    pub a: AigLit,
    pub b: AigLit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Latch {
    pub id: u32,
    pub next: Option<AigLit>,
    pub reset: ResetValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Const,
    Input,
    Latch,
    And,
}

/// Sequential and-inverter graph.
///
/// Node 0 is constant false. Every other node is an input, a latch output or
/// an AND gate, numbered in creation order. Output slots are the primary
/// outputs followed by the latch next-state functions.
#[derive(Debug, Clone)]
pub struct Aig {
    pub max_id: u32,
    pub inputs: Vec<u32>,
    pub latches: Vec<Latch>,
    pub outputs: Vec<AigLit>,
    pub ands: Vec<AndGate>,
    kinds: Vec<NodeKind>,
    strash: HashMap<AndKey, AigLit>,
    signal_names: HashMap<AigLit, String>,
    output_names: HashMap<usize, String>,
}

impl Aig {
    pub fn new() -> Self {
        Self {
            max_id: 0,
            inputs: Vec::new(),
            latches: Vec::new(),
            outputs: Vec::new(),
            ands: Vec::new(),
            kinds: vec![NodeKind::Const],
            strash: HashMap::new(),
            signal_names: HashMap::new(),
            output_names: HashMap::new(),
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_latches(&self) -> usize {
        self.latches.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_ands(&self) -> usize {
        self.ands.len()
    }

    pub fn input_ids(&self) -> &[u32] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[AigLit] {
        &self.outputs
    }

    pub fn is_input(&self, lit: AigLit) -> bool {
        self.kind(lit.id) == Some(NodeKind::Input)
    }

    pub fn is_latch(&self, lit: AigLit) -> bool {
        self.kind(lit.id) == Some(NodeKind::Latch)
    }

    pub fn is_and(&self, lit: AigLit) -> bool {
        self.kind(lit.id) == Some(NodeKind::And)
    }

    pub fn and_gate(&self, id: u32) -> Option<&AndGate> {
        self.ands.iter().find(|g| g.id == id)
    }

    pub fn signal_name(&self, lit: AigLit) -> Option<&str> {
        self.signal_names.get(&lit).map(String::as_str)
    }

    pub fn output_name(&self, index: usize) -> Option<&str> {
        self.output_names.get(&index).map(String::as_str)
    }

    /// Reset values of all latches, nondeterministic ones read as `false`.
    pub fn initial_state(&self) -> Vec<bool> {
        self.latches
            .iter()
            .map(|l| l.reset == ResetValue::One)
            .collect()
    }

    /// Evaluates one clock cycle, returning output values and the next latch
    /// state.
    pub fn eval(
        &self,
        input_bits: &[bool],
        state: &[bool],
    ) -> Result<(Vec<bool>, Vec<bool>)> {
        if input_bits.len() != self.inputs.len() {
            bail!(
                "expected {} input values, got {}",
                self.inputs.len(),
                input_bits.len()
            );
        }
        if state.len() != self.latches.len() {
            bail!(
                "expected {} latch values, got {}",
                self.latches.len(),
                state.len()
            );
        }

        let mut values = vec![false; self.max_id as usize + 1];
        for (idx, &id) in self.inputs.iter().enumerate() {
            values[id as usize] = input_bits[idx];
        }
        for (idx, latch) in self.latches.iter().enumerate() {
            values[latch.id as usize] = state[idx];
        }
        for gate in &self.ands {
            let av = gate.a.value(&values);
            let bv = gate.b.value(&values);
            values[gate.id as usize] = av & bv;
        }

        let outs = self
            .outputs
            .iter()
            .map(|lit| lit.value(&values))
            .collect();
        let mut next = Vec::with_capacity(self.latches.len());
        for latch in &self.latches {
            let Some(lit) = latch.next else {
                bail!("latch {} has no next-state function", latch.id);
            };
            next.push(lit.value(&values));
        }
        Ok((outs, next))
    }

    fn kind(&self, id: u32) -> Option<NodeKind> {
        self.kinds.get(id as usize).copied()
    }

    fn alloc_id(&mut self, kind: NodeKind) -> u32 {
        self.max_id = self.max_id.saturating_add(1);
        self.kinds.push(kind);
        self.max_id
    }
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Network for Aig {
    type Signal = AigLit;

    const HAS_REGISTERS: bool = true;
    const HAS_SIGNAL_NAMES: bool = true;
    const HAS_OUTPUT_NAMES: bool = true;

    fn get_constant(&mut self, value: bool) -> AigLit {
        if value { AigLit::TRUE } else { AigLit::FALSE }
    }

    fn create_pi(&mut self) -> AigLit {
        let id = self.alloc_id(NodeKind::Input);
        self.inputs.push(id);
        AigLit::new(id, false)
    }

    fn create_po(&mut self, signal: AigLit) {
        self.outputs.push(signal);
    }

    fn create_not(&mut self, signal: AigLit) -> AigLit {
        signal.not()
    }

    fn create_and(&mut self, a: AigLit, b: AigLit) -> AigLit {
        if let Some(lit) = fold_and(a, b) {
            return lit;
        }
        let key = AndKey::new(a, b);
        if let Some(&lit) = self.strash.get(&key) {
            return lit;
        }
        let id = self.alloc_id(NodeKind::And);
        let lit = AigLit::new(id, false);
        self.ands.push(AndGate {
            id,
            a: key.a,
            b: key.b,
        });
        self.strash.insert(key, lit);
        lit
    }

    fn create_ro(&mut self) -> AigLit {
        let id = self.alloc_id(NodeKind::Latch);
        self.latches.push(Latch {
            id,
            next: None,
            reset: ResetValue::Zero,
        });
        AigLit::new(id, false)
    }

    fn create_ri(&mut self, next: AigLit, reset: ResetValue) {
        if let Some(latch) = self.latches.iter_mut().find(|l| l.next.is_none()) {
            latch.next = Some(next);
            latch.reset = reset;
        } else {
            log::warn!("register input {:?} has no free register to bind", next);
        }
    }

    fn set_name(&mut self, signal: AigLit, name: &str) {
        self.signal_names.insert(signal, name.to_owned());
    }

    fn has_name(&self, signal: AigLit) -> bool {
        self.signal_names.contains_key(&signal)
    }

    fn set_output_name(&mut self, index: usize, name: &str) {
        self.output_names.insert(index, name.to_owned());
    }

    fn has_output_name(&self, index: usize) -> bool {
        self.output_names.contains_key(&index)
    }
}

/// Commutative key for structural hashing, operands in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AndKey {
    a: AigLit,
    b: AigLit,
}

impl AndKey {
    fn new(a: AigLit, b: AigLit) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
        }
    }
}

/// Result of `a & b` when it needs no gate.
fn fold_and(a: AigLit, b: AigLit) -> Option<AigLit> {
    match (a, b) {
        (AigLit::FALSE, _) | (_, AigLit::FALSE) => Some(AigLit::FALSE),
        (AigLit::TRUE, x) | (x, AigLit::TRUE) => Some(x),
        _ if a == b => Some(a),
        _ if a.id == b.id => Some(AigLit::FALSE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Aig, AigLit};
    use crate::network::{Network, ResetValue};

    #[test]
    fn and_is_hashed_commutatively() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let x = aig.create_and(a, b);
        let y = aig.create_and(b, a);
        assert_eq!(x, y);
        assert_eq!(aig.num_ands(), 1);
    }

    #[test]
    fn and_folds_constants_and_complements() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let t = aig.get_constant(true);
        let f = aig.get_constant(false);
        assert_eq!(aig.create_and(a, t), a);
        assert_eq!(aig.create_and(f, a), f);
        assert_eq!(aig.create_and(a, a.not()), f);
        assert_eq!(aig.num_ands(), 0);
    }

    #[test]
    fn toggle_register_steps() {
        let mut aig = Aig::new();
        let q = aig.create_ro();
        aig.create_ri(q.not(), ResetValue::One);
        aig.create_po(q);

        let mut state = aig.initial_state();
        assert_eq!(state, vec![true]);
        for expected in [true, false, true] {
            let (outs, next) = match aig.eval(&[], &state) {
                Ok(v) => v,
                Err(e) => panic!("eval failed: {e}"),
            };
            assert_eq!(outs, vec![expected]);
            state = next;
        }
    }

    #[test]
    fn raw_literal_round_trip() {
        let lit = AigLit::from_raw(7);
        assert_eq!(lit, AigLit::new(3, true));
        assert_eq!(lit.to_raw(), 7);
        assert_eq!(lit.not().to_raw(), 6);
    }
}
