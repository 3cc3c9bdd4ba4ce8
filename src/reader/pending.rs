use std::collections::HashMap;

use crate::network::ResetValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingOutput {
    pub lit: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLatch {
    pub next: u32,
    pub reset: ResetValue,
    /// Explicit output slot name.
    pub name: String,
    /// `<latch name>_next`, used only for the name map.
    pub next_name: String,
}

/// Outputs and latches declared so far, materialized only at finalization.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    pub outputs: Vec<PendingOutput>,
    pub latches: Vec<PendingLatch>,
    slot_names: HashMap<usize, String>,
    latch_names: HashMap<usize, String>,
}

impl Pending {
    pub fn push_output(&mut self, lit: u32) {
        self.outputs.push(PendingOutput {
            lit,
            name: String::new(),
        });
    }

    pub fn push_latch(&mut self, next: u32, reset: ResetValue) {
        self.latches.push(PendingLatch {
            next,
            reset,
            name: String::new(),
            next_name: String::new(),
        });
    }

    /// Output slot names may arrive before the slot's own event, so they are
    /// kept by slot and resolved once every output is known.
    pub fn name_slot(&mut self, index: usize, name: &str) {
        self.slot_names.insert(index, name.to_owned());
    }

    /// Remembers the register output name of latch `index`. Its next-state
    /// signal is recorded as `<name>_next`; the output slot is left alone.
    pub fn name_latch(&mut self, index: usize, name: &str) {
        self.latch_names.insert(index, format!("{name}_next"));
    }

    pub fn num_slots(&self) -> usize {
        self.outputs.len() + self.latches.len()
    }

    /// Highest named slot that has no output or latch behind it.
    pub fn dangling_slot(&self) -> Option<usize> {
        self.slot_names
            .keys()
            .copied()
            .filter(|&idx| idx >= self.num_slots())
            .max()
    }

    /// Moves slot names onto the pending entries they belong to.
    pub fn attach_slot_names(&mut self) {
        for (idx, name) in self.latch_names.drain() {
            if let Some(latch) = self.latches.get_mut(idx) {
                latch.next_name = name;
            }
        }
        let num_outputs = self.outputs.len();
        for (idx, name) in self.slot_names.drain() {
            if let Some(out) = self.outputs.get_mut(idx) {
                out.name = name;
            } else if let Some(latch) = idx
                .checked_sub(num_outputs)
                .and_then(|k| self.latches.get_mut(k))
            {
                latch.name = name;
            }
        }
    }
}
