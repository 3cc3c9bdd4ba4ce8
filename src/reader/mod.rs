pub mod events;
mod pending;

pub use events::{AigerEvents, Header};

use crate::error::DecodeError;
use crate::names::NameMap;
use crate::network::{Network, ResetValue};

use pending::Pending;

/// Upper bound on the signal table capacity taken from a header up front.
const MAX_RESERVE: usize = 1 << 20;

/// What a finished decode created in the target network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeSummary {
    pub inputs: usize,
    pub latches: usize,
    pub outputs: usize,
    pub ands: usize,
}

/// Builds AIGER events into a network.
///
/// Inputs, register outputs and AND gates are created as soon as their event
/// arrives, because later literals refer to them. Outputs and register inputs
/// are collected and created by [`AigerReader::finalize`], once every name has
/// been seen.
///
/// Handlers never fail on their own. The first structural error is kept, every
/// later event is ignored, and `finalize` reports it.
///
/// ```
/// use aigread::circuit::aig::Aig;
/// use aigread::names::NameMap;
/// use aigread::reader::{AigerEvents, AigerReader, Header};
///
/// let mut aig = Aig::new();
/// let mut names = NameMap::new();
/// let mut reader = AigerReader::with_names(&mut aig, &mut names);
/// reader.on_header(Header { max_var: 3, num_inputs: 2, num_outputs: 1, num_ands: 1, ..Header::default() });
/// reader.on_and(3, 2, 4);
/// reader.on_output(0, 6);
/// let summary = reader.finalize().expect("decode");
/// assert_eq!(summary.outputs, 1);
/// assert_eq!(aig.output_name(0), Some("po0"));
/// ```
pub struct AigerReader<'a, N: Network> {
    ntk: &'a mut N,
    names: Option<&'a mut NameMap<N::Signal>>,
    header: Option<Header>,
    signals: Vec<N::Signal>,
    pending: Pending,
    num_ands: usize,
    error: Option<DecodeError>,
}

impl<'a, N: Network> AigerReader<'a, N> {
    pub fn new(ntk: &'a mut N) -> Self {
        Self {
            ntk,
            names: None,
            header: None,
            signals: Vec::new(),
            pending: Pending::default(),
            num_ands: 0,
            error: None,
        }
    }

    pub fn with_names(ntk: &'a mut N, names: &'a mut NameMap<N::Signal>) -> Self {
        let mut reader = Self::new(ntk);
        reader.names = Some(names);
        reader
    }

    /// Number of entries in the signal table.
    pub fn num_signals(&self) -> usize {
        self.signals.len()
    }

    /// Signal of node `index`, without polarity.
    pub fn signal(&self, index: usize) -> Option<N::Signal> {
        self.signals.get(index).copied()
    }

    /// Resolves a literal to a signal, negating it when the low bit is set.
    pub fn resolve(&mut self, lit: u32) -> Result<N::Signal, DecodeError> {
        resolve_literal(&mut *self.ntk, &self.signals, lit)
    }

    /// First error recorded by a handler, if any.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    /// Creates every pending output and register input and assigns default
    /// names. Fails if a handler recorded an error or the stream stopped
    /// short of what its header declared.
    pub fn finalize(self) -> Result<DecodeSummary, DecodeError> {
        let Self {
            ntk,
            mut names,
            header,
            signals,
            mut pending,
            num_ands,
            error,
        } = self;

        if let Some(err) = error {
            return Err(err);
        }
        let Some(header) = header else {
            return Err(DecodeError::incomplete("no header was decoded"));
        };
        check_count("outputs", pending.outputs.len(), header.num_outputs)?;
        check_count("latches", pending.latches.len(), header.num_latches)?;
        check_count("and gates", num_ands, header.num_ands)?;
        if let Some(slot) = pending.dangling_slot() {
            return Err(DecodeError::malformed(format!(
                "output name for slot {} but only {} slots exist",
                slot,
                pending.num_slots()
            )));
        }
        pending.attach_slot_names();

        let mut output_idx = 0usize;
        for out in &pending.outputs {
            let signal = resolve_literal(&mut *ntk, &signals, out.lit)?;
            ntk.create_po(signal);
            let name = if out.name.is_empty() {
                format!("po{output_idx}")
            } else {
                out.name.clone()
            };
            if N::HAS_OUTPUT_NAMES && !ntk.has_output_name(output_idx) {
                ntk.set_output_name(output_idx, &name);
            }
            if let Some(names) = names.as_deref_mut() {
                names.insert(signal, &name);
            }
            output_idx += 1;
        }

        let mut latches = 0usize;
        if N::HAS_REGISTERS {
            let mut latch_idx = 1usize;
            for latch in &pending.latches {
                let signal = resolve_literal(&mut *ntk, &signals, latch.next)?;
                ntk.create_ri(signal, latch.reset);
                let default = format!("li{latch_idx}");
                if N::HAS_OUTPUT_NAMES && !ntk.has_output_name(output_idx) {
                    ntk.set_output_name(output_idx, &default);
                }
                if let Some(names) = names.as_deref_mut() {
                    let name = [&latch.name, &latch.next_name]
                        .into_iter()
                        .find(|n| !n.is_empty())
                        .unwrap_or(&default);
                    names.insert(signal, name);
                }
                latch_idx += 1;
                output_idx += 1;
            }
            latches = pending.latches.len();
        }

        let summary = DecodeSummary {
            inputs: header.num_inputs,
            latches,
            outputs: pending.outputs.len(),
            ands: num_ands,
        };
        log::debug!(
            "decoded {} inputs, {} latches, {} outputs, {} and gates",
            summary.inputs,
            summary.latches,
            summary.outputs,
            summary.ands
        );
        Ok(summary)
    }

    fn guard(&mut self, f: impl FnOnce(&mut Self) -> Result<(), DecodeError>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = f(self) {
            log::debug!("decode aborted: {err}");
            self.error = Some(err);
        }
    }

    fn header(&self) -> Result<Header, DecodeError> {
        self.header
            .ok_or_else(|| DecodeError::malformed("event before header"))
    }

    fn name_signal(&mut self, slot: usize, name: &str) {
        let signal = self.signals[slot];
        if N::HAS_SIGNAL_NAMES {
            self.ntk.set_name(signal, name);
        }
        if let Some(names) = self.names.as_deref_mut() {
            names.insert(signal, name);
        }
    }
}

impl<N: Network> AigerEvents for AigerReader<'_, N> {
    fn on_header(&mut self, header: Header) {
        self.guard(|r| {
            if r.header.is_some() {
                return Err(DecodeError::malformed("second header"));
            }
            r.header = Some(header);
            log::debug!(
                "header: {} inputs, {} latches, {} outputs, {} and gates",
                header.num_inputs,
                header.num_latches,
                header.num_outputs,
                header.num_ands
            );

            let prefix = header
                .num_inputs
                .saturating_add(header.num_latches)
                .saturating_add(1);
            r.signals.reserve(prefix.min(MAX_RESERVE));
            let constant = r.ntk.get_constant(false);
            r.signals.push(constant);

            for i in 0..header.num_inputs {
                let pi = r.ntk.create_pi();
                r.signals.push(pi);
                if N::HAS_SIGNAL_NAMES && !r.ntk.has_name(pi) {
                    r.ntk.set_name(pi, &format!("pi{i}"));
                }
            }

            if !N::HAS_REGISTERS && header.num_latches > 0 {
                log::debug!(
                    "network has no registers, {} latches read as constant false",
                    header.num_latches
                );
            }
            for _ in 0..header.num_latches {
                let ro = if N::HAS_REGISTERS {
                    r.ntk.create_ro()
                } else {
                    constant
                };
                r.signals.push(ro);
            }
            Ok(())
        });
    }

    fn on_input_name(&mut self, index: usize, name: &str) {
        self.guard(|r| {
            let header = r.header()?;
            if index >= header.num_inputs {
                return Err(DecodeError::malformed(format!(
                    "input name index {} out of range ({} inputs)",
                    index, header.num_inputs
                )));
            }
            r.name_signal(1 + index, name);
            Ok(())
        });
    }

    fn on_output_name(&mut self, index: usize, name: &str) {
        self.guard(|r| {
            r.header()?;
            if N::HAS_OUTPUT_NAMES {
                r.ntk.set_output_name(index, name);
            }
            r.pending.name_slot(index, name);
            Ok(())
        });
    }

    fn on_latch_name(&mut self, index: usize, name: &str) {
        self.guard(|r| {
            let header = r.header()?;
            if index >= header.num_latches {
                return Err(DecodeError::malformed(format!(
                    "latch name index {} out of range ({} latches)",
                    index, header.num_latches
                )));
            }
            if N::HAS_REGISTERS {
                r.name_signal(1 + header.num_inputs + index, name);
            }
            r.pending.name_latch(index, name);
            Ok(())
        });
    }

    fn on_and(&mut self, index: u32, left: u32, right: u32) {
        self.guard(|r| {
            let header = r.header()?;
            if index as usize != r.signals.len() {
                return Err(DecodeError::malformed(format!(
                    "and gate {} declared where node {} was expected",
                    index,
                    r.signals.len()
                )));
            }
            if r.num_ands >= header.num_ands {
                return Err(DecodeError::malformed(format!(
                    "more than the {} and gates declared in the header",
                    header.num_ands
                )));
            }
            let a = r.resolve(left)?;
            let b = r.resolve(right)?;
            let gate = r.ntk.create_and(a, b);
            log::trace!("and {index} = {left} & {right}");
            r.signals.push(gate);
            r.num_ands += 1;
            Ok(())
        });
    }

    fn on_latch(&mut self, index: usize, next: u32, reset: ResetValue) {
        self.guard(|r| {
            let header = r.header()?;
            let expected = r.pending.latches.len();
            if index != expected || index >= header.num_latches {
                return Err(DecodeError::malformed(format!(
                    "latch {} declared where latch {} of {} was expected",
                    index, expected, header.num_latches
                )));
            }
            r.pending.push_latch(next, reset);
            Ok(())
        });
    }

    fn on_output(&mut self, index: usize, lit: u32) {
        self.guard(|r| {
            let header = r.header()?;
            let expected = r.pending.outputs.len();
            if index != expected || index >= header.num_outputs {
                return Err(DecodeError::malformed(format!(
                    "output {} declared where output {} of {} was expected",
                    index, expected, header.num_outputs
                )));
            }
            r.pending.push_output(lit);
            Ok(())
        });
    }
}

fn resolve_literal<N: Network>(
    ntk: &mut N,
    signals: &[N::Signal],
    lit: u32,
) -> Result<N::Signal, DecodeError> {
    let index = (lit >> 1) as usize;
    let Some(&signal) = signals.get(index) else {
        return Err(DecodeError::malformed(format!(
            "literal {} refers to node {} but only {} nodes exist",
            lit,
            index,
            signals.len()
        )));
    };
    if lit & 1 == 1 {
        Ok(ntk.create_not(signal))
    } else {
        Ok(signal)
    }
}

fn check_count(what: &str, seen: usize, declared: usize) -> Result<(), DecodeError> {
    if seen < declared {
        return Err(DecodeError::incomplete(format!(
            "{seen} of {declared} {what} decoded"
        )));
    }
    Ok(())
}
