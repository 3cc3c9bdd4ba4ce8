use aigread::circuit::aig::{Aig, AigLit};
use aigread::error::DecodeError;
use aigread::names::NameMap;
use aigread::network::{Network, ResetValue};
use aigread::reader::{AigerEvents, AigerReader, Header};

/// Combinational network with only the required capabilities.
#[derive(Debug, Default)]
struct Netlist {
    nodes: Vec<Node>,
    outputs: Vec<(usize, bool)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Const,
    Pi,
    And((usize, bool), (usize, bool)),
}

impl Netlist {
    fn count(&self, pred: impl Fn(&Node) -> bool) -> usize {
        self.nodes.iter().filter(|n| pred(n)).count()
    }
}

impl Network for Netlist {
    type Signal = (usize, bool);

    fn get_constant(&mut self, value: bool) -> Self::Signal {
        if self.nodes.is_empty() {
            self.nodes.push(Node::Const);
        }
        (0, value)
    }

    fn create_pi(&mut self) -> Self::Signal {
        self.nodes.push(Node::Pi);
        (self.nodes.len() - 1, false)
    }

    fn create_po(&mut self, signal: Self::Signal) {
        self.outputs.push(signal);
    }

    fn create_not(&mut self, signal: Self::Signal) -> Self::Signal {
        (signal.0, !signal.1)
    }

    fn create_and(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.nodes.push(Node::And(a, b));
        (self.nodes.len() - 1, false)
    }
}

fn header(inputs: usize, latches: usize, outputs: usize, ands: usize) -> Header {
    Header {
        max_var: (inputs + latches + ands) as u32,
        num_inputs: inputs,
        num_latches: latches,
        num_outputs: outputs,
        num_ands: ands,
    }
}

#[test]
fn single_and_gate_end_to_end() {
    let mut aig = Aig::new();
    let mut names = NameMap::new();
    let mut reader = AigerReader::with_names(&mut aig, &mut names);
    reader.on_header(header(2, 0, 1, 1));
    assert_eq!(reader.num_signals(), 3);
    reader.on_and(3, 2, 4);
    reader.on_output(0, 6);
    let summary = reader.finalize().expect("finalize");

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.outputs, 1);
    assert_eq!(aig.num_inputs(), 2);
    assert_eq!(aig.num_ands(), 1);
    assert_eq!(aig.num_outputs(), 1);

    let gate = aig.ands[0].clone();
    assert_eq!(gate.a, AigLit::new(1, false));
    assert_eq!(gate.b, AigLit::new(2, false));
    assert_eq!(aig.outputs()[0], AigLit::new(gate.id, false));
    assert!(aig.is_and(aig.outputs()[0]));
    assert!(aig.is_input(gate.a) && aig.is_input(gate.b));
    assert_eq!(aig.and_gate(gate.id), Some(&gate));
    assert_eq!(aig.output_name(0), Some("po0"));
    assert_eq!(aig.signal_name(AigLit::new(1, false)), Some("pi0"));
    assert_eq!(aig.signal_name(AigLit::new(2, false)), Some("pi1"));

    let out_names = names.names_of(AigLit::new(gate.id, false)).expect("names");
    assert_eq!(out_names, ["po0"]);
}

#[test]
fn single_latch_gets_default_name_after_outputs() {
    let mut aig = Aig::new();
    let mut reader = AigerReader::new(&mut aig);
    reader.on_header(header(0, 1, 1, 0));
    reader.on_latch(0, 3, ResetValue::One);
    reader.on_output(0, 2);
    reader.finalize().expect("finalize");

    assert_eq!(aig.num_latches(), 1);
    let latch = aig.latches[0].clone();
    assert_eq!(latch.next, Some(AigLit::new(latch.id, true)));
    assert_eq!(latch.reset, ResetValue::One);
    assert!(aig.is_latch(aig.outputs()[0]));
    assert_eq!(aig.output_name(0), Some("po0"));
    assert_eq!(aig.output_name(1), Some("li1"));
}

#[test]
fn latch_names_count_from_one() {
    let mut aig = Aig::new();
    let mut reader = AigerReader::new(&mut aig);
    reader.on_header(header(1, 3, 0, 0));
    reader.on_latch(0, 2, ResetValue::Zero);
    reader.on_latch(1, 4, ResetValue::One);
    reader.on_latch(2, 7, ResetValue::Nondeterministic);
    reader.finalize().expect("finalize");

    let got = (0..3)
        .map(|i| aig.output_name(i).unwrap_or("-"))
        .collect::<Vec<_>>();
    assert_eq!(got, ["li1", "li2", "li3"]);
    assert_eq!(aig.latches[2].reset, ResetValue::Nondeterministic);
}

#[test]
fn network_without_optional_capabilities() {
    let mut net = Netlist::default();
    let mut names = NameMap::new();
    let mut reader = AigerReader::with_names(&mut net, &mut names);
    reader.on_header(header(2, 1, 2, 1));
    reader.on_input_name(0, "a");
    reader.on_latch(0, 6, ResetValue::One);
    reader.on_output(0, 9);
    reader.on_output(1, 7);
    reader.on_output_name(0, "y");
    reader.on_and(4, 2, 5);
    let summary = reader.finalize().expect("finalize");

    // register output reads as constant false
    assert_eq!(summary.latches, 0);
    assert_eq!(net.count(|n| *n == Node::Pi), 2);
    assert_eq!(net.count(|n| matches!(n, Node::And(..))), 1);
    assert_eq!(net.nodes[3], Node::And((1, false), (2, true)));
    assert_eq!(net.outputs, [(3, true), (0, true)]);

    assert!(names.has_name((1, false), "a"));
    assert!(names.has_name((3, true), "y"));
    assert!(names.has_name((0, true), "po1"));
}

#[test]
fn latch_name_without_registers_names_nothing() {
    let mut net = Netlist::default();
    let mut names = NameMap::new();
    let mut reader = AigerReader::with_names(&mut net, &mut names);
    reader.on_header(header(1, 1, 1, 0));
    reader.on_latch(0, 2, ResetValue::Zero);
    reader.on_output(0, 4);
    reader.on_latch_name(0, "q");
    reader.finalize().expect("finalize");

    assert_eq!(net.outputs, [(0, false)]);
    assert!(!names.has_name((0, false), "q"));
    assert!(names.signal_of("q").is_none());
    assert!(names.has_name((0, false), "po0"));
}

#[test]
fn output_beyond_header_is_malformed() {
    let mut aig = Aig::new();
    let mut reader = AigerReader::new(&mut aig);
    reader.on_header(header(1, 0, 1, 0));
    reader.on_output(0, 2);
    reader.on_output(1, 3);
    match reader.finalize() {
        Err(DecodeError::MalformedStream { reason }) => {
            assert!(reason.contains("output 1"), "{reason}");
        }
        other => panic!("expected malformed stream, got {other:?}"),
    }
}

#[test]
fn dangling_output_name_is_malformed() {
    let mut aig = Aig::new();
    let mut reader = AigerReader::new(&mut aig);
    reader.on_header(header(1, 0, 1, 0));
    reader.on_output(0, 2);
    reader.on_output_name(4, "nowhere");
    assert!(matches!(
        reader.finalize(),
        Err(DecodeError::MalformedStream { .. })
    ));
}

#[test]
fn name_collision_is_not_fatal() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut aig = Aig::new();
    let mut names = NameMap::new();
    let mut reader = AigerReader::with_names(&mut aig, &mut names);
    reader.on_header(header(2, 0, 1, 0));
    reader.on_input_name(0, "x");
    reader.on_input_name(1, "x");
    reader.on_output(0, 2);
    reader.on_output_name(0, "x");
    reader.finalize().expect("finalize");

    let rev = names.export_reverse_mapping();
    assert_eq!(rev.get("x"), Some(&AigLit::new(1, false)));
    assert!(names.has_name(AigLit::new(2, false), "x"));
}
