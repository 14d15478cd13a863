use test_log::test;

use super::*;
use crate::GateKind;

/// w1, w2, w3; g1 = AND(N(w1), w2); g2 = OR(g1, w3); og = XOR(g1, g2)
fn create_reference_circuit() -> Circuit {
    let (arena, wires, og) = create_reference_arena();
    Circuit::new(arena, wires, og).unwrap()
}

fn create_reference_arena() -> (Arena, Vec<NodeId>, NodeId) {
    let mut arena = Arena::new();
    let w1 = arena.add_input_wire("w1", Some(true)).unwrap();
    let w2 = arena.add_input_wire("w2", Some(true)).unwrap();
    let w3 = arena.add_input_wire("w3", Some(false)).unwrap();

    let g1 = arena
        .add_gate(GateKind::And, "g1", vec![w1, w2], vec![true, false])
        .unwrap();
    let g2 = arena
        .add_gate(GateKind::Or, "g2", vec![g1, w3], vec![false, false])
        .unwrap();
    let og = arena
        .add_gate(GateKind::Xor, "og", vec![g1, g2], vec![false, false])
        .unwrap();

    (arena, vec![w1, w2, w3], og)
}

#[test]
fn test_reference_display() {
    let circuit = create_reference_circuit();
    assert_eq!(
        circuit.display(),
        "\nL\ng1:AND(N(w1),w2)\nL\ng2:OR(g1,w3)\nL\nog:XOR(g1,g2)"
    );
}

#[test]
fn test_reference_evaluate() {
    let mut circuit = create_reference_circuit();
    assert_eq!(circuit.get_num_inputs(), 3);
    assert_eq!(circuit.evaluate(&[true, true, false]), Ok(false));
    assert_eq!(circuit.evaluate(&[true, true, true]), Ok(true));
}

#[test]
fn test_evaluate_is_repeatable() {
    let mut circuit = create_reference_circuit();

    for _ in 0..3 {
        assert_eq!(circuit.evaluate(&[true, true, true]), Ok(true));
    }

    // Switching inputs back and forth must not reuse stale cached values.
    assert_eq!(circuit.evaluate(&[true, true, false]), Ok(false));
    assert_eq!(circuit.evaluate(&[false, true, false]), Ok(false));
    assert_eq!(circuit.evaluate(&[true, true, true]), Ok(true));
}

#[test]
fn test_gates_cached_before_construction_are_dropped() {
    let (mut arena, wires, og) = create_reference_arena();
    // Caches g1 and g2 for (T, T, F) while the output gate stays uncached.
    let g2 = arena.gate(og).unwrap().inputs()[1];
    assert_eq!(arena.evaluate(g2), Ok(false));

    let mut circuit = Circuit::new(arena, wires, og).unwrap();
    assert_eq!(circuit.evaluate(&[true, true, true]), Ok(true));
    assert_eq!(circuit.evaluate(&[true, true, true]), Ok(true));
}

#[test]
fn test_evaluate_checks_input_length() {
    let mut circuit = create_reference_circuit();
    assert_eq!(
        circuit.evaluate(&[true, false]),
        Err(CircuitError::InputLength {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn test_levels() {
    let circuit = create_reference_circuit();
    let levels = circuit.get_levels();

    assert_eq!(levels.len(), circuit.depth() + 1);
    assert_eq!(levels[0], circuit.input_wires());
    for (depth, level) in levels.iter().enumerate().skip(1) {
        assert_eq!(level.len(), 1);
        for &id in level {
            let gate = circuit.arena().gate(id).unwrap();
            assert_eq!(gate.level(), depth);
            for &input in gate.inputs() {
                assert!(circuit.arena().level(input).unwrap() < gate.level());
            }
        }
    }
}

#[test]
fn test_dead_gates_are_trimmed() {
    let mut arena = Arena::new();
    let w0 = arena.add_input_wire("W0", None).unwrap();
    let w1 = arena.add_input_wire("W1", None).unwrap();

    let used = arena
        .add_gate(GateKind::And, "used", vec![w0, w1], vec![false, false])
        .unwrap();
    let dead = arena
        .add_gate(GateKind::Or, "dead", vec![w0, w1], vec![true, false])
        .unwrap();
    let dead_above = arena
        .add_gate(GateKind::Xor, "dead_above", vec![dead, used], vec![false, false])
        .unwrap();
    let output = arena
        .add_gate(GateKind::Xor, "output_gate", vec![used, w1], vec![false, true])
        .unwrap();

    let circuit = Circuit::new(arena, vec![w0, w1], output).unwrap();
    let listed = circuit.get_levels()[1..]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>();

    assert_eq!(listed, vec![used, output]);
    assert!(!listed.contains(&dead));
    assert!(!listed.contains(&dead_above));
    assert_eq!(circuit.num_gates(), 2);

    let text = circuit.display();
    assert!(!text.contains("dead"));
    assert_eq!(text, "\nL\nused:AND(W0,W1)\nL\noutput_gate:XOR(used,N(W1))");
}

#[test]
fn test_shared_fanout_listed_once() {
    let mut arena = Arena::new();
    let wires = (0..4)
        .map(|i| arena.add_input_wire(format!("W{i}"), None).unwrap())
        .collect::<Vec<_>>();

    let shared = arena
        .add_gate(GateKind::Or, "shared", vec![wires[0], wires[1]], vec![false; 2])
        .unwrap();
    let left = arena
        .add_gate(GateKind::And, "left", vec![shared, wires[2]], vec![false; 2])
        .unwrap();
    let right = arena
        .add_gate(GateKind::And, "right", vec![shared, wires[3]], vec![false; 2])
        .unwrap();
    let output = arena
        .add_gate(GateKind::Xor, "out", vec![left, right, shared], vec![false; 3])
        .unwrap();

    let circuit = Circuit::new(arena, wires, output).unwrap();
    let levels = circuit.get_levels();

    assert_eq!(levels[1], vec![shared]);
    assert_eq!(levels[2].len(), 2);
    assert!(levels[2].contains(&left) && levels[2].contains(&right));
    assert_eq!(levels[3], vec![output]);
}

#[test]
fn test_display_shape() {
    let circuit = create_reference_circuit();
    let text = circuit.display();

    assert!(text.starts_with("\nL\n"));
    let markers = text.lines().filter(|line| *line == "L").count();
    assert_eq!(markers, circuit.depth());
}

#[test]
fn test_new_rejects_wrong_node_roles() {
    let mut arena = Arena::new();
    let w0 = arena.add_input_wire("W0", None).unwrap();
    let w1 = arena.add_input_wire("W1", None).unwrap();
    let gate = arena
        .add_gate(GateKind::And, "g", vec![w0, w1], vec![false; 2])
        .unwrap();

    assert_eq!(
        Circuit::new(arena.clone(), vec![w0, w1], w1).unwrap_err(),
        CircuitError::Node(NodeError::NotAGate(w1))
    );
    assert_eq!(
        Circuit::new(arena, vec![w0, gate], gate).unwrap_err(),
        CircuitError::Node(NodeError::NotAnInputWire(gate))
    );
}
