use proptest::prelude::*;
use serde_json::{Map, Value};
use sysdesign_core::{Component, Diagram, DiagramEdge, DiagramNode, Position, Validate};

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

fn property_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        finite().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::from),
    ]
}

fn node(index: usize) -> impl Strategy<Value = DiagramNode> {
    (
        prop::sample::select(Component::ALL.to_vec()),
        finite(),
        finite(),
        prop::collection::btree_map("[a-z]{1,8}", property_value(), 0..4),
    )
        .prop_map(move |(component, x, y, extra)| {
            let mut node = DiagramNode::new(format!("node-{index}"), component, Position { x, y });
            let props: Map<String, Value> = extra.into_iter().collect();
            node.data.properties.extend(props);
            node
        })
}

fn diagram() -> impl Strategy<Value = Diagram> {
    (1..8usize)
        .prop_flat_map(|count| {
            let nodes: Vec<_> = (0..count).map(node).collect();
            let edges = prop::collection::vec(
                (
                    0..count,
                    0..count,
                    prop::option::of("[a-zA-Z ]{1,16}"),
                    any::<bool>(),
                ),
                0..12,
            );
            (nodes, edges)
        })
        .prop_map(|(nodes, edges)| {
            let edges = edges
                .into_iter()
                .enumerate()
                .map(|(i, (s, t, label, styled))| {
                    let mut edge =
                        DiagramEdge::new(format!("edge-{i}"), format!("node-{s}"), format!("node-{t}"));
                    edge.label = label;
                    if styled {
                        edge.apply_standard_style();
                    }
                    edge
                })
                .collect();
            Diagram { nodes, edges }
        })
}

proptest! {
    #[test]
    fn prop_json_round_trip_is_exact(d in diagram()) {
        let back = Diagram::from_json(&d.to_json().unwrap()).unwrap();
        for (a, b) in d.nodes.iter().zip(&back.nodes) {
            prop_assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            prop_assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
        }
        prop_assert_eq!(back, d);
    }

    #[test]
    fn prop_generated_diagrams_are_valid(d in diagram()) {
        prop_assert!(d.validate().is_ok());
    }

    #[test]
    fn prop_standard_style_covers_every_edge(mut d in diagram()) {
        d.apply_standard_edge_style();
        prop_assert!(d.edges.iter().all(|e| e.has_visual_style()));
    }
}
