//! MERGE flow scenarios.
//!
//! One session runs the whole sequence, so later steps see what earlier
//! steps created (labels in particular).

use kestrel_tests::prelude::*;
use pretty_assertions::assert_eq;

fn critic() -> PathPattern {
    PathPattern::start(NodePattern::named("robert").with_label("Critic"))
}

fn charlie() -> PathPattern {
    PathPattern::start(
        NodePattern::named("charlie")
            .with_prop("name", "Charlie Sheen")
            .with_prop("age", 10),
    )
}

fn michael() -> PathPattern {
    PathPattern::start(
        NodePattern::named("michael")
            .with_label("Person")
            .with_prop("name", "Michael Douglas"),
    )
}

fn acted_in() -> PathPattern {
    PathPattern::start(NodePattern::named("charlie").with_label("ACTOR")).then(
        RelPattern::outgoing("ACTED_IN").with_var("r"),
        NodePattern::named("wallStreet").with_label("MOVIE"),
    )
}

fn franklin(rel: RelPattern) -> PathPattern {
    PathPattern::start(
        NodePattern::named("franklin")
            .with_label("ACTOR")
            .with_prop("name", "Franklin Cover"),
    )
    .then(
        rel.with_var("r"),
        NodePattern::named("almostHeroes").with_label("MOVIE"),
    )
}

fn person_31() -> PathPattern {
    PathPattern::start(NodePattern::anonymous().with_label("person").with_prop("age", 31))
}

fn owns_dog() -> PathPattern {
    PathPattern::start(NodePattern::named("p").with_label("person").with_prop("age", 31)).then(
        RelPattern::outgoing("owns"),
        NodePattern::named("d").with_label("dog").with_prop("name", "max"),
    )
}

fn owns_dog_eats_food() -> PathPattern {
    owns_dog().then(
        RelPattern::outgoing("eats"),
        NodePattern::named("f").with_label("food").with_prop("name", "Royal Canin"),
    )
}

fn merge_flow() -> Scenario {
    Scenario::new("merge_flow")
        .step("single_node_with_label", |s| s.merge(&critic()), |a| {
            a.labels_added(1).nodes_created(1).properties_set(0).rows(1)
        })
        .step("existing_single_node_with_label", |s| s.merge(&critic()), |a| {
            a.no_changes().rows(1)
        })
        .step("single_node_with_properties", |s| s.merge(&charlie()), |a| {
            a.labels_added(0).nodes_created(1).properties_set(2)
        })
        .step("existing_single_node_with_properties", |s| s.merge(&charlie()), |a| {
            a.no_changes()
        })
        .step("single_node_both_label_and_property", |s| s.merge(&michael()), |a| {
            a.labels_added(1).nodes_created(1).properties_set(1)
        })
        .step("existing_single_node_both_label_and_property", |s| s.merge(&michael()), |a| {
            a.no_changes()
        })
        .step("merge_on_relationship", |s| s.merge(&acted_in()), |a| {
            a.labels_added(2)
                .nodes_created(2)
                .properties_set(0)
                .relationships_created(1)
        })
        .step("existing_merge_on_relationship", |s| s.merge(&acted_in()), |a| {
            a.no_changes()
        })
        .step(
            "update_existing_node",
            |s| {
                s.merge_with(
                    &charlie(),
                    [BindingRow::new()],
                    &[
                        UpdateOp::set("charlie", "age", 11),
                        UpdateOp::set("charlie", "lastname", "Sheen"),
                    ],
                )
            },
            |a| {
                a.labels_added(0)
                    .nodes_created(0)
                    .properties_set(2)
                    .relationships_created(0)
            },
        )
        .step(
            "update_new_node",
            |s| {
                let tamara = PathPattern::start(
                    NodePattern::named("tamara")
                        .with_label("ACTOR")
                        .with_prop("name", "tamara tunie"),
                );
                s.merge_with(
                    &tamara,
                    [BindingRow::new()],
                    &[
                        UpdateOp::set("tamara", "age", 59),
                        UpdateOp::set("tamara", "name", "Tamara Tunie"),
                    ],
                )
            },
            |a| {
                a.labels_added(0)
                    .nodes_created(1)
                    .properties_set(3)
                    .relationships_created(0)
            },
        )
        .step(
            "update_new_relationship",
            |s| {
                s.merge_with(
                    &franklin(RelPattern::outgoing("ACTED_IN").with_prop("rate", 5.7)),
                    [BindingRow::new()],
                    &[UpdateOp::set("r", "date", 1998), UpdateOp::set("r", "rate", 5.8)],
                )
            },
            |a| {
                a.labels_added(0)
                    .nodes_created(2)
                    .properties_set(4)
                    .relationships_created(1)
            },
        )
        .step(
            "update_existing_edge",
            |s| {
                s.merge_with(
                    &franklin(
                        RelPattern::outgoing("ACTED_IN")
                            .with_prop("rate", 5.8)
                            .with_prop("date", 1998),
                    ),
                    [BindingRow::new()],
                    &[UpdateOp::set("r", "date", 1998), UpdateOp::set("r", "rate", 5.9)],
                )
            },
            |a| {
                a.labels_added(0)
                    .nodes_created(0)
                    .properties_set(2)
                    .relationships_created(0)
            },
        )
        .step(
            "create_multiple_nodes",
            |s| s.create(&[person_31(), person_31(), person_31(), person_31()], &[]),
            |a| a.labels_added(1).nodes_created(4).properties_set(4),
        )
        .step(
            "update_multiple_nodes",
            |s| {
                let p = PathPattern::start(
                    NodePattern::named("p").with_label("person").with_prop("age", 31),
                );
                s.merge_with(&p, [BindingRow::new()], &[UpdateOp::set("p", "newprop", 100)])
            },
            |a| {
                a.labels_added(0)
                    .nodes_created(0)
                    .properties_set(4)
                    .rows(4)
            },
        )
        .step("merge_unbounded_pattern", |s| s.merge(&owns_dog()), |a| {
            a.labels_added(1)
                .nodes_created(2)
                .properties_set(2)
                .relationships_created(1)
        })
        .step(
            "merge_unbounded_longer_pattern",
            |s| s.merge(&owns_dog_eats_food()),
            |a| {
                a.labels_added(1)
                    .nodes_created(3)
                    .properties_set(3)
                    .relationships_created(2)
            },
        )
}

#[test]
fn test_merge_flow() {
    init_logging();

    let session = merge_flow().run().unwrap();
    let graph = session.graph();

    // charlie was updated in place
    let charlie = session.find_nodes(None, &[PropertyPredicate::eq("name", "Charlie Sheen")]);
    assert_eq!(charlie.len(), 1);
    let node = graph.get_node(charlie[0]).unwrap();
    assert_eq!(node.get_property("age"), Some(&Value::Int(11)));
    assert_eq!(node.get_property("lastname"), Some(&Value::from("Sheen")));

    // tamara was renamed after creation
    let tamara = session.find_nodes(Some("ACTOR"), &[PropertyPredicate::eq("name", "Tamara Tunie")]);
    assert_eq!(tamara.len(), 1);
    assert_eq!(
        graph.get_node(tamara[0]).unwrap().get_property("age"),
        Some(&Value::Int(59))
    );

    // franklin's relationship carries the last written values
    let franklin = session.find_nodes(Some("ACTOR"), &[PropertyPredicate::eq("name", "Franklin Cover")]);
    assert_eq!(franklin.len(), 1);
    let rels = graph.edges_from(franklin[0], Some("ACTED_IN"));
    assert_eq!(rels.len(), 1);
    let rel = graph.get_relationship(rels[0]).unwrap();
    assert_eq!(rel.get_property("rate"), Some(&Value::Float(5.9)));
    assert_eq!(rel.get_property("date"), Some(&Value::Int(1998)));

    // every person created by CREATE got the new property; the two persons
    // created by the unbound pattern merges did not
    let with_newprop = session.find_nodes(Some("person"), &[PropertyPredicate::eq("newprop", 100)]);
    assert_eq!(with_newprop.len(), 4);
    assert_eq!(graph.label_count("person"), 6);
    assert_eq!(graph.label_count("dog"), 2);
    assert_eq!(graph.label_count("food"), 1);
}

#[test]
fn test_merge_is_idempotent_for_every_pattern() {
    // GIVEN each pattern merged once
    let patterns = vec![critic(), charlie(), michael(), acted_in(), owns_dog_eats_food()];
    let mut session = Session::new();
    for pattern in &patterns {
        session.merge(pattern).unwrap();
    }
    let nodes = session.graph().node_count();
    let rels = session.graph().relationship_count();

    // WHEN merged again
    for pattern in &patterns {
        let result = session.merge(pattern).unwrap();

        // THEN nothing changes
        assert_eq!(result.stats, Statistics::default());
    }
    assert_eq!(session.graph().node_count(), nodes);
    assert_eq!(session.graph().relationship_count(), rels);
}

#[test]
fn test_creation_counts_every_unbound_descriptor() {
    // GIVEN an empty graph and a pattern with 3 nodes and 2 relationships
    let mut session = Session::new();

    // WHEN
    let result = session.merge(&owns_dog_eats_food()).unwrap();

    // THEN
    assert_eq!(
        result.stats.nodes_created + result.stats.relationships_created,
        5
    );
    assert_eq!(result.row_count(), 1);
    assert!(result.rows[0].node("f").is_some());
}

#[test]
fn test_contradictory_pattern_is_a_definition_error() {
    Scenario::new("contradiction")
        .step(
            "conflicting_literals",
            |s| {
                let n = NodePattern::named("n").with_prop("v", 1);
                let again = NodePattern::named("n").with_prop("v", 2);
                s.merge(&PathPattern::start(n).then(RelPattern::outgoing("R"), again))
            },
            |a| a.error_matches(r"Conflicting values for property 'v' of 'n'"),
        )
        .step(
            "nothing_was_written",
            |s| s.match_pattern(&PathPattern::start(NodePattern::named("n")), [BindingRow::new()]),
            |a| a.rows(0),
        )
        .run()
        .unwrap();
}
