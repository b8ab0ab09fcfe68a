//! MERGE fed by upstream binding rows.

use kestrel_tests::prelude::*;
use pretty_assertions::assert_eq;

fn person(session: &mut Session, name: &str) -> NodeId {
    session
        .graph_mut()
        .create_node(vec!["person".into()], props! { "name" => name })
}

fn knows() -> PathPattern {
    PathPattern::start(NodePattern::named("a"))
        .then(RelPattern::outgoing("KNOWS").with_var("r"), NodePattern::named("b"))
}

#[test]
fn test_bound_endpoints_get_connected_once() {
    init_logging();

    // GIVEN three unconnected people
    let mut session = Session::new();
    let alice = person(&mut session, "alice");
    let bob = person(&mut session, "bob");
    let carol = person(&mut session, "carol");
    let pairs = vec![
        BindingRow::with("a", alice).extend_with("b", bob),
        BindingRow::with("a", bob).extend_with("b", carol),
        BindingRow::with("a", alice).extend_with("b", bob),
    ];

    // WHEN each pair merges a KNOWS relationship
    let result = session.merge_with(&knows(), pairs, &[]).unwrap();

    // THEN the repeated pair reuses the relationship created for the first
    assert_eq!(result.stats.nodes_created, 0);
    assert_eq!(result.stats.relationships_created, 2);
    assert_eq!(result.row_count(), 3);
    assert_eq!(result.rows[0].relationship("r"), result.rows[2].relationship("r"));
    assert_eq!(session.graph().relationships_between(alice, bob, Some("KNOWS")).len(), 1);
}

#[test]
fn test_direction_is_respected() {
    // GIVEN alice -KNOWS-> bob
    let mut session = Session::new();
    let alice = person(&mut session, "alice");
    let bob = person(&mut session, "bob");
    session
        .graph_mut()
        .create_relationship("KNOWS", alice, bob, props!())
        .unwrap();

    // WHEN merging bob -KNOWS-> alice
    let result = session
        .merge_with(&knows(), [BindingRow::with("a", bob).extend_with("b", alice)], &[])
        .unwrap();

    // THEN a second relationship in the other direction
    assert_eq!(result.stats.relationships_created, 1);
    assert_eq!(session.graph().relationship_count(), 2);

    // AND an incoming pattern matches the original edge
    let incoming = PathPattern::start(NodePattern::named("b"))
        .then(RelPattern::incoming("KNOWS"), NodePattern::named("a"));
    let matched = session
        .match_pattern(&incoming, [BindingRow::with("a", alice).extend_with("b", bob)])
        .unwrap();
    assert_eq!(matched.row_count(), 1);
}

#[test]
fn test_per_row_multiplicity() {
    // GIVEN two owners, one with two dogs
    let mut session = Session::new();
    let owner = person(&mut session, "owner");
    let other = person(&mut session, "other");
    for name in ["rex", "max"] {
        let dog = session
            .graph_mut()
            .create_node(vec!["dog".into()], props! { "name" => name });
        session
            .graph_mut()
            .create_relationship("OWNS", owner, dog, props!())
            .unwrap();
    }
    let owns = PathPattern::start(NodePattern::named("p"))
        .then(RelPattern::outgoing("OWNS"), NodePattern::named("d").with_label("dog"));

    // WHEN each owner merges a dog and the dogs get fed
    let result = session
        .merge_with(
            &owns,
            [BindingRow::with("p", owner), BindingRow::with("p", other)],
            &[UpdateOp::set("d", "fed", true)],
        )
        .unwrap();

    // THEN two matched rows for the first owner, one created for the other
    assert_eq!(result.row_count(), 3);
    assert_eq!(result.stats.nodes_created, 1);
    assert_eq!(result.stats.relationships_created, 1);
    assert_eq!(result.stats.properties_set, 3);
    let owners: Vec<Option<NodeId>> = result.rows.iter().map(|r| r.node("p")).collect();
    assert_eq!(owners, vec![Some(owner), Some(owner), Some(other)]);
}

#[test]
fn test_later_rows_see_earlier_creations() {
    // GIVEN the same empty upstream row three times
    let mut session = Session::new();
    let tag = PathPattern::start(NodePattern::named("t").with_label("Tag").with_prop("name", "rust"));

    // WHEN
    let result = session
        .merge_with(
            &tag,
            vec![BindingRow::new(); 3],
            &[UpdateOp::set("t", "hits", 1)],
        )
        .unwrap();

    // THEN one creation, three matched rows of the same node
    assert_eq!(result.stats.nodes_created, 1);
    assert_eq!(result.stats.labels_added, 1);
    assert_eq!(result.stats.properties_set, 4);
    assert_eq!(result.rows[0], result.rows[2]);
}

#[test]
fn test_reference_errors() {
    let mut session = Session::new();
    let alice = person(&mut session, "alice");
    let bob = person(&mut session, "bob");
    let r = session
        .graph_mut()
        .create_relationship("LIKES", alice, bob, props!())
        .unwrap();

    Scenario::new("reference_errors")
        .step(
            "bound_node_fails_descriptor",
            move |s| {
                let pattern = PathPattern::start(
                    NodePattern::named("a").with_prop("name", "not alice"),
                );
                s.merge_with(&pattern, [BindingRow::with("a", alice)], &[])
            },
            |a| a.error_matches(r"Bound variable 'a' does not satisfy"),
        )
        .step(
            "bound_relationship_needs_creation",
            move |s| {
                s.merge_with(
                    &knows(),
                    [BindingRow::with("a", alice).extend_with("b", bob).extend_with("r", r)],
                    &[],
                )
            },
            |a| a.error_matches(r"Relationship variable 'r' is already bound"),
        )
        .step(
            "bound_relationship_as_node",
            move |s| {
                let pattern = PathPattern::start(NodePattern::named("a"));
                s.merge_with(&pattern, [BindingRow::with("a", r)], &[])
            },
            |a| a.error_matches(r"'a' is bound to a relationship, expected a node"),
        )
        .step(
            "update_unbound_variable",
            move |s| {
                let pattern = PathPattern::start(NodePattern::named("a"));
                s.merge_with(
                    &pattern,
                    [BindingRow::with("a", alice)],
                    &[UpdateOp::set("ghost", "x", 1)],
                )
            },
            |a| a.error("Unbound variable: ghost"),
        )
        .step(
            "update_after_delete",
            move |s| {
                let pattern = PathPattern::start(NodePattern::named("a"));
                s.merge_with(
                    &pattern,
                    [BindingRow::with("a", bob)],
                    &[UpdateOp::delete("a"), UpdateOp::set("a", "x", 1)],
                )
            },
            |a| a.error_matches(r"Entity n\d+ bound to 'a' was deleted"),
        )
        .step(
            "delete_twice",
            move |s| {
                let pattern = PathPattern::start(NodePattern::named("a"));
                s.merge_with(
                    &pattern,
                    [BindingRow::with("a", alice)],
                    &[UpdateOp::delete("a"), UpdateOp::delete("a")],
                )
            },
            |a| a.nodes_deleted(1).relationships_deleted(0).rows(1),
        )
        .run_on(&mut session)
        .unwrap();

    assert_eq!(session.graph().node_count(), 0);
}
