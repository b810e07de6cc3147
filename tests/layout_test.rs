//! Tests for tree layout

use rstest::rstest;

use inorder_viz::domain::{
    assign_layout, assign_layout_with_step, NodeId, Position, TreeArena, TreeBuilder,
    DEFAULT_POOL,
};

fn position_of(tree: &TreeArena, id: &str) -> Option<Position> {
    tree.find(&NodeId::from(id))
        .and_then(|idx| tree.get_node(idx))
        .and_then(|node| node.position)
}

#[test]
fn given_sample_tree_when_laying_out_then_children_straddle_root() {
    let mut tree = TreeBuilder::build_sample_tree();

    assign_layout(&mut tree, 300.0, 50.0, 140.0);

    let left = position_of(&tree, "2").unwrap();
    let right = position_of(&tree, "3").unwrap();
    assert!(left.x < 300.0);
    assert!(right.x > 300.0);
    assert_eq!(left.y, 130.0);
    assert_eq!(right.y, 130.0);
    assert_eq!(position_of(&tree, "1"), Some(Position::new(300.0, 50.0)));
}

#[test]
fn given_tree_without_layout_when_reading_positions_then_none() {
    let tree = TreeBuilder::build_sample_tree();

    assert!(tree.iter().all(|(_, node)| node.position.is_none()));
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(13)]
#[case(77)]
fn given_random_tree_when_laying_out_then_children_ordered_by_side(#[case] seed: u64) {
    let mut tree = TreeBuilder::new()
        .build_random_tree_seeded(&DEFAULT_POOL, seed)
        .unwrap();

    assign_layout_with_step(&mut tree, 0.0, 0.0, 100.0, 60.0);

    for (_, node) in tree.iter() {
        let p = node.position.unwrap();
        if let Some(left) = node.left.and_then(|idx| tree.get_node(idx)) {
            let lp = left.position.unwrap();
            assert!(lp.x < p.x);
            assert_eq!(lp.y, p.y + 60.0);
        }
        if let Some(right) = node.right.and_then(|idx| tree.get_node(idx)) {
            let rp = right.position.unwrap();
            assert!(rp.x > p.x);
            assert_eq!(rp.y, p.y + 60.0);
        }
    }
}

#[test]
fn given_sample_tree_when_laying_out_then_grandchildren_do_not_overlap() {
    let mut tree = TreeBuilder::build_sample_tree();

    assign_layout(&mut tree, 300.0, 50.0, 140.0);

    let xs: Vec<f64> = ["4", "5", "6", "7"]
        .iter()
        .map(|id| position_of(&tree, id).unwrap().x)
        .collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "{xs:?}");
}
