use super::*;
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn assert_tiles(node: &LaidOutNode, padding: f64) {
    if node.is_leaf() {
        return;
    }
    let inner = node.rect.inset(padding);
    let child_area: f64 = node.children.iter().map(|c| c.rect.area()).sum();
    assert!(
        (child_area - inner.area()).abs() <= EPS * inner.area().max(1.0),
        "{}: children cover {child_area}, inner area {}",
        node.name,
        inner.area()
    );
    for (i, a) in node.children.iter().enumerate() {
        assert!(inner.contains(&a.rect, EPS), "{} escapes {}", a.name, node.name);
        for b in &node.children[i + 1..] {
            assert!(a.rect.is_disjoint(&b.rect, EPS), "{} overlaps {}", a.name, b.name);
        }
        assert_tiles(a, padding);
    }
}

#[test]
fn test_two_children_proportional() {
    let root = TreeNode::branch(
        "root",
        vec![TreeNode::leaf("small", 30.0), TreeNode::leaf("large", 70.0)],
    );
    let out = layout(&root, 100.0, 100.0, 0.0, TilingMethod::Squarify).unwrap();
    assert_eq!(out.value, 100.0);
    // Largest first.
    assert_eq!(out.children[0].name, "large");
    assert!((out.children[0].rect.area() - 7000.0).abs() < EPS);
    assert!((out.children[1].rect.area() - 3000.0).abs() < EPS);
    assert_tiles(&out, 0.0);
}

#[test]
fn test_padding_insets_internal_nodes() {
    let root = TreeNode::branch(
        "root",
        vec![TreeNode::leaf("a", 30.0), TreeNode::leaf("b", 70.0)],
    );
    let out = layout(&root, 100.0, 100.0, 5.0, TilingMethod::Squarify).unwrap();
    assert_eq!(out.rect, Rectangle::new(0.0, 0.0, 100.0, 100.0));
    let inner_area = 90.0 * 90.0;
    assert!((out.children[0].rect.area() - 0.7 * inner_area).abs() < EPS);
    assert!((out.children[1].rect.area() - 0.3 * inner_area).abs() < EPS);
    assert_tiles(&out, 5.0);
}

#[test]
fn test_single_child_gets_parent_minus_padding() {
    let root = TreeNode::branch("root", vec![TreeNode::leaf("only", 4.0)]);
    let out = layout(&root, 50.0, 20.0, 2.0, TilingMethod::Squarify).unwrap();
    assert_eq!(out.children[0].rect, Rectangle::new(2.0, 2.0, 48.0, 18.0));
}

#[test]
fn test_zero_value_gets_zero_area() {
    let root = TreeNode::branch(
        "root",
        vec![
            TreeNode::leaf("zero", 0.0),
            TreeNode::leaf("a", 1.0),
            TreeNode::leaf("b", 3.0),
        ],
    );
    let out = layout(&root, 40.0, 10.0, 0.0, TilingMethod::Squarify).unwrap();
    let zero = out.children.iter().find(|c| c.name == "zero").unwrap();
    assert_eq!(zero.rect.area(), 0.0);
    assert_eq!(out.children.last().unwrap().name, "zero");
    assert_tiles(&out, 0.0);
}

#[test]
fn test_all_zero_siblings_split_equally() {
    let root = TreeNode::branch(
        "root",
        vec![TreeNode::leaf("a", 0.0), TreeNode::leaf("b", 0.0)],
    );
    let out = layout(&root, 10.0, 4.0, 0.0, TilingMethod::Squarify).unwrap();
    assert_eq!(out.children[0].rect, Rectangle::new(0.0, 0.0, 5.0, 4.0));
    assert_eq!(out.children[1].rect, Rectangle::new(5.0, 0.0, 10.0, 4.0));
}

#[test]
fn test_ties_keep_insertion_order() {
    let root = TreeNode::branch(
        "root",
        vec![
            TreeNode::leaf("first", 5.0),
            TreeNode::leaf("second", 5.0),
            TreeNode::leaf("big", 9.0),
        ],
    );
    let out = layout(&root, 30.0, 30.0, 0.0, TilingMethod::SliceDice).unwrap();
    let names: Vec<&str> = out.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["big", "first", "second"]);
}

#[test]
fn test_slice_dice_alternates() {
    let root = TreeNode::branch(
        "root",
        vec![
            TreeNode::branch("left", vec![TreeNode::leaf("l1", 1.0), TreeNode::leaf("l2", 1.0)]),
            TreeNode::leaf("right", 2.0),
        ],
    );
    let out = layout(&root, 8.0, 8.0, 0.0, TilingMethod::SliceDice).unwrap();
    // Depth 0 splits columns, depth 1 splits rows.
    assert_eq!(out.children[0].rect, Rectangle::new(0.0, 0.0, 4.0, 8.0));
    let left = &out.children[0];
    assert_eq!(left.children[0].rect, Rectangle::new(0.0, 0.0, 4.0, 4.0));
    assert_eq!(left.children[1].rect, Rectangle::new(0.0, 4.0, 4.0, 8.0));
    assert_eq!(out.height(), 2);
    assert_eq!(out.leaves().len(), 3);
}

#[test]
fn test_nested_tree_tiles() {
    let root = TreeNode::branch(
        "Sales",
        vec![
            TreeNode::branch(
                "Wii",
                vec![
                    TreeNode::leaf("Wii Sports", 82.53),
                    TreeNode::leaf("Mario Kart Wii", 37.14),
                    TreeNode::leaf("Wii Fit", 22.7),
                ],
            ),
            TreeNode::branch(
                "NES",
                vec![TreeNode::leaf("Super Mario Bros.", 40.24), TreeNode::leaf("Duck Hunt", 28.31)],
            ),
            TreeNode::branch("GB", vec![TreeNode::leaf("Pokemon Red", 31.37)]),
        ],
    );
    let out = layout(&root, 960.0, 570.0, 1.0, TilingMethod::Squarify).unwrap();
    assert_eq!(out.leaves().len(), 6);
    assert_tiles(&out, 1.0);
}

#[test]
fn test_rejects_negative_value() {
    let root = TreeNode::branch("root", vec![TreeNode::leaf("bad", -1.0)]);
    assert!(matches!(
        layout(&root, 10.0, 10.0, 0.0, TilingMethod::Squarify),
        Err(LayoutError::InvalidValue { .. })
    ));
}

#[test]
fn test_rejects_overflowing_total() {
    let root = TreeNode::branch(
        "root",
        vec![TreeNode::leaf("a", 1e308), TreeNode::leaf("b", 1e308)],
    );
    match layout(&root, 100.0, 100.0, 0.0, TilingMethod::Squarify) {
        Err(LayoutError::InvalidValue { name, value }) => {
            assert_eq!(name, "root");
            assert!(value.is_infinite());
        }
        other => panic!("unexpected layout result: {other:?}"),
    }
}

#[test]
fn test_huge_finite_total_stays_proportional() {
    let root = TreeNode::branch(
        "root",
        vec![TreeNode::leaf("a", 8e307), TreeNode::leaf("b", 8e307)],
    );
    for tiling in [TilingMethod::Squarify, TilingMethod::SliceDice] {
        let out = layout(&root, 100.0, 100.0, 0.0, tiling).unwrap();
        for child in &out.children {
            assert!((child.rect.area() - 5000.0).abs() < EPS, "{}: {:?}", child.name, child.rect);
        }
        assert_tiles(&out, 0.0);
    }
}

#[test]
fn test_rejects_bad_extent() {
    let root = TreeNode::leaf("x", 1.0);
    assert!(matches!(
        layout(&root, -10.0, 10.0, 0.0, TilingMethod::Squarify),
        Err(LayoutError::InvalidExtent { .. })
    ));
    assert!(matches!(
        layout(&root, 10.0, 10.0, f64::NAN, TilingMethod::Squarify),
        Err(LayoutError::InvalidExtent { .. })
    ));
}

#[test]
fn test_leaf_root_takes_whole_canvas() {
    let out = layout(&TreeNode::leaf("x", 3.0), 10.0, 5.0, 1.0, TilingMethod::Squarify).unwrap();
    assert_eq!(out.rect, Rectangle::new(0.0, 0.0, 10.0, 5.0));
    assert!(out.is_leaf());
}

fn arb_tree() -> impl Strategy<Value = TreeNode> {
    let leaf = (0u32..100).prop_map(|v| TreeNode::leaf("leaf", v as f64));
    leaf.prop_recursive(3, 40, 6, |inner| {
        prop::collection::vec(inner, 1..6).prop_map(|children| TreeNode::branch("node", children))
    })
}

proptest! {
    #[test]
    fn children_tile_parent(
        tree in arb_tree(),
        width in 1.0f64..2000.0,
        height in 1.0f64..2000.0,
        padding in 0.0f64..3.0,
        squarify in any::<bool>(),
    ) {
        let tiling = if squarify { TilingMethod::Squarify } else { TilingMethod::SliceDice };
        let out = layout(&tree, width, height, padding, tiling).unwrap();
        assert_tiles(&out, padding);
    }
}
