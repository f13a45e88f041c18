//! Tests for the `ContextTree` contract's default methods across both
//! shipped representations.

use contree::render::to_termtree;
use contree::util::testing;
use contree::{ContextTree, CtxArena, CtxData, ProfileNodeRef, ProfileTree, TreeError};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn arena_tree() -> CtxArena {
    let mut tree = CtxArena::new("run-17");
    let root = tree.insert_node(CtxData::new("main", 1), None);
    let parse = tree.insert_node(CtxData::new("parse", 5), Some(root));
    tree.insert_node(CtxData::new("lex", 7), Some(parse));
    tree.insert_node(CtxData::new("emit", 2), Some(root));
    tree
}

fn profile_tree() -> ProfileTree {
    let main = ProfileNodeRef::new("main", 1);
    let parse = ProfileNodeRef::new("parse", 5);
    let emit = ProfileNodeRef::new("emit", 2);
    main.add_child(&parse);
    main.add_child(&emit);
    parse.add_child(&ProfileNodeRef::new("lex", 7));
    ProfileTree::new("run-17", main)
}

#[test]
fn given_arena_tree_when_indexing_child_out_of_range_then_returns_error() {
    let tree = arena_tree();
    let root = tree.root();

    assert!(tree.child(&root, 0).is_ok());
    assert!(tree.child(&root, 1).is_ok());

    let err = tree.child(&root, 2).unwrap_err();
    assert!(matches!(
        err,
        TreeError::ChildIndexOutOfRange { index: 2, count: 2 }
    ));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn given_arena_tree_when_looking_up_child_by_label_then_finds_or_none() {
    let tree = arena_tree();
    let root = tree.root();

    let parse = tree.child_with_label(&root, &"parse".to_string()).unwrap();
    assert_eq!(tree.label(&parse), "parse");
    assert!(tree.child_with_label(&root, &"link".to_string()).is_none());
}

#[test]
fn given_arena_tree_when_querying_structure_then_contract_holds() {
    let tree = arena_tree();
    let root = tree.root();
    let parse = tree.child(&root, 0).unwrap();
    let emit = tree.child(&root, 1).unwrap();

    assert_eq!(tree.name(), "run-17");
    assert!(tree.is_root(&root));
    assert!(!tree.is_root(&parse));
    assert_eq!(tree.parent(&parse), Some(root));
    assert_eq!(tree.parent(&root), None);
    assert_eq!(tree.child_count(&root), 2);
    assert_eq!(tree.index_of_child(&root, &parse), Some(0));
    assert_eq!(tree.index_of_child(&root, &emit), Some(1));
    assert_eq!(tree.index_of_child(&parse, &emit), None);
}

#[test]
fn given_profile_tree_when_querying_structure_then_same_contract_holds() {
    let tree = profile_tree();
    let root = tree.root();
    let parse = tree.child_with_label(&root, &"parse".to_string()).unwrap();

    assert_eq!(tree.label(&root), "main");
    assert_eq!(tree.parent(&parse), Some(root.clone()));
    assert!(tree.is_root(&root));
    assert_eq!(tree.child_count(&parse), 1);
    assert_eq!(tree.index_of_child(&root, &parse), Some(0));

    let err = tree.child(&parse, 5).unwrap_err();
    assert!(matches!(
        err,
        TreeError::ChildIndexOutOfRange { index: 5, count: 1 }
    ));
}

#[test]
fn given_children_when_iterating_twice_then_sequence_is_restartable() {
    let tree = arena_tree();
    let root = tree.root();

    let first: Vec<String> = tree.children(&root).iter().map(|c| tree.label(c)).collect();
    let second: Vec<String> = tree.children(&root).iter().map(|c| tree.label(c)).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec!["parse", "emit"]);
}

#[test]
fn given_any_representation_when_rendering_then_labels_appear_in_order() {
    let rendered = to_termtree(&arena_tree()).to_string();
    assert!(rendered.contains("main"));
    assert!(rendered.contains("lex"));

    let profile_rendered = profile_tree().to_string();
    let parse_pos = profile_rendered.find("parse").unwrap();
    let emit_pos = profile_rendered.find("emit").unwrap();
    assert!(parse_pos < emit_pos);
}
