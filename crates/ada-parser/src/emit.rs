//! The post-name-resolution walk that turns a [`TokenTree`] into the
//! sink's [`TagEntry`] stream (§4.12).
//!
//! This pass never mutates the tree: the one-way spec-kind promotion is
//! computed on the fly from `is_spec` rather than written back into
//! `TokenNode::kind`, since every [`TokenId`] is only ever visited once
//! and nothing downstream needs the pre-promotion value again.

use ada_common::{Kind, TagEntry, TagOptions, TagSink};

use crate::tree::{TokenId, TokenNode, TokenTree};

/// Kinds that never participate in the dotted-name qualification chain
/// (§4.12 step 5): a qualified tag would be meaningless for a record
/// field, an enum literal, a generic formal, a label, a block
/// identifier, a parameter/loop variable, or a synthetic anonymous
/// frame.
const QUALIFICATION_EXCLUDED: [Kind; 7] = [
    Kind::RecordComponent,
    Kind::EnumLiteral,
    Kind::Formal,
    Kind::Label,
    Kind::Identifier,
    Kind::AutomaticVariable,
    Kind::Anonymous,
];

/// The kind a token presents to the emitter: its stored `kind`, promoted
/// to the spec variant when `is_spec` is set and a spec variant exists.
/// Falls back to `Kind::Undefined` -- never emitted -- when `is_spec` is
/// set but the kind has no spec form (§4.12 step 1).
fn effective_kind(node: &TokenNode) -> Kind {
    if node.is_spec {
        node.kind.spec_variant().unwrap_or(Kind::Undefined)
    } else {
        node.kind
    }
}

/// The synthetic display name for a node: a real name is used as-is; an
/// unnamed `Anonymous` token (a `declare`/`begin` frame, as opposed to a
/// `loop` frame, which is already named at creation) gets the name
/// `declare` if it has children, and stays nameless -- and unemittable
/// -- otherwise (§4.12 step 3).
fn display_name(node: &TokenNode) -> Option<String> {
    if node.kind == Kind::Anonymous && node.name.is_none() {
        if node.children.is_empty() {
            None
        } else {
            Some("declare".to_string())
        }
    } else {
        node.name.clone()
    }
}

/// The immediate-parent `(kind_long_name, name)` pair recorded on a
/// tag, per §4.12 step 2. `Separate` parents report a synthetic
/// `"separate"` kind name rather than their own (unemittable) kind.
fn scope_for(tree: &TokenTree, parent: TokenId) -> Option<(String, String)> {
    if parent == tree.root() {
        return None;
    }
    let node = tree.get(parent);
    if node.kind == Kind::Separate {
        return node.name.clone().map(|name| ("separate".to_string(), name));
    }
    let eff = effective_kind(node);
    if !eff.is_emittable() {
        return None;
    }
    node.name.clone().map(|name| (eff.info().long_name.to_string(), name))
}

/// Walks the tree in source order (§2 "emitter", P6), emitting tags to
/// `sink` according to `options`.
pub fn emit_tags(tree: &TokenTree, options: &TagOptions, sink: &mut dyn TagSink) {
    let root = tree.root();
    for &child in &tree.get(root).children {
        emit_node(tree, child, options, None, sink);
    }
}

fn emit_node(
    tree: &TokenTree,
    id: TokenId,
    options: &TagOptions,
    parent_scope: Option<String>,
    sink: &mut dyn TagSink,
) {
    let node = tree.get(id);
    let eff = effective_kind(node);
    let name = display_name(node);
    let scope = scope_for(tree, node.parent);

    let emittable = eff.is_emittable()
        && options.is_enabled(eff)
        && name.is_some()
        && (node.kind != Kind::Anonymous || !node.children.is_empty())
        && (options.file_scope || !node.is_file_scope);

    if emittable {
        sink.make_tag(TagEntry {
            name: name.clone().unwrap(),
            kind: eff,
            scope: scope.clone(),
            position: node.position,
            is_file_scope: node.is_file_scope,
            is_qualified: false,
        });
    }

    let mut next_scope = parent_scope.clone();
    if options.qualified_tags && !QUALIFICATION_EXCLUDED.contains(&node.kind) {
        if let Some(name) = &name {
            match &parent_scope {
                Some(outer) => {
                    let qualified = format!("{outer}.{name}");
                    if emittable {
                        sink.make_tag(TagEntry {
                            name: qualified.clone(),
                            kind: eff,
                            scope: scope.clone(),
                            position: node.position,
                            is_file_scope: node.is_file_scope,
                            is_qualified: true,
                        });
                    }
                    next_scope = Some(qualified);
                }
                None => next_scope = Some(name.clone()),
            }
        }
    }

    for &child in &tree.get(id).children {
        emit_node(tree, child, options, next_scope.clone(), sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ada_common::{Position, VecSink};

    fn pos(line: u32) -> Position {
        Position::new(line, 0)
    }

    #[test]
    fn emits_a_package_and_its_spec_variable() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let pkg = tree.new_token(Some("P".into()), Kind::Package, true, root, pos(1));
        tree.new_token(Some("X".into()), Kind::Variable, false, pkg, pos(1));

        let mut sink = VecSink::new();
        emit_tags(&tree, &TagOptions::new(), &mut sink);

        assert_eq!(sink.tags.len(), 2);
        assert_eq!(sink.tags[0].name, "P");
        assert_eq!(sink.tags[0].kind, Kind::Package);
        assert_eq!(sink.tags[0].scope, None);
        assert_eq!(sink.tags[1].name, "X");
        assert_eq!(sink.tags[1].kind, Kind::Variable);
        assert_eq!(
            sink.tags[1].scope,
            Some(("package".to_string(), "P".to_string()))
        );
    }

    #[test]
    fn file_scope_false_filters_file_scoped_tags() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let pkg = tree.new_token(Some("P".into()), Kind::Package, false, root, pos(1));
        tree.new_token(Some("X".into()), Kind::Variable, false, pkg, pos(2));

        let mut opts = TagOptions::new();
        opts.file_scope = false;
        let mut sink = VecSink::new();
        emit_tags(&tree, &opts, &mut sink);

        assert_eq!(sink.tags.len(), 1);
        assert_eq!(sink.tags[0].name, "P");
    }

    #[test]
    fn anonymous_token_without_children_is_not_emitted() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        tree.new_token(None, Kind::Anonymous, false, root, pos(1));

        let mut sink = VecSink::new();
        emit_tags(&tree, &TagOptions::new(), &mut sink);
        assert!(sink.tags.is_empty());
    }

    #[test]
    fn anonymous_token_with_children_emits_as_declare() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let mut opts = TagOptions::new();
        opts.set_enabled(Kind::Anonymous, true);
        let anon = tree.new_token(None, Kind::Anonymous, false, root, pos(1));
        tree.new_token(Some("V".into()), Kind::Variable, false, anon, pos(2));

        let mut sink = VecSink::new();
        emit_tags(&tree, &opts, &mut sink);
        assert_eq!(sink.tags[0].name, "declare");
    }

    #[test]
    fn loop_token_keeps_its_own_name() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let mut opts = TagOptions::new();
        opts.set_enabled(Kind::Anonymous, true);
        tree.new_token(Some("loop".into()), Kind::Anonymous, false, root, pos(1));

        let mut sink = VecSink::new();
        emit_tags(&tree, &opts, &mut sink);
        assert_eq!(sink.tags[0].name, "loop");
    }

    #[test]
    fn spec_promotion_applies_only_at_emit_time() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        tree.new_token(Some("Q".into()), Kind::Subprogram, true, root, pos(1));

        let mut sink = VecSink::new();
        emit_tags(&tree, &TagOptions::new(), &mut sink);
        assert_eq!(sink.tags[0].kind, Kind::SubprogramSpec);
    }

    #[test]
    fn kind_with_no_spec_variant_is_suppressed_when_marked_spec() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        // RecordComponent has no spec form; is_spec=true here models a
        // malformed tree that should never actually occur, but the
        // emitter must not crash or invent a kind for it.
        tree.new_token(Some("F".into()), Kind::RecordComponent, true, root, pos(1));

        let mut sink = VecSink::new();
        emit_tags(&tree, &TagOptions::new(), &mut sink);
        assert!(sink.tags.is_empty());
    }

    #[test]
    fn separate_sentinel_gives_children_a_synthetic_scope_and_is_never_emitted() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let sep = tree.new_token(Some("Parent.Child".into()), Kind::Separate, false, root, Position::ZERO);
        tree.new_token(Some("X".into()), Kind::Package, false, sep, pos(1));

        let mut sink = VecSink::new();
        emit_tags(&tree, &TagOptions::new(), &mut sink);

        assert_eq!(sink.tags.len(), 1);
        assert_eq!(sink.tags[0].name, "X");
        assert_eq!(
            sink.tags[0].scope,
            Some(("separate".to_string(), "Parent.Child".to_string()))
        );
    }

    #[test]
    fn qualified_tags_emit_a_second_dotted_entry() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let pkg = tree.new_token(Some("Outer".into()), Kind::Package, false, root, pos(1));
        let inner = tree.new_token(Some("Inner".into()), Kind::Package, false, pkg, pos(2));
        tree.new_token(Some("X".into()), Kind::Variable, false, inner, pos(3));

        let mut opts = TagOptions::new();
        opts.qualified_tags = true;
        let mut sink = VecSink::new();
        emit_tags(&tree, &opts, &mut sink);

        let names: Vec<&str> = sink.tags.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"Outer"));
        assert!(names.contains(&"Inner"));
        assert!(names.contains(&"Outer.Inner"));
        assert!(names.contains(&"Outer.Inner.X"));
        let qualified_count = sink.tags.iter().filter(|t| t.is_qualified).count();
        assert_eq!(qualified_count, 2);
    }

    #[test]
    fn qualification_excluded_kinds_do_not_get_a_second_emission() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let ty = tree.new_token(Some("Color".into()), Kind::Type, false, root, pos(1));
        tree.new_token(Some("Red".into()), Kind::EnumLiteral, false, ty, pos(1));

        let mut opts = TagOptions::new();
        opts.qualified_tags = true;
        let mut sink = VecSink::new();
        emit_tags(&tree, &opts, &mut sink);

        assert!(!sink.tags.iter().any(|t| t.name == "Color.Red"));
    }
}
