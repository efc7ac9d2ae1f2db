//! The token tree: an arena of [`TokenNode`]s forming an ordered,
//! parent-owns-children forest rooted at a single `Undefined` sentinel.
//!
//! Per the design notes, this is represented as an index-based arena
//! (`Vec<TokenNode>` plus a root at index 0) with a `parent: TokenId` and
//! a `children: Vec<TokenId>` on each node, rather than an
//! owned-parent/weak-child graph -- this sidesteps aliasing issues for
//! the cyclic-looking parent/child shape while preserving every
//! invariant: child ownership, source order, a single parent, one-way
//! spec promotion (applied only by the emitter), and bulk re-parenting of
//! detached generic formals.

use ada_common::{Kind, Position};

/// An index into a [`TokenTree`]'s arena. Index 0 is always the root
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(u32);

impl TokenId {
    pub const ROOT: TokenId = TokenId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node in the token tree. Mutated only by the parser routine that
/// created it, and by the emit pass (spec promotion, anonymous-name
/// substitution) -- see `ada_parser::emit`.
#[derive(Debug, Clone)]
pub struct TokenNode {
    pub name: Option<String>,
    pub kind: Kind,
    pub is_spec: bool,
    pub is_private: bool,
    pub position: Position,
    pub is_file_scope: bool,
    pub parent: TokenId,
    pub children: Vec<TokenId>,
}

/// The token tree itself: an arena with a root sentinel at index 0.
pub struct TokenTree {
    nodes: Vec<TokenNode>,
}

impl TokenTree {
    /// Creates a tree containing only the root sentinel: kind
    /// `Undefined`, no name, parented to itself.
    pub fn new() -> Self {
        let root = TokenNode {
            name: None,
            kind: Kind::Undefined,
            is_spec: false,
            is_private: false,
            position: Position::ZERO,
            is_file_scope: false,
            parent: TokenId::ROOT,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> TokenId {
        TokenId::ROOT
    }

    pub fn get(&self, id: TokenId) -> &TokenNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: TokenId) -> &mut TokenNode {
        &mut self.nodes[id.index()]
    }

    /// Whether `parent` currently qualifies as a non-private spec of a
    /// scope-opening kind, per the §3 invariant for `is_file_scope`.
    fn parent_is_open_spec(&self, parent: TokenId) -> bool {
        if parent == TokenId::ROOT {
            return false;
        }
        let node = self.get(parent);
        if node.is_private {
            return false;
        }
        node.is_spec
            && matches!(
                node.kind,
                Kind::Package | Kind::Subprogram | Kind::Protected | Kind::Task
            )
    }

    /// Computes `is_file_scope` for a new child of `parent`, per the §3
    /// invariant: false iff the parent is the root, a `Separate`
    /// sentinel, or a non-private spec of package/subprogram/
    /// protected/task; true otherwise.
    fn compute_is_file_scope(&self, parent: TokenId) -> bool {
        if parent == TokenId::ROOT {
            return false;
        }
        if self.get(parent).kind == Kind::Separate {
            return false;
        }
        !self.parent_is_open_spec(parent)
    }

    /// Creates a new token, computes its `is_file_scope`, and links it as
    /// the last child of `parent`.
    pub fn new_token(
        &mut self,
        name: Option<String>,
        kind: Kind,
        is_spec: bool,
        parent: TokenId,
        position: Position,
    ) -> TokenId {
        let is_file_scope = self.compute_is_file_scope(parent);
        let id = TokenId(self.nodes.len() as u32);
        self.nodes.push(TokenNode {
            name,
            kind,
            is_spec,
            is_private: false,
            position,
            is_file_scope,
            parent,
            children: Vec::new(),
        });
        self.get_mut(parent).children.push(id);
        id
    }

    /// Re-parents every node in `list` onto `parent`, in order, then
    /// empties `list`. Used to attach generic formals collected at a
    /// frame onto the subject that follows them.
    ///
    /// `is_file_scope` is recomputed against the real parent: formals are
    /// created detached (parent = the tree root, a placeholder) so their
    /// file-scope bit would otherwise reflect that placeholder rather
    /// than the subject they end up attached to.
    pub fn append_tokens(&mut self, parent: TokenId, list: &mut Vec<TokenId>) {
        for id in list.drain(..) {
            let old_parent = self.get(id).parent;
            self.get_mut(old_parent).children.retain(|&c| c != id);
            let is_file_scope = self.compute_is_file_scope(parent);
            let node = self.get_mut(id);
            node.parent = parent;
            node.is_file_scope = is_file_scope;
            self.get_mut(parent).children.push(id);
        }
    }

    pub fn mark_private(&mut self, id: TokenId) {
        self.get_mut(id).is_private = true;
    }

    pub fn set_is_spec(&mut self, id: TokenId, is_spec: bool) {
        self.get_mut(id).is_spec = is_spec;
    }

    /// Discards a token created in error (e.g. a `separate` stub, a
    /// forward declaration later found to live elsewhere). Only ever
    /// called on the most recently created child of its parent, before
    /// any further tokens have been attached to it, so a simple removal
    /// from the parent's children list is sufficient -- this never runs
    /// during emit.
    pub fn free_token(&mut self, id: TokenId) {
        let parent = self.get(id).parent;
        self.get_mut(parent).children.retain(|&c| c != id);
    }
}

impl Default for TokenTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_undefined_and_unparented() {
        let tree = TokenTree::new();
        let root = tree.get(tree.root());
        assert_eq!(root.kind, Kind::Undefined);
        assert!(root.name.is_none());
    }

    #[test]
    fn child_of_root_is_not_file_scoped() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let p = tree.new_token(Some("P".into()), Kind::Package, true, root, Position::new(1, 0));
        assert!(!tree.get(p).is_file_scope);
    }

    #[test]
    fn child_of_open_package_spec_is_not_file_scoped() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let p = tree.new_token(Some("P".into()), Kind::Package, true, root, Position::new(1, 0));
        let x = tree.new_token(Some("X".into()), Kind::Variable, false, p, Position::new(1, 0));
        assert!(!tree.get(x).is_file_scope);
    }

    #[test]
    fn child_created_after_private_marker_is_file_scoped() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let p = tree.new_token(Some("P".into()), Kind::Package, true, root, Position::new(1, 0));
        tree.mark_private(p);
        let r = tree.new_token(Some("R".into()), Kind::Variable, false, p, Position::new(3, 0));
        assert!(tree.get(r).is_file_scope);
    }

    #[test]
    fn child_of_package_body_is_file_scoped() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let p = tree.new_token(Some("P".into()), Kind::Package, false, root, Position::new(1, 0));
        let x = tree.new_token(Some("X".into()), Kind::Variable, false, p, Position::new(2, 0));
        assert!(tree.get(x).is_file_scope);
    }

    #[test]
    fn child_of_separate_sentinel_is_not_file_scoped() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let sep = tree.new_token(Some("Parent".into()), Kind::Separate, false, root, Position::ZERO);
        let x = tree.new_token(Some("X".into()), Kind::Variable, false, sep, Position::new(1, 0));
        assert!(!tree.get(x).is_file_scope);
    }

    #[test]
    fn append_tokens_reparents_and_empties_list() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let mut formals = Vec::new();
        let t = tree.new_token(Some("T".into()), Kind::Formal, false, root, Position::ZERO);
        formals.push(t);
        let g = tree.new_token(Some("G".into()), Kind::Package, true, root, Position::new(5, 0));
        tree.append_tokens(g, &mut formals);
        assert!(formals.is_empty());
        assert_eq!(tree.get(g).children, vec![t]);
        // The formal must not remain linked under its placeholder parent
        // too, or it would be emitted twice (once at top level, once
        // under its subject).
        assert_eq!(tree.get(root).children, vec![g]);
    }

    #[test]
    fn children_preserve_source_order() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let p = tree.new_token(Some("P".into()), Kind::Package, true, root, Position::new(1, 0));
        let a = tree.new_token(Some("A".into()), Kind::Variable, false, p, Position::new(2, 0));
        let b = tree.new_token(Some("B".into()), Kind::Variable, false, p, Position::new(3, 0));
        assert_eq!(tree.get(p).children, vec![a, b]);
    }

    #[test]
    fn free_token_unlinks_from_parent() {
        let mut tree = TokenTree::new();
        let root = tree.root();
        let p = tree.new_token(Some("P".into()), Kind::Separate, false, root, Position::ZERO);
        assert_eq!(tree.get(root).children.len(), 1);
        tree.free_token(p);
        assert!(tree.get(root).children.is_empty());
    }
}
