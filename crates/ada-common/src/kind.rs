use serde::Serialize;

/// Every declaration category the parser can tag, plus two internal
/// sentinels (`Separate`, `Undefined`) that are built and linked into the
/// token tree but never reach the emitter.
///
/// A [`Token`](crate::reader) (really: a parser-side tree node) always
/// stores the *base* kind here -- `Package`, never `PackageSpec`. The
/// emitter promotes a base kind to its spec variant when the token's
/// `is_spec` flag is set; see [`Kind::spec_variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Package,
    PackageSpec,
    Type,
    TypeSpec,
    Subtype,
    SubtypeSpec,
    RecordComponent,
    EnumLiteral,
    Variable,
    VariableSpec,
    Formal,
    Constant,
    Exception,
    Subprogram,
    SubprogramSpec,
    Task,
    TaskSpec,
    Protected,
    ProtectedSpec,
    Entry,
    EntrySpec,
    Label,
    Identifier,
    AutomaticVariable,
    Anonymous,
    /// Sentinel carrying the parent name of a `separate` unit. Never
    /// emitted; exists only to give its children a scope.
    Separate,
    /// Sentinel kind of the tree root, and of a spec-only kind with no
    /// spec form after emit-time promotion fails (§4.12 step 1).
    Undefined,
}

/// The per-kind attributes the emitter and the host option table read:
/// a single-letter tag, a long name, and whether the kind is enabled by
/// default. This mirrors the table in the external interface section
/// verbatim -- note that `SubprogramSpec`, `TaskSpec`, and `ProtectedSpec`
/// are `on` by default even though they are spec kinds; the table, not
/// the "spec kinds are off by default" rule of thumb, is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub letter: char,
    pub long_name: &'static str,
    pub default_enabled: bool,
}

impl Kind {
    pub fn info(self) -> KindInfo {
        use Kind::*;
        let (letter, long_name, default_enabled) = match self {
            PackageSpec => ('P', "packspec", false),
            Package => ('p', "package", true),
            TypeSpec => ('T', "typespec", false),
            Type => ('t', "type", true),
            SubtypeSpec => ('U', "subspec", false),
            Subtype => ('u', "subtype", true),
            RecordComponent => ('c', "component", true),
            EnumLiteral => ('l', "literal", true),
            VariableSpec => ('V', "varspec", false),
            Variable => ('v', "variable", true),
            Formal => ('f', "formal", true),
            Constant => ('n', "constant", true),
            Exception => ('x', "exception", true),
            SubprogramSpec => ('R', "subprogspec", true),
            Subprogram => ('r', "subprogram", true),
            TaskSpec => ('K', "taskspec", true),
            Task => ('k', "task", true),
            ProtectedSpec => ('O', "protectspec", true),
            Protected => ('o', "protected", true),
            EntrySpec => ('E', "entryspec", false),
            Entry => ('e', "entry", true),
            Label => ('b', "label", true),
            Identifier => ('i', "identifier", true),
            AutomaticVariable => ('a', "autovar", false),
            Anonymous => ('y', "annon", false),
            // Sentinels are never consulted by the emitter (it checks
            // `is_emittable` first), but every variant needs a mapping.
            Separate => ('?', "separate", false),
            Undefined => ('?', "undefined", false),
        };
        KindInfo {
            letter,
            long_name,
            default_enabled,
        }
    }

    /// Whether this kind ever appears in an emitted tag. `Separate` and
    /// `Undefined` are internal bookkeeping only.
    pub fn is_emittable(self) -> bool {
        !matches!(self, Kind::Separate | Kind::Undefined)
    }

    /// The spec-kind counterpart of a base kind, if Ada lets this kind of
    /// declaration be a spec without a body. Returns `None` for kinds
    /// that have no spec form (component, literal, formal, constant,
    /// exception, label, identifier, autovar, anonymous) and for kinds
    /// that are already spec variants.
    pub fn spec_variant(self) -> Option<Kind> {
        use Kind::*;
        match self {
            Package => Some(PackageSpec),
            Type => Some(TypeSpec),
            Subtype => Some(SubtypeSpec),
            Variable => Some(VariableSpec),
            Subprogram => Some(SubprogramSpec),
            Task => Some(TaskSpec),
            Protected => Some(ProtectedSpec),
            Entry => Some(EntrySpec),
            _ => None,
        }
    }
}
