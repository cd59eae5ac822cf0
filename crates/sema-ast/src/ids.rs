//! Dense integer handles into the AST/IR arenas (§6, §9 "large typed arenas").
//!
//! Every AST node is addressed by a small integer handle rather than a pointer, so
//! arenas are plain `Vec`s and maps keyed by handle are flat or `FxHashMap`.

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(u32::MAX);

            pub const fn is_none(self) -> bool {
                self.0 == u32::MAX
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::NONE
            }
        }
    };
}

define_id!(ExprId);
define_id!(StmtId);
define_id!(ItemId);
define_id!(TypeExprId);
define_id!(ParamId);
define_id!(AttrId);
define_id!(FieldId);
