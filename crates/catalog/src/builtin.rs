use crate::{Catalog, Result};

const BUILTIN_CHECKLIST: &str = include_str!("../../../catalogs/checklist.json");
const BUILTIN_RESOURCES: &str = include_str!("../../../catalogs/resources.json");

/// Catalogs compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCatalog {
    /// Course units and their steps.
    Checklist,
    /// The resource finder's single "All resources" group.
    Resources,
}

impl BuiltinCatalog {
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinCatalog::Checklist => "checklist",
            BuiltinCatalog::Resources => "resources",
        }
    }

    pub const fn source(self) -> &'static str {
        match self {
            BuiltinCatalog::Checklist => BUILTIN_CHECKLIST,
            BuiltinCatalog::Resources => BUILTIN_RESOURCES,
        }
    }

    pub fn load(self) -> Result<Catalog> {
        Catalog::from_json_str(self.source())
    }
}
