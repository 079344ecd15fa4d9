use serde::{Deserialize, Serialize};

/// The two entity collections managed by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Group,
    Category,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Group => "group",
            EntityKind::Category => "category",
        }
    }

    /// Capitalized label for user-facing messages ("Group created successfully").
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Group => "Group",
            EntityKind::Category => "Category",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
