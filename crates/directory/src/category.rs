use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use huddle_core::{CategoryId, DomainResult, Entity, GroupId};

use crate::group::{AttendeeGroup, require_text};
use crate::kind::EntityKind;

/// A product category and the raw identifiers of the groups it requires.
///
/// The category owns the relation; groups never hold a back-link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: CategoryId,
    pub name: String,
    pub required_group_ids: BTreeSet<GroupId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for ProductCategory {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProductCategory {
    pub fn from_new(new: &NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id.clone(),
            name: new.name.trim().to_string(),
            required_group_ids: new.required_group_ids.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update. A present `required_group_ids` replaces the whole
    /// reference set; it is never unioned with the old one.
    pub fn apply_patch(&self, patch: &CategoryPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            name: patch
                .name
                .as_deref()
                .map(str::trim)
                .map_or_else(|| self.name.clone(), str::to_string),
            required_group_ids: patch
                .required_group_ids
                .clone()
                .unwrap_or_else(|| self.required_group_ids.clone()),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Join this category with the groups its references resolve to.
    ///
    /// References the lookup cannot resolve are left out of `required_groups` but
    /// stay in `required_group_ids`.
    pub fn with_groups<'a, F>(&self, mut lookup: F) -> CategoryWithGroups
    where
        F: FnMut(&GroupId) -> Option<&'a AttendeeGroup>,
    {
        let required_groups = self
            .required_group_ids
            .iter()
            .filter_map(|id| lookup(id).cloned())
            .collect();

        CategoryWithGroups {
            id: self.id.clone(),
            name: self.name.clone(),
            required_group_ids: self.required_group_ids.clone(),
            required_groups,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A category with its required groups materialized for display.
///
/// This is also the shape the admin API returns for categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithGroups {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub required_group_ids: BTreeSet<GroupId>,
    #[serde(default)]
    pub required_groups: Vec<AttendeeGroup>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryWithGroups {
    /// Strip the materialized join back to the raw reference set.
    ///
    /// Ids of materialized groups are folded into the reference set so a payload
    /// that only carries `requiredGroups` still round-trips.
    pub fn to_category(&self) -> ProductCategory {
        let mut required_group_ids = self.required_group_ids.clone();
        required_group_ids.extend(self.required_groups.iter().map(|g| g.id.clone()));

        ProductCategory {
            id: self.id.clone(),
            name: self.name.clone(),
            required_group_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Creation input for a product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub required_group_ids: BTreeSet<GroupId>,
}

impl NewCategory {
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        required_group_ids: impl IntoIterator<Item = GroupId>,
    ) -> DomainResult<Self> {
        let new = Self {
            id,
            name: name.into(),
            required_group_ids: required_group_ids.into_iter().collect(),
        };
        new.validate()?;
        Ok(new)
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text(EntityKind::Category, "name", &self.name)
    }
}

/// Partial update for a product category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_group_ids: Option<BTreeSet<GroupId>>,
}

impl CategoryPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn required_groups(mut self, ids: impl IntoIterator<Item = GroupId>) -> Self {
        self.required_group_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => require_text(EntityKind::Category, "name", name),
            None => Ok(()),
        }
    }
}
