use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use huddle_core::{DomainError, DomainResult, EmailSet, Entity, GroupId};

use crate::kind::EntityKind;

/// An attendee group: a named set of people from one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeGroup {
    pub id: GroupId,
    pub name: String,
    pub department: String,
    pub emails: EmailSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for AttendeeGroup {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AttendeeGroup {
    /// Build a group from creation input, stamping both timestamps with `now`.
    ///
    /// Used by the authoritative store and, with a local clock, as the optimistic
    /// placeholder until the server's copy arrives.
    pub fn from_new(new: &NewGroup, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id.clone(),
            name: new.name.trim().to_string(),
            department: new.department.trim().to_string(),
            emails: new.emails.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this group.
    ///
    /// The identifier and `created_at` are always preserved, as is every field the
    /// patch leaves unset.
    pub fn apply_patch(&self, patch: &GroupPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            name: patch
                .name
                .as_deref()
                .map(str::trim)
                .map_or_else(|| self.name.clone(), str::to_string),
            department: patch
                .department
                .as_deref()
                .map(str::trim)
                .map_or_else(|| self.department.clone(), str::to_string),
            emails: patch.emails.clone().unwrap_or_else(|| self.emails.clone()),
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Creation input for an attendee group. The identifier is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub id: GroupId,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub emails: EmailSet,
}

impl NewGroup {
    pub fn new(
        id: GroupId,
        name: impl Into<String>,
        department: impl Into<String>,
        emails: EmailSet,
    ) -> DomainResult<Self> {
        let new = Self {
            id,
            name: name.into(),
            department: department.into(),
            emails,
        };
        new.validate()?;
        Ok(new)
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text(EntityKind::Group, "name", &self.name)?;
        require_text(EntityKind::Group, "department", &self.department)
    }
}

/// Partial update for an attendee group: any subset of name/department/emails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<EmailSet>,
}

impl GroupPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn emails(mut self, emails: EmailSet) -> Self {
        self.emails = Some(emails);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            require_text(EntityKind::Group, "name", name)?;
        }
        if let Some(department) = &self.department {
            require_text(EntityKind::Group, "department", department)?;
        }
        Ok(())
    }
}

pub(crate) fn require_text(kind: EntityKind, field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::validation(format!("{kind} {field} must not be blank")))
    } else {
        Ok(())
    }
}
