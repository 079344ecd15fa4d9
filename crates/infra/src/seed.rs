//! Default directory contents used by dev servers and tests.

use huddle_core::{CategoryId, DomainResult, EmailSet, GroupId};
use huddle_directory::{NewCategory, NewGroup};

use crate::repository::{DirectoryRepository, InMemoryDirectory, RepositoryResult};

pub fn default_groups() -> DomainResult<Vec<NewGroup>> {
    Ok(vec![
        NewGroup::new(
            GroupId::new("tech-team")?,
            "Technical Team",
            "Technology",
            EmailSet::parse(["tech.lead@flexothene.com", "developer@flexothene.com"])?,
        )?,
        NewGroup::new(
            GroupId::new("product-team")?,
            "Product Team",
            "Product",
            EmailSet::parse(["product.manager@flexothene.com", "product.owner@flexothene.com"])?,
        )?,
        NewGroup::new(
            GroupId::new("qa-team")?,
            "QA Team",
            "Quality Assurance",
            EmailSet::parse(["qa.lead@flexothene.com", "qa.engineer@flexothene.com"])?,
        )?,
    ])
}

pub fn default_categories() -> DomainResult<Vec<NewCategory>> {
    Ok(vec![
        NewCategory::new(
            CategoryId::new("technical-review")?,
            "Technical Review",
            [GroupId::new("tech-team")?, GroupId::new("qa-team")?],
        )?,
        NewCategory::new(
            CategoryId::new("product-planning")?,
            "Product Planning",
            [GroupId::new("product-team")?, GroupId::new("tech-team")?],
        )?,
        NewCategory::new(
            CategoryId::new("qa-review")?,
            "QA Review",
            [GroupId::new("qa-team")?],
        )?,
    ])
}

/// Load the default groups, then the default categories, into `repo`.
pub fn seed(repo: &dyn DirectoryRepository) -> RepositoryResult<()> {
    for group in default_groups()? {
        repo.create_group(group)?;
    }
    for category in default_categories()? {
        repo.create_category(category)?;
    }
    tracing::info!("directory seeded with default groups and categories");
    Ok(())
}

/// A fresh in-memory directory holding the default data.
pub fn seeded() -> RepositoryResult<InMemoryDirectory> {
    let repo = InMemoryDirectory::new();
    seed(&repo)?;
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_directory_resolves_every_reference() {
        let repo = seeded().unwrap();

        assert_eq!(repo.list_groups().unwrap().len(), 3);
        let categories = repo.list_categories().unwrap();
        assert_eq!(categories.len(), 3);
        for category in categories {
            assert_eq!(category.required_groups.len(), category.required_group_ids.len());
        }
    }

    #[test]
    fn seeding_twice_conflicts() {
        let repo = seeded().unwrap();
        assert!(seed(&repo).is_err());
    }
}
