use crate::errors::{AppError, AppResult};
use crate::models::{CatalogEntry, Impact};
use once_cell::sync::Lazy;
use std::collections::HashSet;

pub const BUILTIN_CATALOG_VERSION: &str = "entra-2024.1";

static BUILTIN_CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog {
    version: BUILTIN_CATALOG_VERSION.to_string(),
    entries: vec![
        entry(
            "id-1",
            "Identity Fundamentals",
            "Sync on-premises directories with Entra ID Connect",
            Impact::High,
            "https://learn.microsoft.com/en-us/entra/identity/hybrid/connect/whatis-azure-ad-connect",
        ),
        entry(
            "id-2",
            "Identity Fundamentals",
            "Configure Custom Domain Names",
            Impact::Medium,
            "https://learn.microsoft.com/en-us/entra/fundamentals/add-custom-domain",
        ),
        entry(
            "id-3",
            "Identity Fundamentals",
            "Enable Company Branding",
            Impact::Low,
            "https://learn.microsoft.com/en-us/entra/fundamentals/customize-branding",
        ),
        entry(
            "sec-1",
            "Security & Zero Trust",
            "Enable Multi-Factor Authentication (MFA) for all users",
            Impact::Critical,
            "https://learn.microsoft.com/en-us/entra/identity/authentication/concept-mfa-howitworks",
        ),
        entry(
            "sec-2",
            "Security & Zero Trust",
            "Block Legacy Authentication",
            Impact::High,
            "https://learn.microsoft.com/en-us/entra/identity/conditional-access/block-legacy-authentication",
        ),
        entry(
            "sec-3",
            "Security & Zero Trust",
            "Implement Conditional Access Policies",
            Impact::High,
            "https://learn.microsoft.com/en-us/entra/identity/conditional-access/overview",
        ),
        entry(
            "sec-4",
            "Security & Zero Trust",
            "Enable Identity Protection (Risk-based policies)",
            Impact::High,
            "https://learn.microsoft.com/en-us/entra/id-protection/overview-identity-protection",
        ),
        entry(
            "gov-1",
            "Access Governance",
            "Configure Privileged Identity Management (PIM)",
            Impact::High,
            "https://learn.microsoft.com/en-us/entra/id-governance/privileged-identity-management/pim-configure",
        ),
        entry(
            "gov-2",
            "Access Governance",
            "Set up Access Reviews for Groups and Apps",
            Impact::Medium,
            "https://learn.microsoft.com/en-us/entra/id-governance/access-reviews/access-reviews-overview",
        ),
        entry(
            "ext-1",
            "External Identities",
            "Configure B2B External Collaboration Settings",
            Impact::Medium,
            "https://learn.microsoft.com/en-us/entra/external-id/external-collaboration-settings-configure",
        ),
    ],
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    version: String,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn builtin() -> &'static Catalog {
        &BUILTIN_CATALOG
    }

    pub fn new(version: impl Into<String>, entries: Vec<CatalogEntry>) -> AppResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(AppError::Invalid("catalog entry with empty id".to_string()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(AppError::Invalid(format!(
                    "duplicate catalog id {}",
                    entry.id
                )));
            }
        }
        Ok(Self {
            version: version.into(),
            entries,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(id: &str, category: &str, text: &str, impact: Impact, link: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        category: category.to_string(),
        text: text.to_string(),
        impact,
        link: link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{entry, Catalog};
    use crate::models::Impact;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 10);
        let ids = catalog
            .entries()
            .iter()
            .map(|entry| entry.id.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.contains("sec-1"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::new(
            "test",
            vec![
                entry("a", "Cat", "First", Impact::Low, "https://example.test/a"),
                entry("a", "Cat", "Second", Impact::Low, "https://example.test/b"),
            ],
        )
        .expect_err("duplicate id must fail");
        assert!(err.to_string().contains("INVALID"));
    }
}
