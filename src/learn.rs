use crate::models::ArchitectureScenario;
use once_cell::sync::Lazy;

static SCENARIOS: Lazy<Vec<ArchitectureScenario>> = Lazy::new(|| {
    vec![
        scenario(
            "arch-1",
            "Hybrid Identity with Password Hash Sync",
            "Synchronize on-premises users to Entra ID using Entra ID Connect. Password Hash Sync allows users to sign in to cloud services with the same password as on-premises.",
            "https://placehold.co/600x400?text=Hybrid+Identity+Diagram",
        ),
        scenario(
            "arch-2",
            "Zero Trust Architecture",
            "Never trust, always verify. Implement Conditional Access, MFA, and device compliance checks before granting access to resources.",
            "https://placehold.co/600x400?text=Zero+Trust+Diagram",
        ),
        scenario(
            "arch-3",
            "B2B Guest Access & Collaboration",
            "Securely collaborate with external partners by inviting them as guests to your tenant, controlled by Conditional Access and Access Reviews.",
            "https://placehold.co/600x400?text=B2B+Guest+Access",
        ),
        scenario(
            "arch-4",
            "Passwordless Authentication",
            "Move away from passwords using FIDO2 keys, Microsoft Authenticator app, or Windows Hello for Business for a more secure login experience.",
            "https://placehold.co/600x400?text=Passwordless+Auth",
        ),
    ]
});

pub fn scenarios() -> &'static [ArchitectureScenario] {
    &SCENARIOS
}

pub fn search_scenarios(term: &str) -> Vec<&'static ArchitectureScenario> {
    let needle = term.to_lowercase();
    SCENARIOS
        .iter()
        .filter(|scenario| {
            scenario.title.to_lowercase().contains(&needle)
                || scenario.description.to_lowercase().contains(&needle)
        })
        .collect()
}

fn scenario(id: &str, title: &str, description: &str, image_url: &str) -> ArchitectureScenario {
    ArchitectureScenario {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image_url: image_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{scenarios, search_scenarios};

    #[test]
    fn empty_search_returns_everything() {
        assert_eq!(search_scenarios("").len(), scenarios().len());
    }

    #[test]
    fn whitespace_is_matched_literally() {
        assert!(search_scenarios("  ").is_empty());
        assert_eq!(search_scenarios("zero trust").len(), 1);
    }

    #[test]
    fn search_matches_title_and_description_case_insensitively() {
        let ids = |term: &str| {
            search_scenarios(term)
                .into_iter()
                .map(|scenario| scenario.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("ZERO trust"), vec!["arch-2"]);
        assert_eq!(ids("conditional access"), vec!["arch-2", "arch-3"]);
        assert!(ids("kerberos").is_empty());
    }
}
