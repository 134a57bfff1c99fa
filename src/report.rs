use crate::models::{AssessmentReport, CategorySection, ChecklistItem, MaturityBand};
use crate::stats::{aggregate, critical_gaps};
use chrono::{DateTime, Utc};

pub fn assessment_report(
    items: &[ChecklistItem],
    catalog_version: &str,
    generated_at: DateTime<Utc>,
) -> AssessmentReport {
    let stats = aggregate(items);
    AssessmentReport {
        generated_at,
        catalog_version: catalog_version.to_string(),
        overall_score: stats.overall,
        maturity: MaturityBand::for_score(stats.overall),
        categories: stats.per_category,
        critical_gaps: critical_gaps(items),
    }
}

pub fn items_by_category(items: &[ChecklistItem]) -> Vec<CategorySection> {
    let mut sections: Vec<CategorySection> = Vec::new();
    for item in items {
        match sections
            .iter_mut()
            .find(|section| section.category == item.category)
        {
            Some(section) => section.items.push(item.clone()),
            None => sections.push(CategorySection {
                category: item.category.clone(),
                items: vec![item.clone()],
            }),
        }
    }
    sections
}
