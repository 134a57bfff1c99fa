use crate::models::{CategoryScore, ChecklistItem, CriticalGap, ItemStatus, StatsReport};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    implemented: usize,
    applicable: usize,
}

impl Tally {
    fn add(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Implemented => {
                self.implemented += 1;
                self.applicable += 1;
            }
            ItemStatus::NotImplemented | ItemStatus::Planned => self.applicable += 1,
            ItemStatus::NotApplicable => {}
        }
    }

    fn score(self) -> u8 {
        score(self.implemented, self.applicable)
    }
}

/// Percentage of applicable items that are implemented, rounded half away
/// from zero. An empty denominator scores 0.
pub fn score(implemented: usize, applicable: usize) -> u8 {
    if applicable == 0 {
        return 0;
    }
    let rounded = (200 * implemented + applicable) / (2 * applicable);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

pub fn aggregate(items: &[ChecklistItem]) -> StatsReport {
    let mut overall = Tally::default();
    let mut categories: Vec<(&str, Tally)> = Vec::new();

    for item in items {
        overall.add(item.status);
        match categories
            .iter_mut()
            .find(|(category, _)| *category == item.category)
        {
            Some((_, tally)) => tally.add(item.status),
            None => {
                let mut tally = Tally::default();
                tally.add(item.status);
                categories.push((item.category.as_str(), tally));
            }
        }
    }

    StatsReport {
        per_category: categories
            .into_iter()
            .map(|(category, tally)| CategoryScore {
                category: category.to_string(),
                score: tally.score(),
                implemented: tally.implemented,
                applicable: tally.applicable,
            })
            .collect(),
        overall: overall.score(),
    }
}

pub fn critical_gaps(items: &[ChecklistItem]) -> Vec<CriticalGap> {
    items
        .iter()
        .filter(|item| item.status == ItemStatus::NotImplemented && item.impact.is_severe())
        .map(|item| CriticalGap {
            id: item.id.clone(),
            category: item.category.clone(),
            text: item.text.clone(),
            impact: item.impact,
        })
        .collect()
}
