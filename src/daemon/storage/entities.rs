use std::collections::HashMap;

/// Accumulated seconds per domain. This is the exact shape of the persisted store: one entry per
/// domain, absence of a key means zero.
pub type DomainTotals = HashMap<String, u64>;

/// Represents a change of a single persisted entry between two snapshots of the store. A side
/// that had no entry is reported as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub domain: String,
    pub old: u64,
    pub new: u64,
}

impl StorageChange {
    /// Whether the change moved the value into another whole minute.
    pub fn crosses_minute(&self) -> bool {
        self.old / 60 != self.new / 60
    }
}

/// Computes the entries that differ between two snapshots.
pub fn diff_totals(previous: &DomainTotals, current: &DomainTotals) -> Vec<StorageChange> {
    let mut changes = current
        .iter()
        .filter_map(|(domain, &new)| {
            let old = previous.get(domain).copied().unwrap_or(0);
            (old != new).then(|| StorageChange {
                domain: domain.clone(),
                old,
                new,
            })
        })
        .chain(
            previous
                .iter()
                .filter(|(domain, _)| !current.contains_key(*domain))
                .map(|(domain, &old)| StorageChange {
                    domain: domain.clone(),
                    old,
                    new: 0,
                }),
        )
        .collect::<Vec<_>>();
    changes.sort_by(|a, b| a.domain.cmp(&b.domain));
    changes
}

#[cfg(test)]
mod tests {
    use super::{diff_totals, DomainTotals, StorageChange};

    fn totals(entries: &[(&str, u64)]) -> DomainTotals {
        entries.iter().map(|(d, s)| (d.to_string(), *s)).collect()
    }

    #[test]
    fn test_diff_reports_added_changed_and_removed() {
        let previous = totals(&[("a.com", 10), ("b.com", 5), ("gone.com", 70)]);
        let current = totals(&[("a.com", 10), ("b.com", 6), ("new.com", 1)]);

        assert_eq!(
            diff_totals(&previous, &current),
            vec![
                StorageChange {
                    domain: "b.com".into(),
                    old: 5,
                    new: 6
                },
                StorageChange {
                    domain: "gone.com".into(),
                    old: 70,
                    new: 0
                },
                StorageChange {
                    domain: "new.com".into(),
                    old: 0,
                    new: 1
                },
            ]
        );
    }

    #[test]
    fn test_minute_crossing() {
        let within = StorageChange {
            domain: "a.com".into(),
            old: 61,
            new: 119,
        };
        let across = StorageChange {
            domain: "a.com".into(),
            old: 59,
            new: 60,
        };
        let cleared = StorageChange {
            domain: "a.com".into(),
            old: 30,
            new: 0,
        };
        assert!(!within.crosses_minute());
        assert!(across.crosses_minute());
        assert!(!cleared.crosses_minute());
    }
}
