//! Priority resolution across pane records.
//!
//! Attention beats Running beats Done. The winning bucket's count is passed
//! through untouched so the display can tell one pane from several.

use crate::state::StateRecord;
use crate::types::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub status: Status,
    pub count: usize,
}

/// Resolves the indicator for `records`, optionally limited to one partition.
///
/// Returns `None` when no record matches.
pub fn aggregate<'a, I>(records: I, partition: Option<&str>) -> Option<Aggregate>
where
    I: IntoIterator<Item = &'a StateRecord>,
{
    let mut counts = [0usize; 3];
    for record in records {
        if partition.is_some_and(|p| record.partition_key != p) {
            continue;
        }
        counts[usize::from(record.status.priority())] += 1;
    }

    Status::BY_PRIORITY
        .into_iter()
        .map(|status| Aggregate {
            status,
            count: counts[usize::from(status.priority())],
        })
        .find(|agg| agg.count > 0)
}

/// Icons used when rendering an [`Aggregate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icons {
    pub attention: String,
    pub running: String,
    pub done: String,
}

impl Default for Icons {
    fn default() -> Self {
        Icons {
            attention: "!".to_string(),
            running: "●".to_string(),
            done: "✓".to_string(),
        }
    }
}

impl Icons {
    pub fn for_status(&self, status: Status) -> &str {
        match status {
            Status::Attention => &self.attention,
            Status::Running => &self.running,
            Status::Done => &self.done,
        }
    }
}

impl Aggregate {
    /// Icon alone for a single pane, icon followed by the count for more.
    pub fn render(&self, icons: &Icons) -> String {
        let icon = icons.for_status(self.status);
        if self.count > 1 {
            format!("{icon}{}", self.count)
        } else {
            icon.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, status: Status, window: &str) -> StateRecord {
        StateRecord {
            session_key: key.to_string(),
            status,
            timestamp: 0,
            conversation_id: String::new(),
            partition_key: window.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn empty_input_is_none() {
        let records: Vec<StateRecord> = Vec::new();
        assert_eq!(aggregate(&records, None), None);
    }

    #[test]
    fn attention_wins() {
        let records = vec![
            record("1", Status::Running, "@1"),
            record("2", Status::Done, "@1"),
            record("3", Status::Attention, "@2"),
        ];
        assert_eq!(
            aggregate(&records, None),
            Some(Aggregate {
                status: Status::Attention,
                count: 1
            })
        );
    }

    #[test]
    fn running_beats_done() {
        let records = vec![
            record("1", Status::Done, ""),
            record("2", Status::Running, ""),
            record("3", Status::Running, ""),
        ];
        assert_eq!(
            aggregate(&records, None),
            Some(Aggregate {
                status: Status::Running,
                count: 2
            })
        );
    }

    #[test]
    fn done_only() {
        let records = vec![record("1", Status::Done, ""), record("2", Status::Done, "")];
        assert_eq!(aggregate(&records, None).unwrap().status, Status::Done);
    }

    #[test]
    fn partition_filter_scopes_the_result() {
        let records = vec![
            record("1", Status::Attention, "@1"),
            record("2", Status::Running, "@2"),
            record("3", Status::Running, "@2"),
        ];
        assert_eq!(
            aggregate(&records, Some("@2")),
            Some(Aggregate {
                status: Status::Running,
                count: 2
            })
        );
        assert_eq!(aggregate(&records, Some("@9")), None);
    }

    #[test]
    fn priority_holds_for_every_mix() {
        let all = [Status::Attention, Status::Running, Status::Done];
        for mask in 1u8..8 {
            let records: Vec<_> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(i, s)| record(&i.to_string(), *s, ""))
                .collect();
            let expected = records.iter().map(|r| r.status).min_by_key(Status::priority);
            assert_eq!(aggregate(&records, None).map(|a| a.status), expected);
        }
    }

    #[test]
    fn render_distinguishes_one_from_many() {
        let icons = Icons::default();
        let one = Aggregate {
            status: Status::Running,
            count: 1,
        };
        let two = Aggregate {
            status: Status::Running,
            count: 2,
        };
        assert_eq!(one.render(&icons), "●");
        assert_eq!(two.render(&icons), "●2");
    }

    #[test]
    fn render_uses_custom_icons() {
        let icons = Icons {
            attention: "#[fg=red]A".to_string(),
            ..Icons::default()
        };
        let agg = Aggregate {
            status: Status::Attention,
            count: 3,
        };
        assert_eq!(agg.render(&icons), "#[fg=red]A3");
    }
}
