//! Status line rendering.
//!
//! Called from tmux `status-right`/`window-status-format` on every redraw, so
//! it must be fast and must never fail loudly: no live record means no output.

use std::path::Path;

use tmux_stat_core::{aggregate, Icons, StateStore};

pub fn render(
    state_dir: &Path,
    window: Option<&str>,
    icons: &Icons,
    stale_after: i64,
) -> Option<String> {
    let store = StateStore::new(state_dir);
    let records = store.enumerate(stale_after);
    let result = aggregate(&records, window)?;
    Some(result.render(icons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tmux_stat_core::{Status, STALE_THRESHOLD_SECS};

    #[test]
    fn empty_directory_renders_nothing() {
        let temp = tempdir().unwrap();
        assert_eq!(
            render(temp.path(), None, &Icons::default(), STALE_THRESHOLD_SECS),
            None
        );
    }

    #[test]
    fn missing_directory_renders_nothing() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert_eq!(
            render(&missing, None, &Icons::default(), STALE_THRESHOLD_SECS),
            None
        );
    }

    #[test]
    fn count_suffix_appears_only_above_one() {
        let temp = tempdir().unwrap();
        let store = StateStore::new(temp.path());
        let icons = Icons::default();

        store.write("%1", Status::Running, "", "@1", "").unwrap();
        assert_eq!(
            render(temp.path(), None, &icons, STALE_THRESHOLD_SECS).as_deref(),
            Some("●")
        );

        store.write("%2", Status::Running, "", "@2", "").unwrap();
        assert_eq!(
            render(temp.path(), None, &icons, STALE_THRESHOLD_SECS).as_deref(),
            Some("●2")
        );
        assert_eq!(
            render(temp.path(), Some("@2"), &icons, STALE_THRESHOLD_SECS).as_deref(),
            Some("●")
        );
    }
}
