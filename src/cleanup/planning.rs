//! Cleanup classification: which worktrees and directories may be removed.

use super::types::{CleanableItem, CleanupSet};
use crate::fs::is_path_under;
use crate::process::CommandRunner;
use crate::remote::{RemoteLookup, RemoteStatus};
use crate::worktree::{ChangeState, ScanResults, WorktreeRecord, change_state};
use rayon::prelude::*;
use std::path::Path;
use tracing::debug;

/// Per-worktree questions the classifier needs answered.
pub trait WorktreeInspector: Sync {
    fn remote_status(&self, branch: &str) -> RemoteStatus;
    fn change_state(&self, path: &Path) -> ChangeState;
}

/// [`WorktreeInspector`] backed by git and the review service.
pub struct LiveInspector<'a> {
    runner: &'a dyn CommandRunner,
    remote: &'a RemoteLookup<'a>,
}

impl<'a> LiveInspector<'a> {
    pub fn new(runner: &'a dyn CommandRunner, remote: &'a RemoteLookup<'a>) -> Self {
        Self { runner, remote }
    }
}

impl WorktreeInspector for LiveInspector<'_> {
    fn remote_status(&self, branch: &str) -> RemoteStatus {
        self.remote.status(branch)
    }

    fn change_state(&self, path: &Path) -> ChangeState {
        change_state(self.runner, path)
    }
}

/// Whether `record` overlaps the operator's location: the worktree they are
/// standing in, or one nested below it.
fn overlaps_current(record: &WorktreeRecord, current_path: &Path) -> bool {
    is_path_under(current_path, &record.path) || is_path_under(&record.path, current_path)
}

fn stale_candidate(
    record: &WorktreeRecord,
    inspector: &dyn WorktreeInspector,
) -> Option<CleanableItem> {
    let branch = record.branch.as_ref()?;
    let status = inspector.remote_status(branch);
    if !status.state.is_finished() {
        return None;
    }

    // git lists a worktree whose directory is gone as prunable; there is
    // nothing on disk left to lose.
    let state = if record.prunable.is_some() {
        ChangeState::Clean
    } else {
        inspector.change_state(&record.path)
    };
    debug!(
        branch = %branch,
        pr_state = %status.state,
        change_state = ?state,
        locked = record.locked.is_some(),
        "stale worktree candidate"
    );

    Some(CleanableItem::StaleWorktree {
        path: record.path.clone(),
        branch: branch.clone(),
        remote_state: status.state,
        has_uncommitted_changes: state.blocks_removal(),
        locked: record.locked.is_some(),
    })
}

/// Whether removing `dir` would take a registered worktree with it.
fn holds_worktree(dir: &Path, records: &[WorktreeRecord]) -> bool {
    records.iter().any(|record| is_path_under(&record.path, dir))
}

/// Build the set of removal candidates.
///
/// Stale worktrees come first in inventory order, then abandoned folders,
/// then orphans. Stale worktrees that are locked, or have local changes (or
/// whose state could not be determined), are placed in `skipped` and never
/// offered. The primary worktree, and any worktree overlapping
/// `current_path`, is never a candidate at all; neither is a scanned
/// directory that is or contains a registered worktree.
pub fn build_cleanup_set(
    records: &[WorktreeRecord],
    scan: &ScanResults,
    inspector: &dyn WorktreeInspector,
    current_path: &Path,
) -> CleanupSet {
    let stale: Vec<CleanableItem> = records
        .par_iter()
        .filter(|record| !record.is_primary && !overlaps_current(record, current_path))
        .filter_map(|record| stale_candidate(record, inspector))
        .collect();

    let (skipped, mut to_offer): (Vec<_>, Vec<_>) = stale
        .into_iter()
        .partition(|item| item.hold_reason().is_some());

    to_offer.extend(
        scan.abandoned
            .iter()
            .filter(|folder| !holds_worktree(&folder.path, records))
            .map(|folder| CleanableItem::Abandoned {
                path: folder.path.clone(),
                file_count: folder.file_count,
                folder_count: folder.folder_count,
            }),
    );
    to_offer.extend(
        scan.orphans
            .iter()
            .filter(|orphan| !holds_worktree(&orphan.path, records))
            .map(|orphan| CleanableItem::Orphan {
                path: orphan.path.clone(),
                broken_target: orphan.broken_target.clone(),
            }),
    );

    CleanupSet { to_offer, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::PrState;
    use crate::test_support::FakeRunner;
    use crate::worktree::{AbandonedFolder, OrphanWorktree, parse_porcelain};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeInspector {
        states: HashMap<String, PrState>,
        changes: HashMap<PathBuf, ChangeState>,
        inspected: Mutex<Vec<PathBuf>>,
    }

    impl FakeInspector {
        fn pr(mut self, branch: &str, state: PrState) -> Self {
            self.states.insert(branch.to_string(), state);
            self
        }

        fn changes(mut self, path: &str, state: ChangeState) -> Self {
            self.changes.insert(PathBuf::from(path), state);
            self
        }
    }

    impl WorktreeInspector for FakeInspector {
        fn remote_status(&self, branch: &str) -> RemoteStatus {
            RemoteStatus {
                state: self.states.get(branch).copied().unwrap_or_default(),
                ..RemoteStatus::none()
            }
        }

        fn change_state(&self, path: &Path) -> ChangeState {
            self.inspected.lock().unwrap().push(path.to_path_buf());
            self.changes.get(path).copied().unwrap_or(ChangeState::Clean)
        }
    }

    fn inventory() -> Vec<WorktreeRecord> {
        parse_porcelain(
            "worktree /src/app\nHEAD 1111\nbranch refs/heads/main\n\n\
             worktree /trees/merged\nHEAD 2222\nbranch refs/heads/merged\n\n\
             worktree /trees/dirty\nHEAD 3333\nbranch refs/heads/dirty\n\n\
             worktree /trees/open\nHEAD 4444\nbranch refs/heads/open\n\n\
             worktree /trees/closed\nHEAD 5555\nbranch refs/heads/closed\n\n\
             worktree /trees/detached\nHEAD 6666\ndetached\n",
        )
        .unwrap()
    }

    fn inspector() -> FakeInspector {
        FakeInspector::default()
            .pr("main", PrState::Merged)
            .pr("merged", PrState::Merged)
            .pr("dirty", PrState::Merged)
            .pr("open", PrState::Open)
            .pr("closed", PrState::Closed)
            .changes("/trees/dirty", ChangeState::Dirty)
            .changes("/trees/closed", ChangeState::Unknown)
    }

    fn names(items: &[CleanableItem]) -> Vec<String> {
        items.iter().map(CleanableItem::name).collect()
    }

    #[test]
    fn test_stale_worktrees_are_partitioned_by_changes() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/elsewhere"),
        );

        assert_eq!(names(&set.to_offer), vec!["merged"]);
        assert_eq!(names(&set.skipped), vec!["dirty", "closed"]);
    }

    #[test]
    fn test_locked_worktree_is_held_back_not_offered() {
        let records = parse_porcelain(
            "worktree /src/app\nHEAD 1111\nbranch refs/heads/main\n\n\
             worktree /trees/held\nHEAD 2222\nbranch refs/heads/held\nlocked on a usb stick\n",
        )
        .unwrap();
        let inspector = FakeInspector::default().pr("held", PrState::Merged);

        let set = build_cleanup_set(
            &records,
            &ScanResults::default(),
            &inspector,
            Path::new("/elsewhere"),
        );

        assert!(set.to_offer.is_empty());
        assert_eq!(names(&set.skipped), vec!["held"]);
        assert_eq!(set.skipped[0].hold_reason(), Some("locked"));
    }

    #[test]
    fn test_prunable_worktree_is_offered_without_status_check() {
        let records = parse_porcelain(
            "worktree /src/app\nHEAD 1111\nbranch refs/heads/main\n\n\
             worktree /trees/gone\nHEAD 2222\nbranch refs/heads/gone\n\
             prunable gitdir file points to non-existent location\n",
        )
        .unwrap();
        let inspector = FakeInspector::default()
            .pr("gone", PrState::Merged)
            .changes("/trees/gone", ChangeState::Unknown);

        let set = build_cleanup_set(
            &records,
            &ScanResults::default(),
            &inspector,
            Path::new("/elsewhere"),
        );

        assert_eq!(names(&set.to_offer), vec!["gone"]);
        assert!(set.skipped.is_empty());
        assert!(inspector.inspected.lock().unwrap().is_empty());
    }

    #[test]
    fn test_scanned_directory_holding_a_worktree_is_not_offered() {
        let scan = ScanResults {
            abandoned: vec![
                AbandonedFolder {
                    path: PathBuf::from("/trees"),
                    name: "trees".to_string(),
                    file_count: 0,
                    folder_count: 5,
                },
                AbandonedFolder {
                    path: PathBuf::from("/src"),
                    name: "src".to_string(),
                    file_count: 9,
                    folder_count: 1,
                },
                AbandonedFolder {
                    path: PathBuf::from("/scratch"),
                    name: "scratch".to_string(),
                    file_count: 1,
                    folder_count: 0,
                },
            ],
            orphans: Vec::new(),
        };

        let set = build_cleanup_set(
            &inventory(),
            &scan,
            &FakeInspector::default(),
            Path::new("/elsewhere"),
        );

        assert_eq!(names(&set.to_offer), vec!["scratch"]);
    }

    #[test]
    fn test_items_with_changes_are_never_offered() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/elsewhere"),
        );

        for item in &set.to_offer {
            if let CleanableItem::StaleWorktree {
                has_uncommitted_changes,
                ..
            } = item
            {
                assert!(!has_uncommitted_changes);
            }
        }
        assert!(set.skipped.iter().all(|item| matches!(
            item,
            CleanableItem::StaleWorktree {
                has_uncommitted_changes: true,
                ..
            }
        )));
    }

    #[test]
    fn test_unknown_change_state_is_held_back() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/elsewhere"),
        );
        let closed = set.skipped.iter().find(|i| i.name() == "closed").unwrap();
        assert!(matches!(
            closed,
            CleanableItem::StaleWorktree {
                remote_state: PrState::Closed,
                has_uncommitted_changes: true,
                ..
            }
        ));
    }

    #[test]
    fn test_primary_is_never_a_candidate() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/elsewhere"),
        );
        assert!(
            set.to_offer
                .iter()
                .chain(set.skipped.iter())
                .all(|item| item.branch() != Some("main"))
        );
    }

    #[test]
    fn test_current_worktree_is_excluded() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/trees/merged"),
        );
        assert!(set.to_offer.is_empty());

        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/trees/dirty/src/deep"),
        );
        assert!(set.skipped.iter().all(|item| item.name() != "dirty"));
        assert_eq!(names(&set.to_offer), vec!["merged"]);
    }

    #[test]
    fn test_worktrees_nested_under_current_path_are_excluded() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector(),
            Path::new("/trees"),
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_change_check_only_runs_for_finished_requests() {
        let inspector = inspector();
        build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &inspector,
            Path::new("/elsewhere"),
        );

        let mut inspected = inspector.inspected.lock().unwrap().clone();
        inspected.sort();
        assert_eq!(
            inspected,
            vec![
                PathBuf::from("/trees/closed"),
                PathBuf::from("/trees/dirty"),
                PathBuf::from("/trees/merged"),
            ]
        );
    }

    #[test]
    fn test_order_is_stale_then_abandoned_then_orphan() {
        let scan = ScanResults {
            abandoned: vec![AbandonedFolder {
                path: PathBuf::from("/trees/leftover"),
                name: "leftover".to_string(),
                file_count: 2,
                folder_count: 1,
            }],
            orphans: vec![OrphanWorktree {
                path: PathBuf::from("/trees/broken-wt"),
                name: "broken-wt".to_string(),
                broken_target: PathBuf::from("/nonexistent/path"),
            }],
        };

        let set = build_cleanup_set(&inventory(), &scan, &inspector(), Path::new("/elsewhere"));

        let kinds: Vec<_> = set.to_offer.iter().map(CleanableItem::kind).collect();
        assert_eq!(kinds, vec!["stale", "abandoned", "orphan"]);
        assert_eq!(names(&set.to_offer), vec!["merged", "leftover", "broken-wt"]);
    }

    #[test]
    fn test_no_remote_information_means_no_stale_worktrees() {
        let set = build_cleanup_set(
            &inventory(),
            &ScanResults::default(),
            &FakeInspector::default(),
            Path::new("/elsewhere"),
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_live_inspector_fails_closed() {
        let runner = FakeRunner::new().fail("git", &["status"], "fatal: not a git repository");
        let remote = RemoteLookup::disabled();
        let inspector = LiveInspector::new(&runner, &remote);

        assert_eq!(inspector.change_state(Path::new("/trees/x")), ChangeState::Unknown);
        assert_eq!(inspector.remote_status("x"), RemoteStatus::none());
    }
}
