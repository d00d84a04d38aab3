use crate::error::{ArborError, Result};
use crate::process::{CommandOutput, CommandRunner};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A scratch area holding a repository in `repo/`, leaving room for a
/// sibling worktrees directory next to it.
pub(crate) struct TestRepo {
    pub(crate) dir: TempDir,
}

impl TestRepo {
    pub(crate) fn path(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    pub(crate) fn worktrees_root(&self) -> PathBuf {
        self.dir.path().join("repo-worktrees")
    }
}

/// Create a repository on `main` with one commit, at `<tmp>/repo`.
pub(crate) fn create_test_repo_in_parent() -> TestRepo {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("repo");
    std::fs::create_dir_all(&path).unwrap();
    init_repo(&path);
    TestRepo { dir }
}

/// Create a repository on `main` with one commit, rooted at the temp dir.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    temp_dir
}

fn init_repo(path: &Path) {
    git(path, &["init"]);
    // Ensure the repo uses a deterministic default branch name across environments.
    // This sets HEAD to an unborn `main` branch before the first commit.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    // Create initial commit (required for worktree creation)
    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
}

/// Write `name` in `dir` and commit it on the currently checked-out branch.
pub(crate) fn commit_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-m", &format!("Add {}", name)]);
}

/// Create `branch` from HEAD and check it out in a new worktree at `path`.
pub(crate) fn add_worktree(repo: &Path, path: &Path, branch: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    git(
        repo,
        &["worktree", "add", "-b", branch, path.to_str().unwrap()],
    );
}

pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

struct Rule {
    program: String,
    args_prefix: Vec<String>,
    response: std::result::Result<String, String>,
}

/// Scripted [`CommandRunner`].
///
/// Each invocation is answered by the first rule whose program matches and
/// whose argument list starts with the rule's prefix. Unmatched invocations
/// fail. Every invocation is recorded as a single space-joined line.
#[derive(Default)]
pub(crate) struct FakeRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ok(mut self, program: &str, args_prefix: &[&str], stdout: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|s| s.to_string()).collect(),
            response: Ok(stdout.to_string()),
        });
        self
    }

    pub(crate) fn fail(mut self, program: &str, args_prefix: &[&str], message: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|s| s.to_string()).collect(),
            response: Err(message.to_string()),
        });
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, _cwd: &Path, args: &[&str]) -> Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(line.clone());

        let rule = self.rules.iter().find(|rule| {
            rule.program == program
                && rule.args_prefix.len() <= args.len()
                && rule
                    .args_prefix
                    .iter()
                    .zip(args.iter())
                    .all(|(expected, actual)| expected == actual)
        });

        match rule.map(|r| &r.response) {
            Some(Ok(stdout)) => Ok(CommandOutput::stdout(stdout.clone())),
            Some(Err(message)) => Err(ArborError::CommandFailed(message.clone())),
            None => Err(ArborError::CommandFailed(format!(
                "unexpected command: {}",
                line
            ))),
        }
    }
}
