//! Thin wrapper over the `git` executable

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

use super::{FetchPhase, FetchProgress, FetchProgressCallback};

/// Large HTTP buffer so big modpack pushes and clones don't stall.
const HTTP_POST_BUFFER: &str = "http.postBuffer=524288000";

/// One commit of `git log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    /// First line of the commit message.
    pub subject: String,
}

/// Runs `git` commands.
#[derive(Debug, Clone)]
pub struct GitClient {
    program: PathBuf,
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitClient {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the executable can be started.
    pub fn is_available(&self) -> bool {
        self.base_command(None)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    /// Whether `path` is the root of a working tree.
    pub fn is_repository(path: &Path) -> bool {
        path.join(".git").exists()
    }

    fn base_command(&self, dir: Option<&Path>) -> Command {
        let mut command = Command::new(&self.program);
        command.args(["-c", HTTP_POST_BUFFER]);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        command.env("GIT_TERMINAL_PROMPT", "0");
        command
    }

    /// Run a command and return its stdout.
    pub fn run<S: AsRef<OsStr>>(&self, dir: Option<&Path>, args: &[S]) -> Result<String> {
        let command_line = display_args(args);
        tracing::debug!("git {command_line}");

        let output = self
            .base_command(dir)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(&e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Err(Error::Git {
                command: command_line,
                message: failure_detail(stderr, stdout),
            })
        }
    }

    /// Run a command, forwarding every output line (split on `\r` and `\n`)
    /// to `on_line` as it arrives.
    pub fn run_streaming<S: AsRef<OsStr>>(
        &self,
        dir: Option<&Path>,
        args: &[S],
        on_line: &(dyn Fn(&str) + Sync),
    ) -> Result<()> {
        let command_line = display_args(args);
        tracing::debug!("git {command_line}");

        let mut child = self
            .base_command(dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Keep the last lines of stderr for the error message
        let (status, last_error) = std::thread::scope(|scope| {
            let out_handle = scope.spawn(move || {
                if let Some(out) = stdout {
                    for_each_line(out, |line| on_line(line));
                }
            });
            let err_handle = scope.spawn(move || {
                let mut tail: Vec<String> = Vec::new();
                if let Some(err) = stderr {
                    for_each_line(err, |line| {
                        on_line(line);
                        tail.push(line.to_string());
                        if tail.len() > 5 {
                            tail.remove(0);
                        }
                    });
                }
                tail.join("\n")
            });

            let status = child.wait();
            let _ = out_handle.join();
            let tail = err_handle.join().unwrap_or_default();
            (status, tail)
        });

        let status = status?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Git {
                command: command_line,
                message: failure_detail(last_error, String::new()),
            })
        }
    }

    /// `git clone --branch <b> --recurse-submodules --remote-submodules`.
    pub fn clone_repo(&self, url: &str, branch: &str, dest: &Path, progress: FetchProgressCallback) -> Result<()> {
        let dest_str = dest.to_string_lossy();
        let args = [
            "clone",
            "--progress",
            "--branch",
            branch,
            "--recurse-submodules",
            "--remote-submodules",
            url,
            &*dest_str,
        ];
        self.run_streaming(None, &args, &|line| {
            progress(&FetchProgress::with_detail(FetchPhase::Cloning, 0, 0, line));
        })
    }

    /// Whether the working tree has local changes or untracked files.
    pub fn is_dirty(&self, repo: &Path) -> Result<bool> {
        let status = self.run(Some(repo), &["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    /// Update an existing checkout.
    ///
    /// Local changes are discarded first (`reset --hard` + `clean -fd`), then
    /// the branch is pulled and each submodule is updated in turn.
    pub fn update(&self, repo: &Path, progress: FetchProgressCallback) -> Result<()> {
        if !repo.is_dir() || !Self::is_repository(repo) {
            return Err(Error::NotARepository {
                path: repo.to_path_buf(),
            });
        }

        if self.is_dirty(repo)? {
            progress(&FetchProgress::with_detail(
                FetchPhase::Resetting,
                0,
                0,
                "Uncommitted changes detected. Resetting and cleaning repository...",
            ));
            self.run(Some(repo), &["reset", "--hard"])?;
            self.run(Some(repo), &["clean", "-fd"])?;
        }

        progress(&FetchProgress::with_detail(FetchPhase::Pulling, 0, 0, "Pulling latest changes..."));
        self.run_streaming(Some(repo), &["pull", "--progress"], &|line| {
            progress(&FetchProgress::with_detail(FetchPhase::Pulling, 0, 0, line));
        })?;

        self.update_submodules(repo, progress)
    }

    /// `git submodule update --init --recursive`, one submodule at a time so
    /// the current name and count can be reported.
    pub fn update_submodules(&self, repo: &Path, progress: FetchProgressCallback) -> Result<()> {
        let submodules = submodule_paths(repo);
        if submodules.is_empty() {
            return self
                .run(Some(repo), &["submodule", "update", "--init", "--recursive"])
                .map(|_| ());
        }

        let total = submodules.len() as u64;
        for (index, path) in submodules.iter().enumerate() {
            progress(&FetchProgress::with_detail(
                FetchPhase::Submodules,
                index as u64 + 1,
                total,
                path.clone(),
            ));
            self.run(
                Some(repo),
                &["submodule", "update", "--init", "--recursive", "--", path.as_str()],
            )?;
        }
        tracing::info!("Updated {total} submodules in {}", repo.display());
        Ok(())
    }

    /// Commits reachable from HEAD, newest first.
    pub fn log(&self, repo: &Path) -> Result<Vec<CommitInfo>> {
        let output = self.run(Some(repo), &["log", "--format=%H%x09%s"])?;
        Ok(output
            .lines()
            .filter_map(|line| {
                let (hash, subject) = line.split_once('\t')?;
                Some(CommitInfo {
                    hash: hash.to_string(),
                    subject: subject.to_string(),
                })
            })
            .collect())
    }

    /// Detach HEAD at `hash` and hard-reset the working tree to it.
    pub fn checkout_detached(&self, repo: &Path, hash: &str) -> Result<()> {
        self.run(Some(repo), &["switch", "--detach", hash])?;
        self.run(Some(repo), &["reset", "--hard", hash])?;
        Ok(())
    }

    /// `git switch <branch>`.
    pub fn switch(&self, repo: &Path, branch: &str) -> Result<()> {
        self.run(Some(repo), &["switch", branch]).map(|_| ())
    }

    /// Current branch name, or `HEAD` when detached.
    pub fn current_branch(&self, repo: &Path) -> Result<String> {
        Ok(self
            .run(Some(repo), &["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }
}

/// Submodule paths listed in `.gitmodules`, in file order.
pub fn submodule_paths(repo: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(repo.join(".gitmodules")) else {
        return Vec::new();
    };
    content
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once('=')?;
            (key.trim() == "path").then(|| value.trim().to_string())
        })
        .collect()
}

fn display_args<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_error(e: &std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::GitNotFound
    } else {
        Error::Git {
            command: String::new(),
            message: e.to_string(),
        }
    }
}

fn failure_detail(stderr: String, stdout: String) -> String {
    if !stderr.is_empty() {
        stderr
    } else if !stdout.is_empty() {
        stdout
    } else {
        "An unknown error occurred.".to_string()
    }
}

/// Read a stream to the end, calling `f` for every non-empty line.
///
/// Git rewrites progress lines with `\r`, so both `\r` and `\n` end a line.
fn for_each_line<R: Read>(mut reader: R, mut f: impl FnMut(&str)) {
    let mut pending: Vec<u8> = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        for &byte in &buf[..n] {
            if byte == b'\n' || byte == b'\r' {
                emit_line(&mut pending, &mut f);
            } else {
                pending.push(byte);
            }
        }
    }
    emit_line(&mut pending, &mut f);
}

fn emit_line(pending: &mut Vec<u8>, f: &mut impl FnMut(&str)) {
    if !pending.is_empty() {
        let line = String::from_utf8_lossy(pending);
        let line = line.trim();
        if !line.is_empty() {
            f(line);
        }
        pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_for_each_line_splits_on_carriage_return() {
        let input = b"Receiving objects:  10%\rReceiving objects: 100%\r\nDone\n\n";
        let mut lines = Vec::new();
        for_each_line(&input[..], |line| lines.push(line.to_string()));
        assert_eq!(lines, ["Receiving objects:  10%", "Receiving objects: 100%", "Done"]);
    }

    #[test]
    fn test_submodule_paths() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".gitmodules"),
            "[submodule \"Mods/Talisman\"]\n\tpath = Mods/Talisman\n\turl = https://github.com/x/Talisman.git\n\
             [submodule \"Mods/Cryptid\"]\n\tpath = Mods/Cryptid\n\turl = https://github.com/x/Cryptid.git\n",
        )
        .unwrap();

        assert_eq!(submodule_paths(temp.path()), ["Mods/Talisman", "Mods/Cryptid"]);
        assert!(submodule_paths(&temp.path().join("missing")).is_empty());
    }

    #[test]
    fn test_missing_program_reports_git_not_found() {
        let git = GitClient::new("definitely-not-a-git-binary");
        assert!(!git.is_available());
        assert!(matches!(git.run(None, &["--version"]), Err(Error::GitNotFound)));
    }

    #[test]
    fn test_update_rejects_non_repository() {
        let temp = TempDir::new().unwrap();
        let result = GitClient::default().update(temp.path(), &|_| {});
        assert!(matches!(result, Err(Error::NotARepository { .. })));
    }
}
