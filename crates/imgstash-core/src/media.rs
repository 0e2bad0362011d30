//! Fire-and-forget notifications to an external media indexer.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;

use crate::config::MediaConfig;

/// Receives "new media at this path" events. Implementations must not block
/// on delivery and report nothing back to the caller.
pub trait MediaIndexer {
    fn notify(&self, path: &Path);
}

/// Tells `sink` that a new file exists at `path`.
pub fn notify_media_indexer(path: &Path, sink: &dyn MediaIndexer) {
    sink.notify(path);
}

/// Only records the event in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogIndexer;

impl MediaIndexer for LogIndexer {
    fn notify(&self, path: &Path) {
        tracing::info!(path = %path.display(), "new media file");
    }
}

/// Spawns `program args.. <path>` and does not wait for it.
#[derive(Debug, Clone)]
pub struct CommandIndexer {
    program: String,
    args: Vec<String>,
}

impl CommandIndexer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds from `[program, args..]`; `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl MediaIndexer for CommandIndexer {
    fn notify(&self, path: &Path) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                let pid = child.id();
                tracing::debug!(program = %self.program, pid, path = %path.display(), "media indexer spawned");
                let program = self.program.clone();
                // Reap in the background so finished indexers don't linger as zombies.
                let reaper = std::thread::Builder::new()
                    .name("imgstash-indexer-reaper".to_string())
                    .spawn(move || match child.wait() {
                        Ok(status) if !status.success() => {
                            tracing::debug!(program = %program, pid, %status, "media indexer exited with failure");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::debug!(program = %program, pid, "failed to wait for media indexer: {}", e);
                        }
                    });
                if let Err(e) = reaper {
                    tracing::warn!(program = %self.program, pid, "failed to start media indexer reaper: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(program = %self.program, "failed to spawn media indexer: {}", e);
            }
        }
    }
}

/// Forwards paths over a channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelIndexer {
    tx: Sender<PathBuf>,
}

impl ChannelIndexer {
    pub fn new(tx: Sender<PathBuf>) -> Self {
        Self { tx }
    }
}

impl MediaIndexer for ChannelIndexer {
    fn notify(&self, path: &Path) {
        if self.tx.send(path.to_path_buf()).is_err() {
            tracing::debug!(path = %path.display(), "media indexer channel closed");
        }
    }
}

/// Configured command, or [`LogIndexer`] when none is set.
pub fn indexer_from_config(cfg: &MediaConfig) -> Box<dyn MediaIndexer> {
    match cfg.command.as_deref().and_then(CommandIndexer::from_argv) {
        Some(cmd) => Box::new(cmd),
        None => Box::new(LogIndexer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn channel_indexer_delivers_path() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelIndexer::new(tx);
        notify_media_indexer(Path::new("/pics/20140622_120000.jpg"), &sink);
        assert_eq!(rx.recv().unwrap(), PathBuf::from("/pics/20140622_120000.jpg"));
    }

    #[test]
    fn channel_indexer_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        notify_media_indexer(Path::new("/pics/a.jpg"), &ChannelIndexer::new(tx));
    }

    #[test]
    fn from_argv_splits_program() {
        let argv = vec!["tracker3".to_string(), "index".to_string(), "--add".to_string()];
        let cmd = CommandIndexer::from_argv(&argv).unwrap();
        assert_eq!(cmd.program, "tracker3");
        assert_eq!(cmd.args, ["index", "--add"]);
        assert!(CommandIndexer::from_argv(&[]).is_none());
    }

    #[test]
    fn missing_program_does_not_panic() {
        let cmd = CommandIndexer::new("imgstash-no-such-indexer", Vec::new());
        notify_media_indexer(Path::new("/pics/a.jpg"), &cmd);
    }

    #[cfg(unix)]
    #[test]
    fn command_indexer_receives_path_argument() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("seen");
        let media = dir.path().join("new.jpg");
        let cmd = CommandIndexer::new(
            "sh",
            vec![
                "-c".to_string(),
                format!("printf %s \"$0\" > '{}'", marker.display()),
            ],
        );
        notify_media_indexer(&media, &cmd);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            if let Ok(s) = std::fs::read_to_string(&marker) {
                if !s.is_empty() {
                    assert_eq!(s, media.display().to_string());
                    return;
                }
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("indexer command did not run");
    }

    /// Child processes of this test binary named `comm` that are zombies.
    #[cfg(target_os = "linux")]
    fn zombie_children(comm: &str) -> usize {
        let me = std::process::id().to_string();
        std::fs::read_dir("/proc")
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| std::fs::read_to_string(e.path().join("stat")).ok())
            .filter(|stat| {
                let Some((head, rest)) = stat.rsplit_once(')') else {
                    return false;
                };
                let name = head.split_once('(').map(|(_, n)| n).unwrap_or("");
                let mut fields = rest.split_whitespace();
                let state = fields.next().unwrap_or("");
                let ppid = fields.next().unwrap_or("");
                name == comm && state == "Z" && ppid == me
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn finished_indexers_are_reaped() {
        let cmd = CommandIndexer::new("true", Vec::new());
        for _ in 0..3 {
            notify_media_indexer(Path::new("/pics/a.jpg"), &cmd);
        }

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        loop {
            std::thread::sleep(std::time::Duration::from_millis(100));
            let zombies = zombie_children("true");
            if zombies == 0 {
                return;
            }
            if std::time::Instant::now() >= deadline {
                panic!("{zombies} indexer process(es) left unreaped");
            }
        }
    }

    #[test]
    fn config_without_command_logs() {
        let sink = indexer_from_config(&MediaConfig::default());
        sink.notify(Path::new("/pics/a.jpg"));
    }
}
