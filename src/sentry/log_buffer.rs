//! Per-mirror run log shared by that mirror's location tasks.

use std::sync::Mutex;

/// Line buffer appended to concurrently; each line is written whole.
///
/// Line order follows completion order, not location order.
#[derive(Debug, Default)]
pub struct LockedLog {
    text: Mutex<String>,
}

impl LockedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `line` and a newline.
    pub fn push_line(&self, line: &str) {
        let mut text = self.text.lock().unwrap_or_else(|e| e.into_inner());
        text.push_str(line);
        text.push('\n');
    }

    /// Returns the accumulated text and leaves the buffer empty.
    pub fn take(&self) -> String {
        let mut text = self.text.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_take_empties_buffer() {
        let log = LockedLog::new();
        log.push_line("a");
        log.push_line("b");
        assert_eq!(log.take(), "a\nb\n");
        assert_eq!(log.take(), "");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lines_never_interleave() {
        let log = Arc::new(LockedLog::new());
        let mut handles = Vec::new();
        for task in 0..16 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    log.push_line(&format!("task-{:02} line-{:02} {}", task, i, "x".repeat(64)));
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let text = log.take();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 16 * 50);
        for line in lines {
            assert!(line.starts_with("task-"), "corrupted line: {}", line);
            assert!(line.ends_with(&"x".repeat(64)), "corrupted line: {}", line);
        }
    }
}
