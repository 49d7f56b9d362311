//! JSON-lines match event log.
//!
//! Records are handed to a background writer task over an unbounded channel so
//! the scheduler never waits on the filesystem. Each record is one JSON object
//! followed by `\n`.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::MatchEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    Start {
        ts: u64,
        episode: u32,
    },
    Merge {
        ts: u64,
        episode: u32,
        side: &'static str,
        cleared_rows: Vec<u8>,
        score_gained: u64,
        garbage_sent: u8,
    },
    Garbage {
        ts: u64,
        episode: u32,
        side: &'static str,
        count: u8,
        truncated_rows: u8,
    },
    GameOver {
        ts: u64,
        episode: u32,
        winner: &'static str,
    },
}

impl EventRecord {
    /// Loggable form of an event; moves and think steps are not logged.
    pub fn from_event(event: &MatchEvent, ts: u64, episode: u32) -> Option<Self> {
        Some(match event {
            MatchEvent::Started { episode } => EventRecord::Start {
                ts,
                episode: *episode,
            },
            MatchEvent::Merged {
                side,
                cleared_rows,
                score_gained,
                garbage_sent,
            } => EventRecord::Merge {
                ts,
                episode,
                side: side.as_str(),
                cleared_rows: cleared_rows.to_vec(),
                score_gained: *score_gained,
                garbage_sent: *garbage_sent,
            },
            MatchEvent::GarbageApplied {
                side,
                count,
                truncated_rows,
            } => EventRecord::Garbage {
                ts,
                episode,
                side: side.as_str(),
                count: *count,
                truncated_rows: *truncated_rows,
            },
            MatchEvent::Over { winner } => EventRecord::GameOver {
                ts,
                episode,
                winner: winner.as_str(),
            },
            MatchEvent::Moved { .. } | MatchEvent::Thought { .. } => return None,
        })
    }
}

/// Handle to the background log writer; a disabled log drops every record.
#[derive(Debug, Default)]
pub struct EventLog {
    tx: Option<mpsc::UnboundedSender<EventRecord>>,
    writer: Option<JoinHandle<u64>>,
    recorded: u64,
}

impl EventLog {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Spawn the writer task appending to `path`. Must run inside a tokio runtime.
    ///
    /// If the file cannot be opened the writer reports it on stderr and
    /// discards every record.
    pub fn open(path: &str) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EventRecord>();
        let path = path.to_string();

        let writer = tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[Adapter] event log {} unavailable: {}", path, e);
                    return 0;
                }
            };

            let mut written = 0u64;
            let mut buf: Vec<u8> = Vec::with_capacity(512);
            while let Some(record) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &record).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if let Err(e) = file.write_all(&buf).await {
                    eprintln!("[Adapter] event log {} write failed: {}", path, e);
                    break;
                }
                written += 1;
            }

            let _ = file.flush().await;
            written
        });

        Self {
            tx: Some(tx),
            writer: Some(writer),
            recorded: 0,
        }
    }

    pub fn from_path(path: Option<&str>) -> Self {
        path.map_or_else(Self::disabled, Self::open)
    }

    /// Records handed to the writer so far (not necessarily on disk yet)
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn record(&mut self, event: &MatchEvent, ts: u64, episode: u32) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Some(record) = EventRecord::from_event(event, ts, episode) {
            if tx.send(record).is_ok() {
                self.recorded += 1;
            }
        }
    }

    /// Close the channel, wait for the writer to flush, and return how many
    /// records actually reached the file.
    pub async fn close(mut self) -> u64 {
        self.tx = None;
        match self.writer.take() {
            Some(writer) => writer.await.unwrap_or(0),
            None => 0,
        }
    }
}
