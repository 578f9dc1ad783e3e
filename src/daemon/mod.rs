use anyhow::Result;
use log::{info, warn};
use std::collections::HashSet;
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use crate::domain::MessageSummary;
use crate::webmail::{Transport, WebMail};

pub struct WatchConfig {
    pub folder: String,
    pub interval_secs: u64,
}

/// Remembers the uids on the folder's first page as of the last poll.
#[derive(Debug, Default)]
pub struct Watcher {
    seen: HashSet<String>,
}

impl Watcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// One cycle: refresh the token (logging in again if that fails), list
    /// page 1 and return entries whose uid has not been reported yet.
    pub fn poll<T: Transport>(&mut self, mail: &mut WebMail<T>, folder: &str) -> Vec<MessageSummary> {
        if let Err(e) = mail.refresh() {
            warn!("Session refresh failed ({e}), logging in again");
            if !mail.authenticate() {
                return Vec::new();
            }
        }

        let page = mail.get_messages(folder, 1);
        // An empty page may be a failed listing; keep what we knew.
        if page.is_empty() {
            return page;
        }

        let current: HashSet<String> = page.iter().filter_map(|m| m.uid.clone()).collect();
        let fresh = page
            .into_iter()
            .filter(|m| m.uid.as_ref().is_some_and(|uid| !self.seen.contains(uid)))
            .collect();
        self.seen = current;
        fresh
    }
}

/// Poll `cfg.folder` until Ctrl-C, handing each new message to `on_new`.
pub fn run_watch<T: Transport>(
    mail: &mut WebMail<T>,
    cfg: WatchConfig,
    mut on_new: impl FnMut(&MessageSummary),
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    let mut watcher = Watcher::new();
    let interval = Duration::from_secs(cfg.interval_secs.max(1));
    info!("Watching {} every {}s", cfg.folder, interval.as_secs());

    while running.load(Ordering::SeqCst) {
        for m in watcher.poll(mail, &cfg.folder) {
            on_new(&m);
        }

        let wake = Instant::now() + interval;
        while running.load(Ordering::SeqCst) && Instant::now() < wake {
            thread::sleep(Duration::from_millis(200));
        }
    }

    info!("Watch stopped");
    Ok(())
}
