use anyhow::Result;
use gempa_core::app::{shakemap_url, Command, Session, Trigger};
use gempa_core::domain::{Event, EventRecord, FeedDocument};
use gempa_core::error::FetchError;
use gempa_core::ports::{Clock, FeedConfig, FeedPort};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

type FetchResult = std::result::Result<FeedDocument, FetchError>;

/// Timing and URL settings of the monitor
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub shakemap_base: String,
}

impl MonitorSettings {
    pub fn from_config(feed: &FeedConfig) -> Self {
        Self {
            poll_interval: feed.poll_interval(),
            request_timeout: feed.request_timeout(),
            shakemap_base: feed.shakemap_base_url.clone(),
        }
    }
}

/// Drives the refresh cycle: schedules fetches, guards against overlap,
/// detects new events and reports everything to the UI as events.
///
/// All session state is owned by the single task running [`MonitorService::start`],
/// so it is never shared or locked.
pub struct MonitorService {
    // Ports (dependency injection)
    feed_port: Arc<dyn FeedPort>,
    clock: Arc<dyn Clock>,

    settings: MonitorSettings,

    // Outgoing events (for TUI)
    event_tx: mpsc::UnboundedSender<Event>,

    // Command receiver
    command_rx: mpsc::UnboundedReceiver<Command>,

    // Last shown event and in-flight guard
    session: Session,

    // At most one fetch lives here at a time
    fetches: JoinSet<FetchResult>,

    // Shakemap probes, independent of the fetch cycle
    probes: JoinSet<()>,
}

impl MonitorService {
    pub fn new(
        feed_port: Arc<dyn FeedPort>,
        clock: Arc<dyn Clock>,
        settings: MonitorSettings,
    ) -> (Self, mpsc::UnboundedReceiver<Event>, mpsc::UnboundedSender<Command>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let service = Self {
            feed_port,
            clock,
            settings,
            event_tx,
            command_rx,
            session: Session::new(),
            fetches: JoinSet::new(),
            probes: JoinSet::new(),
        };

        (service, event_rx, command_tx)
    }

    /// Run until a `Quit` command arrives or the command channel closes.
    /// The first fetch starts immediately.
    pub async fn start(&mut self) -> Result<()> {
        info!(
            "Starting MonitorService (interval {:?}, timeout {:?})",
            self.settings.poll_interval, self.settings.request_timeout
        );

        self.run_event_loop().await
    }

    async fn run_event_loop(&mut self) -> Result<()> {
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // the interval's first tick completes immediately
        let mut next_trigger = Trigger::Startup;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.begin_fetch(next_trigger);
                    next_trigger = Trigger::Interval;
                }

                // Handle commands from the TUI
                command = self.command_rx.recv() => {
                    match command {
                        Some(Command::Refresh { trigger }) => {
                            self.begin_fetch(trigger);
                        }
                        Some(Command::Quit) => {
                            info!("Quit command received");
                            break;
                        }
                        None => {
                            info!("Command channel closed, stopping monitor");
                            break;
                        }
                    }
                }

                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    self.complete_fetch(joined);
                }

                Some(joined) = self.probes.join_next(), if !self.probes.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Shakemap probe task failed: {}", e);
                    }
                }
            }
        }

        info!("Shutting down background tasks");
        self.fetches.abort_all();
        self.probes.abort_all();
        self.emit(Event::QuitRequested);

        Ok(())
    }

    /// Start a fetch unless one is in flight. Returns whether one was started.
    fn begin_fetch(&mut self, trigger: Trigger) -> bool {
        if !self.session.try_begin_fetch() {
            debug!("Fetch already in flight, ignoring {} trigger", trigger);
            self.emit(Event::FetchSkipped { trigger });
            return false;
        }

        info!("Fetching latest event ({} trigger)", trigger);
        self.emit(Event::FetchStarted { trigger });

        let feed_port = self.feed_port.clone();
        let timeout = self.settings.request_timeout;

        self.fetches.spawn(async move {
            match tokio::time::timeout(timeout, feed_port.fetch_latest()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    millis: duration_millis(timeout),
                }),
            }
        });

        true
    }

    /// The single exit path of every fetch: present or report the outcome,
    /// then release the guard and stamp the check time.
    fn complete_fetch(&mut self, joined: std::result::Result<FetchResult, JoinError>) {
        let result = joined.unwrap_or_else(|e| Err(FetchError::Task(e.to_string())));

        let ok = match result {
            Ok(document) => {
                self.present(document.into_record());
                true
            }
            Err(e) => {
                error!("Error fetching data: {}", e);
                self.emit(Event::FetchFailed { error: e });
                false
            }
        };

        if !self.session.finish_fetch() {
            warn!("Fetch completed while no fetch was in flight");
        }

        self.emit(Event::FetchFinished {
            checked_at: self.clock.now(),
            ok,
        });
    }

    fn present(&mut self, record: EventRecord) {
        let Some(shown) = self.session.accept(record).cloned() else {
            debug!("Latest event unchanged");
            self.emit(Event::QuakeUnchanged);
            return;
        };

        info!("New event: {}", shown);
        let probe_url = shown
            .shakemap_file()
            .map(|file| shakemap_url(&self.settings.shakemap_base, file));

        self.emit(Event::QuakeUpdated { record: shown });

        if let Some(url) = probe_url {
            self.probe_shakemap(url);
        }
    }

    fn probe_shakemap(&mut self, url: String) {
        let feed_port = self.feed_port.clone();
        let event_tx = self.event_tx.clone();
        let timeout = self.settings.request_timeout;

        self.probes.spawn(async move {
            let available = match tokio::time::timeout(timeout, feed_port.probe_asset(&url)).await {
                Ok(Ok(available)) => available,
                Ok(Err(e)) => {
                    warn!("Shakemap probe failed for {}: {}", url, e);
                    false
                }
                Err(_) => {
                    warn!("Shakemap probe timed out for {}", url);
                    false
                }
            };

            debug!("Shakemap {} available: {}", url, available);
            if event_tx.send(Event::ShakemapChecked { url, available }).is_err() {
                debug!("Event receiver dropped before shakemap result");
            }
        });
    }

    fn emit(&self, event: Event) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Drop for MonitorService {
    fn drop(&mut self) {
        // Abort all background tasks when the service is dropped
        self.fetches.abort_all();
        self.probes.abort_all();
    }
}
