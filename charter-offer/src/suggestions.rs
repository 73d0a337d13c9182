use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use charter_core::repository::PassengerDirectory;
use charter_shared::PassengerSuggestion;
use crate::Generation;

#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub min_query_len: usize,
    /// Lets a click on a suggestion land before blur dismisses the list
    pub blur_grace: Duration,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            blur_grace: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    Replaced(Vec<PassengerSuggestion>),
    Failed { message: String },
    BlurElapsed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionEvent {
    pub generation: Generation,
    pub outcome: SuggestionOutcome,
}

/// Passenger-name autocomplete list scoped to one booking modal.
///
/// Every query replaces the list wholesale. Dismissal (selection, blur,
/// outside click) empties it, and reopening always goes back to the
/// directory.
pub struct SuggestionCache {
    directory: Arc<dyn PassengerDirectory>,
    config: SuggestionConfig,
    generation: Generation,
    entries: Vec<PassengerSuggestion>,
    blur_timer: Option<oneshot::Sender<()>>,
    events: mpsc::UnboundedSender<SuggestionEvent>,
}

impl SuggestionCache {
    pub fn new(
        directory: Arc<dyn PassengerDirectory>,
        config: SuggestionConfig,
        events: mpsc::UnboundedSender<SuggestionEvent>,
    ) -> Self {
        Self {
            directory,
            config,
            generation: 0,
            entries: Vec::new(),
            blur_timer: None,
            events,
        }
    }

    pub fn entries(&self) -> &[PassengerSuggestion] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn on_name_input(&mut self, input: &str) -> Generation {
        self.cancel_blur();
        self.generation += 1;
        let generation = self.generation;

        let query = input.trim().to_string();
        if query.chars().count() < self.config.min_query_len {
            self.entries.clear();
            return generation;
        }

        let directory = self.directory.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = match directory.search_passengers(&query).await {
                Ok(found) => SuggestionOutcome::Replaced(found),
                Err(e) => {
                    warn!("Passenger search failed: {}", e);
                    SuggestionOutcome::Failed {
                        message: e.user_message("Passenger search is unavailable right now."),
                    }
                }
            };
            let _ = events.send(SuggestionEvent { generation, outcome });
        });
        generation
    }

    pub fn apply(&mut self, event: SuggestionEvent) -> Option<SuggestionOutcome> {
        if event.generation != self.generation {
            debug!(stale = event.generation, current = self.generation, "Dropping stale suggestion event");
            return None;
        }
        match &event.outcome {
            SuggestionOutcome::Replaced(found) => self.entries = found.clone(),
            SuggestionOutcome::Failed { .. } => self.entries.clear(),
            SuggestionOutcome::BlurElapsed => {
                self.blur_timer = None;
                self.dismiss();
            }
        }
        Some(event.outcome)
    }

    /// Picks an entry and closes the list. The caller applies the returned
    /// suggestion to the draft in one step.
    pub fn select(&mut self, id: &str) -> Option<PassengerSuggestion> {
        let picked = self.entries.iter().find(|s| s.id == id).cloned();
        if picked.is_some() {
            self.dismiss();
        }
        picked
    }

    pub fn on_blur(&mut self) {
        self.cancel_blur();
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        self.blur_timer = Some(cancel_tx);

        let generation = self.generation;
        let grace = self.config.blur_grace;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(grace) => {
                    let _ = events.send(SuggestionEvent {
                        generation,
                        outcome: SuggestionOutcome::BlurElapsed,
                    });
                }
                _ = &mut cancel_rx => {}
            }
        });
    }

    pub fn on_outside_click(&mut self) {
        self.dismiss();
    }

    pub fn dismiss(&mut self) {
        self.cancel_blur();
        self.generation += 1;
        self.entries.clear();
    }

    fn cancel_blur(&mut self) {
        if let Some(cancel) = self.blur_timer.take() {
            let _ = cancel.send(());
        }
    }
}

impl Drop for SuggestionCache {
    fn drop(&mut self) {
        self.cancel_blur();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use charter_core::{RemoteError, RemoteResult};
    use std::sync::Mutex;

    struct MockDirectory {
        people: Vec<PassengerSuggestion>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    impl MockDirectory {
        fn new(fail: bool) -> Self {
            let person = |id: &str, first: &str, last: &str| PassengerSuggestion {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: Some(format!("{}@example.com", first.to_lowercase())),
                phone: Some("+509 3700 0000".to_string()),
                nationality: None,
                date_of_birth: None,
                id_number: None,
            };
            Self {
                people: vec![person("p-1", "Jean", "Baptiste"), person("p-2", "Jeanne", "Pierre")],
                fail,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PassengerDirectory for MockDirectory {
        async fn search_passengers(&self, partial_name: &str) -> RemoteResult<Vec<PassengerSuggestion>> {
            self.queries.lock().unwrap().push(partial_name.to_string());
            if self.fail {
                return Err(RemoteError::Transport("timeout".to_string()));
            }
            let needle = partial_name.to_lowercase();
            Ok(self
                .people
                .iter()
                .filter(|p| p.first_name.to_lowercase().starts_with(&needle))
                .cloned()
                .collect())
        }
    }

    fn setup(fail: bool) -> (Arc<MockDirectory>, SuggestionCache, mpsc::UnboundedReceiver<SuggestionEvent>) {
        let directory = Arc::new(MockDirectory::new(fail));
        let (tx, rx) = mpsc::unbounded_channel();
        let cache = SuggestionCache::new(directory.clone(), SuggestionConfig::default(), tx);
        (directory, cache, rx)
    }

    async fn settle(cache: &mut SuggestionCache, rx: &mut mpsc::UnboundedReceiver<SuggestionEvent>, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        while let Ok(event) = rx.try_recv() {
            cache.apply(event);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_clears_without_query() {
        let (directory, mut cache, mut rx) = setup(false);
        cache.on_name_input("Je");
        settle(&mut cache, &mut rx, 10).await;
        assert_eq!(cache.entries().len(), 2);

        cache.on_name_input("J");
        assert!(cache.entries().is_empty());
        settle(&mut cache, &mut rx, 10).await;
        assert_eq!(directory.queries(), vec!["Je".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_query_replaces_the_list() {
        let (_directory, mut cache, mut rx) = setup(false);
        cache.on_name_input("Je");
        settle(&mut cache, &mut rx, 10).await;
        cache.on_name_input("Jeann");
        settle(&mut cache, &mut rx, 10).await;

        let ids: Vec<&str> = cache.entries().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p-2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_returns_pick_and_dismisses() {
        let (_directory, mut cache, mut rx) = setup(false);
        cache.on_name_input("Jean");
        settle(&mut cache, &mut rx, 10).await;

        assert!(cache.select("missing").is_none());
        let picked = cache.select("p-1").expect("suggestion should be selectable");
        assert_eq!(picked.last_name, "Baptiste");
        assert!(!cache.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_dismisses_after_grace_unless_selected() {
        let (_directory, mut cache, mut rx) = setup(false);
        cache.on_name_input("Je");
        settle(&mut cache, &mut rx, 10).await;

        cache.on_blur();
        settle(&mut cache, &mut rx, 100).await;
        assert!(cache.is_open(), "grace period keeps the list open");
        assert!(cache.select("p-2").is_some());

        cache.on_name_input("Je");
        settle(&mut cache, &mut rx, 10).await;
        cache.on_blur();
        settle(&mut cache, &mut rx, 250).await;
        assert!(!cache.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_click_and_reopen_requeries() {
        let (directory, mut cache, mut rx) = setup(false);
        cache.on_name_input("Je");
        settle(&mut cache, &mut rx, 10).await;
        cache.on_outside_click();
        assert!(cache.entries().is_empty());

        cache.on_name_input("Je");
        settle(&mut cache, &mut rx, 10).await;
        assert_eq!(directory.queries().len(), 2);
        assert!(cache.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_dismiss_is_ignored() {
        let (_directory, mut cache, mut rx) = setup(false);
        cache.on_name_input("Je");
        cache.on_outside_click();
        settle(&mut cache, &mut rx, 10).await;
        assert!(cache.entries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_failure_reports_message() {
        let (_directory, mut cache, mut rx) = setup(true);
        cache.on_name_input("Je");
        tokio::time::sleep(Duration::from_millis(10)).await;
        let event = rx.try_recv().expect("failure event");
        match cache.apply(event) {
            Some(SuggestionOutcome::Failed { message }) => assert!(!message.contains("timeout")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(cache.entries().is_empty());
    }
}
