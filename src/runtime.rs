//! Async wrapper around a `GameSession`.
//!
//! All mutations go through `act`, which holds the session's write lock for
//! the whole action and publishes the events it produced before releasing it.
//! The tick loop is just another caller of `act`, so growth and forage
//! completion are serialized with player actions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::events::GameEvent;
use crate::game::{GameSession, SessionSnapshot};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct GameHandle {
    session: Arc<RwLock<GameSession>>,
    events: broadcast::Sender<GameEvent>,
    clock: Arc<dyn Clock>,
}

impl GameHandle {
    pub fn new(session: GameSession, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: Arc::new(RwLock::new(session)),
            events,
            clock,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Run one action against the session at the current time.
    pub async fn act<T>(&self, action: impl FnOnce(&mut GameSession, u64) -> T) -> T {
        let mut session = self.session.write().await;
        let now = self.clock.now_ms();
        let output = action(&mut *session, now);

        for event in session.drain_events() {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        output
    }

    /// Read-only access to the session.
    pub async fn read<T>(&self, view: impl FnOnce(&GameSession) -> T) -> T {
        let session = self.session.read().await;
        view(&*session)
    }

    pub async fn tick(&self) {
        self.act(|session, now| session.tick(now)).await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let now = self.clock.now_ms();
        self.read(|session| session.snapshot(now)).await
    }

    /// Tick the session every `interval` until the returned task is aborted.
    pub fn spawn_tick_loop(&self, interval: Duration) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            loop {
                interval.tick().await;
                handle.tick().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::GameConfig;
    use crate::data::{GameData, ItemDefinition, ItemRegistry};
    use crate::error::{EngineError, ValidationError};
    use crate::farming::SeedRegistry;
    use crate::scene::{Scene, SceneRegistry};
    use crate::skills::ExperienceTable;

    fn handle(clock: Arc<ManualClock>) -> GameHandle {
        let apple = ItemDefinition::new("apple", 50, 20, 1);
        let items: ItemRegistry = [apple.clone()].into_iter().collect();
        let mut scenes = SceneRegistry::new();
        scenes.insert(Scene {
            id: "forest".to_string(),
            display_name: "Forest".to_string(),
            description: String::new(),
            adjacent: Vec::new(),
            loot: vec![apple],
            difficulty: 1,
            bank: false,
            farm: false,
        });
        let data = GameData::from_parts(items, SeedRegistry::new(), scenes, ExperienceTable::standard())
            .unwrap();
        let config = GameConfig {
            rng_seed: Some(3),
            ..GameConfig::default()
        };
        let session = GameSession::new(Arc::new(data), &config).unwrap();
        GameHandle::new(session, clock)
    }

    #[tokio::test]
    async fn test_act_publishes_events() {
        let clock = Arc::new(ManualClock::new(10_000));
        let game = handle(clock.clone());
        let mut rx = game.subscribe();

        let due_at = game.act(|s, now| s.begin_forage(now)).await.unwrap();
        assert_eq!(due_at, 15_000);

        match rx.recv().await.unwrap() {
            GameEvent::ForageStarted { scene, due_at, .. } => {
                assert_eq!(scene, "forest");
                assert_eq!(due_at, 15_000);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let err = game.act(|s, now| s.begin_forage(now)).await.unwrap_err();
        assert_eq!(err, EngineError::Validation(ValidationError::ForageInProgress));
    }

    #[tokio::test]
    async fn test_tick_uses_clock() {
        let clock = Arc::new(ManualClock::new(0));
        let game = handle(clock.clone());

        game.act(|s, now| s.begin_forage(now)).await.unwrap();
        game.tick().await;
        assert!(game.read(GameSession::is_foraging).await);

        clock.advance(5_000);
        game.tick().await;
        assert!(!game.read(GameSession::is_foraging).await);
        assert_eq!(game.read(|s| s.inventory().count_of("apple")).await, 1);

        let snapshot = game.snapshot().await;
        assert_eq!(snapshot.now, 5_000);
        assert_eq!(snapshot.collection, (1, 1));
    }

    #[tokio::test]
    async fn test_tick_loop_completes_forage() {
        let clock = Arc::new(ManualClock::new(0));
        let game = handle(clock.clone());
        let mut rx = game.subscribe();

        game.act(|s, now| s.begin_forage(now)).await.unwrap();
        clock.advance(60_000);
        let ticker = game.spawn_tick_loop(Duration::from_millis(5));

        let foraged = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Ok(GameEvent::ItemForaged { item_id, .. }) = rx.recv().await {
                    return item_id;
                }
            }
        })
        .await
        .unwrap();

        ticker.abort();
        assert_eq!(foraged, "apple");
    }
}
