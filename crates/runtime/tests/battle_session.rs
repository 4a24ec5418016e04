use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use battle_core::{
    BattleEvent, Combatant, CritTier, EncounterState, LogTone, PlayerAction, ProgressSnapshot,
    TimingTier,
};
use battle_runtime::{
    ActOutcome, Presenter, Runtime, RuntimeConfig, RuntimeError, RuntimeEvent, RuntimeHandle,
};
use battle_core::{MonsterState, Phase};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq)]
enum Cue {
    Log(String),
    Stats(u32, u32, u32),
    Damage(Combatant, u32, CritTier),
    Heal(Combatant, u32),
    LevelUp(u32),
    Defeat(Combatant),
    Input(bool),
    Timing(TimingTier),
    Progress(u32),
    Round(u32, u32),
}

/// Presenter that records every call in order.
#[derive(Default)]
struct Recorder {
    cues: Mutex<Vec<Cue>>,
}

impl Recorder {
    fn push(&self, cue: Cue) {
        self.cues.lock().unwrap().push(cue);
    }

    fn take(&self) -> Vec<Cue> {
        std::mem::take(&mut *self.cues.lock().unwrap())
    }
}

#[async_trait]
impl Presenter for Recorder {
    async fn report_log(&self, message: &str, _tone: LogTone) {
        self.push(Cue::Log(message.to_owned()));
    }

    async fn report_stat_update(&self, player_hp: u32, monster_hp: u32, monster_max_hp: u32) {
        self.push(Cue::Stats(player_hp, monster_hp, monster_max_hp));
    }

    async fn report_damage(&self, target: Combatant, amount: u32, crit: CritTier) {
        self.push(Cue::Damage(target, amount, crit));
    }

    async fn report_heal(&self, target: Combatant, amount: u32) {
        self.push(Cue::Heal(target, amount));
    }

    async fn report_level_up(&self, level: u32) {
        self.push(Cue::LevelUp(level));
    }

    async fn report_defeat(&self, who: Combatant) {
        // Give the worker a chance to misbehave if it does not await us.
        tokio::task::yield_now().await;
        self.push(Cue::Defeat(who));
    }

    async fn set_input_enabled(&self, enabled: bool) {
        self.push(Cue::Input(enabled));
    }

    async fn report_timing(&self, tier: TimingTier) {
        self.push(Cue::Timing(tier));
    }

    async fn report_progress(&self, progress: ProgressSnapshot) {
        self.push(Cue::Progress(progress.level));
    }

    async fn report_round(&self, round: u32, monster_max_hp: u32, _damage_multiplier: f64) {
        self.push(Cue::Round(round, monster_max_hp));
    }
}

/// Manual-clock config so the agility pointer only moves when told to.
fn manual_clock(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        seed: Some(seed),
        agility_tick: None,
        ..RuntimeConfig::default()
    }
}

async fn start(seed: u64, state: Option<EncounterState>) -> (Runtime, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let mut builder = Runtime::builder()
        .config(manual_clock(seed))
        .presenter(recorder.clone());
    if let Some(state) = state {
        builder = builder.initial_state(state);
    }
    let runtime = builder.build().await.expect("runtime should start");
    (runtime, recorder)
}

fn drain(rx: &mut broadcast::Receiver<RuntimeEvent>) -> Vec<RuntimeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn stop(runtime: Runtime, handle: RuntimeHandle) {
    drop(handle);
    runtime.shutdown().await.expect("worker should stop cleanly");
}

#[tokio::test]
async fn turn_disables_input_until_fully_presented() {
    let (runtime, recorder) = start(1, None).await;
    let handle = runtime.handle();

    let outcome = handle.act(PlayerAction::Heal).await.unwrap();
    let snapshot = outcome.snapshot().expect("heal should complete").clone();
    assert!(snapshot.input_enabled);
    assert!(snapshot.agility.running);

    let cues = recorder.take();
    // Session start: stats, progress, input on.
    assert_eq!(cues[0], Cue::Stats(100, 1000, 1000));
    assert_eq!(cues[1], Cue::Progress(1));
    assert_eq!(cues[2], Cue::Input(true));

    let turn = &cues[3..];
    assert_eq!(turn.first(), Some(&Cue::Input(false)));
    assert_eq!(turn.last(), Some(&Cue::Input(true)));
    assert_eq!(
        turn.iter().filter(|c| matches!(c, Cue::Input(_))).count(),
        2,
        "input toggles exactly once per turn"
    );
    assert_eq!(turn[1], Cue::Log("You heal!".into()));
    assert!(turn.iter().any(|c| matches!(c, Cue::Heal(Combatant::Player, _))));

    stop(runtime, handle).await;
}

#[tokio::test]
async fn actions_queued_during_a_turn_are_ignored() {
    let (runtime, _recorder) = start(2, None).await;
    let handle = runtime.handle();
    let mut events = handle.subscribe();

    // Both commands are queued before the worker gets to run.
    handle.submit(PlayerAction::Heal).await.unwrap();
    let second = handle.act(PlayerAction::Attack).await.unwrap();
    assert_eq!(second, ActOutcome::Ignored);

    let events = drain(&mut events);
    assert_eq!(
        events.first(),
        Some(&RuntimeEvent::TurnStarted {
            action: PlayerAction::Heal
        })
    );
    let ignored = events
        .iter()
        .position(|e| *e == RuntimeEvent::ActionIgnored { action: PlayerAction::Attack })
        .expect("stale attack reported");
    let completed = events
        .iter()
        .position(|e| matches!(e, RuntimeEvent::TurnCompleted { .. }))
        .expect("turn completed");
    assert!(ignored < completed);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, RuntimeEvent::TurnStarted { .. }))
            .count(),
        1
    );

    // Input is back, so the next action plays normally.
    let third = handle.act(PlayerAction::Heal).await.unwrap();
    assert!(!third.is_ignored());

    stop(runtime, handle).await;
}

#[tokio::test]
async fn defeat_is_presented_before_round_advances() {
    let mut state = EncounterState::new();
    state.monster.hp = 1;
    let (runtime, recorder) = start(3, Some(state)).await;
    let handle = runtime.handle();

    let outcome = handle.act(PlayerAction::Attack).await.unwrap();
    let snapshot = outcome.snapshot().expect("attack should complete");
    assert_eq!(snapshot.state.round, 2);
    assert_eq!(snapshot.state.monster.hp, 2000);
    assert_eq!(snapshot.state.monster.damage_multiplier_tenths(), 11);

    let cues = recorder.take();
    let defeat = cues
        .iter()
        .position(|c| *c == Cue::Defeat(Combatant::Monster))
        .expect("defeat presented");
    let round = cues
        .iter()
        .position(|c| *c == Cue::Round(2, 2000))
        .expect("round presented");
    assert!(defeat < round);
    // The stats shown right after the defeat still show the fallen monster.
    assert!(cues[..defeat].contains(&Cue::Stats(100, 0, 1000)));
    // The monster does not act on the turn it falls.
    assert!(!cues.contains(&Cue::Log("Monster attacks!".into())));
    assert!(!cues.contains(&Cue::Log("Monster heals!".into())));

    stop(runtime, handle).await;
}

#[tokio::test]
async fn player_defeat_is_presented_before_revival() {
    let mut state = EncounterState::new();
    state.player.hp = 1;
    state.player.level = 3;
    state.player.xp = 7;
    // Base damage 100: any monster attack is lethal.
    state.monster = MonsterState::with_multiplier_tenths(10_000, 10);
    let (runtime, recorder) = start(7, Some(state)).await;
    let handle = runtime.handle();

    let mut fallen = None;
    for _ in 0..40 {
        let outcome = handle.act(PlayerAction::Heal).await.unwrap();
        let snapshot = outcome.snapshot().expect("heal should complete").clone();
        if snapshot.state.round == 2 {
            fallen = Some(snapshot);
            break;
        }
    }
    let snapshot = fallen.expect("the monster should land a hit");
    assert_eq!(snapshot.state.player.hp, 100);
    assert_eq!(snapshot.state.player.level, 3);
    assert_eq!(snapshot.state.player.xp, 7);
    // Only the monster respawns on a monster defeat.
    assert_eq!(snapshot.state.monster.max_hp, 10_000);
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.input_enabled);

    let cues = recorder.take();
    let defeat = cues
        .iter()
        .position(|c| *c == Cue::Defeat(Combatant::Player))
        .expect("defeat presented");
    let revival = cues
        .iter()
        .position(|c| *c == Cue::Log("Round 2: you rise again".into()))
        .expect("revival presented");
    assert!(defeat < revival);
    assert!(cues[..defeat].contains(&Cue::Log("You have fallen!".into())));
    assert!(cues[revival..].iter().any(|c| matches!(c, Cue::Stats(100, _, 10_000))));
    assert_eq!(cues.last(), Some(&Cue::Input(true)));

    stop(runtime, handle).await;
}

#[tokio::test]
async fn restored_defeat_finishes_its_round_before_input_opens() {
    let mut state = EncounterState::new();
    state.monster.hp = 0;
    let (runtime, recorder) = start(8, Some(state)).await;
    let handle = runtime.handle();

    let ready = handle.snapshot().await.unwrap();
    assert_eq!(ready.phase, Phase::Idle);
    assert!(ready.input_enabled);
    assert_eq!(ready.state.round, 2);
    assert_eq!(ready.state.monster.hp, 2000);

    let cues = recorder.take();
    let round = cues
        .iter()
        .position(|c| *c == Cue::Round(2, 2000))
        .expect("round presented");
    let input = cues
        .iter()
        .position(|c| *c == Cue::Input(true))
        .expect("input opened");
    assert!(round < input);
    // The defeat itself happened before the session started.
    assert!(!cues.iter().any(|c| matches!(c, Cue::Defeat(_))));

    for _ in 0..3 {
        let outcome = handle.act(PlayerAction::Heal).await.unwrap();
        assert!(!outcome.is_ignored());
    }

    stop(runtime, handle).await;
}

#[tokio::test]
async fn a_restored_fallen_player_rises_before_the_first_turn() {
    let mut state = EncounterState::new();
    state.player.hp = 0;
    let (runtime, _recorder) = start(9, Some(state)).await;
    let handle = runtime.handle();

    let outcome = handle.act(PlayerAction::Attack).await.unwrap();
    let snapshot = outcome.snapshot().expect("attack should complete");
    assert_eq!(snapshot.state.round, 2);
    assert_eq!(snapshot.state.monster.max_hp, 1000);

    stop(runtime, handle).await;
}

#[tokio::test]
async fn attack_samples_the_meter_where_it_stopped() {
    let (runtime, recorder) = start(4, None).await;
    let handle = runtime.handle();

    // Default track: 400 wide at 20 per tick, so 10 ticks reach the center.
    handle.advance_meter(10).await.unwrap();
    let before = handle.snapshot().await.unwrap();
    assert_eq!(before.agility.position, 200);
    assert_eq!(before.agility.tier, TimingTier::Perfect);

    // The second advance is queued behind the turn and lands while paused.
    handle.submit(PlayerAction::Attack).await.unwrap();
    handle.advance_meter(5).await.unwrap();
    let after = handle.snapshot().await.unwrap();
    assert_eq!(after.agility.position, 200);

    let cues = recorder.take();
    assert!(cues.contains(&Cue::Timing(TimingTier::Perfect)));
    assert!(cues.contains(&Cue::Log("Perfect!".into())));

    stop(runtime, handle).await;
}

#[tokio::test]
async fn agility_watch_follows_the_pointer() {
    let (runtime, _recorder) = start(6, None).await;
    let handle = runtime.handle();
    let agility = handle.agility();

    handle.advance_meter(4).await.unwrap();
    // The snapshot reply is sent after the advance was applied.
    handle.snapshot().await.unwrap();
    let view = *agility.borrow();
    assert_eq!(view.position, 80);
    assert_eq!(view.span, 400);
    assert!(view.running);
    assert!((view.ratio() - 0.2).abs() < f64::EPSILON);

    handle.act(PlayerAction::Heal).await.unwrap();
    let view = *agility.borrow();
    assert_eq!(view.position, 80, "a turn does not move the pointer");
    assert!(view.running);

    stop(runtime, handle).await;
}

#[tokio::test]
async fn same_seed_replays_the_same_battle() {
    async fn battle_log(seed: u64) -> Vec<BattleEvent> {
        let (runtime, _recorder) = start(seed, None).await;
        let handle = runtime.handle();
        let mut rx = handle.subscribe();

        for action in [
            PlayerAction::Attack,
            PlayerAction::Attack,
            PlayerAction::Heal,
            PlayerAction::Attack,
        ] {
            handle.advance_meter(3).await.unwrap();
            handle.act(action).await.unwrap();
        }

        let events = drain(&mut rx)
            .into_iter()
            .filter_map(|event| match event {
                RuntimeEvent::Battle(event) => Some(event),
                _ => None,
            })
            .collect();
        stop(runtime, handle).await;
        events
    }

    let first = battle_log(0xB055).await;
    let second = battle_log(0xB055).await;
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn runtime_events_serialize_to_json() {
    let (runtime, _recorder) = start(5, None).await;
    let handle = runtime.handle();
    let mut rx = handle.subscribe();

    handle.act(PlayerAction::Heal).await.unwrap();
    for event in drain(&mut rx) {
        let json = event.to_json().expect("event serializes");
        let back: RuntimeEvent = serde_json::from_str(&json).expect("event deserializes");
        assert_eq!(back, event);
    }

    stop(runtime, handle).await;
}

#[tokio::test]
async fn rejects_invalid_configuration() {
    let mut config = RuntimeConfig::default();
    config.battle.agility_step = 0;
    let err = Runtime::builder().config(config).build().await.err();
    assert!(matches!(err, Some(RuntimeError::Config(_))));

    let config = RuntimeConfig {
        agility_tick: Some(std::time::Duration::ZERO),
        ..RuntimeConfig::default()
    };
    let err = Runtime::builder().config(config).build().await.err();
    assert!(matches!(err, Some(RuntimeError::ZeroAgilityTick)));
}
