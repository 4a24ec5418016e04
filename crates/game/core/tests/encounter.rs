use battle_core::combat::player_attack_damage;
use battle_core::progression::{apply_xp, xp_for_damage};
use battle_core::{
    BattleEvent, Combatant, CritTier, Encounter, EncounterState, Phase, PlayerIntent, ScriptedRng,
    Step, TimingTier,
};

/// Every roll at its minimum and never a crit.
fn minimum_rolls() -> ScriptedRng {
    ScriptedRng::new([0.0, 0.5])
}

#[test]
fn first_attack_with_minimum_roll() {
    let mut state = EncounterState::new();
    let mut rng = minimum_rolls();

    let roll = player_attack_damage(&mut rng, state.player.level, 1.0);
    assert_eq!(roll.damage, 15);
    assert_eq!(roll.crit, CritTier::None);

    state.monster.take_damage(roll.damage);
    apply_xp(&mut state.player, xp_for_damage(roll.damage));

    assert_eq!(state.monster.hp, 985);
    assert_eq!(state.player.xp, 3);
    assert_eq!(state.player.level, 1);
}

#[test]
fn attacking_until_the_monster_falls_starts_round_two() {
    let mut state = EncounterState::new();
    let mut rng = minimum_rolls();
    let mut attacks = 0;

    while !state.monster.is_defeated() {
        let roll = player_attack_damage(&mut rng, state.player.level, 1.0);
        state.monster.take_damage(roll.damage);
        apply_xp(&mut state.player, xp_for_damage(roll.damage));
        attacks += 1;
    }
    // 1000 HP at 15 per hit needs 67 hits; level-ups only shorten that.
    assert!(attacks <= 67);
    assert!(state.player.level > 1);

    state.advance_round(Combatant::Monster);
    assert_eq!(state.round, 2);
    assert_eq!(state.monster.max_hp, 2000);
    assert_eq!(state.monster.hp, 2000);
    assert_eq!(state.monster.damage_multiplier(), 1.1);
}

#[test]
fn ten_monster_defeats_cycle_the_tier() {
    let mut state = EncounterState::new();
    let mut maxima = Vec::new();
    for _ in 0..10 {
        state.monster.take_damage(state.monster.hp);
        state.advance_round(Combatant::Monster);
        maxima.push(state.monster.max_hp);
    }

    assert_eq!(state.round, 11);
    assert_eq!(maxima[8], 10_000);
    assert_eq!(maxima[9], 1000);
    assert_eq!(state.monster.damage_multiplier_tenths(), 20);
}

#[test]
fn state_machine_walks_a_full_monster_kill() {
    // Player always lands minimum Perfect hits; monster always heals for its minimum.
    let mut encounter = Encounter::new(ScriptedRng::new([0.0, 0.5, 0.9, 0.0]));
    let mut turns = 0;

    loop {
        let report = encounter.play_turn(PlayerIntent::Attack(TimingTier::Perfect));
        assert!(!report.ignored);
        turns += 1;
        if report.defeated() == Some(Combatant::Monster) {
            let advanced = report.events.iter().find_map(|event| match event {
                BattleEvent::RoundAdvanced {
                    round,
                    monster_max_hp,
                    ..
                } => Some((*round, *monster_max_hp)),
                _ => None,
            });
            assert_eq!(advanced, Some((2, 2000)));
            break;
        }
        assert!(turns < 500, "monster never fell");
    }

    assert_eq!(encounter.phase(), Phase::Idle);
    assert_eq!(encounter.state().round, 2);
    assert!(encounter.accepts_input());
}

#[test]
fn defeat_is_reported_before_the_round_changes() {
    let mut state = EncounterState::new();
    state.monster.hp = 1;
    let mut encounter = Encounter::with_state(state, minimum_rolls());

    let step = encounter.submit(PlayerIntent::Attack(TimingTier::Bad));
    let Step::Resolved { events, next } = step else {
        panic!("attack should resolve");
    };
    assert_eq!(next, Phase::RoundTransition(Combatant::Monster));
    assert!(events.contains(&BattleEvent::Defeated {
        who: Combatant::Monster
    }));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, BattleEvent::RoundAdvanced { .. }))
    );
    assert_eq!(encounter.state().monster.hp, 0);

    assert!(!encounter.advance().is_ignored());
    assert_eq!(encounter.state().monster.hp, 2000);
}
