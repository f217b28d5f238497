use habitat_lib::engine::config::{MetabolismConfig, StatRange};
use habitat_lib::engine::{SpeciesDescriptor, StatModel, MAX_STAT};
use habitat_lib::{Animal, AnimalId, Coord, Direction, Gender, Landscape, SpeciesKind};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
enum StatOp {
    Decay,
    Eat(i32),
    Drink(i32),
    Damage(i32),
    Drain(i32, i32, i32),
}

fn arb_stat_op() -> impl Strategy<Value = StatOp> {
    prop_oneof![
        Just(StatOp::Decay),
        (-50i32..200).prop_map(StatOp::Eat),
        (-50i32..200).prop_map(StatOp::Drink),
        (0i32..300).prop_map(StatOp::Damage),
        (-20i32..150, -20i32..150, -20i32..150).prop_map(|(a, b, c)| StatOp::Drain(a, b, c)),
    ]
}

prop_compose! {
    fn arb_levels()(
        health in -100i32..250,
        hunger in -100i32..250,
        thirst in -100i32..250
    ) -> (i32, i32, i32) {
        (health, hunger, thirst)
    }
}

prop_compose! {
    fn arb_decay_rules()(
        lo in 0i32..20,
        span in 0i32..40,
        penalty in 0i32..30,
        grace in 0u32..20
    ) -> MetabolismConfig {
        MetabolismConfig {
            hunger_decay: StatRange::new(lo, lo + span),
            thirst_decay: StatRange::new(lo, lo + span),
            starvation_penalty: penalty,
            starvation_grace: grace,
            ..Default::default()
        }
    }
}

fn in_range(s: &StatModel) -> bool {
    let r = 0..=MAX_STAT;
    r.contains(&s.health()) && r.contains(&s.hunger()) && r.contains(&s.thirst())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_stats_stay_clamped(
        (health, hunger, thirst) in arb_levels(),
        rules in arb_decay_rules(),
        ops in prop::collection::vec(arb_stat_op(), 0..60),
        seed in any::<u64>()
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut stats = StatModel::new(10, 2, 500).with_levels(health, hunger, thirst);
        prop_assert!(in_range(&stats));
        for op in ops {
            match op {
                StatOp::Decay => stats.decay_tick(&rules, &mut rng),
                StatOp::Eat(n) => stats.eat(n),
                StatOp::Drink(n) => stats.drink(n),
                StatOp::Damage(n) => stats.apply_damage(n).unwrap(),
                StatOp::Drain(a, b, c) => stats.drain(a, b, c),
            }
            prop_assert!(in_range(&stats), "out of range after {:?}: {:?}", op, stats);
        }
    }

    #[test]
    fn test_negative_damage_never_applies(
        damage in i32::MIN..0,
    ) {
        let mut stats = StatModel::new(10, 2, 500);
        prop_assert!(stats.apply_damage(damage).is_err());
        prop_assert_eq!(stats.health(), MAX_STAT);
    }

    #[test]
    fn test_neighbors_idempotent_and_bounded(
        width in 1u16..30,
        height in 1u16..30,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0
    ) {
        let land = Landscape::new(width, height, 4, 20);
        let c = Coord::new(
            ((f64::from(width) * fx) as u16).min(width - 1),
            ((f64::from(height) * fy) as u16).min(height - 1),
        );
        let first: Vec<_> = land.neighbors_of(c).collect();
        let second: Vec<_> = land.neighbors_of(c).collect();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.len() <= 8);
        for n in &first {
            prop_assert!(land.in_bounds(*n));
            prop_assert_eq!(n.chebyshev(c), 1);
        }
    }

    #[test]
    fn test_moves_keep_registry_consistent(
        cap in 1usize..4,
        moves in prop::collection::vec((0usize..6, 0usize..8), 0..80)
    ) {
        let mut land = Landscape::new(4, 4, cap, 20);
        let mut animals: Vec<Animal> = (0..6u128)
            .map(|n| {
                Animal::new(
                    AnimalId::from_bits(n + 1),
                    SpeciesDescriptor::default_for(SpeciesKind::Rabbit),
                    Gender::Female,
                )
            })
            .collect();
        for (i, a) in animals.iter_mut().enumerate() {
            let at = Coord::new((i % 4) as u16, (i / 4) as u16);
            land.place(a, at).unwrap();
        }

        for (who, dir) in moves {
            let animal = &mut animals[who];
            let before = animal.position();
            let Some(to) = before.step(Direction::ALL[dir]) else {
                continue;
            };
            if land.move_occupant(animal, to).is_err() {
                prop_assert_eq!(animal.position(), before);
            }
            prop_assert!(land.is_consistent_with(animals.iter()));
            for (c, cell) in land.cells() {
                prop_assert!(cell.occupant_count() <= cap, "cell {} over cap", c);
            }
        }
    }
}
