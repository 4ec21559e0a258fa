#![allow(non_snake_case)]

use engine::{
    Difficulty, FieldLayout, GameSession, GameVariant, ProbabilityMatrix, ProbabilityModel,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn start_game__places_the_configured_field_count_on_every_difficulty() {
    for difficulty in Difficulty::ALL {
        // given
        let config = difficulty.config();
        let mut rng = StdRng::seed_from_u64(42);

        // when
        let session = GameSession::new(difficulty, GameVariant::Enhanced, &mut rng);

        // then
        assert_eq!(session.field_count(), config.quantum_fields);
        assert_eq!(session.grid_size(), config.grid_size);
        assert_eq!(
            session.total_safe_cells(),
            u16::from(config.grid_size) * u16::from(config.grid_size)
                - config.quantum_fields
        );
    }
}

#[test]
fn start_game__field_cells_are_distinct() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = FieldLayout::generate(&Difficulty::Master.config(), &mut rng);

        let mut cells = layout.field_cells().to_vec();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len() as u16, layout.field_count());
    }
}

#[test]
fn start_game__probabilities_stay_in_unit_range_for_both_models() {
    for seed in 0..10 {
        for difficulty in Difficulty::ALL {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = FieldLayout::generate(&difficulty.config(), &mut rng);

            for model in [ProbabilityModel::Classic, ProbabilityModel::Advanced] {
                let matrix = ProbabilityMatrix::for_model(model, &layout);
                for value in matrix.iter() {
                    assert!(
                        (0.0..=1.0).contains(&value),
                        "{difficulty} {model:?} produced {value}"
                    );
                }
            }
        }
    }
}

#[test]
fn start_game__identical_seeds_give_identical_boards() {
    let config = Difficulty::Hard.config();
    let a = FieldLayout::generate(&config, &mut StdRng::seed_from_u64(7));
    let b = FieldLayout::generate(&config, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
}
