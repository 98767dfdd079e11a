//! Results business logic: standings, qualification, bracket, advancement, editing.

mod advancement;
mod bracket;
mod editor;
mod qualification;
mod rankings;
mod standings;

pub use advancement::{
    derive_final_rankings, record_result, seed_third_place, set_match_participant,
};
pub use bracket::{bracket_position, cross_seed, generate_bracket};
pub use editor::{EditCommand, ResultsEditor};
pub use qualification::select_qualified;
pub use rankings::{merge_rankings, upsert_override};
pub use standings::calculate_standings;
