//! Table tennis tournament results: group tables, knockout brackets and final rankings,
//! plus the registry and results store the web server exposes.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod registry;
pub mod store;

pub use config::AppConfig;
pub use logic::{
    bracket_position, calculate_standings, cross_seed, derive_final_rankings, generate_bracket,
    merge_rankings, record_result, seed_third_place, select_qualified, set_match_participant,
    upsert_override, EditCommand, ResultsEditor,
};
pub use models::{
    match_id, parse_match_id, BestOf, FinalRanking, GridPosition, GroupPlayer, GroupStageTable,
    KnockoutMatch, MatchResultEntry, MatchScore, Participant, ParticipantId, ParticipationResults,
    PositionMark, QualifiedPlayer, Registrant, ResultType, ResultsError, SaveResultsRequest, Side,
    Standing, TournamentResults, BYE_ID, BYE_SCORE, THIRD_PLACE_MATCH_ID,
};
pub use registry::{ParticipantRegistry, RegistryError};
pub use store::{ResultsStore, StoreError};
