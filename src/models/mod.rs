//! Data structures for tournament results: participants, group tables, knockout matches, rankings.

mod group;
mod knockout;
mod participant;
mod ranking;
mod results;

pub use group::{GroupPlayer, GroupStageTable, MatchScore, PositionMark, Standing};
pub use knockout::{
    match_id, parse_match_id, BestOf, GridPosition, KnockoutMatch, MatchResultEntry, ResultType,
    Side, BYE_SCORE, THIRD_PLACE_MATCH_ID,
};
pub use participant::{Participant, ParticipantId, Registrant, BYE_ID, PLACEHOLDER_PREFIX};
pub use ranking::{FinalRanking, QualifiedPlayer};
pub use results::{ParticipationResults, ResultsError, SaveResultsRequest, TournamentResults};
