//! Participant registry: who is registered for which tournament and participation type.

use crate::models::{Participant, Registrant, BYE_ID};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Errors raised while loading or registering participants.
#[derive(Debug)]
pub enum RegistryError {
    /// The CSV could not be read or a row did not deserialize.
    Csv(csv::Error),
    /// This id is already registered for the tournament.
    DuplicateRegistrant { tournament_id: String, id: String },
    /// A required field is blank.
    MissingField(&'static str),
    /// The id is reserved for bracket byes.
    ReservedId(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Csv(e) => write!(f, "Could not read registrations: {}", e),
            RegistryError::DuplicateRegistrant { tournament_id, id } => write!(
                f,
                "Participant {} is already registered for tournament {}",
                id, tournament_id
            ),
            RegistryError::MissingField(field) => write!(f, "Field '{}' must not be empty", field),
            RegistryError::ReservedId(id) => write!(f, "Participant id '{}' is reserved", id),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for RegistryError {
    fn from(e: csv::Error) -> Self {
        RegistryError::Csv(e)
    }
}

/// One line of the registrations CSV.
#[derive(Debug, Deserialize)]
struct RegistrationRow {
    tournament_id: String,
    id: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    club: String,
    participation_type: String,
}

/// Registrations grouped by tournament id, in registration order.
#[derive(Clone, Debug, Default)]
pub struct ParticipantRegistry {
    by_tournament: HashMap<String, Vec<Registrant>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a CSV file with header
    /// `tournament_id,id,first_name,last_name,club,participation_type`.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let reader = csv::Reader::from_path(path.as_ref())?;
        Self::from_csv(reader)
    }

    pub fn from_csv_reader<R: std::io::Read>(rdr: R) -> Result<Self, RegistryError> {
        Self::from_csv(csv::Reader::from_reader(rdr))
    }

    fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for row in reader.deserialize() {
            let row: RegistrationRow = row?;
            registry.register(
                &row.tournament_id,
                Registrant {
                    id: row.id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    club: row.club,
                    participation_type: row.participation_type,
                },
            )?;
        }
        log::info!(
            "Loaded {} registration(s) for {} tournament(s)",
            registry.len(),
            registry.by_tournament.len()
        );
        Ok(registry)
    }

    /// Register one participant. Ids are unique per tournament.
    pub fn register(&mut self, tournament_id: &str, registrant: Registrant) -> Result<(), RegistryError> {
        if tournament_id.trim().is_empty() {
            return Err(RegistryError::MissingField("tournament_id"));
        }
        if registrant.id.trim().is_empty() {
            return Err(RegistryError::MissingField("id"));
        }
        if registrant.id.trim() == BYE_ID {
            return Err(RegistryError::ReservedId(registrant.id));
        }
        if registrant.participation_type.trim().is_empty() {
            return Err(RegistryError::MissingField("participation_type"));
        }
        let entries = self
            .by_tournament
            .entry(tournament_id.trim().to_string())
            .or_default();
        if entries.iter().any(|r| r.id == registrant.id) {
            return Err(RegistryError::DuplicateRegistrant {
                tournament_id: tournament_id.to_string(),
                id: registrant.id,
            });
        }
        entries.push(registrant);
        Ok(())
    }

    /// Registrations for a tournament, optionally limited to one participation type.
    pub fn registrants(&self, tournament_id: &str, participation_type: Option<&str>) -> Vec<Registrant> {
        self.by_tournament
            .get(tournament_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|r| participation_type.map_or(true, |t| r.participation_type == t))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Same as [`Self::registrants`], as display-ready participants.
    pub fn participants(&self, tournament_id: &str, participation_type: Option<&str>) -> Vec<Participant> {
        self.registrants(tournament_id, participation_type)
            .iter()
            .map(Registrant::to_participant)
            .collect()
    }

    /// Distinct participation types registered for a tournament, in first-seen order.
    pub fn participation_types(&self, tournament_id: &str) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for r in self.by_tournament.get(tournament_id).into_iter().flatten() {
            if !types.contains(&r.participation_type) {
                types.push(r.participation_type.clone());
            }
        }
        types
    }

    /// Total registrations across all tournaments.
    pub fn len(&self) -> usize {
        self.by_tournament.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
