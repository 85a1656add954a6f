//! In-memory incident store using DashMap.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use saferoute_core::{CreateIncidentRequest, Incident, VoteType};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncidentError {
    #[error("incident {0} not found")]
    NotFound(String),
    #[error("only the reporting user can delete incident {0}")]
    Forbidden(String),
    #[error("user {user_id} already voted on incident {incident_id}")]
    AlreadyVoted { incident_id: String, user_id: String },
}

/// Thread-safe store for incident reports and their votes.
pub struct IncidentStore {
    incidents: DashMap<String, Incident>,
    /// (incident id, user id) -> vote cast
    votes: DashMap<(String, String), VoteType>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self {
            incidents: DashMap::new(),
            votes: DashMap::new(),
        }
    }

    pub fn create(&self, request: CreateIncidentRequest) -> Incident {
        let now = Utc::now();
        let incident = Incident {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id,
            incident_type: request.incident_type,
            description: request.description,
            location: request.location,
            severity: request.severity,
            date: request.date.unwrap_or(now),
            is_anonymous: request.is_anonymous,
            image_uri: request.image_uri,
            upvotes: 0,
            downvotes: 0,
            created_at: now,
        };
        self.incidents.insert(incident.id.clone(), incident.clone());
        incident
    }

    /// All incidents, newest first.
    pub fn list(&self) -> Vec<Incident> {
        let mut incidents: Vec<Incident> =
            self.incidents.iter().map(|r| r.value().clone()).collect();
        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        incidents
    }

    pub fn get(&self, id: &str) -> Option<Incident> {
        self.incidents.get(id).map(|r| r.value().clone())
    }

    pub fn delete(&self, id: &str, user_id: &str) -> Result<(), IncidentError> {
        let removed = self
            .incidents
            .remove_if(id, |_, incident| incident.user_id == user_id);
        if removed.is_some() {
            self.votes.retain(|(incident_id, _), _| incident_id != id);
            return Ok(());
        }

        if self.incidents.contains_key(id) {
            Err(IncidentError::Forbidden(id.to_string()))
        } else {
            Err(IncidentError::NotFound(id.to_string()))
        }
    }

    /// Record one vote per user per incident and return the updated incident.
    pub fn vote(&self, id: &str, user_id: &str, vote: VoteType) -> Result<Incident, IncidentError> {
        let Some(mut incident) = self.incidents.get_mut(id) else {
            return Err(IncidentError::NotFound(id.to_string()));
        };

        match self.votes.entry((id.to_string(), user_id.to_string())) {
            Entry::Occupied(_) => {
                return Err(IncidentError::AlreadyVoted {
                    incident_id: id.to_string(),
                    user_id: user_id.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(vote);
            }
        }

        match vote {
            VoteType::Upvote => incident.upvotes += 1,
            VoteType::Downvote => incident.downvotes += 1,
        }
        Ok(incident.clone())
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}
