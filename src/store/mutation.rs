use uuid::Uuid;

use crate::entities::Place;
use crate::error::{invalid_state_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
}

impl Operation {
    pub fn name(&self) -> String {
        match self {
            Self::Add => "add".into(),
            Self::Remove => "remove".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

/// One optimistic change to the user's places.
///
/// `begin` snapshots the collection and applies the change in place, after
/// which the mutation is either committed (the snapshot is dropped) or rolled
/// back (the snapshot is handed back verbatim, so anything else that changed
/// in the meantime is discarded too).
#[derive(Clone, Debug)]
pub struct Mutation {
    pub id: Uuid,
    pub operation: Operation,
    pub place: Place,
    snapshot: Vec<Place>,
    state: State,
}

impl Mutation {
    pub fn new(operation: Operation, place: Place) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            place,
            snapshot: Vec::new(),
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn snapshot(&self) -> &[Place] {
        &self.snapshot
    }

    /// Returns whether `places` was modified.
    pub fn begin(&mut self, places: &mut Vec<Place>) -> Result<bool, Error> {
        if self.state != State::Idle {
            return Err(invalid_state_error());
        }

        self.snapshot = places.clone();
        self.state = State::Pending;

        let modified = match self.operation {
            Operation::Add => {
                if places.iter().any(|p| p.id == self.place.id) {
                    false
                } else {
                    places.push(self.place.clone());
                    true
                }
            }
            Operation::Remove => {
                let len = places.len();
                places.retain(|p| p.id != self.place.id);
                places.len() != len
            }
        };

        Ok(modified)
    }

    pub fn commit(&mut self) -> Result<(), Error> {
        if self.state != State::Pending {
            return Err(invalid_state_error());
        }

        self.snapshot = Vec::new();
        self.state = State::Committed;

        Ok(())
    }

    pub fn rollback(&mut self) -> Result<Vec<Place>, Error> {
        if self.state != State::Pending {
            return Err(invalid_state_error());
        }

        self.state = State::RolledBack;

        Ok(std::mem::take(&mut self.snapshot))
    }
}
