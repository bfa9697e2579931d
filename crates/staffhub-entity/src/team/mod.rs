//! Team domain entities.

pub mod model;

pub use model::{AddTeamMember, CreateTeam, Team, TeamMember, UpdateTeam};
