pub mod cat;
pub mod movement;
pub mod needs;

pub use cat::{in_conflict, starting_household, Cat, Quirk};
pub use movement::{Activity, Intent, MovementState, Route};
pub use needs::{HealthChange, HealthReason, Needs};
