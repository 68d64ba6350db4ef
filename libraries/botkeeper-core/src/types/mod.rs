mod ids;
mod interaction;
mod stats;
mod user;

pub use ids::UserId;
pub use interaction::{Interaction, NewInteraction, INTERACTION_HISTORY_LIMIT};
pub use stats::Stats;
pub use user::{NewUser, User, UserFilter, UserUpsert};
