// Draft engine: snake order, player pool, rosters, and session state.

pub mod order;
pub mod pick;
pub mod player;
pub mod roster;
pub mod state;
