pub mod analysis;
pub mod farm_profile;
pub mod observation;
pub mod recommendation;
pub mod variety;
pub mod zone;

pub use analysis::*;
pub use farm_profile::*;
pub use observation::*;
pub use recommendation::*;
pub use variety::*;
pub use zone::*;
