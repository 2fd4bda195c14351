pub mod payload;
pub mod session;
pub mod skill;

pub use payload::Payload;
pub use session::{Credentials, SessionToken};
pub use skill::{
    Course, Level1Category, Level2Category, MainCategoryReport, ResultDocument, SkillBlock, Trait,
};
