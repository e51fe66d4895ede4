pub mod directory;
pub mod layout;
pub mod lifecycle;
pub mod properties;

pub use directory::{
    CorruptData, DeleteError, Directory, InitError, LoadAll, LoadError, LoadFailure, SaveAllError,
    SaveError,
};
pub use properties::{ParseError, Properties};
