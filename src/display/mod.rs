mod selector;

pub use selector::{ClassSelection, ClassSelector, ShowOnly};
