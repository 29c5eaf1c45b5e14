// 🗂️ Entity Models - Card identities and their time-sliced versions

pub mod card;

pub use card::{Card, CardVersion};
