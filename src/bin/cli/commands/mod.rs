pub mod add;
pub mod delete;
pub mod due;
pub mod edit;
pub mod list;
pub mod migrate;
pub mod preview;
pub mod review;
pub mod show;
pub mod stats;
