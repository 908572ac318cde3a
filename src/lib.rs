pub mod index;
pub mod output;
pub mod parser;
pub mod rater;
pub mod report;
pub mod standards;
