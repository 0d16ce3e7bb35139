pub mod attempt;
pub mod mailing;
pub mod recipient;
pub mod report;
pub mod sweep;
pub mod template;
