mod clean;
mod pages;
mod records;
mod run;
mod sections;
mod segment;
#[cfg(test)]
mod tests;

pub use records::read_lessons;
pub use run::run;
