//! Corpus assembly and cleaning.

pub mod assemble;
pub mod clean;

pub use assemble::{assemble, list_message_files, Assembly, AssemblyReport, SkippedFile};
pub use clean::{clean, CleanedCorpus, CleaningReport};
