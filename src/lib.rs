//! src/lib.rs
pub mod codec;
pub mod configuration;
pub mod emitter;
pub mod error;
pub mod executors;
pub mod file_splitter;
pub mod functions;
pub mod index;
pub mod mappers;
pub mod mapreduce;
pub mod master;
pub mod reducers;
pub mod registry;
pub mod shuffle;
pub mod spec;
pub mod startup;
pub mod stop_words;
pub mod telemetry;
pub mod tokenizer;
pub mod worker;
