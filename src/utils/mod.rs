//! Utility functions and types

pub mod data_loader;

pub use data_loader::{load_csv, save_csv, train_test_split, ResumeDataset, ResumeRecord, TrainTestSplit};
